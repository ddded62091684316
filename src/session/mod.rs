/// The [`Session`](context::Session) type.
pub mod context;
/// Notices and notification sinks.
pub mod notify;
/// Update messages accepted by a session.
pub mod update;
