/// Background capture thread and its latest-frame mailbox.
pub mod session;
/// Frame sources.
pub mod source;
