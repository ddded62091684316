/// Backend trait and raster types.
pub mod backend;
/// CPU backend built on `vello_cpu`.
pub mod cpu;
/// Zoom/pan/rotate/flip view transform.
pub mod view;

#[cfg(test)]
pub(crate) mod stub;
