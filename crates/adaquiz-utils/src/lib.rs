pub mod args;
pub mod net;
pub mod tracing;
