//! Process-wide diagnostics setup for catalog services and test binaries.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with};
