//! Synthetic input generation for tests and examples.

pub mod synthetic;

pub use synthetic::{generate_streams, SyntheticConfig};
