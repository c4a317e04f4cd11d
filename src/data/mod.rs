//! Data sources other than operator-recorded files.

pub mod synthetic;

pub use synthetic::{generate_dataset, SyntheticSpec};
