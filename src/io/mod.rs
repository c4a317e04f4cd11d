//! Input/output helpers.
//!
//! - calibration dataset JSON (`calibration`)
//! - raw readings from the command line or a JSON file (`reading`)
//! - persisted calibration results (`export`)

pub mod calibration;
pub mod export;
pub mod reading;

pub use calibration::*;
pub use export::*;
pub use reading::*;
