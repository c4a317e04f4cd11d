//! Reporting utilities: fit diagnostics and formatted terminal output.

pub mod diagnostics;
pub mod format;

pub use diagnostics::*;
pub use format::*;
