//! Utility modules: error types and output formatting.

pub mod errors;
pub mod pretty;

pub use errors::{BuildError, EmitError, SpdError, SpdResult};
pub use pretty::CodeFormatter;
