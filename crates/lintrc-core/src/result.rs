//! Result type alias used throughout the crate.

use crate::error::LintrcError;

/// Result type for configuration resolution operations
pub type Result<T> = std::result::Result<T, LintrcError>;
