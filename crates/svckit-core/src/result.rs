//! Result type alias for svckit operations.

use crate::SvcError;

/// A specialized `Result` for svckit operations.
pub type SvcResult<T> = Result<T, SvcError>;
