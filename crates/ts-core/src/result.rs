//! Result type aliases

use crate::error::TsError;

/// Standard Result type for workflow operations
pub type TsResult<T> = Result<T, TsError>;
