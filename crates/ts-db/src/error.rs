//! Gateway errors

use std::path::PathBuf;

use thiserror::Error;
use ts_core::{Id, TsError};

/// Failures of the storage behind a gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate timesheet id {0} in snapshot")]
    DuplicateId(Id),
    #[error("Timesheet {id} in snapshot is inconsistent: {source}")]
    InvalidTimesheet {
        id: Id,
        #[source]
        source: TsError,
    },
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for TsError {
    fn from(err: GatewayError) -> Self {
        TsError::Gateway(err.to_string())
    }
}
