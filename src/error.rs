//! Dashboard and persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from [`Dashboard`](crate::Dashboard) updates and persistence.
///
/// The indicator engine itself never fails; only state lookups and file
/// storage do.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No instrument with this id is held by the dashboard.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// No alert with this id is held by the dashboard.
    #[error("unknown alert: {0}")]
    UnknownAlert(String),

    /// Reading or writing the snapshot file failed.
    #[error("snapshot i/o at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded or decoded.
    #[error("snapshot encoding: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
