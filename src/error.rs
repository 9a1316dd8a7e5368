//! Error types for the tracker core.
//!
//! Missing or malformed history files are not errors: the store treats both as
//! an empty history. Everything else surfaces here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("invalid timer target: {minutes} minutes (expected {min}..={max})")]
    InvalidConfiguration { minutes: u32, min: u32, max: u32 },

    #[error("failed to persist history to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure came from writing history to disk.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            TrackerError::Persistence { .. } | TrackerError::Encode(_)
        )
    }
}
