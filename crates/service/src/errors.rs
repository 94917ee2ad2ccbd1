use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected before any state changed.
    #[error("validation error: {0}")]
    Validation(String),
    /// The artifact exists but cannot be parsed under the configured encoding.
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// Reading the artifact failed for a reason other than it being absent.
    #[error("failed to read {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing the artifact failed; the in-memory value has already changed.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn content_too_long(chars: usize, limit: usize) -> Self {
        Self::Validation(format!(
            "content has {chars} characters, exceeding the limit of {limit}"
        ))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Decode { .. } => 1101,
            ServiceError::Load { .. } => 1102,
            ServiceError::Persist { .. } => 1201,
        }
    }

    /// True when the logical write took effect in memory but not on disk.
    pub fn is_persist(&self) -> bool {
        matches!(self, ServiceError::Persist { .. })
    }
}
