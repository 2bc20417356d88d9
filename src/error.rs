use crate::types::WorkoutType;
use thiserror::Error;

/// Rejected creation input. Reported as one aggregate error, never per field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown workout type: {0:?}")]
    UnknownType(String),

    /// `fields` lists the offending inputs for diagnostics.
    #[error("data entered is not valid for {kind} ({})", .fields.join(", "))]
    InvalidFields {
        kind: WorkoutType,
        fields: Vec<&'static str>,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage quota exceeded writing {key:?}: {needed} bytes, quota {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("encoding snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("decoding snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no workout with id {0:?}")]
    NotFound(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        Self::Persistence(PersistenceError::Storage(e))
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
