/// World-state errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid composite key: {0}")]
    InvalidCompositeKey(String),

    #[error("read conflict on key {key:?}: value changed before commit")]
    Conflict { key: String },

    #[error("invalid transaction timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<rocksdb::Error> for StoreError {
    fn from(e: rocksdb::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
