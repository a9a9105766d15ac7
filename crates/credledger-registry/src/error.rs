use credledger_core::CoreError;
use credledger_store::StoreError;

/// Errors surfaced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: String },

    #[error("credential {0} not found")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("issuer {issuer_id} has no relationship with holder {holder_id}")]
    NotAffiliated { holder_id: String, issuer_id: String },

    #[error("credential {doc_id}: {source}")]
    InvalidTransition { doc_id: String, source: CoreError },

    #[error("{op} failed: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{op}: record at {key} could not be decoded: {reason}")]
    Serialization {
        op: &'static str,
        key: String,
        reason: String,
    },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("{function} expects {expected} arguments, got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },
}

impl RegistryError {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) | Self::ArgumentCount { .. } | Self::UnknownFunction(_) => {
                "VALIDATION"
            }
            Self::NotAffiliated { .. } => "NOT_AFFILIATED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Store {
                source: StoreError::Conflict { .. },
                ..
            } => "CONFLICT",
            Self::Store { .. } => "STORE",
            Self::Serialization { .. } => "SERIALIZATION",
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Attaches the operation name to store failures.
pub(crate) trait StoreContext<T> {
    fn during(self, op: &'static str) -> RegistryResult<T>;
}

impl<T> StoreContext<T> for Result<T, StoreError> {
    fn during(self, op: &'static str) -> RegistryResult<T> {
        self.map_err(|source| match source {
            StoreError::InvalidKey(msg) | StoreError::InvalidCompositeKey(msg) => {
                RegistryError::Validation(format!("{}: {}", op, msg))
            }
            source => RegistryError::Store { op, source },
        })
    }
}

/// Reject identifiers that would collide with the composite-key namespace.
pub(crate) fn validate_doc_id(doc_id: &str) -> RegistryResult<()> {
    if doc_id.is_empty() {
        return Err(RegistryError::Validation("docId must not be empty".into()));
    }
    if doc_id.contains('\u{0}') {
        return Err(RegistryError::Validation(format!(
            "docId {:?} contains a reserved character",
            doc_id
        )));
    }
    Ok(())
}
