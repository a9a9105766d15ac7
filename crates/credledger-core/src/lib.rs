//! Credledger Core — Record types, errors, and the acceptance state machine
//! shared by every layer of the credential ledger.

pub mod config;
pub mod error;
pub mod status;
pub mod types;

pub use config::LedgerConfig;
pub use error::CoreError;
pub use status::{AcceptanceStatus, DecisionEvent, DecisionPolicy, StatusMachine};
pub use types::{
    AccessGrant, Affiliation, Attributes, Credential, CredentialDraft, IssuerHolderRelationship,
    ACTIVE_STATUS,
};
