//! Namespaces partitioning the shared world-state keyspace.

/// issuer id → doc id.
pub const ISSUER_INDEX: &str = "issuer~doc";
/// holder id → doc id.
pub const HOLDER_INDEX: &str = "holder~doc";
/// issuer organization id → doc id.
pub const ORGANIZATION_INDEX: &str = "issuerOrg~doc";

/// (holder id, issuer id) relationship records.
pub const RELATIONSHIP_NAMESPACE: &str = "issuer-holder";
/// (user id, organization id) affiliation records.
pub const AFFILIATION_NAMESPACE: &str = "affiliation";
/// (doc id, requester id) access grant records.
pub const ACCESS_NAMESPACE: &str = "access";

/// Payload of every index entry. Not valid JSON, so full scans skip it.
pub const INDEX_SENTINEL: [u8; 1] = [0];

pub const EVENT_CREDENTIAL_ISSUED: &str = "CredentialIssued";
pub const EVENT_CREDENTIAL_ACCEPTED: &str = "CredentialAccepted";
pub const EVENT_CREDENTIAL_DENIED: &str = "CredentialDenied";
