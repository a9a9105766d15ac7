//! Records persisted in the ledger's world state.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::status::AcceptanceStatus;

/// Status written on every relationship and affiliation record.
pub const ACTIVE_STATUS: &str = "active";

/// Free-form, string-valued credential attributes.
///
/// No key set is assumed; the only requirement is that the input is a
/// well-formed string→string mapping. A JSON `null` reads as empty, both
/// in issuer input and in stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<BTreeMap<String, String>>::deserialize(deserializer)?;
        Ok(Self(map.unwrap_or_default()))
    }
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse attributes from a JSON object. `null` yields an empty mapping.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::ValidationError(format!("failed to parse attributes JSON: {}", e)))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A credential record (degree, certificate, badge, …) keyed by `doc_id`.
///
/// Only `accepted` and `denied` change after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub doc_id: String,
    /// Digest of the off-ledger document, supplied by the issuer and never recomputed.
    pub doc_hash: String,
    /// Kind of credential (degree, certificate, badge, …).
    #[serde(rename = "type")]
    pub credential_type: String,
    pub holder_id: String,
    pub issuer_id: String,
    pub issuer_org_id: String,
    pub accepted: bool,
    pub denied: bool,
    pub title: String,
    pub description: String,
    /// RFC3339 transaction time of issuance.
    pub ledger_timestamp: String,
    pub achievement_date: String,
    pub expiration_date: String,
    /// Length of the program, e.g. "4 years".
    pub program_length: String,
    /// Field or area of the credential.
    pub domain: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Credential {
    /// Current acceptance status.
    pub fn status(&self) -> AcceptanceStatus {
        AcceptanceStatus::from_flags(self.accepted, self.denied)
    }

    /// Overwrite both flags from a status.
    pub fn set_status(&mut self, status: AcceptanceStatus) {
        let (accepted, denied) = status.flags();
        self.accepted = accepted;
        self.denied = denied;
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::SerializationError(e.to_string()))
    }
}

/// Issuer-supplied fields of a credential, before the ledger stamps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDraft {
    pub doc_id: String,
    pub doc_hash: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub holder_id: String,
    pub issuer_id: String,
    pub issuer_org_id: String,
    pub title: String,
    pub description: String,
    pub achievement_date: String,
    pub expiration_date: String,
    pub program_length: String,
    pub domain: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl CredentialDraft {
    /// Stamp the draft with the ledger timestamp, producing a pending credential.
    pub fn into_credential(self, ledger_timestamp: String) -> Credential {
        Credential {
            doc_id: self.doc_id,
            doc_hash: self.doc_hash,
            credential_type: self.credential_type,
            holder_id: self.holder_id,
            issuer_id: self.issuer_id,
            issuer_org_id: self.issuer_org_id,
            accepted: false,
            denied: false,
            title: self.title,
            description: self.description,
            ledger_timestamp,
            achievement_date: self.achievement_date,
            expiration_date: self.expiration_date,
            program_length: self.program_length,
            domain: self.domain,
            attributes: self.attributes,
        }
    }
}

/// Asserts that an issuer may issue credentials to a holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerHolderRelationship {
    pub holder_id: String,
    pub issuer_id: String,
    pub status: String,
}

impl IssuerHolderRelationship {
    pub fn active(holder_id: &str, issuer_id: &str) -> Self {
        Self {
            holder_id: holder_id.to_string(),
            issuer_id: issuer_id.to_string(),
            status: ACTIVE_STATUS.to_string(),
        }
    }
}

/// Asserts that a user belongs to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
    pub user_id: String,
    pub organization_id: String,
    pub status: String,
}

impl Affiliation {
    pub fn active(user_id: &str, organization_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            organization_id: organization_id.to_string(),
            status: ACTIVE_STATUS.to_string(),
        }
    }
}

/// Audit record of a third party being granted visibility into a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub doc_id: String,
    pub requested_by: String,
    pub granted_at: String,
}
