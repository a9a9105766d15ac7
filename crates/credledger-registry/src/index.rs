//! Secondary indexes: issuer, holder, and organization → credential.
//!
//! Each index entry is a composite key `(namespace, [indexed value, doc id])`
//! with a one-byte sentinel payload. Resolution is tolerant: entries whose
//! key has too few parts, or whose doc id no longer resolves, are skipped so
//! that a partial failure never blocks the rest of an enumeration.

use credledger_core::Credential;
use credledger_store::{split_composite_key, TxContext};

use crate::error::{RegistryError, RegistryResult, StoreContext};
use crate::keys::{HOLDER_INDEX, INDEX_SENTINEL, ISSUER_INDEX, ORGANIZATION_INDEX};

/// Lazily resolved credentials.
pub type CredentialIter<'t> = Box<dyn Iterator<Item = RegistryResult<Credential>> + 't>;

/// The attribute a secondary index is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Issuer,
    Holder,
    Organization,
}

impl IndexKind {
    pub const ALL: [IndexKind; 3] = [IndexKind::Issuer, IndexKind::Holder, IndexKind::Organization];

    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Issuer => ISSUER_INDEX,
            Self::Holder => HOLDER_INDEX,
            Self::Organization => ORGANIZATION_INDEX,
        }
    }

    /// The value of `credential` this index is keyed on.
    pub fn value_of<'c>(&self, credential: &'c Credential) -> &'c str {
        match self {
            Self::Issuer => &credential.issuer_id,
            Self::Holder => &credential.holder_id,
            Self::Organization => &credential.issuer_org_id,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Self::Issuer => "GetCredentialsByIssuer",
            Self::Holder => "GetHolderCredentials",
            Self::Organization => "GetIssuerCredentials",
        }
    }
}

/// Maintains and resolves the credential secondary indexes.
pub struct SecondaryIndex;

impl SecondaryIndex {
    /// Buffer one entry per index for a newly issued credential.
    pub fn register(tx: &TxContext<'_>, credential: &Credential) -> RegistryResult<()> {
        for kind in IndexKind::ALL {
            let key = tx
                .composite_key(kind.namespace(), &[kind.value_of(credential), credential.doc_id.as_str()])
                .during("IssueCredential")?;
            tx.put_state(&key, INDEX_SENTINEL.to_vec())
                .during("IssueCredential")?;
        }
        Ok(())
    }

    /// Credentials whose `kind` attribute equals `value`, in index key order.
    pub fn lookup<'t>(
        tx: &'t TxContext<'_>,
        kind: IndexKind,
        value: &str,
    ) -> RegistryResult<CredentialIter<'t>> {
        let op = kind.operation();
        let entries = tx
            .partial_composite_scan(kind.namespace(), &[value])
            .during(op)?;

        let resolved = entries.filter_map(move |entry| {
            let (key, _) = match entry.during(op) {
                Ok(kv) => kv,
                Err(e) => return Some(Err(e)),
            };
            Self::resolve_entry(tx, op, &key).transpose()
        });

        Ok(Box::new(resolved))
    }

    pub fn by_issuer<'t>(tx: &'t TxContext<'_>, issuer_id: &str) -> RegistryResult<CredentialIter<'t>> {
        Self::lookup(tx, IndexKind::Issuer, issuer_id)
    }

    pub fn by_holder<'t>(tx: &'t TxContext<'_>, holder_id: &str) -> RegistryResult<CredentialIter<'t>> {
        Self::lookup(tx, IndexKind::Holder, holder_id)
    }

    pub fn by_organization<'t>(
        tx: &'t TxContext<'_>,
        organization_id: &str,
    ) -> RegistryResult<CredentialIter<'t>> {
        Self::lookup(tx, IndexKind::Organization, organization_id)
    }

    /// Every credential in the store, in ascending key order.
    ///
    /// Walks the whole keyspace and keeps only values that decode as a
    /// credential; index sentinels, relationships, and access grants fall
    /// out. Cost is proportional to the total number of keys.
    pub fn scan_all<'t>(tx: &'t TxContext<'_>) -> RegistryResult<CredentialIter<'t>> {
        let op = "GetAllCredentials";
        let entries = tx.range_scan("", "").during(op)?;

        let credentials = entries.filter_map(move |entry| match entry.during(op) {
            Ok((_, value)) => Credential::from_json_bytes(&value).ok().map(Ok),
            Err(e) => Some(Err(e)),
        });

        Ok(Box::new(credentials))
    }

    fn resolve_entry(
        tx: &TxContext<'_>,
        op: &'static str,
        key: &str,
    ) -> RegistryResult<Option<Credential>> {
        let (_, parts) = split_composite_key(key).during(op)?;
        let Some(doc_id) = parts.get(1) else {
            tracing::debug!(key = ?key, "skipping index entry with too few parts");
            return Ok(None);
        };

        let Some(bytes) = tx.get_state(doc_id).during(op)? else {
            tracing::warn!(doc_id = %doc_id, op, "skipping dangling index entry");
            return Ok(None);
        };
        if bytes.is_empty() {
            tracing::warn!(doc_id = %doc_id, op, "skipping dangling index entry");
            return Ok(None);
        }

        Credential::from_json_bytes(&bytes)
            .map(Some)
            .map_err(|e| RegistryError::Serialization {
                op,
                key: doc_id.clone(),
                reason: e.to_string(),
            })
    }
}
