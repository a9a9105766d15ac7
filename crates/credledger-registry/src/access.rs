use credledger_core::AccessGrant;
use credledger_store::TxContext;

use crate::error::{validate_doc_id, RegistryError, RegistryResult, StoreContext};
use crate::keys::ACCESS_NAMESPACE;

/// Audit trail of third parties granted visibility into a document.
///
/// Grants are bookkeeping only and are never consulted for access control.
pub struct AccessGrantLog;

impl AccessGrantLog {
    /// Record that `requester_id` was granted access to `doc_id`.
    ///
    /// Repeated grants for the same pair overwrite the earlier record.
    pub fn grant(tx: &TxContext<'_>, doc_id: &str, requester_id: &str) -> RegistryResult<AccessGrant> {
        const OP: &str = "GrantAccess";
        validate_doc_id(doc_id)?;

        if !tx.get_state(doc_id).during(OP)?.is_some_and(|v| !v.is_empty()) {
            return Err(RegistryError::NotFound(doc_id.to_string()));
        }

        let record = AccessGrant {
            doc_id: doc_id.to_string(),
            requested_by: requester_id.to_string(),
            granted_at: tx.ledger_time().during(OP)?,
        };
        let key = tx
            .composite_key(ACCESS_NAMESPACE, &[doc_id, requester_id])
            .during(OP)?;
        let data = serde_json::to_vec(&record).map_err(|e| RegistryError::Serialization {
            op: OP,
            key: key.clone(),
            reason: e.to_string(),
        })?;
        tx.put_state(&key, data).during(OP)?;

        tracing::info!(doc_id = %doc_id, requester = %requester_id, "access granted");
        Ok(record)
    }

    /// Every committed grant recorded for `doc_id`, ordered by requester id.
    pub fn grants_for(tx: &TxContext<'_>, doc_id: &str) -> RegistryResult<Vec<AccessGrant>> {
        const OP: &str = "GetAccessGrants";
        validate_doc_id(doc_id)?;

        let mut grants = Vec::new();
        for entry in tx.partial_composite_scan(ACCESS_NAMESPACE, &[doc_id]).during(OP)? {
            let (key, value) = entry.during(OP)?;
            let grant = serde_json::from_slice(&value).map_err(|e| RegistryError::Serialization {
                op: OP,
                key,
                reason: e.to_string(),
            })?;
            grants.push(grant);
        }
        Ok(grants)
    }
}
