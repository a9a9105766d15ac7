use credledger_core::{Affiliation, IssuerHolderRelationship};
use credledger_store::TxContext;
use serde::Serialize;

use crate::error::{RegistryError, RegistryResult, StoreContext};
use crate::keys::{AFFILIATION_NAMESPACE, RELATIONSHIP_NAMESPACE};

/// Append-only eligibility facts: issuer↔holder relationships and
/// user↔organization affiliations.
///
/// A present record grants eligibility regardless of its `status` value.
/// Pairs are ordered: registering `(A, B)` says nothing about `(B, A)`.
pub struct RelationshipRegistry;

impl RelationshipRegistry {
    pub fn register(tx: &TxContext<'_>, holder_id: &str, issuer_id: &str) -> RegistryResult<()> {
        let record = IssuerHolderRelationship::active(holder_id, issuer_id);
        Self::insert(
            tx,
            "AddIssuerHolderRelationship",
            "relationship",
            RELATIONSHIP_NAMESPACE,
            [holder_id, issuer_id],
            &record,
        )?;
        tracing::info!(holder = %holder_id, issuer = %issuer_id, "issuer-holder relationship registered");
        Ok(())
    }

    pub fn exists(tx: &TxContext<'_>, holder_id: &str, issuer_id: &str) -> RegistryResult<bool> {
        Self::present(
            tx,
            "CheckIssuerHolderRelationship",
            RELATIONSHIP_NAMESPACE,
            [holder_id, issuer_id],
        )
    }

    pub fn register_affiliation(
        tx: &TxContext<'_>,
        user_id: &str,
        organization_id: &str,
    ) -> RegistryResult<()> {
        let record = Affiliation::active(user_id, organization_id);
        Self::insert(
            tx,
            "AddOrganizationAffiliation",
            "affiliation",
            AFFILIATION_NAMESPACE,
            [user_id, organization_id],
            &record,
        )?;
        tracing::info!(user = %user_id, org = %organization_id, "organization affiliation registered");
        Ok(())
    }

    pub fn affiliation_exists(
        tx: &TxContext<'_>,
        user_id: &str,
        organization_id: &str,
    ) -> RegistryResult<bool> {
        Self::present(
            tx,
            "CheckOrganizationAffiliation",
            AFFILIATION_NAMESPACE,
            [user_id, organization_id],
        )
    }

    fn insert<R: Serialize>(
        tx: &TxContext<'_>,
        op: &'static str,
        kind: &'static str,
        namespace: &str,
        pair: [&str; 2],
        record: &R,
    ) -> RegistryResult<()> {
        let key = tx.composite_key(namespace, &pair).during(op)?;
        if tx.get_state(&key).during(op)?.is_some_and(|v| !v.is_empty()) {
            return Err(RegistryError::AlreadyExists {
                kind,
                key: format!("({}, {})", pair[0], pair[1]),
            });
        }

        let data = serde_json::to_vec(record).map_err(|e| RegistryError::Serialization {
            op,
            key: key.clone(),
            reason: e.to_string(),
        })?;
        tx.put_state(&key, data).during(op)
    }

    fn present(
        tx: &TxContext<'_>,
        op: &'static str,
        namespace: &str,
        pair: [&str; 2],
    ) -> RegistryResult<bool> {
        let key = tx.composite_key(namespace, &pair).during(op)?;
        Ok(tx.get_state(&key).during(op)?.is_some_and(|v| !v.is_empty()))
    }
}
