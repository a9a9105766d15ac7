use credledger_core::{
    Credential, CredentialDraft, DecisionEvent, DecisionPolicy, LedgerConfig, StatusMachine,
};
use credledger_store::TxContext;

use crate::error::{validate_doc_id, RegistryError, RegistryResult, StoreContext};
use crate::index::SecondaryIndex;
use crate::keys::{EVENT_CREDENTIAL_ACCEPTED, EVENT_CREDENTIAL_DENIED, EVENT_CREDENTIAL_ISSUED};
use crate::relationship::RelationshipRegistry;

/// Creates credentials, applies holder decisions, and reads records back.
pub struct CredentialManager {
    policy: DecisionPolicy,
    require_relationship: bool,
}

impl CredentialManager {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            policy: config.decision_policy(),
            require_relationship: config.require_relationship,
        }
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Issue a credential together with its issuer, holder, and organization index entries.
    pub fn issue(&self, tx: &TxContext<'_>, draft: CredentialDraft) -> RegistryResult<Credential> {
        const OP: &str = "IssueCredential";
        Self::ensure_absent(tx, &draft.doc_id)?;

        if self.require_relationship
            && !RelationshipRegistry::exists(tx, &draft.holder_id, &draft.issuer_id)?
        {
            return Err(RegistryError::NotAffiliated {
                holder_id: draft.holder_id,
                issuer_id: draft.issuer_id,
            });
        }

        let ledger_timestamp = tx.ledger_time().during(OP)?;
        let credential = draft.into_credential(ledger_timestamp);
        let data = encode(OP, &credential)?;

        SecondaryIndex::register(tx, &credential)?;
        tx.put_state(&credential.doc_id, data.clone()).during(OP)?;
        tx.set_event(EVENT_CREDENTIAL_ISSUED, data);

        tracing::info!(
            doc_id = %credential.doc_id,
            holder = %credential.holder_id,
            issuer = %credential.issuer_id,
            org = %credential.issuer_org_id,
            credential_type = %credential.credential_type,
            "credential issued"
        );

        Ok(credential)
    }

    /// Fail with `AlreadyExists` if `doc_id` already holds a record.
    pub fn ensure_absent(tx: &TxContext<'_>, doc_id: &str) -> RegistryResult<()> {
        validate_doc_id(doc_id)?;
        if tx
            .get_state(doc_id)
            .during("IssueCredential")?
            .is_some_and(|v| !v.is_empty())
        {
            return Err(RegistryError::AlreadyExists {
                kind: "credential",
                key: doc_id.to_string(),
            });
        }
        Ok(())
    }

    /// Mark a credential as accepted by its holder.
    pub fn accept(&self, tx: &TxContext<'_>, doc_id: &str) -> RegistryResult<Credential> {
        self.decide(tx, doc_id, DecisionEvent::Accept, "AcceptCredential")
    }

    /// Mark a credential as denied by its holder.
    pub fn deny(&self, tx: &TxContext<'_>, doc_id: &str) -> RegistryResult<Credential> {
        self.decide(tx, doc_id, DecisionEvent::Deny, "DenyCredential")
    }

    fn decide(
        &self,
        tx: &TxContext<'_>,
        doc_id: &str,
        event: DecisionEvent,
        op: &'static str,
    ) -> RegistryResult<Credential> {
        let mut credential = Self::load(tx, doc_id, op)?;

        let next = StatusMachine::transition(credential.status(), event, self.policy).map_err(
            |source| RegistryError::InvalidTransition {
                doc_id: doc_id.to_string(),
                source,
            },
        )?;
        credential.set_status(next);

        let data = encode(op, &credential)?;
        tx.put_state(doc_id, data.clone()).during(op)?;
        let event_name = match event {
            DecisionEvent::Accept => EVENT_CREDENTIAL_ACCEPTED,
            DecisionEvent::Deny => EVENT_CREDENTIAL_DENIED,
        };
        tx.set_event(event_name, data);

        tracing::info!(doc_id = %doc_id, status = %next, "credential decision recorded");
        Ok(credential)
    }

    /// Fetch a credential by document id.
    pub fn read(tx: &TxContext<'_>, doc_id: &str) -> RegistryResult<Credential> {
        Self::load(tx, doc_id, "ReadCredential")
    }

    pub(crate) fn load(tx: &TxContext<'_>, doc_id: &str, op: &'static str) -> RegistryResult<Credential> {
        let bytes = tx
            .get_state(doc_id)
            .during(op)?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RegistryError::NotFound(doc_id.to_string()))?;

        Credential::from_json_bytes(&bytes).map_err(|e| RegistryError::Serialization {
            op,
            key: doc_id.to_string(),
            reason: e.to_string(),
        })
    }
}

fn encode(op: &'static str, credential: &Credential) -> RegistryResult<Vec<u8>> {
    credential
        .to_json_bytes()
        .map_err(|e| RegistryError::Serialization {
            op,
            key: credential.doc_id.clone(),
            reason: e.to_string(),
        })
}
