use credledger_store::TxContext;

use crate::error::RegistryResult;
use crate::manager::CredentialManager;

/// Compares caller-supplied document hashes against the stored `docHash`.
pub struct IntegrityVerifier;

impl IntegrityVerifier {
    /// Exact, case-sensitive comparison with no normalization.
    pub fn verify_hash(tx: &TxContext<'_>, doc_id: &str, candidate_hash: &str) -> RegistryResult<bool> {
        let credential = CredentialManager::load(tx, doc_id, "VerifyHash")?;
        let matches = credential.doc_hash == candidate_hash;
        tracing::debug!(doc_id = %doc_id, matches, "hash verified");
        Ok(matches)
    }
}
