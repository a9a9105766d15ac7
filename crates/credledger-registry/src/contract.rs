//! Named-operation dispatch.
//!
//! The host invokes the ledger by operation name with positional string
//! arguments. [`CredentialContract::invoke`] parses those arguments, routes
//! to the registry components, and returns a serializable [`Response`].

use std::fmt;
use std::str::FromStr;

use credledger_core::{
    AccessGrant, Attributes, CoreError, Credential, CredentialDraft, LedgerConfig,
};
use credledger_store::TxContext;
use serde::Serialize;

use crate::access::AccessGrantLog;
use crate::error::{RegistryError, RegistryResult};
use crate::index::{CredentialIter, SecondaryIndex};
use crate::manager::CredentialManager;
use crate::relationship::RelationshipRegistry;
use crate::verifier::IntegrityVerifier;

/// Every operation the ledger exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    IssueCredential,
    AddIssuerHolderRelationship,
    CheckIssuerHolderRelationship,
    AddOrganizationAffiliation,
    CheckOrganizationAffiliation,
    AcceptCredential,
    DenyCredential,
    ReadCredential,
    VerifyHash,
    GetAllCredentials,
    GetIssuerCredentials,
    GetOrganizationCredentials,
    GetCredentialsByIssuer,
    GetHolderCredentials,
    GrantAccess,
    GetAccessGrants,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Self::IssueCredential,
        Self::AddIssuerHolderRelationship,
        Self::CheckIssuerHolderRelationship,
        Self::AddOrganizationAffiliation,
        Self::CheckOrganizationAffiliation,
        Self::AcceptCredential,
        Self::DenyCredential,
        Self::ReadCredential,
        Self::VerifyHash,
        Self::GetAllCredentials,
        Self::GetIssuerCredentials,
        Self::GetOrganizationCredentials,
        Self::GetCredentialsByIssuer,
        Self::GetHolderCredentials,
        Self::GrantAccess,
        Self::GetAccessGrants,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::IssueCredential => "IssueCredential",
            Self::AddIssuerHolderRelationship => "AddIssuerHolderRelationship",
            Self::CheckIssuerHolderRelationship => "CheckIssuerHolderRelationship",
            Self::AddOrganizationAffiliation => "AddOrganizationAffiliation",
            Self::CheckOrganizationAffiliation => "CheckOrganizationAffiliation",
            Self::AcceptCredential => "AcceptCredential",
            Self::DenyCredential => "DenyCredential",
            Self::ReadCredential => "ReadCredential",
            Self::VerifyHash => "VerifyHash",
            Self::GetAllCredentials => "GetAllCredentials",
            Self::GetIssuerCredentials => "GetIssuerCredentials",
            Self::GetOrganizationCredentials => "GetOrganizationCredentials",
            Self::GetCredentialsByIssuer => "GetCredentialsByIssuer",
            Self::GetHolderCredentials => "GetHolderCredentials",
            Self::GrantAccess => "GrantAccess",
            Self::GetAccessGrants => "GetAccessGrants",
        }
    }

    /// Number of positional arguments.
    pub fn arity(&self) -> usize {
        match self {
            Self::IssueCredential => 13,
            Self::AddIssuerHolderRelationship
            | Self::CheckIssuerHolderRelationship
            | Self::AddOrganizationAffiliation
            | Self::CheckOrganizationAffiliation
            | Self::VerifyHash
            | Self::GrantAccess => 2,
            Self::GetAllCredentials => 0,
            _ => 1,
        }
    }

    /// Whether the operation never writes state.
    pub fn is_read_only(&self) -> bool {
        !matches!(
            self,
            Self::IssueCredential
                | Self::AddIssuerHolderRelationship
                | Self::AddOrganizationAffiliation
                | Self::AcceptCredential
                | Self::DenyCredential
                | Self::GrantAccess
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| RegistryError::UnknownFunction(s.to_string()))
    }
}

/// Result of an operation, serialized as the bare value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Empty,
    Bool(bool),
    Credential(Box<Credential>),
    Credentials(Vec<Credential>),
    AccessGrant(AccessGrant),
    AccessGrants(Vec<AccessGrant>),
}

/// Entry point binding operation names to the registry.
pub struct CredentialContract {
    manager: CredentialManager,
}

impl CredentialContract {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            manager: CredentialManager::new(config),
        }
    }

    pub fn manager(&self) -> &CredentialManager {
        &self.manager
    }

    /// Run `function` inside `tx`. The caller decides whether to commit.
    pub fn invoke(&self, tx: &TxContext<'_>, function: &str, args: &[String]) -> RegistryResult<Response> {
        let op: Operation = function.parse()?;
        if args.len() != op.arity() {
            return Err(RegistryError::ArgumentCount {
                function: op.name().to_string(),
                expected: op.arity(),
                got: args.len(),
            });
        }
        let arg = |i: usize| args[i].as_str();

        tracing::debug!(tx_id = %tx.tx_id(), op = %op, "invoking operation");

        let response = match op {
            Operation::IssueCredential => {
                CredentialManager::ensure_absent(tx, arg(0))?;
                let draft = issue_draft(args)?;
                Response::Credential(Box::new(self.manager.issue(tx, draft)?))
            }
            Operation::AddIssuerHolderRelationship => {
                RelationshipRegistry::register(tx, arg(0), arg(1))?;
                Response::Empty
            }
            Operation::CheckIssuerHolderRelationship => {
                Response::Bool(RelationshipRegistry::exists(tx, arg(0), arg(1))?)
            }
            Operation::AddOrganizationAffiliation => {
                RelationshipRegistry::register_affiliation(tx, arg(0), arg(1))?;
                Response::Empty
            }
            Operation::CheckOrganizationAffiliation => {
                Response::Bool(RelationshipRegistry::affiliation_exists(tx, arg(0), arg(1))?)
            }
            Operation::AcceptCredential => {
                Response::Credential(Box::new(self.manager.accept(tx, arg(0))?))
            }
            Operation::DenyCredential => Response::Credential(Box::new(self.manager.deny(tx, arg(0))?)),
            Operation::ReadCredential => {
                Response::Credential(Box::new(CredentialManager::read(tx, arg(0))?))
            }
            Operation::VerifyHash => {
                Response::Bool(IntegrityVerifier::verify_hash(tx, arg(0), arg(1))?)
            }
            Operation::GetAllCredentials => collect(SecondaryIndex::scan_all(tx)?)?,
            Operation::GetIssuerCredentials | Operation::GetOrganizationCredentials => {
                collect(SecondaryIndex::by_organization(tx, arg(0))?)?
            }
            Operation::GetCredentialsByIssuer => collect(SecondaryIndex::by_issuer(tx, arg(0))?)?,
            Operation::GetHolderCredentials => collect(SecondaryIndex::by_holder(tx, arg(0))?)?,
            Operation::GrantAccess => Response::AccessGrant(AccessGrantLog::grant(tx, arg(0), arg(1))?),
            Operation::GetAccessGrants => Response::AccessGrants(AccessGrantLog::grants_for(tx, arg(0))?),
        };

        Ok(response)
    }
}

fn collect(iter: CredentialIter<'_>) -> RegistryResult<Response> {
    Ok(Response::Credentials(iter.collect::<RegistryResult<Vec<_>>>()?))
}

/// Positional order: docId, docHash, holderId, issuerId, issuerOrgId, type,
/// title, description, achievementDate, expirationDate, programLength,
/// domain, attributes JSON.
fn issue_draft(args: &[String]) -> RegistryResult<CredentialDraft> {
    let attributes = Attributes::from_json(&args[12]).map_err(|e| match e {
        CoreError::ValidationError(msg) => RegistryError::Validation(msg),
        other => RegistryError::Validation(other.to_string()),
    })?;

    Ok(CredentialDraft {
        doc_id: args[0].clone(),
        doc_hash: args[1].clone(),
        holder_id: args[2].clone(),
        issuer_id: args[3].clone(),
        issuer_org_id: args[4].clone(),
        credential_type: args[5].clone(),
        title: args[6].clone(),
        description: args[7].clone(),
        achievement_date: args[8].clone(),
        expiration_date: args[9].clone(),
        program_length: args[10].clone(),
        domain: args[11].clone(),
        attributes,
    })
}
