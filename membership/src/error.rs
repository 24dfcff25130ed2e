use crate::credential::CredentialAddress;
use quorum_types::{AccountAddress, ProposalId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("no credential at {0}")]
    CredentialNotFound(CredentialAddress),

    #[error("{0} already holds a credential")]
    AlreadyIssued(AccountAddress),

    #[error("credential has no attribute `{0}`")]
    AttributeMissing(String),

    #[error("attribute `{attribute}` is not of type {expected}")]
    AttributeType {
        attribute: String,
        expected: &'static str,
    },

    #[error("vote record already contains proposal {0}")]
    DuplicateVoteRecord(ProposalId),
}
