use quorum_ballot::BallotError;
use quorum_membership::MembershipError;
use quorum_types::{AccountAddress, ProposalId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("{0} does not hold a membership credential")]
    NotAMember(AccountAddress),

    #[error("{0} is not allowed to create proposals")]
    NoProposalAbility(AccountAddress),

    #[error("metadata location is {len} bytes, limit is {max}")]
    InvalidMetadataLocation { len: usize, max: usize },

    #[error("metadata hash is {len} bytes, limit is {max}")]
    InvalidMetadataHash { len: usize, max: usize },

    #[error("{voter} has already voted on proposal {proposal_id}")]
    AlreadyVoted {
        voter: AccountAddress,
        proposal_id: ProposalId,
    },

    #[error("voting on proposal {0} is closed")]
    VotingClosed(ProposalId),

    #[error("{0} is not the governance system identity")]
    NotSystemIdentity(AccountAddress),

    #[error("proposal id {0} has not been allocated")]
    InvalidProposalId(ProposalId),

    #[error("proposal {0} has not succeeded and cannot be resolved")]
    ProposalCannotBeResolved(ProposalId),

    #[error("no approved execution hash for proposal {0}")]
    HashDoesNotExist(ProposalId),

    #[error("no capability registered under ({key}, {description})")]
    CapabilityNotFound { key: String, description: String },

    #[error("invalid governance config: {0}")]
    InvalidConfig(String),

    #[error("ballot ledger: {0}")]
    Ballot(#[from] BallotError),

    #[error("membership: {0}")]
    Membership(#[from] MembershipError),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
