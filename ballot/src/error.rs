use quorum_types::ProposalId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal execution hash cannot be empty")]
    EmptyExecutionHash,

    #[error("early resolution threshold {early} is below the minimum vote threshold {min}")]
    InvalidMinVoteThreshold { min: u128, early: u128 },

    #[error("voting on proposal {0} is closed")]
    VotingClosed(ProposalId),

    #[error("proposal {0} has not succeeded")]
    NotSucceeded(ProposalId),

    #[error("proposal {0} is already resolved")]
    AlreadyResolved(ProposalId),

    #[error("executing script hash does not match the hash approved for proposal {0}")]
    ExecutionHashMismatch(ProposalId),

    #[error("proposal {0} is multi-step and must be resolved step by step")]
    MultiStepResolveRequired(ProposalId),

    #[error("single-step proposal {0} cannot carry a next execution hash")]
    SingleStepCannotContinue(ProposalId),

    #[error("{0}")]
    Other(String),
}
