//! Proposals as stored by the ballot ledger.

use quorum_types::{AccountAddress, ExecutionHash, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle state reported for a proposal at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// Voting is still open.
    Pending,
    /// Voting closed with more yes than no votes and enough total participation.
    Succeeded,
    /// Voting closed without meeting the success conditions.
    Failed,
}

/// Off-ledger pointer to the human-readable description of a proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalMetadata {
    /// Where the proposal text lives (URL, content address, ...).
    pub location: Vec<u8>,
    /// Hash of the text found at `location`.
    pub hash: Vec<u8>,
}

/// Everything the ledger needs to open a new proposal.
#[derive(Clone, Debug)]
pub struct NewProposal {
    pub proposer: AccountAddress,
    pub execution_hash: ExecutionHash,
    pub min_vote_threshold: u128,
    pub expiration: Timestamp,
    pub early_resolution_vote_threshold: Option<u128>,
    pub metadata: ProposalMetadata,
    pub is_multi_step: bool,
}

/// A proposal held by the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BallotProposal {
    pub id: ProposalId,
    pub proposer: AccountAddress,
    /// Hash of the artifact cleared to run for the current step.
    pub execution_hash: ExecutionHash,
    pub min_vote_threshold: u128,
    pub early_resolution_vote_threshold: Option<u128>,
    pub expiration: Timestamp,
    pub created_at: Timestamp,
    pub metadata: ProposalMetadata,
    pub yes_votes: u128,
    pub no_votes: u128,
    pub is_resolved: bool,
    pub is_multi_step: bool,
    /// Time of the last resolution step, if any.
    pub resolved_at: Option<Timestamp>,
}

impl BallotProposal {
    /// Early resolution is possible once either side reaches the early threshold.
    pub fn can_be_resolved_early(&self) -> bool {
        match self.early_resolution_vote_threshold {
            Some(threshold) => self.yes_votes >= threshold || self.no_votes >= threshold,
            None => false,
        }
    }

    pub fn is_voting_closed(&self, now: Timestamp) -> bool {
        self.is_resolved || now.is_after(self.expiration) || self.can_be_resolved_early()
    }

    pub fn state(&self, now: Timestamp) -> ProposalState {
        if !self.is_voting_closed(now) {
            return ProposalState::Pending;
        }
        let total = self.yes_votes.saturating_add(self.no_votes);
        if self.yes_votes > self.no_votes && total >= self.min_vote_threshold {
            ProposalState::Succeeded
        } else {
            ProposalState::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(min: u128, early: Option<u128>, yes: u128, no: u128) -> BallotProposal {
        BallotProposal {
            id: 0,
            proposer: AccountAddress::new("0x1"),
            execution_hash: ExecutionHash::new(vec![1]),
            min_vote_threshold: min,
            early_resolution_vote_threshold: early,
            expiration: Timestamp::new(100),
            created_at: Timestamp::new(0),
            metadata: ProposalMetadata::default(),
            yes_votes: yes,
            no_votes: no,
            is_resolved: false,
            is_multi_step: false,
            resolved_at: None,
        }
    }

    #[test]
    fn test_pending_before_expiration() {
        let p = proposal(1, None, 5, 0);
        assert_eq!(p.state(Timestamp::new(100)), ProposalState::Pending);
    }

    #[test]
    fn test_succeeds_after_expiration() {
        let p = proposal(3, None, 2, 1);
        assert_eq!(p.state(Timestamp::new(101)), ProposalState::Succeeded);
    }

    #[test]
    fn test_fails_below_min_threshold() {
        let p = proposal(10, None, 2, 1);
        assert_eq!(p.state(Timestamp::new(101)), ProposalState::Failed);
    }

    #[test]
    fn test_tie_fails() {
        let p = proposal(1, None, 2, 2);
        assert_eq!(p.state(Timestamp::new(101)), ProposalState::Failed);
    }

    #[test]
    fn test_early_resolution_closes_voting() {
        let p = proposal(1, Some(2), 2, 0);
        assert!(p.is_voting_closed(Timestamp::new(0)));
        assert_eq!(p.state(Timestamp::new(0)), ProposalState::Succeeded);

        let rejected = proposal(1, Some(2), 0, 2);
        assert_eq!(rejected.state(Timestamp::new(0)), ProposalState::Failed);
    }
}
