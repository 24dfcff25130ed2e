//! In-memory ballot ledger.

use crate::error::BallotError;
use crate::ledger::BallotLedger;
use crate::proposal::{BallotProposal, NewProposal, ProposalState};
use quorum_types::{ExecutionHash, ProposalId, Timestamp};
use tracing::{debug, info};

/// Reference [`BallotLedger`] keeping every proposal in a dense vector indexed by id.
#[derive(Debug, Default)]
pub struct InMemoryBallotLedger {
    proposals: Vec<BallotProposal>,
}

impl InMemoryBallotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, proposal_id: ProposalId) -> Result<&BallotProposal, BallotError> {
        usize::try_from(proposal_id)
            .ok()
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(BallotError::ProposalNotFound(proposal_id))
    }

    fn get_mut(&mut self, proposal_id: ProposalId) -> Result<&mut BallotProposal, BallotError> {
        usize::try_from(proposal_id)
            .ok()
            .and_then(|idx| self.proposals.get_mut(idx))
            .ok_or(BallotError::ProposalNotFound(proposal_id))
    }

    /// Checks shared by both resolution paths.
    fn check_resolvable(
        proposal: &BallotProposal,
        script_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        if proposal.is_resolved {
            return Err(BallotError::AlreadyResolved(proposal.id));
        }
        if proposal.state(now) != ProposalState::Succeeded {
            return Err(BallotError::NotSucceeded(proposal.id));
        }
        if &proposal.execution_hash != script_hash {
            return Err(BallotError::ExecutionHashMismatch(proposal.id));
        }
        Ok(())
    }
}

impl BallotLedger for InMemoryBallotLedger {
    fn create_proposal(
        &mut self,
        proposal: NewProposal,
        now: Timestamp,
    ) -> Result<ProposalId, BallotError> {
        if proposal.execution_hash.is_empty() {
            return Err(BallotError::EmptyExecutionHash);
        }
        if let Some(early) = proposal.early_resolution_vote_threshold {
            if early < proposal.min_vote_threshold {
                return Err(BallotError::InvalidMinVoteThreshold {
                    min: proposal.min_vote_threshold,
                    early,
                });
            }
        }

        let id = self.next_proposal_id();
        self.proposals.push(BallotProposal {
            id,
            proposer: proposal.proposer,
            execution_hash: proposal.execution_hash,
            min_vote_threshold: proposal.min_vote_threshold,
            early_resolution_vote_threshold: proposal.early_resolution_vote_threshold,
            expiration: proposal.expiration,
            created_at: now,
            metadata: proposal.metadata,
            yes_votes: 0,
            no_votes: 0,
            is_resolved: false,
            is_multi_step: proposal.is_multi_step,
            resolved_at: None,
        });
        debug!(proposal_id = id, "ballot opened");
        Ok(id)
    }

    fn record_vote(
        &mut self,
        proposal_id: ProposalId,
        weight: u64,
        should_pass: bool,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        let proposal = self.get_mut(proposal_id)?;
        if proposal.is_voting_closed(now) {
            return Err(BallotError::VotingClosed(proposal_id));
        }
        let weight = u128::from(weight);
        if should_pass {
            proposal.yes_votes = proposal.yes_votes.saturating_add(weight);
        } else {
            proposal.no_votes = proposal.no_votes.saturating_add(weight);
        }
        debug!(
            proposal_id,
            yes = proposal.yes_votes,
            no = proposal.no_votes,
            "ballot tally updated"
        );
        Ok(())
    }

    fn get_state(
        &self,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalState, BallotError> {
        Ok(self.get(proposal_id)?.state(now))
    }

    fn is_voting_closed(&self, proposal_id: ProposalId, now: Timestamp) -> Result<bool, BallotError> {
        Ok(self.get(proposal_id)?.is_voting_closed(now))
    }

    fn get_execution_hash(&self, proposal_id: ProposalId) -> Result<ExecutionHash, BallotError> {
        Ok(self.get(proposal_id)?.execution_hash.clone())
    }

    fn is_resolved(&self, proposal_id: ProposalId) -> Result<bool, BallotError> {
        Ok(self.get(proposal_id)?.is_resolved)
    }

    fn next_proposal_id(&self) -> ProposalId {
        self.proposals.len() as ProposalId
    }

    fn resolve(
        &mut self,
        proposal_id: ProposalId,
        script_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        let proposal = self.get_mut(proposal_id)?;
        if proposal.is_multi_step {
            return Err(BallotError::MultiStepResolveRequired(proposal_id));
        }
        Self::check_resolvable(proposal, script_hash, now)?;
        proposal.is_resolved = true;
        proposal.resolved_at = Some(now);
        info!(proposal_id, "ballot resolved");
        Ok(())
    }

    fn resolve_with_next_hash(
        &mut self,
        proposal_id: ProposalId,
        script_hash: &ExecutionHash,
        next_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        let proposal = self.get_mut(proposal_id)?;
        if !proposal.is_multi_step && !next_hash.is_empty() {
            return Err(BallotError::SingleStepCannotContinue(proposal_id));
        }
        Self::check_resolvable(proposal, script_hash, now)?;
        proposal.resolved_at = Some(now);
        if next_hash.is_empty() {
            proposal.is_resolved = true;
            info!(proposal_id, "ballot resolved");
        } else {
            proposal.execution_hash = next_hash.clone();
            info!(proposal_id, next_hash = %next_hash, "ballot advanced to next step");
        }
        Ok(())
    }

    fn proposal(&self, proposal_id: ProposalId) -> Option<&BallotProposal> {
        self.get(proposal_id).ok()
    }
}
