//! Nullable ballot ledger: scripted proposal state for testing.

use quorum_ballot::{BallotError, BallotLedger, BallotProposal, NewProposal, ProposalMetadata, ProposalState};
use quorum_types::{AccountAddress, ExecutionHash, ProposalId, Timestamp};
use std::collections::HashMap;

/// A ballot ledger whose proposal states are set by the test.
///
/// Votes are tallied but never change the reported state; voting is closed
/// whenever the scripted state is not `Pending` or the proposal is resolved.
/// No hash or threshold checks are performed.
#[derive(Debug, Default)]
pub struct NullBallotLedger {
    proposals: Vec<BallotProposal>,
    states: HashMap<ProposalId, ProposalState>,
    /// Every `record_vote` call that was applied: (proposal, weight, direction).
    votes: Vec<(ProposalId, u64, bool)>,
    fail_next_vote: Option<BallotError>,
    fail_next_resolve: Option<BallotError>,
}

impl NullBallotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pending proposal directly, bypassing governance.
    pub fn push_proposal(&mut self, execution_hash: ExecutionHash, is_multi_step: bool) -> ProposalId {
        let id = self.proposals.len() as ProposalId;
        self.proposals.push(BallotProposal {
            id,
            proposer: AccountAddress::new("0x0"),
            execution_hash,
            min_vote_threshold: 0,
            early_resolution_vote_threshold: None,
            expiration: Timestamp::new(u64::MAX),
            created_at: Timestamp::EPOCH,
            metadata: ProposalMetadata::default(),
            yes_votes: 0,
            no_votes: 0,
            is_resolved: false,
            is_multi_step,
            resolved_at: None,
        });
        id
    }

    /// Script the state reported for `proposal_id`.
    pub fn set_state(&mut self, proposal_id: ProposalId, state: ProposalState) {
        self.states.insert(proposal_id, state);
    }

    pub fn set_resolved(&mut self, proposal_id: ProposalId, resolved: bool) {
        if let Some(p) = self.slot(proposal_id) {
            p.is_resolved = resolved;
        }
    }

    pub fn set_execution_hash(&mut self, proposal_id: ProposalId, hash: ExecutionHash) {
        if let Some(p) = self.slot(proposal_id) {
            p.execution_hash = hash;
        }
    }

    /// Make the next `record_vote` fail with `error`.
    pub fn fail_next_vote(&mut self, error: BallotError) {
        self.fail_next_vote = Some(error);
    }

    /// Make the next resolution call fail with `error`.
    pub fn fail_next_resolve(&mut self, error: BallotError) {
        self.fail_next_resolve = Some(error);
    }

    pub fn votes(&self) -> &[(ProposalId, u64, bool)] {
        &self.votes
    }

    fn slot(&mut self, proposal_id: ProposalId) -> Option<&mut BallotProposal> {
        usize::try_from(proposal_id)
            .ok()
            .and_then(|idx| self.proposals.get_mut(idx))
    }

    fn get(&self, proposal_id: ProposalId) -> Result<&BallotProposal, BallotError> {
        usize::try_from(proposal_id)
            .ok()
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(BallotError::ProposalNotFound(proposal_id))
    }

    fn scripted_state(&self, proposal_id: ProposalId) -> ProposalState {
        self.states
            .get(&proposal_id)
            .copied()
            .unwrap_or(ProposalState::Pending)
    }
}

impl BallotLedger for NullBallotLedger {
    fn create_proposal(
        &mut self,
        proposal: NewProposal,
        now: Timestamp,
    ) -> Result<ProposalId, BallotError> {
        let id = self.push_proposal(proposal.execution_hash, proposal.is_multi_step);
        if let Some(p) = self.slot(id) {
            p.proposer = proposal.proposer;
            p.min_vote_threshold = proposal.min_vote_threshold;
            p.early_resolution_vote_threshold = proposal.early_resolution_vote_threshold;
            p.expiration = proposal.expiration;
            p.created_at = now;
            p.metadata = proposal.metadata;
        }
        Ok(id)
    }

    fn record_vote(
        &mut self,
        proposal_id: ProposalId,
        weight: u64,
        should_pass: bool,
        _now: Timestamp,
    ) -> Result<(), BallotError> {
        if let Some(error) = self.fail_next_vote.take() {
            return Err(error);
        }
        let p = self
            .slot(proposal_id)
            .ok_or(BallotError::ProposalNotFound(proposal_id))?;
        if should_pass {
            p.yes_votes += u128::from(weight);
        } else {
            p.no_votes += u128::from(weight);
        }
        self.votes.push((proposal_id, weight, should_pass));
        Ok(())
    }

    fn get_state(&self, proposal_id: ProposalId, _now: Timestamp) -> Result<ProposalState, BallotError> {
        self.get(proposal_id)?;
        Ok(self.scripted_state(proposal_id))
    }

    fn is_voting_closed(&self, proposal_id: ProposalId, _now: Timestamp) -> Result<bool, BallotError> {
        let p = self.get(proposal_id)?;
        Ok(p.is_resolved || self.scripted_state(proposal_id) != ProposalState::Pending)
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
        _script_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        if let Some(error) = self.fail_next_resolve.take() {
            return Err(error);
        }
        let p = self
            .slot(proposal_id)
            .ok_or(BallotError::ProposalNotFound(proposal_id))?;
        p.is_resolved = true;
        p.resolved_at = Some(now);
        Ok(())
    }

    fn resolve_with_next_hash(
        &mut self,
        proposal_id: ProposalId,
        _script_hash: &ExecutionHash,
        next_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        if let Some(error) = self.fail_next_resolve.take() {
            return Err(error);
        }
        let p = self
            .slot(proposal_id)
            .ok_or(BallotError::ProposalNotFound(proposal_id))?;
        p.resolved_at = Some(now);
        if next_hash.is_empty() {
            p.is_resolved = true;
        } else {
            p.execution_hash = next_hash.clone();
        }
        Ok(())
    }

    fn proposal(&self, proposal_id: ProposalId) -> Option<&BallotProposal> {
        self.get(proposal_id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_state() {
        let mut ledger = NullBallotLedger::new();
        let id = ledger.push_proposal(ExecutionHash::new(vec![1]), false);
        let now = Timestamp::new(0);
        assert_eq!(ledger.get_state(id, now), Ok(ProposalState::Pending));
        assert_eq!(ledger.is_voting_closed(id, now), Ok(false));
        ledger.set_state(id, ProposalState::Succeeded);
        assert_eq!(ledger.get_state(id, now), Ok(ProposalState::Succeeded));
        assert_eq!(ledger.is_voting_closed(id, now), Ok(true));
    }

    #[test]
    fn test_injected_vote_failure_is_one_shot() {
        let mut ledger = NullBallotLedger::new();
        let id = ledger.push_proposal(ExecutionHash::new(vec![1]), false);
        let now = Timestamp::new(0);
        ledger.fail_next_vote(BallotError::Other("disk full".to_string()));
        assert!(ledger.record_vote(id, 3, true, now).is_err());
        assert!(ledger.votes().is_empty());
        ledger.record_vote(id, 3, true, now).unwrap();
        assert_eq!(ledger.votes(), &[(id, 3, true)]);
    }
}
