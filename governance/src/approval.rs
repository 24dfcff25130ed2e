//! Execution authorization gate.
//!
//! Tracks, per proposal, the hash of the execution artifact currently cleared
//! to run. A proposal id is present iff it has such an artifact:
//!
//! - `Unapproved → Approved(h)` when a succeeded proposal's hash is registered,
//! - `Approved(h) → Approved(h')` when a multi-step proposal advances,
//! - `Approved(h) → Closed` (entry removed) on final resolution.

use crate::error::GovernanceError;
use quorum_ballot::{BallotLedger, ProposalState};
use quorum_types::{ExecutionHash, ProposalId, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct ApprovedExecutionSet {
    entries: BTreeMap<ProposalId, ExecutionHash>,
}

impl ApprovedExecutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: BTreeMap<ProposalId, ExecutionHash>) -> Self {
        Self { entries }
    }

    /// Clear the ledger's current execution hash for `proposal_id` to run.
    ///
    /// The proposal must be allocated, succeeded and not yet resolved.
    /// Re-approving overwrites the existing entry with the ledger's current hash.
    pub fn approve<L: BallotLedger>(
        &mut self,
        ledger: &L,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<ExecutionHash, GovernanceError> {
        let hash = Self::check_approvable(ledger, proposal_id, now)?;
        match self.entries.insert(proposal_id, hash.clone()) {
            Some(previous) if previous != hash => {
                info!(proposal_id, from = %previous, to = %hash, "approved execution hash replaced")
            }
            Some(_) => debug!(proposal_id, "execution hash re-approved unchanged"),
            None => info!(proposal_id, hash = %hash, "execution hash approved"),
        }
        Ok(hash)
    }

    /// Validity and state checks of [`ApprovedExecutionSet::approve`], without mutating.
    pub fn check_approvable<L: BallotLedger>(
        ledger: &L,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<ExecutionHash, GovernanceError> {
        if proposal_id >= ledger.next_proposal_id() {
            return Err(GovernanceError::InvalidProposalId(proposal_id));
        }
        if ledger.get_state(proposal_id, now)? != ProposalState::Succeeded
            || ledger.is_resolved(proposal_id)?
        {
            return Err(GovernanceError::ProposalCannotBeResolved(proposal_id));
        }
        Ok(ledger.get_execution_hash(proposal_id)?)
    }

    /// Remove the entry for a finally resolved proposal.
    pub fn close(&mut self, proposal_id: ProposalId) -> Result<ExecutionHash, GovernanceError> {
        let hash = self
            .entries
            .remove(&proposal_id)
            .ok_or(GovernanceError::HashDoesNotExist(proposal_id))?;
        info!(proposal_id, "approved execution hash closed");
        Ok(hash)
    }

    /// Fails with `HashDoesNotExist` unless `proposal_id` is currently approved.
    pub fn ensure_approved(&self, proposal_id: ProposalId) -> Result<&ExecutionHash, GovernanceError> {
        self.entries
            .get(&proposal_id)
            .ok_or(GovernanceError::HashDoesNotExist(proposal_id))
    }

    pub fn get(&self, proposal_id: ProposalId) -> Option<&ExecutionHash> {
        self.entries.get(&proposal_id)
    }

    pub fn contains(&self, proposal_id: ProposalId) -> bool {
        self.entries.contains_key(&proposal_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<ProposalId, ExecutionHash> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_nullables::NullBallotLedger;

    fn now() -> Timestamp {
        Timestamp::new(50)
    }

    fn ledger_with(state: ProposalState, hash: &[u8]) -> (NullBallotLedger, ProposalId) {
        let mut ledger = NullBallotLedger::new();
        let id = ledger.push_proposal(ExecutionHash::from(hash), false);
        ledger.set_state(id, state);
        (ledger, id)
    }

    #[test]
    fn test_unallocated_id_rejected() {
        let (ledger, _) = ledger_with(ProposalState::Succeeded, &[1]);
        let mut set = ApprovedExecutionSet::new();
        assert_eq!(
            set.approve(&ledger, 1, now()),
            Err(GovernanceError::InvalidProposalId(1))
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_only_succeeded_proposals_approved() {
        for state in [ProposalState::Pending, ProposalState::Failed] {
            let (ledger, id) = ledger_with(state, &[1]);
            let mut set = ApprovedExecutionSet::new();
            assert_eq!(
                set.approve(&ledger, id, now()),
                Err(GovernanceError::ProposalCannotBeResolved(id))
            );
            assert!(!set.contains(id));
        }
    }

    #[test]
    fn test_resolved_proposal_not_reapproved() {
        let (mut ledger, id) = ledger_with(ProposalState::Succeeded, &[1]);
        ledger.set_resolved(id, true);
        let mut set = ApprovedExecutionSet::new();
        assert_eq!(
            set.approve(&ledger, id, now()),
            Err(GovernanceError::ProposalCannotBeResolved(id))
        );
    }

    #[test]
    fn test_approve_is_idempotent() {
        let (ledger, id) = ledger_with(ProposalState::Succeeded, &[7, 7]);
        let mut set = ApprovedExecutionSet::new();
        set.approve(&ledger, id, now()).unwrap();
        set.approve(&ledger, id, now()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(id), Some(&ExecutionHash::new(vec![7, 7])));
    }

    #[test]
    fn test_reapprove_picks_up_new_ledger_hash() {
        let (mut ledger, id) = ledger_with(ProposalState::Succeeded, &[1]);
        let mut set = ApprovedExecutionSet::new();
        set.approve(&ledger, id, now()).unwrap();
        ledger.set_execution_hash(id, ExecutionHash::new(vec![2]));
        set.approve(&ledger, id, now()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(id), Some(&ExecutionHash::new(vec![2])));
    }

    #[test]
    fn test_close_removes_exactly_once() {
        let (ledger, id) = ledger_with(ProposalState::Succeeded, &[1]);
        let mut set = ApprovedExecutionSet::new();
        set.approve(&ledger, id, now()).unwrap();
        assert_eq!(set.close(id), Ok(ExecutionHash::new(vec![1])));
        assert_eq!(set.close(id), Err(GovernanceError::HashDoesNotExist(id)));
    }
}
