//! The ballot ledger contract consumed by the governance core.

use crate::error::BallotError;
use crate::proposal::{BallotProposal, NewProposal, ProposalState};
use quorum_types::{ExecutionHash, ProposalId, Timestamp};

/// Proposal/vote store with its own tally and lifecycle state machine.
///
/// Every method runs atomically: either its effect is fully applied or the
/// ledger is left unchanged and an error is returned.
pub trait BallotLedger {
    /// Allocate the next proposal id and store the proposal.
    fn create_proposal(&mut self, proposal: NewProposal, now: Timestamp)
        -> Result<ProposalId, BallotError>;

    /// Add `weight` votes in the given direction.
    fn record_vote(
        &mut self,
        proposal_id: ProposalId,
        weight: u64,
        should_pass: bool,
        now: Timestamp,
    ) -> Result<(), BallotError>;

    fn get_state(&self, proposal_id: ProposalId, now: Timestamp)
        -> Result<ProposalState, BallotError>;

    fn is_voting_closed(&self, proposal_id: ProposalId, now: Timestamp) -> Result<bool, BallotError>;

    fn get_execution_hash(&self, proposal_id: ProposalId) -> Result<ExecutionHash, BallotError>;

    fn is_resolved(&self, proposal_id: ProposalId) -> Result<bool, BallotError>;

    /// Id the next created proposal will receive; every valid id is below it.
    fn next_proposal_id(&self) -> ProposalId;

    /// Final resolution of a single-step proposal executing `script_hash`.
    fn resolve(
        &mut self,
        proposal_id: ProposalId,
        script_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError>;

    /// Resolve one step of a proposal. An empty `next_hash` resolves it for good;
    /// otherwise the proposal's execution hash advances to `next_hash`.
    fn resolve_with_next_hash(
        &mut self,
        proposal_id: ProposalId,
        script_hash: &ExecutionHash,
        next_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<(), BallotError>;

    fn proposal(&self, proposal_id: ProposalId) -> Option<&BallotProposal>;
}
