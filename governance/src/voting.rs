//! Membership-weighted voting gate.
//!
//! Resolves identities to credentials, enforces one vote per credential per
//! proposal, and forwards the credential's weight to the ballot ledger.

use crate::error::GovernanceError;
use quorum_ballot::BallotLedger;
use quorum_membership::{CredentialAddress, CredentialIssuer, CAN_PROPOSE, VOTING_POWER};
use quorum_types::{AccountAddress, ProposalId, Timestamp};
use tracing::{debug, info, warn};

/// What a successful vote did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteReceipt {
    pub proposal_id: ProposalId,
    pub voter: AccountAddress,
    pub credential: CredentialAddress,
    pub voting_power: u64,
    pub should_pass: bool,
}

/// Simple majority plus one of `supply`; `None` when supply is unknown.
///
/// The `+1` keeps an even split from being enough to resolve early.
pub fn early_resolution_threshold(supply: Option<u64>) -> Option<u128> {
    supply.map(|n| u128::from(n / 2) + 1)
}

/// Early-resolution threshold for a proposal created now, from the live supply.
pub fn compute_early_resolution_threshold<M: CredentialIssuer>(members: &M) -> Option<u128> {
    early_resolution_threshold(members.total_issued_count())
}

/// Address of `identity`'s credential, or `NotAMember`.
pub fn resolve_member<M: CredentialIssuer>(
    members: &M,
    identity: &AccountAddress,
) -> Result<CredentialAddress, GovernanceError> {
    members
        .lookup_credential(identity)
        .ok_or_else(|| GovernanceError::NotAMember(identity.clone()))
}

/// Fails with `NoProposalAbility` unless the credential's `can_propose` is set.
pub fn proposal_ability_check<M: CredentialIssuer>(
    members: &M,
    identity: &AccountAddress,
    credential: &CredentialAddress,
) -> Result<(), GovernanceError> {
    if members.read_bool_attribute(credential, CAN_PROPOSE)? {
        Ok(())
    } else {
        Err(GovernanceError::NoProposalAbility(identity.clone()))
    }
}

/// Cast `voter`'s full weight on `proposal_id`.
///
/// The vote record is written before the ledger tally. If the ledger then
/// fails, the record stays: the member cannot retry into a double tally.
pub fn cast_vote<L: BallotLedger, M: CredentialIssuer>(
    ledger: &mut L,
    members: &mut M,
    voter: &AccountAddress,
    proposal_id: ProposalId,
    should_pass: bool,
    now: Timestamp,
) -> Result<VoteReceipt, GovernanceError> {
    let credential = resolve_member(members, voter)?;
    if proposal_id >= ledger.next_proposal_id() {
        return Err(GovernanceError::InvalidProposalId(proposal_id));
    }
    if members.vote_record_contains(&credential, proposal_id)? {
        debug!(voter = %voter, proposal_id, "duplicate vote rejected");
        return Err(GovernanceError::AlreadyVoted {
            voter: voter.clone(),
            proposal_id,
        });
    }
    if ledger.is_voting_closed(proposal_id, now)? {
        return Err(GovernanceError::VotingClosed(proposal_id));
    }
    let voting_power = members.read_u64_attribute(&credential, VOTING_POWER)?;

    members.vote_record_insert(&credential, proposal_id, should_pass)?;
    if let Err(e) = ledger.record_vote(proposal_id, voting_power, should_pass, now) {
        warn!(voter = %voter, proposal_id, error = %e, "vote recorded but not tallied");
        return Err(e.into());
    }

    info!(voter = %voter, proposal_id, voting_power, should_pass, "vote cast");
    Ok(VoteReceipt {
        proposal_id,
        voter: voter.clone(),
        credential,
        voting_power,
        should_pass,
    })
}
