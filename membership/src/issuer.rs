//! The issuance contract the governance core consumes.

use crate::credential::CredentialAddress;
use crate::error::MembershipError;
use quorum_types::{AccountAddress, ProposalId};

/// Read/append access to membership credentials.
///
/// Issuance, burning and transfer locking happen behind this trait; governance
/// only looks credentials up, reads attributes and appends vote records.
pub trait CredentialIssuer {
    /// Address of `identity`'s credential, or `None` if it holds none.
    fn lookup_credential(&self, identity: &AccountAddress) -> Option<CredentialAddress>;

    fn read_u64_attribute(
        &self,
        credential: &CredentialAddress,
        attribute: &str,
    ) -> Result<u64, MembershipError>;

    fn read_bool_attribute(
        &self,
        credential: &CredentialAddress,
        attribute: &str,
    ) -> Result<bool, MembershipError>;

    fn vote_record_contains(
        &self,
        credential: &CredentialAddress,
        proposal_id: ProposalId,
    ) -> Result<bool, MembershipError>;

    /// Append a vote record entry. Fails if the proposal is already recorded.
    fn vote_record_insert(
        &mut self,
        credential: &CredentialAddress,
        proposal_id: ProposalId,
        should_pass: bool,
    ) -> Result<(), MembershipError>;

    /// Number of credentials currently outstanding, or `None` when supply is not tracked.
    fn total_issued_count(&self) -> Option<u64>;
}
