//! In-memory credential issuer.

use crate::credential::{
    CredentialAddress, MembershipCredential, PropertyValue, CAN_PROPOSE, VOTING_POWER,
};
use crate::error::MembershipError;
use crate::issuer::CredentialIssuer;
use quorum_types::{AccountAddress, ProposalId};
use std::collections::HashMap;
use tracing::info;

/// A credential collection held in memory.
///
/// One credential per identity. Burned credentials leave the supply; their
/// vote records go with them.
pub struct MembershipRoster {
    collection: String,
    credentials: HashMap<CredentialAddress, MembershipCredential>,
    /// Whether [`CredentialIssuer::total_issued_count`] reports a number.
    track_supply: bool,
}

impl MembershipRoster {
    /// A collection with tracked supply.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            credentials: HashMap::new(),
            track_supply: true,
        }
    }

    /// A collection whose supply is not tracked (no early resolution).
    pub fn untracked(collection: impl Into<String>) -> Self {
        Self {
            track_supply: false,
            ..Self::new(collection)
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Issue a credential to `owner`.
    pub fn issue(
        &mut self,
        owner: AccountAddress,
        voting_power: u64,
        can_propose: bool,
    ) -> Result<CredentialAddress, MembershipError> {
        let address = CredentialAddress::derive(&self.collection, &owner);
        if self.credentials.contains_key(&address) {
            return Err(MembershipError::AlreadyIssued(owner));
        }
        info!(owner = %owner, credential = %address, voting_power, can_propose, "credential issued");
        self.credentials.insert(
            address,
            MembershipCredential::new(&self.collection, owner, voting_power, can_propose),
        );
        Ok(address)
    }

    /// Destroy `owner`'s credential.
    pub fn burn(&mut self, owner: &AccountAddress) -> Result<MembershipCredential, MembershipError> {
        let address = CredentialAddress::derive(&self.collection, owner);
        let credential = self
            .credentials
            .remove(&address)
            .ok_or(MembershipError::CredentialNotFound(address))?;
        info!(owner = %owner, credential = %address, "credential burned");
        Ok(credential)
    }

    pub fn set_voting_power(
        &mut self,
        owner: &AccountAddress,
        voting_power: u64,
    ) -> Result<(), MembershipError> {
        self.credential_mut(owner)?
            .properties
            .insert(VOTING_POWER.to_string(), PropertyValue::U64(voting_power));
        Ok(())
    }

    pub fn set_can_propose(
        &mut self,
        owner: &AccountAddress,
        can_propose: bool,
    ) -> Result<(), MembershipError> {
        self.credential_mut(owner)?
            .properties
            .insert(CAN_PROPOSE.to_string(), PropertyValue::Bool(can_propose));
        Ok(())
    }

    pub fn credential(&self, address: &CredentialAddress) -> Option<&MembershipCredential> {
        self.credentials.get(address)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    fn credential_mut(
        &mut self,
        owner: &AccountAddress,
    ) -> Result<&mut MembershipCredential, MembershipError> {
        let address = CredentialAddress::derive(&self.collection, owner);
        self.credentials
            .get_mut(&address)
            .ok_or(MembershipError::CredentialNotFound(address))
    }

    fn get(&self, address: &CredentialAddress) -> Result<&MembershipCredential, MembershipError> {
        self.credentials
            .get(address)
            .ok_or(MembershipError::CredentialNotFound(*address))
    }
}

impl CredentialIssuer for MembershipRoster {
    fn lookup_credential(&self, identity: &AccountAddress) -> Option<CredentialAddress> {
        let address = CredentialAddress::derive(&self.collection, identity);
        self.credentials.contains_key(&address).then_some(address)
    }

    fn read_u64_attribute(
        &self,
        credential: &CredentialAddress,
        attribute: &str,
    ) -> Result<u64, MembershipError> {
        self.get(credential)?.read_u64(attribute)
    }

    fn read_bool_attribute(
        &self,
        credential: &CredentialAddress,
        attribute: &str,
    ) -> Result<bool, MembershipError> {
        self.get(credential)?.read_bool(attribute)
    }

    fn vote_record_contains(
        &self,
        credential: &CredentialAddress,
        proposal_id: ProposalId,
    ) -> Result<bool, MembershipError> {
        Ok(self.get(credential)?.vote_record.contains_key(&proposal_id))
    }

    fn vote_record_insert(
        &mut self,
        credential: &CredentialAddress,
        proposal_id: ProposalId,
        should_pass: bool,
    ) -> Result<(), MembershipError> {
        let record = &mut self
            .credentials
            .get_mut(credential)
            .ok_or(MembershipError::CredentialNotFound(*credential))?
            .vote_record;
        if record.contains_key(&proposal_id) {
            return Err(MembershipError::DuplicateVoteRecord(proposal_id));
        }
        record.insert(proposal_id, should_pass);
        Ok(())
    }

    fn total_issued_count(&self) -> Option<u64> {
        self.track_supply.then_some(self.credentials.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(n: u32) -> AccountAddress {
        AccountAddress::new(format!("0x{:x}", n))
    }

    #[test]
    fn test_issue_and_lookup() {
        let mut roster = MembershipRoster::new("dao");
        let addr = roster.issue(member(1), 10, true).unwrap();
        assert_eq!(roster.lookup_credential(&member(1)), Some(addr));
        assert_eq!(roster.lookup_credential(&member(2)), None);
        assert_eq!(roster.read_u64_attribute(&addr, VOTING_POWER), Ok(10));
        assert_eq!(roster.read_bool_attribute(&addr, CAN_PROPOSE), Ok(true));
    }

    #[test]
    fn test_one_credential_per_identity() {
        let mut roster = MembershipRoster::new("dao");
        roster.issue(member(1), 1, false).unwrap();
        assert_eq!(
            roster.issue(member(1), 5, true),
            Err(MembershipError::AlreadyIssued(member(1)))
        );
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_vote_record_is_append_only() {
        let mut roster = MembershipRoster::new("dao");
        let addr = roster.issue(member(1), 1, false).unwrap();
        assert!(!roster.vote_record_contains(&addr, 0).unwrap());
        roster.vote_record_insert(&addr, 0, true).unwrap();
        assert!(roster.vote_record_contains(&addr, 0).unwrap());
        assert_eq!(
            roster.vote_record_insert(&addr, 0, false),
            Err(MembershipError::DuplicateVoteRecord(0))
        );
        assert_eq!(roster.credential(&addr).unwrap().vote_record.get(&0), Some(&true));
    }

    #[test]
    fn test_supply_tracks_issue_and_burn() {
        let mut roster = MembershipRoster::new("dao");
        assert_eq!(roster.total_issued_count(), Some(0));
        roster.issue(member(1), 1, false).unwrap();
        roster.issue(member(2), 1, false).unwrap();
        assert_eq!(roster.total_issued_count(), Some(2));
        roster.burn(&member(1)).unwrap();
        assert_eq!(roster.total_issued_count(), Some(1));
        assert_eq!(roster.lookup_credential(&member(1)), None);
    }

    #[test]
    fn test_untracked_supply() {
        let mut roster = MembershipRoster::untracked("dao");
        roster.issue(member(1), 1, false).unwrap();
        assert_eq!(roster.total_issued_count(), None);
    }

    #[test]
    fn test_attribute_updates() {
        let mut roster = MembershipRoster::new("dao");
        let addr = roster.issue(member(1), 1, false).unwrap();
        roster.set_voting_power(&member(1), 9).unwrap();
        roster.set_can_propose(&member(1), true).unwrap();
        assert_eq!(roster.read_u64_attribute(&addr, VOTING_POWER), Ok(9));
        assert_eq!(roster.read_bool_attribute(&addr, CAN_PROPOSE), Ok(true));
        assert!(roster.set_voting_power(&member(2), 1).is_err());
    }

    #[test]
    fn test_burn_unknown_fails() {
        let mut roster = MembershipRoster::new("dao");
        assert!(matches!(
            roster.burn(&member(3)),
            Err(MembershipError::CredentialNotFound(_))
        ));
    }
}
