//! The credential object and its deterministic address.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use quorum_types::{AccountAddress, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// Attribute holding the holder's vote weight (`u64`).
pub const VOTING_POWER: &str = "voting_power";
/// Attribute holding whether the holder may open proposals (`bool`).
pub const CAN_PROPOSE: &str = "can_propose";

/// Address of a credential object, derived from the collection and the owner.
///
/// Derivation is deterministic so the address of an identity's credential can
/// be computed without an index, and probed for existence.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CredentialAddress([u8; 32]);

impl CredentialAddress {
    /// `blake2b-256(collection || 0x00 || owner)`.
    pub fn derive(collection: &str, owner: &AccountAddress) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(collection.as_bytes());
        hasher.update([0u8]);
        hasher.update(owner.as_str().as_bytes());
        let result = hasher.finalize();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        Self(output)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for CredentialAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialAddress({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CredentialAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A typed credential attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    U64(u64),
    Bool(bool),
}

/// A membership credential.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipCredential {
    pub owner: AccountAddress,
    pub address: CredentialAddress,
    pub properties: BTreeMap<String, PropertyValue>,
    /// Proposal id → vote direction. Append-only.
    pub vote_record: BTreeMap<ProposalId, bool>,
}

impl MembershipCredential {
    pub fn new(
        collection: &str,
        owner: AccountAddress,
        voting_power: u64,
        can_propose: bool,
    ) -> Self {
        let address = CredentialAddress::derive(collection, &owner);
        let mut properties = BTreeMap::new();
        properties.insert(VOTING_POWER.to_string(), PropertyValue::U64(voting_power));
        properties.insert(CAN_PROPOSE.to_string(), PropertyValue::Bool(can_propose));
        Self {
            owner,
            address,
            properties,
            vote_record: BTreeMap::new(),
        }
    }

    pub fn read_u64(&self, attribute: &str) -> Result<u64, crate::MembershipError> {
        match self.properties.get(attribute) {
            Some(PropertyValue::U64(v)) => Ok(*v),
            Some(_) => Err(crate::MembershipError::AttributeType {
                attribute: attribute.to_string(),
                expected: "u64",
            }),
            None => Err(crate::MembershipError::AttributeMissing(attribute.to_string())),
        }
    }

    pub fn read_bool(&self, attribute: &str) -> Result<bool, crate::MembershipError> {
        match self.properties.get(attribute) {
            Some(PropertyValue::Bool(v)) => Ok(*v),
            Some(_) => Err(crate::MembershipError::AttributeType {
                attribute: attribute.to_string(),
                expected: "bool",
            }),
            None => Err(crate::MembershipError::AttributeMissing(attribute.to_string())),
        }
    }
}
