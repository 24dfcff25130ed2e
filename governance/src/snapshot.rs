//! Persisted state of a governance instance.
//!
//! Only the state this core owns is captured: config, capability registry and
//! the approved execution set. The ballot ledger and credential issuer persist
//! themselves.

use crate::capability::{Capability, CapabilityKey};
use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use quorum_types::{AccountAddress, ExecutionHash, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    pub system_identity: AccountAddress,
    pub config: GovernanceConfig,
    pub capabilities: BTreeMap<CapabilityKey, Capability>,
    pub approvals: BTreeMap<ProposalId, ExecutionHash>,
}

impl GovernanceSnapshot {
    /// Serialize to bytes for storage.
    pub fn encode(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Decode bytes produced by [`GovernanceSnapshot::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: Self =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        snapshot.config.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GovernanceSnapshot {
        let system = AccountAddress::new("0x5e");
        let mut capabilities = BTreeMap::new();
        capabilities.insert(
            CapabilityKey::new("governance", "system identity"),
            Capability::delegate(system.clone()),
        );
        let mut approvals = BTreeMap::new();
        approvals.insert(4, ExecutionHash::new(vec![9, 9]));
        GovernanceSnapshot {
            system_identity: system,
            config: GovernanceConfig::new(2, 60),
            capabilities,
            approvals,
        }
    }

    #[test]
    fn test_encode_decode() {
        let snapshot = sample();
        let bytes = snapshot.encode().unwrap();
        assert_eq!(GovernanceSnapshot::decode(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            GovernanceSnapshot::decode(&[1, 2, 3]),
            Err(GovernanceError::Snapshot(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut snapshot = sample();
        snapshot.config.voting_duration_seconds = 0;
        let bytes = snapshot.encode().unwrap();
        assert!(matches!(
            GovernanceSnapshot::decode(&bytes),
            Err(GovernanceError::InvalidConfig(_))
        ));
    }
}
