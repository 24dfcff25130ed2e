//! Governance parameters and the store that guards them.

use crate::error::GovernanceError;
use quorum_types::AccountAddress;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One week.
pub const DEFAULT_VOTING_DURATION_SECS: u64 = 7 * 24 * 3600;

/// The two tunable governance parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Minimum total (yes + no) weight for a proposal to be able to succeed.
    pub minimum_voting_threshold: u128,
    /// How long a new proposal stays open for voting.
    pub voting_duration_seconds: u64,
}

impl GovernanceConfig {
    pub fn new(minimum_voting_threshold: u128, voting_duration_seconds: u64) -> Self {
        Self {
            minimum_voting_threshold,
            voting_duration_seconds,
        }
    }

    /// Both parameters must be strictly positive.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.minimum_voting_threshold == 0 {
            return Err(GovernanceError::InvalidConfig(
                "minimum_voting_threshold must be positive".to_string(),
            ));
        }
        if self.voting_duration_seconds == 0 {
            return Err(GovernanceError::InvalidConfig(
                "voting_duration_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self::new(1, DEFAULT_VOTING_DURATION_SECS)
    }
}

/// Singleton holder of the live [`GovernanceConfig`].
#[derive(Debug)]
pub struct ConfigStore {
    system_identity: AccountAddress,
    current: GovernanceConfig,
}

impl ConfigStore {
    pub fn new(system_identity: AccountAddress, initial: GovernanceConfig) -> Self {
        Self {
            system_identity,
            current: initial,
        }
    }

    pub fn read_config(&self) -> GovernanceConfig {
        self.current
    }

    /// Swap in new parameters. Only the system identity may do this.
    ///
    /// Returns the previous config for auditing.
    pub fn update_config(
        &mut self,
        caller: &AccountAddress,
        new_minimum_threshold: u128,
        new_voting_duration: u64,
    ) -> Result<GovernanceConfig, GovernanceError> {
        if caller != &self.system_identity {
            return Err(GovernanceError::NotSystemIdentity(caller.clone()));
        }
        let next = GovernanceConfig::new(new_minimum_threshold, new_voting_duration);
        next.validate()?;
        let old = std::mem::replace(&mut self.current, next);
        info!(
            old_threshold = old.minimum_voting_threshold,
            new_threshold = next.minimum_voting_threshold,
            old_duration = %quorum_utils::format_duration(old.voting_duration_seconds),
            new_duration = %quorum_utils::format_duration(next.voting_duration_seconds),
            "governance config updated"
        );
        Ok(old)
    }
}
