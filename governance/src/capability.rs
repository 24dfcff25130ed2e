//! Registry of delegated signing capabilities.
//!
//! Capabilities are looked up by the composite key `(label, description)`.
//! The free-text description lets operators version or annotate an entry
//! without a separate id table. Mutation goes through one entry point and
//! requires the system identity.

use crate::error::GovernanceError;
use quorum_types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Composite registry key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CapabilityKey {
    pub label: String,
    pub description: String,
}

impl CapabilityKey {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.label, self.description)
    }
}

/// Authority to act as `identity`.
///
/// Handed to callers by value when a proposal resolves; the registry keeps
/// its own copy, so capabilities are duplicable delegation tokens rather than
/// single-use resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    identity: AccountAddress,
}

impl Capability {
    pub fn delegate(identity: AccountAddress) -> Self {
        Self { identity }
    }

    /// The account this capability lets its holder act as.
    pub fn identity(&self) -> &AccountAddress {
        &self.identity
    }
}

/// Composite-key map of capabilities.
#[derive(Debug)]
pub struct CapabilityRegistry {
    system_identity: AccountAddress,
    entries: BTreeMap<CapabilityKey, Capability>,
}

impl CapabilityRegistry {
    /// A registry holding exactly one entry: the system identity's own capability.
    pub fn bootstrap(system_identity: AccountAddress, key: CapabilityKey) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key, Capability::delegate(system_identity.clone()));
        Self {
            system_identity,
            entries,
        }
    }

    pub(crate) fn from_entries(
        system_identity: AccountAddress,
        entries: BTreeMap<CapabilityKey, Capability>,
    ) -> Self {
        Self {
            system_identity,
            entries,
        }
    }

    pub fn get_capability(&self, key: &str, description: &str) -> Result<Capability, GovernanceError> {
        self.entries
            .get(&CapabilityKey::new(key, description))
            .cloned()
            .ok_or_else(|| GovernanceError::CapabilityNotFound {
                key: key.to_string(),
                description: description.to_string(),
            })
    }

    /// Insert or replace the capability stored under `(key, description)`.
    ///
    /// Returns the key of the entry that was replaced, if there was one.
    pub fn upsert_capability(
        &mut self,
        caller: &AccountAddress,
        key: &str,
        description: &str,
        capability: Capability,
    ) -> Result<Option<CapabilityKey>, GovernanceError> {
        if caller != &self.system_identity {
            return Err(GovernanceError::NotSystemIdentity(caller.clone()));
        }
        let new_key = CapabilityKey::new(key, description);
        let old = self
            .entries
            .insert(new_key.clone(), capability)
            .map(|_| new_key.clone());
        info!(key = %new_key, replaced = old.is_some(), "capability registered");
        Ok(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<CapabilityKey, Capability> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> AccountAddress {
        AccountAddress::new("0x5e")
    }

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::bootstrap(system(), CapabilityKey::new("core", "system"))
    }

    #[test]
    fn test_bootstrap_holds_system_capability() {
        let reg = registry();
        assert_eq!(reg.len(), 1);
        let cap = reg.get_capability("core", "system").unwrap();
        assert_eq!(cap.identity(), &system());
    }

    #[test]
    fn test_lookup_requires_exact_composite_key() {
        let reg = registry();
        assert_eq!(
            reg.get_capability("core", "System"),
            Err(GovernanceError::CapabilityNotFound {
                key: "core".to_string(),
                description: "System".to_string(),
            })
        );
    }

    #[test]
    fn test_upsert_new_key_reports_no_old_entry() {
        let mut reg = registry();
        let treasury = Capability::delegate(AccountAddress::new("0x7ea"));
        let old = reg
            .upsert_capability(&system(), "treasury", "v1", treasury.clone())
            .unwrap();
        assert_eq!(old, None);
        assert_eq!(reg.get_capability("treasury", "v1").unwrap(), treasury);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_upsert_existing_key_replaces_and_reports_old() {
        let mut reg = registry();
        reg.upsert_capability(&system(), "treasury", "v1", Capability::delegate(AccountAddress::new("0x1")))
            .unwrap();
        let replacement = Capability::delegate(AccountAddress::new("0x2"));
        let old = reg
            .upsert_capability(&system(), "treasury", "v1", replacement.clone())
            .unwrap();
        assert_eq!(old, Some(CapabilityKey::new("treasury", "v1")));
        assert_eq!(reg.get_capability("treasury", "v1").unwrap(), replacement);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_upsert_requires_system_identity() {
        let mut reg = registry();
        let stranger = AccountAddress::new("0xbad");
        assert_eq!(
            reg.upsert_capability(&stranger, "x", "y", Capability::delegate(stranger.clone())),
            Err(GovernanceError::NotSystemIdentity(stranger))
        );
        assert_eq!(reg.len(), 1);
    }
}
