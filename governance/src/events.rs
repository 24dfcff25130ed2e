//! Audit events emitted by the governance core.

use crate::capability::CapabilityKey;
use quorum_membership::CredentialAddress;
use quorum_types::{AccountAddress, ExecutionHash, ProposalId};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Governance-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        proposer: AccountAddress,
        credential: CredentialAddress,
        proposal_id: ProposalId,
        execution_hash: ExecutionHash,
        metadata_location: Vec<u8>,
        metadata_hash: Vec<u8>,
        is_multi_step: bool,
    },
    Voted {
        proposal_id: ProposalId,
        voter: AccountAddress,
        voting_power: u64,
        should_pass: bool,
    },
    ConfigUpdated {
        old_minimum_voting_threshold: u128,
        new_minimum_voting_threshold: u128,
        old_voting_duration_seconds: u64,
        new_voting_duration_seconds: u64,
    },
    CapabilityUpdated {
        /// Key of the entry that was replaced, `None` for a fresh key.
        old: Option<CapabilityKey>,
        new: CapabilityKey,
    },
    ExecutionHashApproved {
        proposal_id: ProposalId,
        execution_hash: ExecutionHash,
    },
    ProposalResolved {
        proposal_id: ProposalId,
        capability_key: String,
        capability_description: String,
    },
}

impl GovernanceEvent {
    /// Short event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProposalCreated { .. } => "proposal_created",
            Self::Voted { .. } => "voted",
            Self::ConfigUpdated { .. } => "config_updated",
            Self::CapabilityUpdated { .. } => "capability_updated",
            Self::ExecutionHashApproved { .. } => "execution_hash_approved",
            Self::ProposalResolved { .. } => "proposal_resolved",
        }
    }
}

type Listener = Box<dyn Fn(&GovernanceEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the emitting call and must not fail; delivery is
/// fire-and-forget from the core's point of view.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Subscribe a listener that appends every event to a shared log, and return the log.
    pub fn recorder(&mut self) -> Arc<Mutex<Vec<GovernanceEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        self.subscribe(Box::new(move |event| {
            if let Ok(mut events) = sink.lock() {
                events.push(event.clone());
            }
        }));
        log
    }

    pub fn emit(&self, event: GovernanceEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => tracing::debug!(event = event.name(), payload = %json, "governance event"),
            Err(e) => tracing::warn!(event = event.name(), error = %e, "unserializable governance event"),
        }
        for listener in &self.listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> GovernanceEvent {
        GovernanceEvent::ExecutionHashApproved {
            proposal_id: 3,
            execution_hash: ExecutionHash::new(vec![1, 2]),
        }
    }

    #[test]
    fn test_fan_out_to_all_listeners() {
        let mut bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            bus.subscribe(Box::new(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }
        bus.emit(sample());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut bus = EventBus::new();
        let log = bus.recorder();
        bus.emit(sample());
        bus.emit(GovernanceEvent::CapabilityUpdated {
            old: None,
            new: CapabilityKey::new("a", "b"),
        });
        let events = log.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], sample());
        assert_eq!(events[1].name(), "capability_updated");
    }

    #[test]
    fn test_events_serialize_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ExecutionHashApproved"]["proposal_id"], 3);
    }
}
