//! Membership-weighted governance.
//!
//! Credentialed members open proposals and cast one weighted vote each; the
//! tally itself lives in a [`BallotLedger`](quorum_ballot::BallotLedger).
//! Around the ledger this crate layers:
//!
//! - a config store for the minimum vote threshold and voting duration,
//! - a registry of delegated capabilities keyed by `(label, description)`,
//! - an execution authorization gate recording which artifact hash each
//!   succeeded proposal may run, including multi-step hash replacement,
//! - a voting gate that derives weight from credentials, blocks double votes
//!   and sets the early-resolution threshold from the live membership count.
//!
//! [`Governance`] composes them into the public operations. Config and
//! capability mutations require the instance's system identity, which callers
//! obtain by resolving an approved proposal.

pub mod approval;
pub mod capability;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod settings;
pub mod snapshot;
pub mod voting;

pub use approval::ApprovedExecutionSet;
pub use capability::{Capability, CapabilityKey, CapabilityRegistry};
pub use config::{ConfigStore, GovernanceConfig};
pub use engine::{Governance, MAX_METADATA_LEN};
pub use error::GovernanceError;
pub use events::{EventBus, GovernanceEvent};
pub use settings::GovernanceSettings;
pub use snapshot::GovernanceSnapshot;
pub use voting::VoteReceipt;
