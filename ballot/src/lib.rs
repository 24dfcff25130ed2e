//! Ballot ledger: the proposal/vote store that governance delegates to.
//!
//! The ledger owns every proposal: proposer, execution hash, thresholds,
//! expiration, yes/no tallies and the resolved flag. It answers state queries
//! (`Pending`/`Succeeded`/`Failed`) as a pure function of its tallies and the
//! caller-supplied current time. Membership, weighting and execution gating
//! are layered on top by `quorum-governance`.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod proposal;

pub use error::BallotError;
pub use ledger::BallotLedger;
pub use memory::InMemoryBallotLedger;
pub use proposal::{BallotProposal, NewProposal, ProposalMetadata, ProposalState};
