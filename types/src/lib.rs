//! Fundamental types for the Quorum governance workspace.
//!
//! Account identities, execution-artifact hashes and timestamps are shared by
//! the ballot ledger, the membership issuer and the governance core.

pub mod address;
pub mod error;
pub mod hash;
pub mod time;

pub use address::AccountAddress;
pub use error::TypesError;
pub use hash::ExecutionHash;
pub use time::Timestamp;

/// Proposal identifiers are a dense sequence allocated by the ballot ledger, starting at 0.
pub type ProposalId = u64;
