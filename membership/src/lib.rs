//! Membership credentials for weighted governance.
//!
//! A credential is an identity-bound, non-transferable token. It carries two
//! typed attributes (`voting_power`, `can_propose`) and an append-only vote
//! record mapping each proposal the holder voted on to the vote direction.
//!
//! The governance core only consumes the [`CredentialIssuer`] contract;
//! [`MembershipRoster`] is the in-memory issuer used by tests and embedders.

pub mod credential;
pub mod error;
pub mod issuer;
pub mod roster;

pub use credential::{CredentialAddress, MembershipCredential, PropertyValue, CAN_PROPOSE, VOTING_POWER};
pub use error::MembershipError;
pub use issuer::CredentialIssuer;
pub use roster::MembershipRoster;
