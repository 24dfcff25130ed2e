//! Nullable infrastructure for deterministic testing.
//!
//! Time and the ballot ledger sit behind plain values and traits. The types
//! here replace them in tests:
//! - [`NullClock`] only moves when told to,
//! - [`NullBallotLedger`] reports whatever state the test scripts and can be
//!   told to fail its next call.

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::NullBallotLedger;
