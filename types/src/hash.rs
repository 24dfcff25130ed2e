//! Execution artifact hashes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash of an execution artifact (the script a proposal will run).
///
/// Variable length. The empty hash is meaningful: passed as the next step of a
/// multi-step proposal it signals that no further step follows.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExecutionHash(Vec<u8>);

impl ExecutionHash {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The empty hash ("no next step").
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ExecutionHash {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ExecutionHash {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for ExecutionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.0[..self.0.len().min(4)];
        write!(f, "ExecutionHash({}", hex::encode(shown))?;
        if self.0.len() > 4 {
            write!(f, "..")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ExecutionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

// Inline hex encoding to keep this crate free of the `hex` dependency.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hash() {
        assert!(ExecutionHash::empty().is_empty());
        assert_eq!(ExecutionHash::empty(), ExecutionHash::new(vec![]));
    }

    #[test]
    fn test_display_is_full_hex() {
        let h = ExecutionHash::new(vec![0xde, 0xad, 0xbe, 0xef, 0x01]);
        assert_eq!(h.to_string(), "deadbeef01");
        assert_eq!(format!("{:?}", h), "ExecutionHash(deadbeef..)");
    }
}
