//! Canonical identity hashes used throughout Verdict.
//!
//! Both identifiers are 256-bit structured hashes. A [`MandateHash`] binds a
//! mandate to one chain and one settlement instance; a [`ClaimHash`] binds a
//! compact to that mandate and keys the disposition registry.

use std::fmt;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MandateHash
// ---------------------------------------------------------------------------

/// Structured hash of a mandate plus its chain and settlement-instance binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MandateHash(pub B256);

impl MandateHash {
    /// First four bytes in hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for MandateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mandate:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClaimHash
// ---------------------------------------------------------------------------

/// Primary key of the disposition registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ClaimHash(pub B256);

impl ClaimHash {
    /// First four bytes in hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for ClaimHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim:{}", self.0)
    }
}
