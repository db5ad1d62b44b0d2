//! Compacts: the sponsor's locked resources on the claim chain.
//!
//! A [`Compact`] lists the commitments the sponsor has locked and the arbiter
//! allowed to release them. A [`Claim`] wraps a compact with the chain it
//! lives on and the signatures gathered for it. Signature verification is
//! the settlement ledger's job, so signatures are carried as opaque bytes.

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use crate::constants::LOCK_TAG_SHIFT;

/// A single committed resource lock: (lock tag, token, maximum amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lock {
    pub lock_tag: FixedBytes<12>,
    pub token: Address,
    /// Upper bound on what can be claimed from this lock.
    pub amount: U256,
}

impl Lock {
    #[must_use]
    pub fn new(lock_tag: FixedBytes<12>, token: Address, amount: U256) -> Self {
        Self {
            lock_tag,
            token,
            amount,
        }
    }

    /// Ledger resource id: `(lock_tag << 160) | token`.
    #[must_use]
    pub fn lock_id(&self) -> U256 {
        (U256::from_be_slice(self.lock_tag.as_slice()) << LOCK_TAG_SHIFT)
            | U256::from_be_slice(self.token.as_slice())
    }
}

/// The sponsor's commitment set. Commitment order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compact {
    pub arbiter: Address,
    pub sponsor: Address,
    pub nonce: U256,
    /// Unix timestamp (seconds) after which the ledger refuses claims.
    pub expires: u64,
    pub commitments: Vec<Lock>,
}

impl Compact {
    /// Maximum claimable amount of every commitment, in order.
    #[must_use]
    pub fn maximum_amounts(&self) -> Vec<U256> {
        self.commitments.iter().map(|lock| lock.amount).collect()
    }
}

/// A compact as presented for settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Chain holding the locked commitments.
    pub chain_id: u64,
    pub compact: Compact,
    pub sponsor_signature: Bytes,
    pub allocator_data: Bytes,
}

/// Dummy compacts for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Compact {
    /// Single-commitment compact with a random nonce.
    pub fn dummy(arbiter: Address, sponsor: Address, token: Address, amount: U256, expires: u64) -> Self {
        Self {
            arbiter,
            sponsor,
            nonce: U256::from(rand::random::<u64>()),
            expires,
            commitments: vec![Lock::new(FixedBytes::ZERO, token, amount)],
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Claim {
    /// Wrap a compact with empty signatures.
    pub fn dummy(chain_id: u64, compact: Compact) -> Self {
        Self {
            chain_id,
            compact,
            sponsor_signature: Bytes::new(),
            allocator_data: Bytes::new(),
        }
    }
}
