//! # Mandate: the sponsor's signed fill conditions
//!
//! A mandate fixes who receives the fill, in which token, the minimum amount,
//! and how fill and claim amounts move with block distance from a target
//! (the decay curve) and with priority fee (the scaling factor).
//!
//! Mandates are immutable once signed. Their structured hash is the identity
//! used everywhere downstream.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::constants::{BPS_DENOMINATOR, NATIVE_TOKEN};

/// One segment of a decay curve.
///
/// Over `block_duration` blocks the adjustments ramp linearly from the
/// previous segment's end values to (`fill_increase_bps`, `claim_decrease_bps`).
/// A zero duration is a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecaySegment {
    pub block_duration: u64,
    pub fill_increase_bps: u32,
    pub claim_decrease_bps: u32,
}

impl DecaySegment {
    #[must_use]
    pub fn new(block_duration: u64, fill_increase_bps: u32, claim_decrease_bps: u32) -> Self {
        Self {
            block_duration,
            fill_increase_bps,
            claim_decrease_bps,
        }
    }

    /// A claim cannot be decreased by more than all of it.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.claim_decrease_bps <= BPS_DENOMINATOR
    }
}

/// Fill conditions signed by the sponsor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandate {
    /// Receives the fill on the target chain.
    pub recipient: Address,
    /// Unix timestamp (seconds) after which the mandate can no longer be used.
    pub expires: u64,
    /// Fill token, or [`NATIVE_TOKEN`] for the native asset.
    pub token: Address,
    pub minimum_amount: U256,
    /// Priority fee (wei) that triggers no scaling.
    pub baseline_priority_fee: U256,
    /// WAD fixed point; above 1.0 scales the fill up, below scales claims down.
    pub scaling_factor: U256,
    pub decay_curve: Vec<DecaySegment>,
    /// Replay-protection salt.
    pub salt: B256,
}

impl Mandate {
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }

    /// Returns `true` once `now` (unix seconds) is past `expires`.
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires
    }
}

/// Dummy mandate for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Mandate {
    /// Unit-scaled ERC20 mandate with no decay curve and a random salt.
    pub fn dummy(recipient: Address, token: Address, minimum_amount: U256, expires: u64) -> Self {
        Self {
            recipient,
            expires,
            token,
            minimum_amount,
            baseline_priority_fee: U256::ZERO,
            scaling_factor: crate::constants::WAD,
            decay_curve: Vec::new(),
            salt: B256::from(rand::random::<[u8; 32]>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_mandate() -> Mandate {
        Mandate::dummy(
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            U256::from(1_000u64),
            1_700_000_000,
        )
    }

    #[test]
    fn expiry_is_inclusive_of_the_deadline() {
        let mandate = make_mandate();
        assert!(!mandate.is_expired_at(1_699_999_999));
        assert!(!mandate.is_expired_at(1_700_000_000));
        assert!(mandate.is_expired_at(1_700_000_001));
    }

    #[test]
    fn native_sentinel() {
        let mut mandate = make_mandate();
        assert!(!mandate.is_native());
        mandate.token = NATIVE_TOKEN;
        assert!(mandate.is_native());
    }

    #[test]
    fn segment_well_formedness() {
        assert!(DecaySegment::new(1, 50_000, 10_000).is_well_formed());
        assert!(!DecaySegment::new(1, 0, 10_001).is_well_formed());
    }

    #[test]
    fn salts_differ_between_dummies() {
        assert_ne!(make_mandate().salt, make_mandate().salt);
    }

    #[test]
    fn serde_roundtrip() {
        let mut mandate = make_mandate();
        mandate.decay_curve = vec![DecaySegment::new(100, 500, 300)];
        let json = serde_json::to_string(&mandate).unwrap();
        let back: Mandate = serde_json::from_str(&json).unwrap();
        assert_eq!(mandate, back);
    }
}
