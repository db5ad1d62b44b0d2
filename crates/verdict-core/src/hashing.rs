//! Canonical identity derivation for mandates and claims.
//!
//! Hashes follow EIP-712 `hashStruct` layout: `keccak256(abi.encode(typehash,
//! fields...))`, with dynamic arrays of structs hashed as
//! `keccak256(concat(hashStruct(element)))`. Array hashing is therefore
//! order-sensitive; permuting commitments or decay segments changes the
//! result.
//!
//! The mandate hash embeds the chain id and the settlement instance address,
//! so an identical mandate can never be replayed on another chain or against
//! another deployment.

use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_sol_types::SolValue;
use verdict_types::{
    ClaimHash, Compact, DecaySegment, Lock, Mandate, MandateHash,
    constants::{
        COMPACT_TYPESTRING, DECAY_SEGMENT_TYPESTRING, LOCK_TYPESTRING, MANDATE_TYPESTRING,
        WITNESS_AMOUNT_ARG, WITNESS_TOKEN_ARG, WITNESS_TYPESTRING,
    },
};

/// Type string and argument positions external signers need to build the
/// witness for a compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessDescriptor {
    pub type_string: &'static str,
    pub token_arg: usize,
    pub amount_arg: usize,
}

#[must_use]
pub fn witness_descriptor() -> WitnessDescriptor {
    WitnessDescriptor {
        type_string: WITNESS_TYPESTRING,
        token_arg: WITNESS_TOKEN_ARG,
        amount_arg: WITNESS_AMOUNT_ARG,
    }
}

#[must_use]
pub fn mandate_typehash() -> B256 {
    keccak256(MANDATE_TYPESTRING)
}

#[must_use]
pub fn compact_typehash() -> B256 {
    keccak256(COMPACT_TYPESTRING)
}

fn hash_segment(typehash: B256, segment: &DecaySegment) -> B256 {
    keccak256(
        (
            typehash,
            U256::from(segment.block_duration),
            U256::from(segment.fill_increase_bps),
            U256::from(segment.claim_decrease_bps),
        )
            .abi_encode(),
    )
}

fn hash_lock(typehash: B256, lock: &Lock) -> B256 {
    keccak256((typehash, lock.lock_tag, lock.token, lock.amount).abi_encode())
}

/// Ordered hash of a decay curve.
#[must_use]
pub fn decay_curve_hash(curve: &[DecaySegment]) -> B256 {
    let typehash = keccak256(DECAY_SEGMENT_TYPESTRING);
    let mut packed = Vec::with_capacity(curve.len() * 32);
    for segment in curve {
        packed.extend_from_slice(hash_segment(typehash, segment).as_slice());
    }
    keccak256(packed)
}

/// Ordered hash of a commitment sequence.
#[must_use]
pub fn commitments_hash(commitments: &[Lock]) -> B256 {
    let typehash = keccak256(LOCK_TYPESTRING);
    let mut packed = Vec::with_capacity(commitments.len() * 32);
    for lock in commitments {
        packed.extend_from_slice(hash_lock(typehash, lock).as_slice());
    }
    keccak256(packed)
}

/// Structured hash of `mandate` bound to `origin_chain_id` and
/// `settlement_address`.
#[must_use]
pub fn derive_mandate_hash(
    mandate: &Mandate,
    origin_chain_id: u64,
    settlement_address: Address,
) -> MandateHash {
    let encoded = (
        mandate_typehash(),
        U256::from(origin_chain_id),
        settlement_address,
        mandate.recipient,
        U256::from(mandate.expires),
        mandate.token,
        mandate.minimum_amount,
        mandate.baseline_priority_fee,
        mandate.scaling_factor,
        decay_curve_hash(&mandate.decay_curve),
        mandate.salt,
    )
        .abi_encode();
    MandateHash(keccak256(encoded))
}

/// Claim identity: the compact's structured hash with `mandate_hash` as witness.
#[must_use]
pub fn derive_claim_hash(compact: &Compact, mandate_hash: MandateHash) -> ClaimHash {
    let encoded = (
        compact_typehash(),
        compact.arbiter,
        compact.sponsor,
        compact.nonce,
        U256::from(compact.expires),
        commitments_hash(&compact.commitments),
        mandate_hash.0,
    )
        .abi_encode();
    ClaimHash(keccak256(encoded))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::FixedBytes;
    use verdict_types::constants::WAD;

    use super::*;

    const CHAIN: u64 = 10;
    const SETTLEMENT: Address = Address::repeat_byte(0x5e);

    fn make_mandate() -> Mandate {
        Mandate {
            recipient: Address::repeat_byte(0x11),
            expires: 1_700_000_000,
            token: Address::repeat_byte(0x22),
            minimum_amount: U256::from(1_000u64),
            baseline_priority_fee: U256::from(100u64),
            scaling_factor: WAD,
            decay_curve: vec![DecaySegment::new(100, 500, 300)],
            salt: B256::repeat_byte(0x33),
        }
    }

    fn make_compact() -> Compact {
        Compact {
            arbiter: Address::repeat_byte(0xa1),
            sponsor: Address::repeat_byte(0xb2),
            nonce: U256::from(7u64),
            expires: 1_800_000_000,
            commitments: vec![
                Lock::new(FixedBytes::repeat_byte(1), Address::repeat_byte(0xc1), U256::from(10u64)),
                Lock::new(FixedBytes::repeat_byte(2), Address::repeat_byte(0xc2), U256::from(20u64)),
            ],
        }
    }

    #[test]
    fn mandate_hash_is_deterministic() {
        let mandate = make_mandate();
        assert_eq!(
            derive_mandate_hash(&mandate, CHAIN, SETTLEMENT),
            derive_mandate_hash(&mandate.clone(), CHAIN, SETTLEMENT)
        );
    }

    #[test]
    fn mandate_hash_binds_chain_and_settlement() {
        let mandate = make_mandate();
        let base = derive_mandate_hash(&mandate, CHAIN, SETTLEMENT);
        assert_ne!(base, derive_mandate_hash(&mandate, CHAIN + 1, SETTLEMENT));
        assert_ne!(
            base,
            derive_mandate_hash(&mandate, CHAIN, Address::repeat_byte(0x5f))
        );
    }

    #[test]
    fn every_mandate_field_changes_the_hash() {
        let base_mandate = make_mandate();
        let base = derive_mandate_hash(&base_mandate, CHAIN, SETTLEMENT);

        let mutations: Vec<Box<dyn Fn(&mut Mandate)>> = vec![
            Box::new(|m| m.recipient = Address::repeat_byte(0x12)),
            Box::new(|m| m.expires += 1),
            Box::new(|m| m.token = Address::ZERO),
            Box::new(|m| m.minimum_amount += U256::from(1u64)),
            Box::new(|m| m.baseline_priority_fee += U256::from(1u64)),
            Box::new(|m| m.scaling_factor += U256::from(1u64)),
            Box::new(|m| m.decay_curve[0].block_duration += 1),
            Box::new(|m| m.decay_curve[0].fill_increase_bps += 1),
            Box::new(|m| m.decay_curve[0].claim_decrease_bps += 1),
            Box::new(|m| m.decay_curve.push(DecaySegment::new(1, 1, 1))),
            Box::new(|m| m.salt = B256::repeat_byte(0x34)),
        ];

        for (i, mutate) in mutations.iter().enumerate() {
            let mut mandate = base_mandate.clone();
            mutate(&mut mandate);
            assert_ne!(
                derive_mandate_hash(&mandate, CHAIN, SETTLEMENT),
                base,
                "mutation {i} did not change the mandate hash"
            );
        }
    }

    #[test]
    fn decay_curve_order_matters() {
        let a = DecaySegment::new(10, 100, 0);
        let b = DecaySegment::new(20, 200, 50);
        assert_ne!(decay_curve_hash(&[a, b]), decay_curve_hash(&[b, a]));
    }

    #[test]
    fn empty_curve_hashes_empty_bytes() {
        assert_eq!(decay_curve_hash(&[]), keccak256(b""));
        assert_eq!(commitments_hash(&[]), keccak256(b""));
    }

    #[test]
    fn claim_hash_changes_under_commitment_permutation() {
        let compact = make_compact();
        let mandate_hash = derive_mandate_hash(&make_mandate(), CHAIN, SETTLEMENT);
        let base = derive_claim_hash(&compact, mandate_hash);

        let mut swapped = compact.clone();
        swapped.commitments.reverse();
        assert_ne!(derive_claim_hash(&swapped, mandate_hash), base);
    }

    #[test]
    fn every_compact_field_changes_the_claim_hash() {
        let compact = make_compact();
        let mandate_hash = derive_mandate_hash(&make_mandate(), CHAIN, SETTLEMENT);
        let base = derive_claim_hash(&compact, mandate_hash);

        let mutations: Vec<Box<dyn Fn(&mut Compact)>> = vec![
            Box::new(|c| c.arbiter = Address::repeat_byte(0xa2)),
            Box::new(|c| c.sponsor = Address::repeat_byte(0xb3)),
            Box::new(|c| c.nonce += U256::from(1u64)),
            Box::new(|c| c.expires += 1),
            Box::new(|c| c.commitments[0].amount += U256::from(1u64)),
            Box::new(|c| c.commitments[1].lock_tag = FixedBytes::repeat_byte(9)),
            Box::new(|c| c.commitments[1].token = Address::repeat_byte(0xc3)),
            Box::new(|c| {
                c.commitments.pop();
            }),
        ];

        for (i, mutate) in mutations.iter().enumerate() {
            let mut changed = compact.clone();
            mutate(&mut changed);
            assert_ne!(
                derive_claim_hash(&changed, mandate_hash),
                base,
                "mutation {i} did not change the claim hash"
            );
        }

        let other_mandate = MandateHash(B256::repeat_byte(0x99));
        assert_ne!(derive_claim_hash(&compact, other_mandate), base);
    }

    #[test]
    fn typehashes_differ() {
        assert_ne!(mandate_typehash(), compact_typehash());
    }

    #[test]
    fn witness_descriptor_points_into_mandate() {
        let descriptor = witness_descriptor();
        assert!(descriptor.type_string.starts_with("Mandate mandate)"));
        assert_eq!(descriptor.token_arg, 4);
        assert_eq!(descriptor.amount_arg, 5);
    }
}
