//! Batch claim records submitted to the external settlement ledger.

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{Claim, MandateHash, constants};

/// One recipient's share of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub claimant: Address,
    pub amount: U256,
}

/// Claim against a single lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchClaimComponent {
    /// `(lock_tag << 160) | token`.
    pub id: U256,
    pub allocated_amount: U256,
    pub portions: Vec<Component>,
}

/// A full batch claim as the ledger expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchClaim {
    pub allocator_data: Bytes,
    pub sponsor_signature: Bytes,
    pub sponsor: Address,
    pub nonce: U256,
    pub expires: u64,
    /// The mandate hash.
    pub witness: B256,
    pub witness_type_string: String,
    pub claims: Vec<BatchClaimComponent>,
}

impl BatchClaim {
    /// Build the claim paying `claimant` its portion of every commitment.
    ///
    /// `claim_amounts` must be index-aligned with the compact's commitments.
    #[must_use]
    pub fn for_claimant(
        claim: &Claim,
        mandate_hash: MandateHash,
        claimant: Address,
        claim_amounts: &[U256],
    ) -> Self {
        let claims = claim
            .compact
            .commitments
            .iter()
            .zip(claim_amounts)
            .map(|(lock, amount)| BatchClaimComponent {
                id: lock.lock_id(),
                allocated_amount: lock.amount,
                portions: vec![Component {
                    claimant,
                    amount: *amount,
                }],
            })
            .collect();

        Self {
            allocator_data: claim.allocator_data.clone(),
            sponsor_signature: claim.sponsor_signature.clone(),
            sponsor: claim.compact.sponsor,
            nonce: claim.compact.nonce,
            expires: claim.compact.expires,
            witness: mandate_hash.0,
            witness_type_string: constants::WITNESS_TYPESTRING.to_string(),
            claims,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::FixedBytes;

    use super::*;
    use crate::{Compact, Lock};

    #[test]
    fn for_claimant_aligns_components_with_commitments() {
        let mut compact = Compact::dummy(
            Address::repeat_byte(1),
            Address::repeat_byte(2),
            Address::repeat_byte(3),
            U256::from(100u64),
            1_000,
        );
        compact.commitments.push(Lock::new(
            FixedBytes::repeat_byte(9),
            Address::repeat_byte(4),
            U256::from(200u64),
        ));
        let claim = Claim::dummy(1, compact);
        let claimant = Address::repeat_byte(0xcc);
        let mandate_hash = MandateHash(B256::repeat_byte(0x77));

        let batch = BatchClaim::for_claimant(
            &claim,
            mandate_hash,
            claimant,
            &[U256::from(90u64), U256::from(180u64)],
        );

        assert_eq!(batch.sponsor, Address::repeat_byte(2));
        assert_eq!(batch.witness, mandate_hash.0);
        assert!(batch.witness_type_string.starts_with("Mandate mandate)"));
        assert_eq!(batch.claims.len(), 2);
        assert_eq!(batch.claims[0].allocated_amount, U256::from(100u64));
        assert_eq!(batch.claims[0].portions[0].amount, U256::from(90u64));
        assert_eq!(batch.claims[1].id, claim.compact.commitments[1].lock_id());
        assert_eq!(batch.claims[1].portions[0].claimant, claimant);
        assert_eq!(batch.claims[1].portions[0].amount, U256::from(180u64));
    }
}
