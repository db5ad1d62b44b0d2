//! Fill records: the settlement event log.
//!
//! Every successful fill or cancellation appends one [`FillRecord`]. A
//! cancellation is recorded as a zero-amount fill with the sponsor in the
//! claimant slot, so observers on other chains can treat both uniformly.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{ClaimHash, MandateHash};

/// What produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Fill,
    Cancel,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fill => write!(f, "FILL"),
            Self::Cancel => write!(f, "CANCEL"),
        }
    }
}

/// An emitted settlement event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRecord {
    pub kind: RecordKind,
    pub sponsor: Address,
    pub claimant: Address,
    pub claim_hash: ClaimHash,
    pub mandate_hash: MandateHash,
    pub fill_amount: U256,
    pub claim_amounts: Vec<U256>,
    /// Zero when no target block was designated.
    pub target_block: u64,
}

impl FillRecord {
    /// Zero-amount record for a cancelled claim.
    #[must_use]
    pub fn cancellation(
        sponsor: Address,
        claim_hash: ClaimHash,
        mandate_hash: MandateHash,
        commitment_count: usize,
    ) -> Self {
        Self {
            kind: RecordKind::Cancel,
            sponsor,
            claimant: sponsor,
            claim_hash,
            mandate_hash,
            fill_amount: U256::ZERO,
            claim_amounts: vec![U256::ZERO; commitment_count],
            target_block: 0,
        }
    }

    /// Sum of all claim amounts, saturating.
    #[must_use]
    pub fn total_claimed(&self) -> U256 {
        self.claim_amounts
            .iter()
            .fold(U256::ZERO, |acc, a| acc.saturating_add(*a))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    #[test]
    fn cancellation_is_zero_amount() {
        let sponsor = Address::repeat_byte(0x05);
        let record = FillRecord::cancellation(
            sponsor,
            ClaimHash(B256::repeat_byte(1)),
            MandateHash(B256::repeat_byte(2)),
            3,
        );
        assert_eq!(record.kind, RecordKind::Cancel);
        assert_eq!(record.claimant, sponsor);
        assert_eq!(record.fill_amount, U256::ZERO);
        assert_eq!(record.claim_amounts, vec![U256::ZERO; 3]);
        assert_eq!(record.total_claimed(), U256::ZERO);
    }

    #[test]
    fn total_claimed_sums() {
        let mut record = FillRecord::cancellation(
            Address::ZERO,
            ClaimHash(B256::ZERO),
            MandateHash(B256::ZERO),
            0,
        );
        record.claim_amounts = vec![U256::from(7u64), U256::from(8u64)];
        assert_eq!(record.total_claimed(), U256::from(15u64));
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", RecordKind::Fill), "FILL");
        assert_eq!(format!("{}", RecordKind::Cancel), "CANCEL");
    }
}
