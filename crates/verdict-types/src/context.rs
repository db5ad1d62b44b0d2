//! Per-invocation context: who is calling, with what value and gas pricing,
//! and which target block the fill is priced against.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Transaction snapshot taken once at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    /// Native value attached to the call.
    pub value: U256,
    /// Unix seconds.
    pub timestamp: u64,
    pub gas_price: U256,
    pub base_fee: U256,
}

impl CallContext {
    /// A context with no attached value and no priority fee.
    #[must_use]
    pub fn new(caller: Address, timestamp: u64) -> Self {
        Self {
            caller,
            value: U256::ZERO,
            timestamp,
            gas_price: U256::ZERO,
            base_fee: U256::ZERO,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_gas(mut self, gas_price: U256, base_fee: U256) -> Self {
        self.gas_price = gas_price;
        self.base_fee = base_fee;
        self
    }
}

/// Target block designation for a fill.
///
/// `target_block == 0` means no target: the mandate's decay curve must be
/// empty and no decay applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FillTiming {
    pub target_block: u64,
    pub max_blocks_after_target: u64,
}

impl FillTiming {
    #[must_use]
    pub fn targeted(target_block: u64, max_blocks_after_target: u64) -> Self {
        Self {
            target_block,
            max_blocks_after_target,
        }
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target_block != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_has_no_target() {
        let timing = FillTiming::default();
        assert!(!timing.has_target());
        assert!(FillTiming::targeted(5, 2).has_target());
    }

    #[test]
    fn builders_set_fields() {
        let ctx = CallContext::new(Address::repeat_byte(1), 99)
            .with_value(U256::from(3u64))
            .with_gas(U256::from(20u64), U256::from(10u64));
        assert_eq!(ctx.value, U256::from(3u64));
        assert_eq!(ctx.gas_price, U256::from(20u64));
        assert_eq!(ctx.base_fee, U256::from(10u64));
        assert_eq!(ctx.timestamp, 99);
    }
}
