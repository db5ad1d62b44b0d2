//! Configuration for a settlement instance.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{Result, VerdictError, constants};

/// Identity and tunables of one settlement deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Chain this instance settles fills on.
    pub chain_id: u64,
    /// The instance's own address, bound into every mandate hash.
    pub settlement_address: Address,
    /// Divisor applied to the caller's native balance by the default quote.
    #[serde(default = "default_dispensation_divisor")]
    pub dispensation_divisor: u64,
}

fn default_dispensation_divisor() -> u64 {
    constants::DEFAULT_DISPENSATION_DIVISOR
}

impl SettlementConfig {
    #[must_use]
    pub fn new(chain_id: u64, settlement_address: Address) -> Self {
        Self {
            chain_id,
            settlement_address,
            dispensation_divisor: constants::DEFAULT_DISPENSATION_DIVISOR,
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(VerdictError::Configuration(
                "chain_id must be non-zero".into(),
            ));
        }
        if self.dispensation_divisor == 0 {
            return Err(VerdictError::Configuration(
                "dispensation_divisor must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
