//! Error types for the Verdict settlement arbiter.
//!
//! All errors use the `VD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Timing errors (expiry, target block designation)
//! - 2xx: Pricing errors (gas pricing, decay curve, scaling arithmetic)
//! - 3xx: Disposition and authorization errors
//! - 4xx: Execution guard errors
//! - 5xx: External collaborator errors
//! - 9xx: General / internal errors

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::ClaimHash;

/// Central error enum for all Verdict operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictError {
    // =================================================================
    // Timing Errors (1xx)
    // =================================================================
    /// The mandate's expiration timestamp has passed.
    #[error("VD_ERR_100: Mandate expired at {expires}")]
    Expired { expires: u64 },

    /// The target block lies in the future relative to the current block.
    #[error("VD_ERR_101: Target block {target_block} is ahead of current block {current_block}")]
    InvalidTargetBlock {
        target_block: u64,
        current_block: u64,
    },

    /// The decay curve and target block disagree, or the target is stale.
    #[error("VD_ERR_102: Invalid target block designation: {reason}")]
    InvalidTargetBlockDesignation { reason: String },

    // =================================================================
    // Pricing Errors (2xx)
    // =================================================================
    /// Gas price below the block base fee.
    #[error("VD_ERR_200: Gas price {gas_price} below base fee {base_fee}")]
    InvalidGasPrice { gas_price: U256, base_fee: U256 },

    /// Scaling arithmetic left the 256-bit range.
    #[error("VD_ERR_201: Amount overflow: {reason}")]
    AmountOverflow { reason: String },

    /// A decay curve segment is structurally invalid.
    #[error("VD_ERR_202: Invalid decay curve: {reason}")]
    InvalidDecayCurve { reason: String },

    // =================================================================
    // Disposition / Authorization Errors (3xx)
    // =================================================================
    /// A disposition has already been recorded for this claim.
    #[error("VD_ERR_300: Claim already disposed: {0}")]
    AlreadyClaimed(ClaimHash),

    /// Cancellation attempted by someone other than the sponsor.
    #[error("VD_ERR_301: Caller {caller} is not the sponsor {sponsor}")]
    NotSponsor { caller: Address, sponsor: Address },

    // =================================================================
    // Execution Guard Errors (4xx)
    // =================================================================
    /// Nested entry while a guarded entry point is executing.
    #[error("VD_ERR_400: Reentrant call rejected")]
    ReentrancyGuard,

    // =================================================================
    // Collaborator Errors (5xx)
    // =================================================================
    /// The settlement ledger rejected the batch claim.
    #[error("VD_ERR_500: Ledger rejected claim: {reason}")]
    Ledger { reason: String },

    /// A token movement failed.
    #[error("VD_ERR_501: Transfer failed: {reason}")]
    Transfer { reason: String },

    /// The completion callback reported a failure.
    #[error("VD_ERR_502: Fill callback failed: {reason}")]
    Callback { reason: String },

    /// The cross-chain directive could not be dispatched.
    #[error("VD_ERR_503: Directive dispatch failed: {reason}")]
    Directive { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("VD_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("VD_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("VD_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, VerdictError>;

impl From<serde_json::Error> for VerdictError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = VerdictError::Expired { expires: 42 };
        let msg = format!("{err}");
        assert!(msg.starts_with("VD_ERR_100"), "Got: {msg}");
        assert!(msg.contains("42"));
    }

    #[test]
    fn already_claimed_display() {
        let err = VerdictError::AlreadyClaimed(ClaimHash(B256::repeat_byte(0xab)));
        let msg = format!("{err}");
        assert!(msg.contains("VD_ERR_300"));
        assert!(msg.contains("abab"));
    }

    #[test]
    fn gas_price_display() {
        let err = VerdictError::InvalidGasPrice {
            gas_price: U256::from(5u64),
            base_fee: U256::from(7u64),
        };
        let msg = format!("{err}");
        assert!(msg.contains("VD_ERR_200"));
        assert!(msg.contains('5'));
        assert!(msg.contains('7'));
    }

    #[test]
    fn all_errors_have_vd_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(VerdictError::ReentrancyGuard),
            Box::new(VerdictError::NotSponsor {
                caller: Address::ZERO,
                sponsor: Address::repeat_byte(1),
            }),
            Box::new(VerdictError::InvalidTargetBlock {
                target_block: 11,
                current_block: 10,
            }),
            Box::new(VerdictError::Internal("test".into())),
            Box::new(VerdictError::Ledger {
                reason: "nonce".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("VD_ERR_"),
                "Error missing VD_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn serde_json_errors_convert() {
        let err: VerdictError = serde_json::from_str::<u64>("not json").unwrap_err().into();
        assert!(matches!(err, VerdictError::Serialization(_)));
    }
}
