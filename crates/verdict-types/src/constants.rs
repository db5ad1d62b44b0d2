//! System-wide constants for the Verdict settlement arbiter.

use alloy_primitives::{Address, U256};

/// Fixed-point base for scaling factors and multipliers (1.0 = 10^18).
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Basis-point denominator (10 000 bps = 100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Sentinel token address denoting the chain's native asset.
pub const NATIVE_TOKEN: Address = Address::ZERO;

/// Default divisor applied to the caller's native balance when quoting a
/// directive dispensation.
pub const DEFAULT_DISPENSATION_DIVISOR: u64 = 4;

/// Number of bits a lock tag is shifted by when forming a lock id.
pub const LOCK_TAG_SHIFT: usize = 160;

/// EIP-712 type string for a single decay curve segment.
pub const DECAY_SEGMENT_TYPESTRING: &str =
    "DecaySegment(uint256 blockDuration,uint256 fillIncrease,uint256 claimDecrease)";

/// EIP-712 type string for a single committed lock.
pub const LOCK_TYPESTRING: &str = "Lock(bytes12 lockTag,address token,uint256 amount)";

/// EIP-712 type string for a mandate, including its referenced types.
pub const MANDATE_TYPESTRING: &str = "Mandate(uint256 chainId,address settlement,address recipient,uint256 expires,address token,uint256 minimumAmount,uint256 baselinePriorityFee,uint256 scalingFactor,DecaySegment[] decayCurve,bytes32 salt)DecaySegment(uint256 blockDuration,uint256 fillIncrease,uint256 claimDecrease)";

/// EIP-712 type string for a batch compact carrying a mandate witness.
/// Referenced types follow the primary type in alphabetical order.
pub const COMPACT_TYPESTRING: &str = "BatchCompact(address arbiter,address sponsor,uint256 nonce,uint256 expires,Lock[] commitments,Mandate mandate)DecaySegment(uint256 blockDuration,uint256 fillIncrease,uint256 claimDecrease)Lock(bytes12 lockTag,address token,uint256 amount)Mandate(uint256 chainId,address settlement,address recipient,uint256 expires,address token,uint256 minimumAmount,uint256 baselinePriorityFee,uint256 scalingFactor,DecaySegment[] decayCurve,bytes32 salt)";

/// Witness fragment handed to the settlement ledger: the tail of the compact
/// type string starting at the witness argument.
pub const WITNESS_TYPESTRING: &str = "Mandate mandate)DecaySegment(uint256 blockDuration,uint256 fillIncrease,uint256 claimDecrease)Mandate(uint256 chainId,address settlement,address recipient,uint256 expires,address token,uint256 minimumAmount,uint256 baselinePriorityFee,uint256 scalingFactor,DecaySegment[] decayCurve,bytes32 salt)";

/// Position of the fill token among the mandate's fields.
pub const WITNESS_TOKEN_ARG: usize = 4;

/// Position of the minimum fill amount among the mandate's fields.
pub const WITNESS_AMOUNT_ARG: usize = 5;
