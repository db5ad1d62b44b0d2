//! # verdict-core
//!
//! **Pure deterministic derivations for Verdict.**
//!
//! Everything here is a function of its inputs: no storage, no token
//! movement, no clock. The settlement plane calls into this crate, and the
//! same functions are exposed for off-system verification.
//!
//! - **Identity**: mandate and claim hashes ([`derive_mandate_hash`], [`derive_claim_hash`])
//! - **Decay**: piecewise-linear curve evaluation ([`evaluate`])
//! - **Timing**: target block designation checks ([`designate`])
//! - **Amounts**: decay and priority-fee scaling ([`derive_amounts`])

pub mod amounts;
pub mod decay;
pub mod hashing;
pub mod timing;

pub use amounts::{DerivedAmounts, GasPricing, ScalingMode, derive_amounts};
pub use decay::{DecayAdjustment, evaluate};
pub use hashing::{
    WitnessDescriptor, commitments_hash, decay_curve_hash, derive_claim_hash, derive_mandate_hash,
    witness_descriptor,
};
pub use timing::{designate, validate_curve};
