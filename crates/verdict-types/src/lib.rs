//! # verdict-types
//!
//! Shared types, errors, and configuration for the **Verdict** settlement arbiter.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`ClaimHash`], [`MandateHash`]
//! - **Fill conditions**: [`Mandate`], [`DecaySegment`]
//! - **Committed resources**: [`Compact`], [`Lock`], [`Claim`]
//! - **Ledger records**: [`BatchClaim`], [`BatchClaimComponent`], [`Component`]
//! - **Outcomes**: [`Disposition`], [`FillRecord`], [`RecordKind`]
//! - **Invocation context**: [`CallContext`], [`FillTiming`]
//! - **Configuration**: [`SettlementConfig`]
//! - **Errors**: [`VerdictError`] with `VD_ERR_` prefix codes
//! - **Constants**: fixed-point bases, type strings, witness indices

pub mod compact;
pub mod config;
pub mod constants;
pub mod context;
pub mod disposition;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod mandate;
pub mod record;

// Re-export all primary types at crate root for ergonomic imports:
//   use verdict_types::{Mandate, Compact, Claim, Disposition, ...};

pub use compact::*;
pub use config::*;
pub use context::*;
pub use disposition::*;
pub use error::*;
pub use ids::*;
pub use ledger::*;
pub use mandate::*;
pub use record::*;

// Constants are accessed via `verdict_types::constants::FOO`
// (not re-exported to avoid name collisions).
