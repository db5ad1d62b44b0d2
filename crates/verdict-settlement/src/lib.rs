//! # verdict-settlement
//!
//! **Settlement plane**: exactly-once fill and cancel orchestration over
//! external collaborators.
//!
//! ## Architecture
//!
//! [`SettlementEngine`] receives a claim and its mandate and:
//! 1. Takes the engine-wide reentrancy lock
//! 2. Validates expiry and target block timing
//! 3. Derives the mandate and claim hashes for this deployment
//! 4. Records the disposition (unset → filled or cancelled, once)
//! 5. Derives fill and claim amounts
//! 6. Settles locally through the claim ledger, or delivers and dispatches
//!    a cross-chain directive
//! 7. Refunds leftover native value to the caller
//!
//! Any failure reverts the registry, the ledger, the vault and the record
//! log to their state at entry.
//!
//! ## Collaborators
//!
//! - [`BlockClock`]: current block number
//! - [`ClaimLedger`]: locks and releases committed tokens
//! - [`TokenVault`]: token transfers
//! - [`Directive`]: cross-chain trigger and its cost quote
//! - [`FillCallback`]: caller hook on the local path
//!
//! [`memory`] has in-process implementations of the first three.

pub mod engine;
pub mod interfaces;
pub mod memory;
pub mod reentrancy;
pub mod registry;

pub use engine::SettlementEngine;
pub use interfaces::{
    BlockClock, ClaimLedger, Directive, DirectiveRequest, FillCallback, FillCompletion,
    FillOutcome, Journaled, NoopDirective, SettlementEntry, TokenVault,
};
pub use reentrancy::{GuardScope, ReentrancyGuard};
pub use registry::DispositionRegistry;
