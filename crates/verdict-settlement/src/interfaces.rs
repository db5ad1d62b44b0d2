//! Seams to the outside world.
//!
//! The settlement engine owns only the disposition registry. The block
//! clock, the ledger holding the sponsor's locks and token movement are
//! reached through the traits below, as are completion callbacks and
//! cross-chain dispatch. Calls are synchronous and may re-enter the engine
//! through [`SettlementEntry`].

use alloy_primitives::{Address, Bytes, U256};
use verdict_types::{
    BatchClaim, CallContext, Claim, ClaimHash, Compact, FillTiming, Lock, Mandate, MandateHash,
    Result, SettlementConfig,
};

/// State that can be rolled back to an earlier point.
///
/// Checkpoints are opaque positions in the implementor's undo journal. A
/// failed invocation reverts every collaborator to the checkpoint taken at
/// entry; a successful one commits it.
pub trait Journaled {
    fn checkpoint(&self) -> usize;

    fn revert_to(&mut self, checkpoint: usize);

    /// Discard undo information recorded since the checkpoint. Ledgers
    /// whose journal is their data need no compaction.
    fn commit(&mut self, _checkpoint: usize) {}
}

/// Source of the current block number.
///
/// Abstracted so chains with non-standard block numbering can supply their
/// own notion of "current block".
pub trait BlockClock {
    fn block_number(&self) -> u64;
}

/// The external ledger that locks and releases committed tokens.
pub trait ClaimLedger: Journaled {
    /// Submit a batch claim. Signature and allocator checks happen here.
    fn batch_claim(&mut self, claim: &BatchClaim) -> Result<()>;
}

/// Trusted token transfer capability. [`NATIVE_TOKEN`] denotes the native
/// asset.
///
/// [`NATIVE_TOKEN`]: verdict_types::constants::NATIVE_TOKEN
pub trait TokenVault: Journaled {
    fn balance_of(&self, token: Address, holder: Address) -> U256;

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<()>;
}

/// Everything a completion callback learns about a local fill.
#[derive(Debug, Clone, Copy)]
pub struct FillCompletion<'a> {
    pub claim_hash: ClaimHash,
    pub commitments: &'a [Lock],
    pub claim_amounts: &'a [U256],
    pub fill_token: Address,
    pub minimum_fill_amount: U256,
    pub fill_amount: U256,
}

/// Caller-supplied hook run during local settlement, after the ledger claim
/// and before the fill is delivered. Returning an error aborts the fill.
pub trait FillCallback {
    fn on_fill(&mut self, entry: &dyn SettlementEntry, completion: &FillCompletion<'_>) -> Result<()>;
}

/// Parameters handed to a cross-chain directive.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveRequest<'a> {
    /// Chain holding the claim.
    pub chain_id: u64,
    pub compact: &'a Compact,
    pub sponsor_signature: &'a Bytes,
    pub allocator_data: &'a Bytes,
    pub mandate_hash: MandateHash,
    pub claim_hash: ClaimHash,
    pub claimant: Address,
    pub claim_amounts: &'a [U256],
    pub timing: FillTiming,
}

impl<'a> DirectiveRequest<'a> {
    #[must_use]
    pub fn new(
        claim: &'a Claim,
        mandate_hash: MandateHash,
        claim_hash: ClaimHash,
        claimant: Address,
        claim_amounts: &'a [U256],
        timing: FillTiming,
    ) -> Self {
        Self {
            chain_id: claim.chain_id,
            compact: &claim.compact,
            sponsor_signature: &claim.sponsor_signature,
            allocator_data: &claim.allocator_data,
            mandate_hash,
            claim_hash,
            claimant,
            claim_amounts,
            timing,
        }
    }
}

/// Cross-chain settlement trigger.
///
/// Both methods have working defaults: dispatch does nothing and the quote
/// is a fixed fraction of the caller's spare native balance. Specialize per
/// messaging mechanism.
pub trait Directive {
    fn process_directive(
        &mut self,
        _entry: &dyn SettlementEntry,
        _request: &DirectiveRequest<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Estimated native cost of triggering settlement.
    fn quote_directive(
        &self,
        _request: &DirectiveRequest<'_>,
        available_native: U256,
        config: &SettlementConfig,
    ) -> Result<U256> {
        Ok(available_native / U256::from(config.dispensation_divisor))
    }
}

/// Directive strategy that uses every default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDirective;

impl Directive for NoopDirective {}

/// Result of a successful fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOutcome {
    pub claim_hash: ClaimHash,
    pub mandate_hash: MandateHash,
    pub fill_amount: U256,
    pub claim_amounts: Vec<U256>,
}

/// The engine's public entry points, object-safe so callbacks and
/// directives can re-enter it.
pub trait SettlementEntry {
    fn fill(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        timing: FillTiming,
        callback: Option<&mut dyn FillCallback>,
    ) -> Result<FillOutcome>;

    fn cancel(&self, ctx: &CallContext, claim: &Claim, mandate: &Mandate) -> Result<ClaimHash>;

    fn cancel_chain_exclusive(
        &self,
        ctx: &CallContext,
        compact: &Compact,
        mandate: &Mandate,
    ) -> Result<ClaimHash>;

    fn quote(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        timing: FillTiming,
    ) -> Result<U256>;

    fn filled(&self, claim_hash: &ClaimHash) -> Option<Address>;
}
