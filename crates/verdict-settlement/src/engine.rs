//! The settlement engine: fill, cancel and quote entry points.
//!
//! Every guarded invocation follows the same sequence:
//!
//! ```text
//! enter guard → checkpoint → credit attached value
//!   → validate timing → hash → dispose → derive amounts
//!   → { ledger claim → callback → deliver | deliver → record → directive }
//!   → refund native balance → commit            (any Err → revert to checkpoint)
//! ```
//!
//! The engine takes `&self` everywhere. Collaborators sit behind `RefCell`s
//! and are borrowed only for the duration of a single call into them, so a
//! callback or directive can re-enter through [`SettlementEntry`] without a
//! borrow conflict; the reentrancy guard then rejects the nested entry.

use std::cell::{Ref, RefCell};

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};
use verdict_core::{
    DecayAdjustment, GasPricing, WitnessDescriptor, derive_amounts, derive_claim_hash,
    derive_mandate_hash, designate, witness_descriptor,
};
use verdict_types::{
    BatchClaim, CallContext, Claim, ClaimHash, Compact, Disposition, FillRecord, FillTiming,
    Mandate, MandateHash, RecordKind, Result, SettlementConfig, VerdictError,
    constants::NATIVE_TOKEN,
};

use crate::interfaces::{
    BlockClock, ClaimLedger, Directive, DirectiveRequest, FillCallback, FillCompletion,
    FillOutcome, Journaled, NoopDirective, SettlementEntry, TokenVault,
};
use crate::reentrancy::ReentrancyGuard;
use crate::registry::DispositionRegistry;

/// Undo positions of every journaled part, taken at entry.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    registry: usize,
    ledger: usize,
    vault: usize,
    records: usize,
}

/// Settlement arbiter for one deployment (`chain_id`, `settlement_address`).
///
/// Owns the disposition registry and the committed fill-record log. The
/// clock, ledger, vault and directive are injected.
pub struct SettlementEngine<C, L, V, D = NoopDirective> {
    config: SettlementConfig,
    clock: C,
    ledger: RefCell<L>,
    vault: RefCell<V>,
    directive: RefCell<D>,
    registry: RefCell<DispositionRegistry>,
    records: RefCell<Vec<FillRecord>>,
    guard: ReentrancyGuard,
}

impl<C, L, V> SettlementEngine<C, L, V, NoopDirective>
where
    C: BlockClock,
    L: ClaimLedger,
    V: TokenVault,
{
    /// Create an engine using the default directive.
    ///
    /// # Errors
    /// [`VerdictError::Configuration`] if `config` does not validate.
    pub fn new(config: SettlementConfig, clock: C, ledger: L, vault: V) -> Result<Self> {
        config.validate()?;
        info!(
            chain_id = config.chain_id,
            settlement = %config.settlement_address,
            divisor = config.dispensation_divisor,
            "settlement engine ready"
        );
        Ok(Self {
            config,
            clock,
            ledger: RefCell::new(ledger),
            vault: RefCell::new(vault),
            directive: RefCell::new(NoopDirective),
            registry: RefCell::new(DispositionRegistry::new()),
            records: RefCell::new(Vec::new()),
            guard: ReentrancyGuard::new(),
        })
    }
}

impl<C, L, V, D> SettlementEngine<C, L, V, D> {
    /// Swap in a directive strategy.
    #[must_use]
    pub fn with_directive<E: Directive>(self, directive: E) -> SettlementEngine<C, L, V, E> {
        SettlementEngine {
            config: self.config,
            clock: self.clock,
            ledger: self.ledger,
            vault: self.vault,
            directive: RefCell::new(directive),
            registry: self.registry,
            records: self.records,
            guard: self.guard,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Borrow the ledger for inspection.
    ///
    /// # Errors
    /// [`VerdictError::ReentrancyGuard`] while the engine is calling into it.
    pub fn ledger(&self) -> Result<Ref<'_, L>> {
        inspect(&self.ledger)
    }

    /// Borrow the vault for inspection.
    ///
    /// # Errors
    /// [`VerdictError::ReentrancyGuard`] while the engine is calling into it.
    pub fn vault(&self) -> Result<Ref<'_, V>> {
        inspect(&self.vault)
    }

    /// Borrow the directive for inspection.
    ///
    /// # Errors
    /// [`VerdictError::ReentrancyGuard`] while the engine is dispatching to it.
    pub fn directive(&self) -> Result<Ref<'_, D>> {
        inspect(&self.directive)
    }

    #[must_use]
    pub fn disposition(&self, claim_hash: &ClaimHash) -> Disposition {
        self.registry.borrow().disposition(claim_hash)
    }

    /// Committed fill and cancel records, oldest first.
    #[must_use]
    pub fn fill_records(&self) -> Vec<FillRecord> {
        self.records.borrow().clone()
    }

    #[must_use]
    pub fn witness_descriptor(&self) -> WitnessDescriptor {
        witness_descriptor()
    }

    /// Mandate hash as bound to this deployment.
    #[must_use]
    pub fn mandate_hash(&self, mandate: &Mandate) -> MandateHash {
        derive_mandate_hash(mandate, self.config.chain_id, self.config.settlement_address)
    }

    #[must_use]
    pub fn claim_hash(&self, compact: &Compact, mandate: &Mandate) -> ClaimHash {
        derive_claim_hash(compact, self.mandate_hash(mandate))
    }

    fn identify(&self, compact: &Compact, mandate: &Mandate) -> (MandateHash, ClaimHash) {
        let mandate_hash = self.mandate_hash(mandate);
        (mandate_hash, derive_claim_hash(compact, mandate_hash))
    }
}

fn inspect<T>(cell: &RefCell<T>) -> Result<Ref<'_, T>> {
    cell.try_borrow().map_err(|_| VerdictError::ReentrancyGuard)
}

fn ensure_live(mandate: &Mandate, ctx: &CallContext) -> Result<()> {
    if mandate.is_expired_at(ctx.timestamp) {
        return Err(VerdictError::Expired {
            expires: mandate.expires,
        });
    }
    Ok(())
}

impl<C, L, V, D> SettlementEngine<C, L, V, D>
where
    C: BlockClock,
    L: ClaimLedger,
    V: TokenVault,
    D: Directive,
{
    // -----------------------------------------------------------------------
    // Transaction boundary
    // -----------------------------------------------------------------------

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            registry: self.registry.borrow().checkpoint(),
            ledger: self.ledger.borrow().checkpoint(),
            vault: self.vault.borrow().checkpoint(),
            records: self.records.borrow().len(),
        }
    }

    fn rollback(&self, checkpoint: Checkpoint) {
        self.registry.borrow_mut().revert_to(checkpoint.registry);
        self.ledger.borrow_mut().revert_to(checkpoint.ledger);
        self.vault.borrow_mut().revert_to(checkpoint.vault);
        self.records.borrow_mut().truncate(checkpoint.records);
    }

    fn commit(&self, checkpoint: Checkpoint) {
        self.registry.borrow_mut().commit(checkpoint.registry);
        self.ledger.borrow_mut().commit(checkpoint.ledger);
        self.vault.borrow_mut().commit(checkpoint.vault);
    }

    /// Run `body` all-or-nothing. Attached value is credited first and any
    /// native balance left at the settlement address is refunded last.
    fn transact<T>(
        &self,
        operation: &'static str,
        ctx: &CallContext,
        body: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let checkpoint = self.checkpoint();
        let outcome = self
            .receive_value(ctx)
            .and_then(|()| body())
            .and_then(|value| self.refund(ctx).map(|()| value));

        match outcome {
            Ok(value) => {
                self.commit(checkpoint);
                Ok(value)
            }
            Err(err) => {
                self.rollback(checkpoint);
                warn!(operation, caller = %ctx.caller, error = %err, "invocation reverted");
                Err(err)
            }
        }
    }

    fn receive_value(&self, ctx: &CallContext) -> Result<()> {
        if ctx.value.is_zero() {
            return Ok(());
        }
        self.vault.borrow_mut().transfer(
            NATIVE_TOKEN,
            ctx.caller,
            self.config.settlement_address,
            ctx.value,
        )
    }

    fn refund(&self, ctx: &CallContext) -> Result<()> {
        let mut vault = self.vault.borrow_mut();
        let leftover = vault.balance_of(NATIVE_TOKEN, self.config.settlement_address);
        if leftover.is_zero() {
            return Ok(());
        }
        debug!(caller = %ctx.caller, %leftover, "refunding native balance");
        vault.transfer(
            NATIVE_TOKEN,
            self.config.settlement_address,
            ctx.caller,
            leftover,
        )
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    fn deliver(&self, ctx: &CallContext, mandate: &Mandate, amount: U256) -> Result<()> {
        // Native fills are paid out of the value attached to the call.
        let source = if mandate.is_native() {
            self.config.settlement_address
        } else {
            ctx.caller
        };
        self.vault
            .borrow_mut()
            .transfer(mandate.token, source, mandate.recipient, amount)
    }

    fn record(&self, record: FillRecord) {
        debug!(
            kind = %record.kind,
            claim = %record.claim_hash.short(),
            claimant = %record.claimant,
            fill_amount = %record.fill_amount,
            "fill record emitted"
        );
        self.records.borrow_mut().push(record);
    }

    fn dispatch(&self, request: &DirectiveRequest<'_>) -> Result<()> {
        debug!(
            claim = %request.claim_hash.short(),
            chain_id = request.chain_id,
            "dispatching directive"
        );
        self.directive.borrow_mut().process_directive(self, request)
    }

    fn execute_fill(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        timing: FillTiming,
        callback: Option<&mut dyn FillCallback>,
    ) -> Result<FillOutcome> {
        ensure_live(mandate, ctx)?;
        let current_block = self.clock.block_number();
        let adjustment = designate(&mandate.decay_curve, timing, current_block)?;

        let (mandate_hash, claim_hash) = self.identify(&claim.compact, mandate);
        self.registry.borrow_mut().try_fill(claim_hash, claimant)?;

        let amounts = derive_amounts(
            &claim.compact.maximum_amounts(),
            mandate.minimum_amount,
            adjustment,
            mandate.baseline_priority_fee,
            mandate.scaling_factor,
            GasPricing::from(ctx),
        )?;
        debug!(
            claim = %claim_hash.short(),
            current_block,
            fill_increase_bps = adjustment.fill_increase_bps,
            claim_decrease_bps = adjustment.claim_decrease_bps,
            fill_amount = %amounts.fill_amount,
            "amounts derived"
        );

        let local = claim.chain_id == self.config.chain_id;
        if local {
            let batch =
                BatchClaim::for_claimant(claim, mandate_hash, claimant, &amounts.claim_amounts);
            self.ledger.borrow_mut().batch_claim(&batch)?;

            if let Some(callback) = callback {
                callback.on_fill(
                    self,
                    &FillCompletion {
                        claim_hash,
                        commitments: &claim.compact.commitments,
                        claim_amounts: &amounts.claim_amounts,
                        fill_token: mandate.token,
                        minimum_fill_amount: mandate.minimum_amount,
                        fill_amount: amounts.fill_amount,
                    },
                )?;
            }
        }

        self.deliver(ctx, mandate, amounts.fill_amount)?;
        self.record(FillRecord {
            kind: RecordKind::Fill,
            sponsor: claim.compact.sponsor,
            claimant,
            claim_hash,
            mandate_hash,
            fill_amount: amounts.fill_amount,
            claim_amounts: amounts.claim_amounts.clone(),
            target_block: timing.target_block,
        });

        if !local {
            self.dispatch(&DirectiveRequest::new(
                claim,
                mandate_hash,
                claim_hash,
                claimant,
                &amounts.claim_amounts,
                timing,
            ))?;
        }

        info!(
            claim = %claim_hash.short(),
            %claimant,
            fill_amount = %amounts.fill_amount,
            local,
            "claim filled"
        );
        Ok(FillOutcome {
            claim_hash,
            mandate_hash,
            fill_amount: amounts.fill_amount,
            claim_amounts: amounts.claim_amounts,
        })
    }

    /// `claim` is `Some` for the variant that informs other chains.
    fn execute_cancel(
        &self,
        ctx: &CallContext,
        compact: &Compact,
        mandate: &Mandate,
        claim: Option<&Claim>,
    ) -> Result<ClaimHash> {
        if ctx.caller != compact.sponsor {
            return Err(VerdictError::NotSponsor {
                caller: ctx.caller,
                sponsor: compact.sponsor,
            });
        }
        ensure_live(mandate, ctx)?;

        let (mandate_hash, claim_hash) = self.identify(compact, mandate);
        self.registry
            .borrow_mut()
            .try_cancel(claim_hash, compact.sponsor)?;
        self.record(FillRecord::cancellation(
            compact.sponsor,
            claim_hash,
            mandate_hash,
            compact.commitments.len(),
        ));

        if let Some(claim) = claim {
            let zeros = vec![U256::ZERO; compact.commitments.len()];
            self.dispatch(&DirectiveRequest::new(
                claim,
                mandate_hash,
                claim_hash,
                compact.sponsor,
                &zeros,
                FillTiming::default(),
            ))?;
        }

        info!(
            claim = %claim_hash.short(),
            sponsor = %compact.sponsor,
            informed = claim.is_some(),
            "claim cancelled"
        );
        Ok(claim_hash)
    }
}

impl<C, L, V, D> SettlementEntry for SettlementEngine<C, L, V, D>
where
    C: BlockClock,
    L: ClaimLedger,
    V: TokenVault,
    D: Directive,
{
    fn fill(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        timing: FillTiming,
        callback: Option<&mut dyn FillCallback>,
    ) -> Result<FillOutcome> {
        let _scope = self.guard.enter()?;
        self.transact("fill", ctx, || {
            self.execute_fill(ctx, claim, mandate, claimant, timing, callback)
        })
    }

    fn cancel(&self, ctx: &CallContext, claim: &Claim, mandate: &Mandate) -> Result<ClaimHash> {
        let _scope = self.guard.enter()?;
        self.transact("cancel", ctx, || {
            self.execute_cancel(ctx, &claim.compact, mandate, Some(claim))
        })
    }

    fn cancel_chain_exclusive(
        &self,
        ctx: &CallContext,
        compact: &Compact,
        mandate: &Mandate,
    ) -> Result<ClaimHash> {
        let _scope = self.guard.enter()?;
        self.transact("cancel_chain_exclusive", ctx, || {
            self.execute_cancel(ctx, compact, mandate, None)
        })
    }

    fn quote(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        timing: FillTiming,
    ) -> Result<U256> {
        self.guard.check()?;
        ensure_live(mandate, ctx)?;
        designate(&mandate.decay_curve, timing, self.clock.block_number())?;

        let (mandate_hash, claim_hash) = self.identify(&claim.compact, mandate);
        self.registry.borrow().ensure_unset(&claim_hash)?;

        let amounts = derive_amounts(
            &claim.compact.maximum_amounts(),
            mandate.minimum_amount,
            DecayAdjustment::NONE,
            mandate.baseline_priority_fee,
            mandate.scaling_factor,
            GasPricing::from(ctx),
        )?;

        let mut available = self.vault.borrow().balance_of(NATIVE_TOKEN, ctx.caller);
        if mandate.is_native() {
            available = available.saturating_sub(amounts.fill_amount);
        }

        let request = DirectiveRequest::new(
            claim,
            mandate_hash,
            claim_hash,
            claimant,
            &amounts.claim_amounts,
            timing,
        );
        let dispensation =
            self.directive
                .borrow()
                .quote_directive(&request, available, &self.config)?;
        debug!(claim = %claim_hash.short(), %dispensation, "quoted");
        Ok(dispensation)
    }

    fn filled(&self, claim_hash: &ClaimHash) -> Option<Address> {
        self.registry.borrow().filled(claim_hash)
    }
}
