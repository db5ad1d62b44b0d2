//! In-memory collaborators.
//!
//! A manual block clock, a journaled balance table standing in for token
//! contracts, and a journaled claim ledger. Used by tests and for running
//! the engine without a chain behind it.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};
use verdict_types::{BatchClaim, Result, VerdictError};

use crate::interfaces::{BlockClock, ClaimLedger, Journaled, TokenVault};

pub use crate::interfaces::NoopDirective;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Block clock moved by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    block: Cell<u64>,
}

impl ManualClock {
    #[must_use]
    pub fn at(block: u64) -> Self {
        Self {
            block: Cell::new(block),
        }
    }

    pub fn set(&self, block: u64) {
        self.block.set(block);
    }

    pub fn advance(&self, blocks: u64) {
        self.block.set(self.block.get().saturating_add(blocks));
    }
}

impl BlockClock for ManualClock {
    fn block_number(&self) -> u64 {
        self.block.get()
    }
}

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

type BalanceKey = (Address, Address);

/// Per-(token, holder) balances with an undo journal.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    balances: HashMap<BalanceKey, U256>,
    /// Previous value of every write, newest last.
    journal: Vec<(BalanceKey, U256)>,
}

impl InMemoryVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `holder` out of thin air. Setup only.
    pub fn mint(&mut self, token: Address, holder: Address, amount: U256) {
        let current = self.balance_of(token, holder);
        self.write((token, holder), current.saturating_add(amount));
    }

    /// Sum of all balances of `token`.
    #[must_use]
    pub fn total_of(&self, token: Address) -> U256 {
        self.balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .fold(U256::ZERO, |acc, (_, v)| acc.saturating_add(*v))
    }

    fn write(&mut self, key: BalanceKey, value: U256) {
        let previous = self.balances.get(&key).copied().unwrap_or_default();
        self.journal.push((key, previous));
        self.put(key, value);
    }

    fn put(&mut self, key: BalanceKey, value: U256) {
        if value.is_zero() {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, value);
        }
    }
}

impl Journaled for InMemoryVault {
    fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    fn revert_to(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            if let Some((key, previous)) = self.journal.pop() {
                self.put(key, previous);
            }
        }
    }

    fn commit(&mut self, checkpoint: usize) {
        self.journal.truncate(checkpoint);
    }
}

impl TokenVault for InMemoryVault {
    fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance_of(token, from);
        if available < amount {
            return Err(VerdictError::Transfer {
                reason: format!(
                    "{from} holds {available} of {token}, needs {amount}"
                ),
            });
        }
        let credited = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or_else(|| VerdictError::Transfer {
                reason: format!("balance of {to} in {token} overflows"),
            })?;

        self.write((token, from), available - amount);
        self.write((token, to), credited);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Accepts batch claims and consumes each `(sponsor, nonce)` once.
///
/// Signatures are not checked. [`InMemoryLedger::reject_with`] makes every
/// subsequent claim fail, to exercise rollback.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    claims: Vec<BatchClaim>,
    consumed: HashSet<(Address, U256)>,
    rejection: Option<String>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_with(&mut self, reason: impl Into<String>) {
        self.rejection = Some(reason.into());
    }

    pub fn accept_again(&mut self) {
        self.rejection = None;
    }

    /// Accepted claims, oldest first.
    #[must_use]
    pub fn claims(&self) -> &[BatchClaim] {
        &self.claims
    }

    #[must_use]
    pub fn is_consumed(&self, sponsor: Address, nonce: U256) -> bool {
        self.consumed.contains(&(sponsor, nonce))
    }
}

impl Journaled for InMemoryLedger {
    fn checkpoint(&self) -> usize {
        self.claims.len()
    }

    fn revert_to(&mut self, checkpoint: usize) {
        while self.claims.len() > checkpoint {
            if let Some(claim) = self.claims.pop() {
                self.consumed.remove(&(claim.sponsor, claim.nonce));
            }
        }
    }
}

impl ClaimLedger for InMemoryLedger {
    fn batch_claim(&mut self, claim: &BatchClaim) -> Result<()> {
        if let Some(reason) = &self.rejection {
            return Err(VerdictError::Ledger {
                reason: reason.clone(),
            });
        }
        if !self.consumed.insert((claim.sponsor, claim.nonce)) {
            return Err(VerdictError::Ledger {
                reason: format!("nonce {} of {} already consumed", claim.nonce, claim.sponsor),
            });
        }
        self.claims.push(claim.clone());
        Ok(())
    }
}
