//! Disposition registry: each claim is filled or cancelled at most once.
//!
//! The registry is the only state the engine owns. A claim hash moves from
//! `Unset` to exactly one terminal disposition and never changes again; a
//! second attempt of either kind fails with
//! [`VerdictError::AlreadyClaimed`]. Entries are never evicted.
//!
//! Writes are journaled so a failed invocation can roll the registry back
//! together with every other collaborator.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use alloy_primitives::Address;
use verdict_types::{ClaimHash, Disposition, Result, VerdictError};

use crate::interfaces::Journaled;

#[derive(Debug, Default)]
pub struct DispositionRegistry {
    entries: HashMap<ClaimHash, Disposition>,
    /// Claim hashes in write order, for rollback.
    journal: Vec<ClaimHash>,
}

impl DispositionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `claimant` as the filler of `claim_hash`.
    ///
    /// # Errors
    /// [`VerdictError::AlreadyClaimed`] if the claim already has a
    /// disposition.
    pub fn try_fill(&mut self, claim_hash: ClaimHash, claimant: Address) -> Result<()> {
        self.settle(claim_hash, Disposition::Filled(claimant))
    }

    /// Mark `claim_hash` as cancelled by `sponsor`.
    ///
    /// # Errors
    /// [`VerdictError::AlreadyClaimed`] if the claim already has a
    /// disposition.
    pub fn try_cancel(&mut self, claim_hash: ClaimHash, sponsor: Address) -> Result<()> {
        self.settle(claim_hash, Disposition::Cancelled(sponsor))
    }

    fn settle(&mut self, claim_hash: ClaimHash, target: Disposition) -> Result<()> {
        if !Disposition::Unset.can_transition_to(target) {
            return Err(VerdictError::Internal(format!(
                "{target} is not a terminal disposition"
            )));
        }
        match self.entries.entry(claim_hash) {
            Entry::Occupied(_) => Err(VerdictError::AlreadyClaimed(claim_hash)),
            Entry::Vacant(slot) => {
                slot.insert(target);
                self.journal.push(claim_hash);
                Ok(())
            }
        }
    }

    /// Read-only counterpart of the `try_*` checks.
    ///
    /// # Errors
    /// [`VerdictError::AlreadyClaimed`] if `claim_hash` has a disposition.
    pub fn ensure_unset(&self, claim_hash: &ClaimHash) -> Result<()> {
        if self.disposition(claim_hash).is_set() {
            return Err(VerdictError::AlreadyClaimed(*claim_hash));
        }
        Ok(())
    }

    #[must_use]
    pub fn disposition(&self, claim_hash: &ClaimHash) -> Disposition {
        self.entries.get(claim_hash).copied().unwrap_or_default()
    }

    /// The recorded claimant for a filled claim, or the sponsor for a
    /// cancelled one. `None` while unset.
    #[must_use]
    pub fn filled(&self, claim_hash: &ClaimHash) -> Option<Address> {
        self.entries.get(claim_hash).and_then(Disposition::party)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Journaled for DispositionRegistry {
    fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    fn revert_to(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            if let Some(claim_hash) = self.journal.pop() {
                self.entries.remove(&claim_hash);
            }
        }
    }

    fn commit(&mut self, checkpoint: usize) {
        self.journal.truncate(checkpoint);
    }
}
