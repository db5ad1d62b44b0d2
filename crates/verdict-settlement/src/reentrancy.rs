//! Engine-wide reentrancy lock.
//!
//! Fill and cancel entry points hold the lock for their whole invocation.
//! Callbacks and directives run while it is held, so any attempt they make
//! to re-enter a guarded entry point, or to quote, fails with
//! [`VerdictError::ReentrancyGuard`]. Read-only queries stay available.

use std::cell::Cell;

use verdict_types::{Result, VerdictError};

#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: Cell<bool>,
}

/// Held for the duration of a guarded invocation; releases on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct GuardScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock.
    ///
    /// # Errors
    /// [`VerdictError::ReentrancyGuard`] if it is already held.
    pub fn enter(&self) -> Result<GuardScope<'_>> {
        if self.entered.replace(true) {
            return Err(VerdictError::ReentrancyGuard);
        }
        Ok(GuardScope { guard: self })
    }

    /// Fail if a guarded invocation is in progress, without taking the lock.
    ///
    /// # Errors
    /// [`VerdictError::ReentrancyGuard`] while the lock is held.
    pub fn check(&self) -> Result<()> {
        if self.entered.get() {
            Err(VerdictError::ReentrancyGuard)
        } else {
            Ok(())
        }
    }

    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.entered.set(false);
    }
}
