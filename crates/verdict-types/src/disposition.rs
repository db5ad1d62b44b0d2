//! # Disposition: the terminal outcome of a claim
//!
//! ## State Machine
//!
//! ```text
//!   ┌───────┐  fill    ┌──────────────────┐
//!   │ UNSET ├─────────▶│ FILLED(claimant) │
//!   └───┬───┘          └──────────────────┘
//!       │ cancel
//!       ▼
//!   ┌───────────────────┐
//!   │ CANCELLED(sponsor)│
//!   └───────────────────┘
//! ```
//!
//! Both terminal states are final. A claim identity is disposed of at most
//! once, which is what makes settlement exactly-once.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The recorded outcome for one claim identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Disposition {
    /// Nothing recorded yet.
    #[default]
    Unset,
    /// A filler delivered and is entitled to the committed tokens.
    Filled(Address),
    /// The sponsor withdrew the mandate.
    Cancelled(Address),
}

impl Disposition {
    /// Only `Unset` may move, and only to a terminal state.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unset, Self::Filled(_) | Self::Cancelled(_))
        )
    }

    /// The party recorded against the claim, if any.
    #[must_use]
    pub fn party(&self) -> Option<Address> {
        match self {
            Self::Unset => None,
            Self::Filled(who) | Self::Cancelled(who) => Some(*who),
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "UNSET"),
            Self::Filled(who) => write!(f, "FILLED({who})"),
            Self::Cancelled(who) => write!(f, "CANCELLED({who})"),
        }
    }
}
