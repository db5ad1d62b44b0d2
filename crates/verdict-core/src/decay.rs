//! Piecewise-linear decay curve evaluation.
//!
//! A curve starts at (0, 0). Each segment ramps linearly from the previous
//! segment's end values to its own end values over its block duration. Past
//! the last segment the curve saturates at the final end values.
//!
//! ```text
//!   bps
//!    │            ┌──────────  saturates
//!    │          ╱
//!    │   ┌────╱   <- zero-duration segment = step
//!    │ ╱
//!    └─┴──────┴───────────── blocks passed
//! ```

use verdict_types::DecaySegment;

/// Adjustments in basis points produced by the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecayAdjustment {
    pub fill_increase_bps: u32,
    pub claim_decrease_bps: u32,
}

impl DecayAdjustment {
    pub const NONE: Self = Self {
        fill_increase_bps: 0,
        claim_decrease_bps: 0,
    };

    #[must_use]
    pub fn new(fill_increase_bps: u32, claim_decrease_bps: u32) -> Self {
        Self {
            fill_increase_bps,
            claim_decrease_bps,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    fn end_of(segment: &DecaySegment) -> Self {
        Self::new(segment.fill_increase_bps, segment.claim_decrease_bps)
    }
}

/// Linear interpolation from `from` toward `to`, floored toward `from`.
/// Caller guarantees `elapsed < duration`.
fn interpolate(from: u32, to: u32, elapsed: u64, duration: u64) -> u32 {
    let span = u128::from(from.abs_diff(to));
    let delta = span * u128::from(elapsed) / u128::from(duration);
    // delta <= span, which itself fits in u32.
    let delta = u32::try_from(delta).unwrap_or(u32::MAX);
    if to >= from { from + delta } else { from - delta }
}

/// Evaluate `curve` at `blocks_passed` blocks after the target block.
#[must_use]
pub fn evaluate(curve: &[DecaySegment], blocks_passed: u64) -> DecayAdjustment {
    let mut segment_start = 0u64;
    let mut current = DecayAdjustment::NONE;

    for segment in curve {
        let segment_end = segment_start.saturating_add(segment.block_duration);
        if blocks_passed < segment_end {
            let elapsed = blocks_passed - segment_start;
            return DecayAdjustment {
                fill_increase_bps: interpolate(
                    current.fill_increase_bps,
                    segment.fill_increase_bps,
                    elapsed,
                    segment.block_duration,
                ),
                claim_decrease_bps: interpolate(
                    current.claim_decrease_bps,
                    segment.claim_decrease_bps,
                    elapsed,
                    segment.block_duration,
                ),
            };
        }
        current = DecayAdjustment::end_of(segment);
        segment_start = segment_end;
    }

    current
}
