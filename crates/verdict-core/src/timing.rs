//! Target block designation checks.
//!
//! A fill either names no target block (and the mandate must carry no decay
//! curve) or names one that is not in the future and is no more than
//! `max_blocks_after_target` blocks old. Only then is the curve evaluated.

use verdict_types::{DecaySegment, FillTiming, Result, VerdictError, constants::BPS_DENOMINATOR};

use crate::decay::{DecayAdjustment, evaluate};

/// Reject curves whose claim decrease would exceed the whole claim.
pub fn validate_curve(curve: &[DecaySegment]) -> Result<()> {
    if let Some((index, segment)) = curve
        .iter()
        .enumerate()
        .find(|(_, segment)| !segment.is_well_formed())
    {
        return Err(VerdictError::InvalidDecayCurve {
            reason: format!(
                "segment {index} decreases claims by {} bps (max {BPS_DENOMINATOR})",
                segment.claim_decrease_bps
            ),
        });
    }
    Ok(())
}

/// Validate `timing` against `current_block` and evaluate the curve.
pub fn designate(
    curve: &[DecaySegment],
    timing: FillTiming,
    current_block: u64,
) -> Result<DecayAdjustment> {
    validate_curve(curve)?;

    if !timing.has_target() {
        if !curve.is_empty() {
            return Err(VerdictError::InvalidTargetBlockDesignation {
                reason: "decay curve supplied without a target block".into(),
            });
        }
        return Ok(DecayAdjustment::NONE);
    }

    if timing.target_block > current_block {
        return Err(VerdictError::InvalidTargetBlock {
            target_block: timing.target_block,
            current_block,
        });
    }

    let blocks_passed = current_block - timing.target_block;
    if blocks_passed > timing.max_blocks_after_target {
        return Err(VerdictError::InvalidTargetBlockDesignation {
            reason: format!(
                "target block {} is {blocks_passed} blocks old, window is {}",
                timing.target_block, timing.max_blocks_after_target
            ),
        });
    }

    Ok(evaluate(curve, blocks_passed))
}
