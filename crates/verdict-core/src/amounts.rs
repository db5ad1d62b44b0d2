//! Fill and claim amount derivation.
//!
//! Amounts are derived in two stages:
//!
//! 1. **Decay**: each claim amount is reduced by `claim_decrease_bps`
//!    (rounded down) and the minimum fill is increased by
//!    `fill_increase_bps` (rounded up).
//! 2. **Priority-fee scaling**: when the transaction pays more priority fee
//!    than the mandate's baseline and the scaling factor is not unity,
//!    exactly one side scales.
//!    - `scaling_factor > 1.0` (exact-in): fill amount scales up, rounded up.
//!    - `scaling_factor < 1.0` (exact-out): claim amounts scale down, rounded down.
//!
//! Rounding always favors the filler on the fill side and the sponsor on
//! the claim side.

use alloy_primitives::U256;
use verdict_types::{
    CallContext, Result, VerdictError,
    constants::{BPS_DENOMINATOR, WAD},
};

use crate::decay::DecayAdjustment;

/// Gas pricing of the executing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GasPricing {
    pub gas_price: U256,
    pub base_fee: U256,
}

impl GasPricing {
    #[must_use]
    pub fn new(gas_price: U256, base_fee: U256) -> Self {
        Self {
            gas_price,
            base_fee,
        }
    }

    /// `gas_price - base_fee`.
    pub fn priority_fee(&self) -> Result<U256> {
        self.gas_price
            .checked_sub(self.base_fee)
            .ok_or(VerdictError::InvalidGasPrice {
                gas_price: self.gas_price,
                base_fee: self.base_fee,
            })
    }

    /// Priority fee in excess of `baseline`, floored at zero.
    pub fn priority_fee_above(&self, baseline: U256) -> Result<U256> {
        Ok(self.priority_fee()?.saturating_sub(baseline))
    }
}

impl From<&CallContext> for GasPricing {
    fn from(ctx: &CallContext) -> Self {
        Self::new(ctx.gas_price, ctx.base_fee)
    }
}

/// Which side, if any, a priority-fee surplus scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingMode {
    Unscaled,
    ExactIn,
    ExactOut,
}

impl ScalingMode {
    #[must_use]
    pub fn select(scaling_factor: U256, priority_fee_above_baseline: U256) -> Self {
        if priority_fee_above_baseline.is_zero() || scaling_factor == WAD {
            Self::Unscaled
        } else if scaling_factor > WAD {
            Self::ExactIn
        } else {
            Self::ExactOut
        }
    }
}

/// Derived amounts for a fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAmounts {
    /// Delivered to the mandate's recipient.
    pub fill_amount: U256,
    /// Withdrawable from each committed lock, index-aligned with commitments.
    pub claim_amounts: Vec<U256>,
}

fn overflow(what: &str) -> VerdictError {
    VerdictError::AmountOverflow {
        reason: format!("{what} exceeds 256 bits"),
    }
}

/// `floor(x * y / d)`. `d` must be non-zero.
pub fn mul_div_down(x: U256, y: U256, d: U256) -> Result<U256> {
    let product = x.checked_mul(y).ok_or_else(|| overflow("product"))?;
    Ok(product / d)
}

/// `ceil(x * y / d)`. `d` must be non-zero.
pub fn mul_div_up(x: U256, y: U256, d: U256) -> Result<U256> {
    let product = x.checked_mul(y).ok_or_else(|| overflow("product"))?;
    if product.is_zero() {
        return Ok(U256::ZERO);
    }
    Ok((product - U256::from(1u64)) / d + U256::from(1u64))
}

/// `floor(x * y / WAD)`.
pub fn mul_wad(x: U256, y: U256) -> Result<U256> {
    mul_div_down(x, y, WAD)
}

/// `ceil(x * y / WAD)`.
pub fn mul_wad_up(x: U256, y: U256) -> Result<U256> {
    mul_div_up(x, y, WAD)
}

/// Derive fill and claim amounts from the mandate parameters, the decay
/// adjustment, and the transaction's gas pricing.
pub fn derive_amounts(
    maximum_claim_amounts: &[U256],
    minimum_fill_amount: U256,
    adjustment: DecayAdjustment,
    baseline_priority_fee: U256,
    scaling_factor: U256,
    gas: GasPricing,
) -> Result<DerivedAmounts> {
    if adjustment.claim_decrease_bps > BPS_DENOMINATOR {
        return Err(VerdictError::InvalidDecayCurve {
            reason: format!(
                "claim decrease of {} bps exceeds {BPS_DENOMINATOR}",
                adjustment.claim_decrease_bps
            ),
        });
    }

    let denominator = U256::from(BPS_DENOMINATOR);
    let claim_factor = U256::from(BPS_DENOMINATOR - adjustment.claim_decrease_bps);
    let fill_factor = U256::from(BPS_DENOMINATOR) + U256::from(adjustment.fill_increase_bps);

    let mut claim_amounts = maximum_claim_amounts
        .iter()
        .map(|max| mul_div_down(*max, claim_factor, denominator))
        .collect::<Result<Vec<_>>>()?;
    let mut fill_amount = mul_div_up(minimum_fill_amount, fill_factor, denominator)?;

    let fee_above = gas.priority_fee_above(baseline_priority_fee)?;
    let mode = ScalingMode::select(scaling_factor, fee_above);

    match mode {
        ScalingMode::Unscaled => {}
        ScalingMode::ExactIn => {
            let multiplier = (scaling_factor - WAD)
                .checked_mul(fee_above)
                .and_then(|bump| bump.checked_add(WAD))
                .ok_or_else(|| overflow("exact-in multiplier"))?;
            fill_amount = mul_wad_up(fill_amount, multiplier)?;
        }
        ScalingMode::ExactOut => {
            let reduction = (WAD - scaling_factor)
                .checked_mul(fee_above)
                .ok_or_else(|| overflow("exact-out reduction"))?;
            let multiplier =
                WAD.checked_sub(reduction)
                    .ok_or_else(|| VerdictError::AmountOverflow {
                        reason: format!(
                            "exact-out multiplier below zero at priority fee {fee_above}"
                        ),
                    })?;
            for amount in &mut claim_amounts {
                *amount = mul_wad(*amount, multiplier)?;
            }
        }
    }

    tracing::trace!(
        ?mode,
        %fill_amount,
        fill_increase_bps = adjustment.fill_increase_bps,
        claim_decrease_bps = adjustment.claim_decrease_bps,
        %fee_above,
        "derived amounts"
    );

    Ok(DerivedAmounts {
        fill_amount,
        claim_amounts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    const GWEI: u64 = 1_000_000_000;

    fn gas(priority: u64) -> GasPricing {
        GasPricing::new(u(100 + priority), u(100))
    }

    #[test]
    fn unity_scaling_applies_only_decay() {
        let out = derive_amounts(
            &[u(1_000), u(2_000)],
            u(1_000),
            DecayAdjustment::new(500, 300),
            U256::ZERO,
            WAD,
            gas(5 * GWEI),
        )
        .unwrap();
        assert_eq!(out.claim_amounts, vec![u(970), u(1_940)]);
        assert_eq!(out.fill_amount, u(1_050));
    }

    #[test]
    fn zero_fee_above_baseline_applies_only_decay() {
        let out = derive_amounts(
            &[u(1_000)],
            u(1_000),
            DecayAdjustment::new(500, 300),
            u(GWEI),
            WAD + u(1),
            gas(GWEI),
        )
        .unwrap();
        assert_eq!(out.claim_amounts, vec![u(970)]);
        assert_eq!(out.fill_amount, u(1_050));
    }

    #[test]
    fn fill_increase_rounds_up_claim_decrease_rounds_down() {
        let out = derive_amounts(
            &[u(999)],
            u(999),
            DecayAdjustment::new(1, 1),
            U256::ZERO,
            WAD,
            GasPricing::default(),
        )
        .unwrap();
        // 999 * 10001 / 10000 = 999.0999 -> 1000
        assert_eq!(out.fill_amount, u(1_000));
        // 999 * 9999 / 10000 = 998.9001 -> 998
        assert_eq!(out.claim_amounts, vec![u(998)]);
    }

    #[test]
    fn exact_in_scales_fill_only() {
        // (1e-9 per wei) * 1 gwei above baseline = 2x multiplier.
        let scaling = WAD + u(GWEI);
        let out = derive_amounts(
            &[u(1_000)],
            u(1_000),
            DecayAdjustment::NONE,
            U256::ZERO,
            scaling,
            gas(GWEI),
        )
        .unwrap();
        assert_eq!(out.fill_amount, u(2_000));
        assert_eq!(out.claim_amounts, vec![u(1_000)]);
    }

    #[test]
    fn exact_in_scales_decay_adjusted_fill() {
        let out = derive_amounts(
            &[u(1_000)],
            u(1_000),
            DecayAdjustment::new(1_000, 500),
            U256::ZERO,
            WAD + u(GWEI),
            gas(GWEI),
        )
        .unwrap();
        assert_eq!(out.fill_amount, u(2_200));
        assert_eq!(out.claim_amounts, vec![u(950)]);
    }

    #[test]
    fn exact_in_rounds_up() {
        // multiplier = 1 + 1e-18 * 1 -> 3 * (1e18 + 1) / 1e18 rounds up to 4
        let out = derive_amounts(
            &[u(1)],
            u(3),
            DecayAdjustment::NONE,
            U256::ZERO,
            WAD + u(1),
            gas(1),
        )
        .unwrap();
        assert_eq!(out.fill_amount, u(4));
    }

    #[test]
    fn exact_out_scales_claims_only() {
        let scaling = WAD - u(GWEI / 2);
        let out = derive_amounts(
            &[u(1_000), u(3)],
            u(1_000),
            DecayAdjustment::NONE,
            U256::ZERO,
            scaling,
            gas(GWEI),
        )
        .unwrap();
        assert_eq!(out.fill_amount, u(1_000));
        // 3 * 0.5 = 1.5 -> 1
        assert_eq!(out.claim_amounts, vec![u(500), u(1)]);
    }

    #[test]
    fn exact_out_keeps_decay_adjusted_fill() {
        let out = derive_amounts(
            &[u(1_000)],
            u(1_000),
            DecayAdjustment::new(200, 0),
            U256::ZERO,
            WAD - u(GWEI / 2),
            gas(GWEI),
        )
        .unwrap();
        assert_eq!(out.fill_amount, u(1_020));
        assert_eq!(out.claim_amounts, vec![u(500)]);
    }

    #[test]
    fn exact_out_below_zero_is_rejected() {
        let err = derive_amounts(
            &[u(1_000)],
            u(1_000),
            DecayAdjustment::NONE,
            U256::ZERO,
            U256::ZERO,
            gas(2),
        )
        .unwrap_err();
        assert!(matches!(err, VerdictError::AmountOverflow { .. }));
    }

    #[test]
    fn exact_out_at_exactly_zero_multiplier() {
        let out = derive_amounts(
            &[u(1_000)],
            u(1_000),
            DecayAdjustment::NONE,
            U256::ZERO,
            U256::ZERO,
            gas(1),
        )
        .unwrap();
        assert_eq!(out.claim_amounts, vec![U256::ZERO]);
    }

    #[test]
    fn gas_price_below_base_fee_rejected() {
        let err = derive_amounts(
            &[u(1)],
            u(1),
            DecayAdjustment::NONE,
            U256::ZERO,
            WAD,
            GasPricing::new(u(9), u(10)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            VerdictError::InvalidGasPrice {
                gas_price: u(9),
                base_fee: u(10),
            }
        );
    }

    #[test]
    fn overflowing_fill_rejected() {
        let err = derive_amounts(
            &[],
            U256::MAX,
            DecayAdjustment::new(1, 0),
            U256::ZERO,
            WAD,
            GasPricing::default(),
        )
        .unwrap_err();
        assert!(matches!(err, VerdictError::AmountOverflow { .. }));
    }

    #[test]
    fn full_claim_decrease_zeroes_claims() {
        let out = derive_amounts(
            &[u(12_345)],
            u(1),
            DecayAdjustment::new(0, 10_000),
            U256::ZERO,
            WAD,
            GasPricing::default(),
        )
        .unwrap();
        assert_eq!(out.claim_amounts, vec![U256::ZERO]);
    }

    #[test]
    fn mode_selection() {
        assert_eq!(ScalingMode::select(WAD, u(5)), ScalingMode::Unscaled);
        assert_eq!(ScalingMode::select(WAD + u(1), U256::ZERO), ScalingMode::Unscaled);
        assert_eq!(ScalingMode::select(WAD + u(1), u(1)), ScalingMode::ExactIn);
        assert_eq!(ScalingMode::select(WAD - u(1), u(1)), ScalingMode::ExactOut);
    }

    #[test]
    fn priority_fee_above_baseline_floors_at_zero() {
        let pricing = GasPricing::new(u(110), u(100));
        assert_eq!(pricing.priority_fee().unwrap(), u(10));
        assert_eq!(pricing.priority_fee_above(u(4)).unwrap(), u(6));
        assert_eq!(pricing.priority_fee_above(u(40)).unwrap(), U256::ZERO);
    }

    #[test]
    fn mul_div_rounding() {
        assert_eq!(mul_div_down(u(7), u(3), u(2)).unwrap(), u(10));
        assert_eq!(mul_div_up(u(7), u(3), u(2)).unwrap(), u(11));
        assert_eq!(mul_div_up(U256::ZERO, u(3), u(2)).unwrap(), U256::ZERO);
        assert_eq!(mul_wad(u(5), WAD).unwrap(), u(5));
        assert_eq!(mul_wad_up(u(5), WAD).unwrap(), u(5));
    }
}
