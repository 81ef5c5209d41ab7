//! Costing arithmetic for jewelry trade.
//!
//! Metal value is weight times purity times rate; the making charge is
//! selected by an explicit charge-type tag, never inferred from which
//! fields happen to be present.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::finance::rounding::round_money;

/// Errors produced by costing calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CostingError {
    /// Net weight must be strictly positive.
    #[error("net weight must be positive, got {0}")]
    NonPositiveWeight(Decimal),

    /// Purity karat must lie in (0, 24].
    #[error("purity karat must be in (0, 24], got {0}")]
    KaratOutOfRange(Decimal),

    /// Purity factor must lie in (0, 1].
    #[error("purity factor must be in (0, 1], got {0}")]
    FactorOutOfRange(Decimal),

    /// Rate per gram must be strictly positive.
    #[error("rate per gram must be positive, got {0}")]
    NonPositiveRate(Decimal),

    /// A charge component must not be negative.
    #[error("charge must not be negative, got {0}")]
    NegativeCharge(Decimal),
}

/// Metal purity, either in karat (out of 24) or as an explicit factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purity {
    /// Karat purity; 24 karat is pure metal.
    Karat(Decimal),
    /// Explicit purity factor in (0, 1].
    Factor(Decimal),
}

impl Purity {
    /// Returns the purity as a factor in (0, 1].
    ///
    /// # Errors
    ///
    /// Returns a range error for karat outside (0, 24] or a factor outside
    /// (0, 1].
    pub fn factor(self) -> Result<Decimal, CostingError> {
        match self {
            Self::Karat(karat) => {
                let pure = Decimal::from(24);
                if karat <= Decimal::ZERO || karat > pure {
                    return Err(CostingError::KaratOutOfRange(karat));
                }
                Ok(karat / pure)
            }
            Self::Factor(factor) => {
                if factor <= Decimal::ZERO || factor > Decimal::ONE {
                    return Err(CostingError::FactorOutOfRange(factor));
                }
                Ok(factor)
            }
        }
    }
}

/// Making (labor) charge, selected by an explicit charge-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "charge_type", rename_all = "snake_case")]
pub enum MakingCharge {
    /// Per-gram labor rate applied to net weight.
    PerGram {
        /// Rate per gram.
        rate: Decimal,
    },
    /// Fixed labor amount.
    Fixed {
        /// The fixed amount.
        amount: Decimal,
    },
    /// Percentage of the metal value.
    PercentOfMetal {
        /// Percentage (e.g. `8` for 8%).
        percent: Decimal,
    },
}

/// Computes the metal value: net weight x purity factor x rate per gram,
/// rounded to 2 decimal places.
///
/// # Errors
///
/// Returns a validation error for non-positive weight or rate, or a purity
/// outside its range.
pub fn metal_value(
    net_weight: Decimal,
    purity: Purity,
    rate_per_gram: Decimal,
) -> Result<Decimal, CostingError> {
    if net_weight <= Decimal::ZERO {
        return Err(CostingError::NonPositiveWeight(net_weight));
    }
    if rate_per_gram <= Decimal::ZERO {
        return Err(CostingError::NonPositiveRate(rate_per_gram));
    }
    Ok(round_money(net_weight * purity.factor()? * rate_per_gram))
}

/// Computes the making charge for a line, rounded to 2 decimal places.
///
/// `metal_value` is the metal value the percentage variant resolves
/// against; the other variants ignore it.
///
/// # Errors
///
/// Returns a validation error for a negative charge component or, for the
/// per-gram variant, a non-positive weight.
pub fn making_charge_value(
    charge: MakingCharge,
    net_weight: Decimal,
    metal_value: Decimal,
) -> Result<Decimal, CostingError> {
    match charge {
        MakingCharge::PerGram { rate } => {
            if rate < Decimal::ZERO {
                return Err(CostingError::NegativeCharge(rate));
            }
            if net_weight <= Decimal::ZERO {
                return Err(CostingError::NonPositiveWeight(net_weight));
            }
            Ok(round_money(rate * net_weight))
        }
        MakingCharge::Fixed { amount } => {
            if amount < Decimal::ZERO {
                return Err(CostingError::NegativeCharge(amount));
            }
            Ok(round_money(amount))
        }
        MakingCharge::PercentOfMetal { percent } => {
            if percent < Decimal::ZERO {
                return Err(CostingError::NegativeCharge(percent));
            }
            Ok(round_money(metal_value * percent / Decimal::from(100)))
        }
    }
}
