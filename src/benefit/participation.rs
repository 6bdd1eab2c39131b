//! Ceiling, household income and co-payment formulas
//!
//! Every threshold is a multiple of the monthly reference amount `M`:
//! - `R <= 0.725·M`: no co-payment
//! - `R >= 2.67·M`: co-payment of 90% of the approved amount
//! - in between: the approved amount is split into three tranches at
//!   `0.317·M` and `0.498·M`, each weighted by an income-dependent factor

use serde::{Deserialize, Serialize};

use crate::assessment::Grade;
use crate::error::{ensure_amount, InvalidInput};
use crate::tariff::TariffConfig;

/// Income at or below `LOW_INCOME_FACTOR × M` pays nothing
pub const LOW_INCOME_FACTOR: f64 = 0.725;
/// Income at or above `HIGH_INCOME_FACTOR × M` pays the capped rate
pub const HIGH_INCOME_FACTOR: f64 = 2.67;
/// Upper bound of the first tranche, × M
pub const TRANCHE_1_FACTOR: f64 = 0.317;
/// Upper bound of the second tranche, × M
pub const TRANCHE_2_FACTOR: f64 = 0.498;
/// Maximum share of the approved amount borne by the beneficiary
pub const MAX_PARTICIPATION_RATE: f64 = 0.9;
/// Equivalence scale applied to a couple's resources
pub const COUPLE_DIVISOR: f64 = 1.7;

/// Household composition used for the income equivalence scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilySituation {
    #[default]
    Single,
    Couple,
}

impl std::str::FromStr for FamilySituation {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(FamilySituation::Single),
            "couple" => Ok(FamilySituation::Couple),
            other => Err(InvalidInput::UnknownFamilySituation(other.to_string())),
        }
    }
}

/// Approved amount split at the tranche thresholds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tranches {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
}

impl Tranches {
    pub fn total(&self) -> f64 {
        self.a1 + self.a2 + self.a3
    }
}

/// Maximum monthly approved amount for a grade, rounded to the cent
///
/// Grades without a coefficient (5 and 6) return 0: the allowance track does
/// not apply to them, which is not the same as an approved amount of zero.
pub fn ceiling(grade: Grade, cfg: &TariffConfig) -> f64 {
    cfg.coefficient(grade)
        .map(|coef| round_cents(coef * cfg.reference_amount))
        .unwrap_or(0.0)
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Accept only a finite, strictly positive reference amount
pub(crate) fn ensure_reference_amount(value: f64) -> Result<f64, InvalidInput> {
    let m = ensure_amount("reference_amount", value)?;
    if m == 0.0 {
        return Err(InvalidInput::InvalidAmount { field: "reference_amount", value });
    }
    Ok(m)
}

/// Resources taken into account for the co-payment formula
pub fn household_income(raw_income: f64, situation: FamilySituation) -> Result<f64, InvalidInput> {
    let raw_income = ensure_amount("household_income", raw_income)?;
    Ok(match situation {
        FamilySituation::Single => raw_income,
        FamilySituation::Couple => raw_income / COUPLE_DIVISOR,
    })
}

/// Split an approved amount into its three tranches
pub fn split_tranches(approved: f64, reference_amount: f64) -> Tranches {
    let s1 = TRANCHE_1_FACTOR * reference_amount;
    let s2 = TRANCHE_2_FACTOR * reference_amount;

    Tranches {
        a1: approved.min(s1),
        a2: (approved - s1).max(0.0).min((s2 - s1).max(0.0)),
        a3: (approved - s2).max(0.0),
    }
}

/// Monthly co-payment for income `R`, approved amount `A`, reference amount `M`
///
/// Inputs are validated: negative or non-finite amounts and a non-positive
/// reference amount are rejected. The result is always in `[0, 0.9·A]`.
pub fn participation(income: f64, approved: f64, reference_amount: f64) -> Result<f64, InvalidInput> {
    let income = ensure_amount("household_income", income)?;
    let approved = ensure_amount("approved_amount", approved)?;
    let reference_amount = ensure_reference_amount(reference_amount)?;

    Ok(participation_unchecked(income, approved, reference_amount))
}

/// Co-payment formula over already-validated inputs
pub(crate) fn participation_unchecked(income: f64, approved: f64, reference_amount: f64) -> f64 {
    if approved <= 0.0 {
        return 0.0;
    }

    let low = LOW_INCOME_FACTOR * reference_amount;
    let high = HIGH_INCOME_FACTOR * reference_amount;
    let cap = MAX_PARTICIPATION_RATE * approved;

    if income <= low {
        return 0.0;
    }
    if income >= high {
        return cap;
    }

    let t = split_tranches(approved, reference_amount);
    let denom = high - low;
    let base = ((income - low) / denom) * MAX_PARTICIPATION_RATE;
    let term2 = (0.6 / denom) * income + 0.4;
    let term3 = (0.8 / denom) * income + 0.2;

    let p = t.a1 * base + t.a2 * base * term2 + t.a3 * base * term3;
    p.min(cap).max(0.0)
}
