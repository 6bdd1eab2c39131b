//! Session-scoped benefit figures for one household

use log::warn;
use serde::{Deserialize, Serialize};

use super::participation::{
    ceiling, ensure_reference_amount, household_income, participation_unchecked, FamilySituation,
};
use super::hours::net_subsidy;
use crate::assessment::Grade;
use crate::error::{ensure_amount, InvalidInput};
use crate::tariff::TariffConfig;

/// Inputs that drive a benefit computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitInputs {
    pub grade: Grade,
    pub raw_income: f64,
    pub family_situation: FamilySituation,
    /// Requested aid-plan amount; `None` means "the ceiling"
    pub requested_amount: Option<f64>,
}

/// Derived figures for one evaluation
///
/// A plain value: recompute it whenever an input changes, never store it
/// beyond the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitComputation {
    /// Resources used in the formula (`R`)
    pub household_income: f64,
    /// Maximum approved amount for the grade; 0 when the grade has no ceiling
    pub ceiling: f64,
    /// Amount asked for before capping
    pub requested_amount: f64,
    /// Approved amount after capping (`A_effective`)
    pub effective_amount: f64,
    /// Monthly co-payment (`P`)
    pub co_payment: f64,
    /// `P / A_effective`, 0 when nothing is approved
    pub participation_rate: f64,
    /// `A_effective - P`
    pub net_subsidy: f64,
    /// Request was above a non-zero ceiling and got capped
    pub exceeds_ceiling: bool,
}

impl BenefitComputation {
    /// Run the ceiling, income, capping and co-payment steps
    pub fn compute(inputs: &BenefitInputs, cfg: &TariffConfig) -> Result<Self, InvalidInput> {
        let reference_amount = ensure_reference_amount(cfg.reference_amount)?;
        let income = household_income(inputs.raw_income, inputs.family_situation)?;
        let ceiling = ceiling(inputs.grade, cfg);

        let requested = match inputs.requested_amount {
            Some(amount) => ensure_amount("requested_amount", amount)?,
            None => ceiling,
        };

        // A zero ceiling means the track does not apply, so nothing to cap against
        let exceeds_ceiling = ceiling > 0.0 && requested > ceiling;
        let effective = if ceiling > 0.0 { requested.min(ceiling) } else { requested };
        if exceeds_ceiling {
            warn!("Requested amount {:.2} exceeds grade {} ceiling {:.2}, capping",
                requested, inputs.grade, ceiling);
        }

        let co_payment = participation_unchecked(income, effective, reference_amount);
        let participation_rate = if effective == 0.0 { 0.0 } else { co_payment / effective };

        Ok(Self {
            household_income: income,
            ceiling,
            requested_amount: requested,
            effective_amount: effective,
            co_payment,
            participation_rate,
            net_subsidy: net_subsidy(effective, co_payment),
            exceeds_ceiling,
        })
    }
}
