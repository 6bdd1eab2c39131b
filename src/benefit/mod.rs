//! Allowance calculations: ceiling, co-payment, net subsidy and service hours
//!
//! All functions are pure: the same inputs always give the same outputs and
//! nothing is shared between calls except the read-only tariff.

mod participation;
mod hours;
mod computation;

pub use participation::{
    ceiling, household_income, participation, split_tranches, FamilySituation, Tranches,
    COUPLE_DIVISOR, HIGH_INCOME_FACTOR, LOW_INCOME_FACTOR, MAX_PARTICIPATION_RATE,
    TRANCHE_1_FACTOR, TRANCHE_2_FACTOR,
};
pub use hours::{
    hours_for_mode, net_subsidy, net_subsidy_and_hours, HourRange, ServiceHours, SubsidyAndHours,
    HOURS_HIGH_SHARE, HOURS_LOW_SHARE,
};
pub use computation::{BenefitComputation, BenefitInputs};
