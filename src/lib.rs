//! Autonomy Allowance - Dependency-grade and co-payment estimation engine
//!
//! This library provides:
//! - Grade classification from a ten-domain assessment grid
//! - Allowance ceilings by grade from a configurable tariff
//! - Income-dependent co-payment and net subsidy
//! - Purchasable service hours per delivery mode
//!
//! Figures are indicative and must be confirmed by an on-site evaluation.

pub mod error;
pub mod assessment;
pub mod tariff;
pub mod benefit;
pub mod estimate;
pub mod intake;

// Re-export commonly used types
pub use error::InvalidInput;
pub use assessment::{Domain, Answer, AssessmentResult, Grade, GradeClassifier, SimplifiedGrid};
pub use tariff::{TariffConfig, LoadedTariff, ConfigOutcome};
pub use benefit::{BenefitComputation, FamilySituation, HourRange};
pub use estimate::{Estimate, EstimateRequest, EstimateRunner};
