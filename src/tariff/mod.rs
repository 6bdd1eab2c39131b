//! Tariff configuration: reference amount, ceiling coefficients and hourly rates
//!
//! Loaded once at startup and shared read-only between evaluations.

pub mod loader;

pub use loader::{ConfigError, ConfigOutcome, LoadedTariff, DEFAULT_CONFIG_PATH};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::Grade;

/// Monthly reference amount (third-party assistance increase)
pub const DEFAULT_REFERENCE_AMOUNT: f64 = 1365.08;

/// Process-wide tariff parameters
///
/// Deserializing goes through the same validation as the file loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "loader::RawTariff")]
pub struct TariffConfig {
    /// Monthly reference amount every threshold is expressed against
    pub reference_amount: f64,

    /// Ceiling coefficient by grade (ceiling = coefficient × reference amount)
    pub ceiling_coefficients: BTreeMap<Grade, f64>,

    /// Hourly rate by service-delivery mode
    pub hourly_rates: BTreeMap<String, f64>,
}

impl TariffConfig {
    /// Coefficients for grades 1 to 4; grades 5 and 6 have no ceiling
    pub fn default_ceiling_coefficients() -> BTreeMap<Grade, f64> {
        BTreeMap::from([
            (Grade::G1, 1.615),
            (Grade::G2, 1.306),
            (Grade::G3, 0.944),
            (Grade::G4, 0.630),
        ])
    }

    pub fn default_hourly_rates() -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("direct_employment".to_string(), 18.96),
            ("mandated_agency".to_string(), 21.00),
            ("provider_agency".to_string(), 24.58),
        ])
    }

    /// Coefficient for a grade, if that grade has a ceiling
    pub fn coefficient(&self, grade: Grade) -> Option<f64> {
        self.ceiling_coefficients.get(&grade).copied()
    }

    pub fn hourly_rate(&self, mode: &str) -> Option<f64> {
        self.hourly_rates.get(mode).copied()
    }

    /// Configured service modes, sorted by name
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.hourly_rates.keys().map(String::as_str)
    }
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            reference_amount: DEFAULT_REFERENCE_AMOUNT,
            ceiling_coefficients: Self::default_ceiling_coefficients(),
            hourly_rates: Self::default_hourly_rates(),
        }
    }
}
