//! JSON tariff loader with explicit fallback outcome
//!
//! A missing or unreadable file never aborts the caller: the built-in
//! defaults are substituted and the outcome says which case occurred.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use super::TariffConfig;
use crate::assessment::Grade;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Why a config source could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the active tariff was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOutcome {
    /// Read and validated from this file
    Loaded { path: PathBuf },
    /// No config file found; built-in defaults in use
    DefaultedMissing,
    /// File present but unusable; built-in defaults in use
    DefaultedMalformed { path: PathBuf, reason: String },
}

impl ConfigOutcome {
    /// True when defaults were substituted
    pub fn is_fallback(&self) -> bool {
        !matches!(self, ConfigOutcome::Loaded { .. })
    }
}

impl fmt::Display for ConfigOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOutcome::Loaded { path } => write!(f, "loaded from {}", path.display()),
            ConfigOutcome::DefaultedMissing => write!(f, "no config file, using defaults"),
            ConfigOutcome::DefaultedMalformed { path, reason } => {
                write!(f, "{} unusable ({}), using defaults", path.display(), reason)
            }
        }
    }
}

/// Tariff plus the outcome of loading it
#[derive(Debug, Clone)]
pub struct LoadedTariff {
    pub config: TariffConfig,
    pub outcome: ConfigOutcome,
}

/// On-disk shape; every field is optional and falls back to its default
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTariff {
    #[serde(alias = "mtp")]
    reference_amount: Option<f64>,
    #[serde(alias = "plafonds_multiplicateurs")]
    ceiling_coefficients: Option<BTreeMap<String, f64>>,
    #[serde(alias = "couts_horaires")]
    hourly_rates: Option<BTreeMap<String, f64>>,
}

impl RawTariff {
    fn into_config(self) -> Result<TariffConfig, ConfigError> {
        let reference_amount = match self.reference_amount {
            Some(v) if v.is_finite() && v > 0.0 => v,
            Some(v) => {
                return Err(ConfigError::Invalid(format!(
                    "reference amount must be positive, got {}", v
                )))
            }
            None => super::DEFAULT_REFERENCE_AMOUNT,
        };

        let ceiling_coefficients = match self.ceiling_coefficients {
            Some(raw) => parse_coefficients(raw)?,
            None => TariffConfig::default_ceiling_coefficients(),
        };

        let hourly_rates = match self.hourly_rates {
            Some(raw) => check_rates(raw)?,
            None => TariffConfig::default_hourly_rates(),
        };

        Ok(TariffConfig {
            reference_amount,
            ceiling_coefficients,
            hourly_rates,
        })
    }
}

impl TryFrom<RawTariff> for TariffConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTariff) -> Result<Self, Self::Error> {
        raw.into_config()
    }
}

fn parse_coefficients(raw: BTreeMap<String, f64>) -> Result<BTreeMap<Grade, f64>, ConfigError> {
    let mut coefficients = BTreeMap::new();

    for (key, coef) in raw {
        let grade = key
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|g| Grade::try_from(g).ok())
            .ok_or_else(|| ConfigError::Invalid(format!("'{}' is not a grade between 1 and 6", key)))?;

        if !(coef.is_finite() && coef > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ceiling coefficient for grade {} must be positive, got {}", grade, coef
            )));
        }
        if coefficients.insert(grade, coef).is_some() {
            return Err(ConfigError::Invalid(format!("grade {} listed twice", grade)));
        }
    }

    // Higher severity (lower grade number) must carry the higher ceiling
    let values: Vec<(&Grade, &f64)> = coefficients.iter().collect();
    for pair in values.windows(2) {
        let ((g_hi, c_hi), (g_lo, c_lo)) = (pair[0], pair[1]);
        if c_hi <= c_lo {
            return Err(ConfigError::Invalid(format!(
                "coefficient for grade {} ({}) must exceed grade {} ({})",
                g_hi, c_hi, g_lo, c_lo
            )));
        }
    }

    Ok(coefficients)
}

fn check_rates(raw: BTreeMap<String, f64>) -> Result<BTreeMap<String, f64>, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::Invalid("at least one hourly rate is required".to_string()));
    }
    for (mode, rate) in &raw {
        if mode.trim().is_empty() {
            return Err(ConfigError::Invalid("service mode name is empty".to_string()));
        }
        if !(rate.is_finite() && *rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hourly rate for '{}' must be positive, got {}", mode, rate
            )));
        }
    }
    Ok(raw)
}

/// Parse and validate a tariff from a JSON string
pub fn parse_tariff(json: &str) -> Result<TariffConfig, ConfigError> {
    let raw: RawTariff = serde_json::from_str(json)?;
    raw.into_config()
}

/// Parse and validate a tariff from any reader
pub fn load_from_reader<R: Read>(reader: R) -> Result<TariffConfig, ConfigError> {
    let raw: RawTariff = serde_json::from_reader(reader)?;
    raw.into_config()
}

impl LoadedTariff {
    /// Built-in defaults without looking at the filesystem
    pub fn defaults() -> Self {
        Self {
            config: TariffConfig::default(),
            outcome: ConfigOutcome::DefaultedMissing,
        }
    }

    /// Load `config.json` from the working directory, falling back to defaults
    pub fn load_default() -> Self {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No tariff config at {}, using built-in defaults", path.display());
            return Self::defaults();
        }

        let result = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|text| parse_tariff(&text));

        match result {
            Ok(config) => {
                info!("Loaded tariff config from {}", path.display());
                Self {
                    config,
                    outcome: ConfigOutcome::Loaded { path: path.to_path_buf() },
                }
            }
            Err(e) => {
                warn!("Ignoring tariff config {}: {}", path.display(), e);
                Self {
                    config: TariffConfig::default(),
                    outcome: ConfigOutcome::DefaultedMalformed {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}
