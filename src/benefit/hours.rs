//! Net subsidy and purchasable service hours per delivery mode

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, InvalidInput};

/// Share of the base hours reported as the low end of the range
pub const HOURS_LOW_SHARE: f64 = 0.70;
/// Share of the base hours reported as the high end of the range
pub const HOURS_HIGH_SHARE: f64 = 0.90;

/// Usable monthly hours, whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourRange {
    pub min: u32,
    pub max: u32,
}

impl HourRange {
    /// Range from a fractional hour budget
    ///
    /// Rounds half to even; the low bound never goes below 0 and the high
    /// bound never below the low bound.
    pub fn from_base_hours(base_hours: f64) -> Self {
        let base_hours = if base_hours.is_finite() { base_hours.max(0.0) } else { 0.0 };
        let min = (base_hours * HOURS_LOW_SHARE).round_ties_even().max(0.0) as u32;
        let max = ((base_hours * HOURS_HIGH_SHARE).round_ties_even() as u32).max(min);
        Self { min, max }
    }
}

/// Hours purchasable in one delivery mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHours {
    pub mode: String,
    pub hourly_rate: f64,
    pub base_hours: f64,
    pub range: HourRange,
}

impl ServiceHours {
    fn new(mode: &str, hourly_rate: f64, subsidy: f64) -> Self {
        let base_hours = if hourly_rate > 0.0 { subsidy / hourly_rate } else { 0.0 };
        Self {
            mode: mode.to_string(),
            hourly_rate,
            base_hours,
            range: HourRange::from_base_hours(base_hours),
        }
    }
}

/// Net subsidy and the hour range it buys in every mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyAndHours {
    pub subsidy: f64,
    pub hours: BTreeMap<String, ServiceHours>,
}

/// Externally funded share of the approved amount, never negative
pub fn net_subsidy(effective_amount: f64, co_payment: f64) -> f64 {
    (effective_amount - co_payment).max(0.0)
}

/// Net subsidy plus hour ranges for every configured mode
pub fn net_subsidy_and_hours(
    effective_amount: f64,
    co_payment: f64,
    hourly_rates: &BTreeMap<String, f64>,
) -> Result<SubsidyAndHours, InvalidInput> {
    let effective_amount = ensure_amount("effective_amount", effective_amount)?;
    let co_payment = ensure_amount("co_payment", co_payment)?;

    let subsidy = net_subsidy(effective_amount, co_payment);
    let hours = hourly_rates
        .iter()
        .map(|(mode, &rate)| (mode.clone(), ServiceHours::new(mode, rate, subsidy)))
        .collect();

    Ok(SubsidyAndHours { subsidy, hours })
}

/// Hour range for one selected mode
pub fn hours_for_mode(
    subsidy: f64,
    mode: &str,
    hourly_rates: &BTreeMap<String, f64>,
) -> Result<ServiceHours, InvalidInput> {
    let subsidy = ensure_amount("net_subsidy", subsidy)?;
    let rate = hourly_rates
        .get(mode)
        .copied()
        .ok_or_else(|| InvalidInput::UnknownServiceMode(mode.to_string()))?;

    Ok(ServiceHours::new(mode, rate, subsidy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rates(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(m, r)| (m.to_string(), *r)).collect()
    }

    #[test]
    fn test_range_for_14_hours() {
        assert_eq!(HourRange::from_base_hours(14.0), HourRange { min: 10, max: 13 });
    }

    #[test]
    fn test_rate_20_subsidy_400() {
        let result = net_subsidy_and_hours(400.0, 0.0, &rates(&[("agency", 20.0)])).unwrap();
        let agency = &result.hours["agency"];

        assert_eq!(result.subsidy, 400.0);
        assert_abs_diff_eq!(agency.base_hours, 20.0);
        assert_eq!(agency.range, HourRange { min: 14, max: 18 });
    }

    #[test]
    fn test_rate_20_subsidy_280() {
        let hours = hours_for_mode(280.0, "agency", &rates(&[("agency", 20.0)])).unwrap();
        assert_eq!(hours.range, HourRange { min: 10, max: 13 });
    }

    #[test]
    fn test_half_rounds_to_even() {
        // 5 h: 3.5 -> 4, 4.5 -> 4
        assert_eq!(HourRange::from_base_hours(5.0), HourRange { min: 4, max: 4 });
        // 15 h: 10.5 -> 10, 13.5 -> 14
        assert_eq!(HourRange::from_base_hours(15.0), HourRange { min: 10, max: 14 });
    }

    #[test]
    fn test_subsidy_never_negative() {
        let result = net_subsidy_and_hours(100.0, 150.0, &rates(&[("a", 20.0)])).unwrap();
        assert_eq!(result.subsidy, 0.0);
        assert_eq!(result.hours["a"].range, HourRange { min: 0, max: 0 });
    }

    #[test]
    fn test_non_positive_rate_gives_zero_hours() {
        let result = net_subsidy_and_hours(500.0, 0.0, &rates(&[("free", 0.0), ("neg", -3.0)])).unwrap();
        assert_eq!(result.hours["free"].base_hours, 0.0);
        assert_eq!(result.hours["neg"].range, HourRange::default());
    }

    #[test]
    fn test_every_mode_reported() {
        let table = rates(&[("direct_employment", 18.96), ("provider_agency", 24.58)]);
        let result = net_subsidy_and_hours(859.9, 200.0, &table).unwrap();

        assert_eq!(result.hours.len(), 2);
        let direct = &result.hours["direct_employment"];
        let provider = &result.hours["provider_agency"];
        assert!(direct.range.max >= provider.range.max);
        assert!(direct.range.min <= direct.range.max);
    }

    #[test]
    fn test_unknown_mode() {
        let err = hours_for_mode(400.0, "night_shift", &rates(&[("agency", 20.0)])).unwrap_err();
        assert_eq!(err, InvalidInput::UnknownServiceMode("night_shift".to_string()));
    }

    #[test]
    fn test_rejects_negative_amounts() {
        assert!(net_subsidy_and_hours(-1.0, 0.0, &rates(&[("a", 20.0)])).is_err());
        assert!(net_subsidy_and_hours(100.0, f64::NAN, &rates(&[("a", 20.0)])).is_err());
        assert!(hours_for_mode(-5.0, "a", &rates(&[("a", 20.0)])).is_err());
    }
}
