//! Input validation errors raised before any classification or calculation runs

use thiserror::Error;

use crate::assessment::Domain;

/// Rejected engine input
///
/// Every variant is a boundary failure: the arithmetic behind a validated
/// input is total and never produces one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("assessment is missing an answer for domain '{0}'")]
    MissingDomain(Domain),

    #[error("assessment answers domain '{0}' more than once")]
    DuplicateDomain(Domain),

    #[error("unknown assessment domain: {0}")]
    UnknownDomain(String),

    #[error("answer {value} for domain '{domain}' is not one of 0, 1, 2")]
    InvalidAnswer { domain: String, value: i64 },

    #[error("answer {0} is not one of 0, 1, 2")]
    AnswerOutOfRange(i64),

    #[error("{field} must be a non-negative finite amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("unknown service mode '{0}'")]
    UnknownServiceMode(String),

    #[error("grade must be between 1 and 6, got {0}")]
    InvalidGrade(i64),

    #[error("unknown family situation: {0}")]
    UnknownFamilySituation(String),
}

/// Reject negative, NaN and infinite amounts
pub fn ensure_amount(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InvalidInput::InvalidAmount { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_amount() {
        assert_eq!(ensure_amount("income", 0.0), Ok(0.0));
        assert_eq!(ensure_amount("income", 1500.0), Ok(1500.0));
        assert!(ensure_amount("income", -0.01).is_err());
        assert!(ensure_amount("income", f64::INFINITY).is_err());
        assert!(ensure_amount("income", f64::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = InvalidInput::InvalidAmount { field: "household_income", value: -5.0 };
        assert_eq!(
            err.to_string(),
            "household_income must be a non-negative finite amount, got -5"
        );

        let err = InvalidInput::MissingDomain(Domain::Orientation);
        assert_eq!(err.to_string(), "assessment is missing an answer for domain 'orientation'");
    }
}
