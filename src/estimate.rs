//! Estimate runner: grade, allowance and hours for one household
//!
//! Loads the tariff once, then evaluates any number of independent requests.
//! The runner holds no mutable state, so a single instance can be shared
//! across threads.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assessment::{ApplicationTrack, AssessmentResult, Domain, Grade, GradeClassifier, SimplifiedGrid};
use crate::benefit::{
    hours_for_mode, net_subsidy_and_hours, BenefitComputation, BenefitInputs, FamilySituation,
    ServiceHours,
};
use crate::error::InvalidInput;
use crate::tariff::{LoadedTariff, TariffConfig};

/// Everything the presentation layer collects for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub answers: AssessmentResult,
    #[serde(default)]
    pub family_situation: FamilySituation,
    pub household_income: f64,
    /// Defaults to the grade ceiling
    #[serde(default)]
    pub requested_amount: Option<f64>,
    /// Must be one of the configured hourly-rate keys when present
    #[serde(default)]
    pub service_mode: Option<String>,
}

/// Result of one evaluation, handed to rendering or export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub grade: Grade,
    pub grade_description: String,
    pub track: ApplicationTrack,
    /// Domains answered with partial or frequent help, in grid order
    pub domains_needing_help: Vec<Domain>,
    pub benefit: BenefitComputation,
    /// Hour range for every configured mode
    pub hours_by_mode: BTreeMap<String, ServiceHours>,
    /// Hour range for the requested mode, if one was selected
    pub selected: Option<ServiceHours>,
}

/// Pre-loaded estimate runner
///
/// # Example
/// ```ignore
/// let runner = EstimateRunner::new();
/// let estimate = runner.run(&request)?;
/// println!("grade {}: {:.0} / month", estimate.grade, estimate.benefit.net_subsidy);
/// ```
#[derive(Debug, Clone)]
pub struct EstimateRunner<C = SimplifiedGrid> {
    tariff: TariffConfig,
    classifier: C,
}

impl EstimateRunner<SimplifiedGrid> {
    /// Runner with built-in tariff defaults
    pub fn new() -> Self {
        Self::with_tariff(TariffConfig::default())
    }

    /// Runner using a loaded tariff, whatever its outcome
    pub fn from_loaded(loaded: &LoadedTariff) -> Self {
        Self::with_tariff(loaded.config.clone())
    }

    pub fn with_tariff(tariff: TariffConfig) -> Self {
        Self {
            tariff,
            classifier: SimplifiedGrid,
        }
    }
}

impl Default for EstimateRunner<SimplifiedGrid> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GradeClassifier> EstimateRunner<C> {
    /// Runner with a custom classifier
    pub fn with_classifier(tariff: TariffConfig, classifier: C) -> Self {
        Self { tariff, classifier }
    }

    pub fn tariff(&self) -> &TariffConfig {
        &self.tariff
    }

    pub fn classify(&self, answers: &AssessmentResult) -> Grade {
        self.classifier.classify(answers)
    }

    /// Evaluate a single request
    ///
    /// Validation happens before any calculation: an unknown service mode or
    /// an invalid amount fails the whole request.
    pub fn run(&self, request: &EstimateRequest) -> Result<Estimate, InvalidInput> {
        if let Some(mode) = &request.service_mode {
            if self.tariff.hourly_rate(mode).is_none() {
                return Err(InvalidInput::UnknownServiceMode(mode.clone()));
            }
        }

        let grade = self.classify(&request.answers);

        let benefit = BenefitComputation::compute(
            &BenefitInputs {
                grade,
                raw_income: request.household_income,
                family_situation: request.family_situation,
                requested_amount: request.requested_amount,
            },
            &self.tariff,
        )?;

        let hours = net_subsidy_and_hours(
            benefit.effective_amount,
            benefit.co_payment,
            &self.tariff.hourly_rates,
        )?;

        let selected = request
            .service_mode
            .as_deref()
            .map(|mode| hours_for_mode(hours.subsidy, mode, &self.tariff.hourly_rates))
            .transpose()?;

        debug!(
            "estimate: grade={} R={:.2} A={:.2} P={:.2} subsidy={:.2}",
            grade, benefit.household_income, benefit.effective_amount, benefit.co_payment,
            hours.subsidy
        );

        Ok(Estimate {
            grade,
            grade_description: grade.description().to_string(),
            track: grade.track(),
            domains_needing_help: request.answers.domains_needing_help(),
            benefit,
            hours_by_mode: hours.hours,
            selected,
        })
    }

    /// Evaluate many independent requests, keeping each outcome
    pub fn run_batch(&self, requests: &[EstimateRequest]) -> Vec<Result<Estimate, InvalidInput>> {
        requests.iter().map(|r| self.run(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Answer;
    use approx::assert_abs_diff_eq;

    fn request(answers: AssessmentResult, income: f64) -> EstimateRequest {
        EstimateRequest {
            answers,
            family_situation: FamilySituation::Single,
            household_income: income,
            requested_amount: None,
            service_mode: None,
        }
    }

    fn grade_4_answers() -> AssessmentResult {
        AssessmentResult::uniform(Answer::Autonomous)
            .with_answer(Domain::Hygiene, Answer::Partial)
            .with_answer(Domain::Transfers, Answer::Partial)
    }

    #[test]
    fn test_full_pipeline_grade_4() {
        let runner = EstimateRunner::new();
        let estimate = runner.run(&request(grade_4_answers(), 1500.0)).unwrap();

        assert_eq!(estimate.grade, Grade::G4);
        assert_eq!(estimate.track, ApplicationTrack::DepartmentalAllowance);
        assert_eq!(estimate.domains_needing_help, vec![Domain::Hygiene, Domain::Transfers]);
        assert_eq!(estimate.benefit.ceiling, 860.0);
        assert!(estimate.benefit.co_payment > 0.0);
        assert_eq!(estimate.hours_by_mode.len(), 3);
        assert!(estimate.selected.is_none());

        for hours in estimate.hours_by_mode.values() {
            assert_abs_diff_eq!(
                hours.base_hours,
                estimate.benefit.net_subsidy / hours.hourly_rate,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_selected_mode() {
        let runner = EstimateRunner::new();
        let mut req = request(grade_4_answers(), 900.0);
        req.service_mode = Some("direct_employment".to_string());

        let estimate = runner.run(&req).unwrap();
        let selected = estimate.selected.unwrap();

        assert_eq!(selected, estimate.hours_by_mode["direct_employment"]);
        // Fully subsidised: 860 / 18.96 = 45.36 h
        assert_eq!(selected.range.min, 32);
        assert_eq!(selected.range.max, 41);
    }

    #[test]
    fn test_unknown_mode_rejected_before_calculation() {
        let runner = EstimateRunner::new();
        let mut req = request(grade_4_answers(), -1.0);
        req.service_mode = Some("overnight".to_string());

        assert_eq!(
            runner.run(&req).unwrap_err(),
            InvalidInput::UnknownServiceMode("overnight".to_string())
        );
    }

    #[test]
    fn test_autonomous_person() {
        let runner = EstimateRunner::new();
        let estimate = runner.run(&request(AssessmentResult::uniform(Answer::Autonomous), 1200.0)).unwrap();

        assert_eq!(estimate.grade, Grade::G6);
        assert_eq!(estimate.track, ApplicationTrack::PensionFundPrevention);
        assert_eq!(estimate.benefit.ceiling, 0.0);
        assert_eq!(estimate.benefit.net_subsidy, 0.0);
        assert!(estimate.hours_by_mode.values().all(|h| h.range == Default::default()));
    }

    #[test]
    fn test_custom_classifier() {
        struct AlwaysTwo;
        impl GradeClassifier for AlwaysTwo {
            fn classify(&self, _: &AssessmentResult) -> Grade {
                Grade::G2
            }
        }

        let runner = EstimateRunner::with_classifier(TariffConfig::default(), AlwaysTwo);
        let estimate = runner.run(&request(AssessmentResult::uniform(Answer::Autonomous), 1000.0)).unwrap();
        assert_eq!(estimate.grade, Grade::G2);
    }

    #[test]
    fn test_batch_keeps_each_outcome() {
        let runner = EstimateRunner::new();
        let requests = vec![
            request(grade_4_answers(), 1500.0),
            request(grade_4_answers(), -3.0),
        ];

        let results = runner.run_batch(&requests);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_idempotent() {
        let runner = EstimateRunner::new();
        let req = request(grade_4_answers(), 1750.0);
        assert_eq!(runner.run(&req).unwrap(), runner.run(&req).unwrap());
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "answers": {
                "coherence": 2, "orientation": 2, "hygiene": 2, "dressing": 2, "eating": 1,
                "elimination": 1, "transfers": 0, "indoor_mobility": 0, "outdoor_mobility": 0,
                "communication": 0
            },
            "family_situation": "couple",
            "household_income": 2500
        }"#;

        let req: EstimateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.family_situation, FamilySituation::Couple);

        let estimate = EstimateRunner::new().run(&req).unwrap();
        assert_eq!(estimate.grade, Grade::G1);
        assert_abs_diff_eq!(estimate.benefit.household_income, 2500.0 / 1.7, epsilon = 1e-9);
    }
}
