//! Load evaluation cases from a CSV file
//!
//! One row per household: identifiers, financial inputs, then one column per
//! assessment domain. Malformed CSV aborts the load; a row with invalid
//! values is kept with its validation error so a batch can report it.

use csv::Reader;
use std::path::Path;

use crate::assessment::AssessmentResult;
use crate::error::InvalidInput;
use crate::estimate::EstimateRequest;
use super::Case;

/// Raw CSV row matching the cases file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    case_id: String,
    family_situation: String,
    household_income: f64,
    #[serde(default)]
    requested_amount: Option<f64>,
    #[serde(default)]
    service_mode: Option<String>,
    coherence: i64,
    orientation: i64,
    hygiene: i64,
    dressing: i64,
    eating: i64,
    elimination: i64,
    transfers: i64,
    indoor_mobility: i64,
    outdoor_mobility: i64,
    communication: i64,
}

impl CsvRow {
    fn to_request(&self) -> Result<EstimateRequest, InvalidInput> {
        let answers = AssessmentResult::from_raw([
            ("coherence", self.coherence),
            ("orientation", self.orientation),
            ("hygiene", self.hygiene),
            ("dressing", self.dressing),
            ("eating", self.eating),
            ("elimination", self.elimination),
            ("transfers", self.transfers),
            ("indoor_mobility", self.indoor_mobility),
            ("outdoor_mobility", self.outdoor_mobility),
            ("communication", self.communication),
        ])?;

        Ok(EstimateRequest {
            answers,
            family_situation: self.family_situation.parse()?,
            household_income: self.household_income,
            requested_amount: self.requested_amount,
            service_mode: self
                .service_mode
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        })
    }

    fn into_case(self) -> Case {
        let request = self.to_request();
        Case {
            case_id: self.case_id,
            request,
        }
    }
}

/// Load all cases from a CSV file
pub fn load_cases<P: AsRef<Path>>(path: P) -> Result<Vec<Case>, csv::Error> {
    let mut reader = Reader::from_path(path)?;
    read_cases(&mut reader)
}

/// Load cases from any reader (e.g., string buffer, request body)
pub fn load_cases_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Case>, csv::Error> {
    let mut csv_reader = Reader::from_reader(reader);
    read_cases(&mut csv_reader)
}

fn read_cases<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<Case>, csv::Error> {
    let mut cases = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        cases.push(row.into_case());
    }

    Ok(cases)
}
