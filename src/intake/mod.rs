//! Evaluation cases read from files for batch runs

pub mod loader;

pub use loader::{load_cases, load_cases_from_reader};

use crate::error::InvalidInput;
use crate::estimate::EstimateRequest;

/// One household from a cases file
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub case_id: String,
    /// Parsed request, or the reason the row cannot be evaluated
    pub request: Result<EstimateRequest, InvalidInput>,
}
