//! Assessment grid, dependency grades and grade classification

mod domain;
mod grade;
mod classifier;

pub use domain::{Domain, Answer, AssessmentResult};
pub use grade::{Grade, ApplicationTrack};
pub use classifier::{GradeClassifier, SimplifiedGrid};
