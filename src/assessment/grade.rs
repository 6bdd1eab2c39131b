//! Dependency grade (1 = most severe, 6 = autonomous)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Discrete dependency-severity grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Grade {
    G1 = 1,
    G2 = 2,
    G3 = 3,
    G4 = 4,
    G5 = 5,
    G6 = 6,
}

/// Where the person should file an application for support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationTrack {
    /// Grades 1-4: joint allowance application to the departmental council
    DepartmentalAllowance,
    /// Grades 5-6: prevention support from the pension fund
    PensionFundPrevention,
}

impl Grade {
    pub const ALL: [Grade; 6] = [Grade::G1, Grade::G2, Grade::G3, Grade::G4, Grade::G5, Grade::G6];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn description(self) -> &'static str {
        match self {
            Grade::G1 => "Very heavy dependency: continuous help, severely impaired mental functions.",
            Grade::G2 => "Substantial help: confined to bed or chair, or marked cognitive impairment.",
            Grade::G3 => "Help several times a day for bodily autonomy.",
            Grade::G4 => "Occasional help: transfers, washing, meals.",
            Grade::G5 => "Household help possible, outside the allowance.",
            Grade::G6 => "Autonomous for essential activities.",
        }
    }

    pub fn track(self) -> ApplicationTrack {
        match self {
            Grade::G1 | Grade::G2 | Grade::G3 | Grade::G4 => ApplicationTrack::DepartmentalAllowance,
            Grade::G5 | Grade::G6 => ApplicationTrack::PensionFundPrevention,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade.value()
    }
}

impl TryFrom<u8> for Grade {
    type Error = InvalidInput;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::G1),
            2 => Ok(Grade::G2),
            3 => Ok(Grade::G3),
            4 => Ok(Grade::G4),
            5 => Ok(Grade::G5),
            6 => Ok(Grade::G6),
            other => Err(InvalidInput::InvalidGrade(other as i64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_conversion() {
        for g in Grade::ALL {
            assert_eq!(Grade::try_from(g.value()), Ok(g));
        }
        assert_eq!(Grade::try_from(0), Err(InvalidInput::InvalidGrade(0)));
        assert_eq!(Grade::try_from(7), Err(InvalidInput::InvalidGrade(7)));
    }

    #[test]
    fn test_track() {
        assert_eq!(Grade::G4.track(), ApplicationTrack::DepartmentalAllowance);
        assert_eq!(Grade::G5.track(), ApplicationTrack::PensionFundPrevention);
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Grade::G3).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Grade>("2").unwrap(), Grade::G2);
        assert!(serde_json::from_str::<Grade>("9").is_err());
    }
}
