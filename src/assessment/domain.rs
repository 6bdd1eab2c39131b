//! Assessment grid: the ten capability domains and their answers

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InvalidInput;

/// Capability domain of the assessment grid, in grid order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Understanding, expressing oneself and behaving appropriately
    Coherence,
    /// Finding one's way in time and places
    Orientation,
    /// Washing
    Hygiene,
    /// Dressing
    Dressing,
    /// Eating and drinking
    Eating,
    /// Using the toilet
    Elimination,
    /// Getting up, lying down, sitting down
    Transfers,
    /// Moving around inside the home
    IndoorMobility,
    /// Going out of the home
    OutdoorMobility,
    /// Telephone, alarm
    Communication,
}

impl Domain {
    /// All domains in grid order
    pub const ALL: [Domain; 10] = [
        Domain::Coherence,
        Domain::Orientation,
        Domain::Hygiene,
        Domain::Dressing,
        Domain::Eating,
        Domain::Elimination,
        Domain::Transfers,
        Domain::IndoorMobility,
        Domain::OutdoorMobility,
        Domain::Communication,
    ];

    /// Position in the grid (0-indexed)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier used in config files, CSV headers and JSON
    pub fn code(self) -> &'static str {
        match self {
            Domain::Coherence => "coherence",
            Domain::Orientation => "orientation",
            Domain::Hygiene => "hygiene",
            Domain::Dressing => "dressing",
            Domain::Eating => "eating",
            Domain::Elimination => "elimination",
            Domain::Transfers => "transfers",
            Domain::IndoorMobility => "indoor_mobility",
            Domain::OutdoorMobility => "outdoor_mobility",
            Domain::Communication => "communication",
        }
    }

    /// Short description of the activity assessed
    pub fn label(self) -> &'static str {
        match self {
            Domain::Coherence => "Understand, express oneself and behave appropriately",
            Domain::Orientation => "Find one's way in time and places",
            Domain::Hygiene => "Wash",
            Domain::Dressing => "Get dressed",
            Domain::Eating => "Eat and drink",
            Domain::Elimination => "Use the toilet",
            Domain::Transfers => "Get up, lie down and sit down",
            Domain::IndoorMobility => "Move around the home",
            Domain::OutdoorMobility => "Go out of the home",
            Domain::Communication => "Use the telephone or an alarm",
        }
    }

    /// Mental-function domains that qualify four severe answers for grade 1
    pub fn is_cognitive(self) -> bool {
        matches!(self, Domain::Coherence | Domain::Orientation)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Domain {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Domain::ALL
            .iter()
            .copied()
            .find(|d| d.code().eq_ignore_ascii_case(key))
            .ok_or_else(|| InvalidInput::UnknownDomain(key.to_string()))
    }
}

/// Level of assistance needed for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Answer {
    /// Does it alone
    Autonomous = 0,
    /// Occasional help
    Partial = 1,
    /// Frequent or continuous help
    Frequent = 2,
}

impl Answer {
    pub fn needs_help(self) -> bool {
        !matches!(self, Answer::Autonomous)
    }
}

impl From<Answer> for u8 {
    fn from(answer: Answer) -> u8 {
        answer as u8
    }
}

impl TryFrom<u8> for Answer {
    type Error = InvalidInput;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Answer::Autonomous),
            1 => Ok(Answer::Partial),
            2 => Ok(Answer::Frequent),
            other => Err(InvalidInput::AnswerOutOfRange(other as i64)),
        }
    }
}

/// Complete set of answers, exactly one per domain
///
/// Can only be built through validation, so holding one means the grid is
/// complete and every value is in {0, 1, 2}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "HashMap<String, i64>")]
pub struct AssessmentResult {
    answers: [Answer; 10],
}

impl AssessmentResult {
    /// Build from typed answers
    ///
    /// Fails on a repeated domain or when any of the ten domains is absent.
    pub fn from_answers<I>(answers: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = (Domain, Answer)>,
    {
        let mut slots: [Option<Answer>; 10] = [None; 10];

        for (domain, answer) in answers {
            let slot = &mut slots[domain.index()];
            if slot.is_some() {
                return Err(InvalidInput::DuplicateDomain(domain));
            }
            *slot = Some(answer);
        }

        let mut complete = [Answer::Autonomous; 10];
        for domain in Domain::ALL {
            complete[domain.index()] =
                slots[domain.index()].ok_or(InvalidInput::MissingDomain(domain))?;
        }

        Ok(Self { answers: complete })
    }

    /// Build from raw `(identifier, value)` pairs as collected by a form or a file
    pub fn from_raw<I, S>(pairs: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut typed = Vec::with_capacity(10);
        for (key, value) in pairs {
            let domain: Domain = key.as_ref().parse()?;
            let answer = u8::try_from(value)
                .ok()
                .and_then(|v| Answer::try_from(v).ok())
                .ok_or_else(|| InvalidInput::InvalidAnswer {
                    domain: domain.code().to_string(),
                    value,
                })?;
            typed.push((domain, answer));
        }
        Self::from_answers(typed)
    }

    /// Same answer for every domain
    pub fn uniform(answer: Answer) -> Self {
        Self { answers: [answer; 10] }
    }

    pub fn answer(&self, domain: Domain) -> Answer {
        self.answers[domain.index()]
    }

    /// Answers in grid order
    pub fn iter(&self) -> impl Iterator<Item = (Domain, Answer)> + '_ {
        Domain::ALL.iter().map(move |&d| (d, self.answer(d)))
    }

    /// Number of domains with the given answer
    pub fn count(&self, answer: Answer) -> usize {
        self.answers.iter().filter(|&&a| a == answer).count()
    }

    /// Domains needing partial or frequent help, in grid order
    pub fn domains_needing_help(&self) -> Vec<Domain> {
        self.iter()
            .filter(|(_, a)| a.needs_help())
            .map(|(d, _)| d)
            .collect()
    }

    /// Copy with one answer replaced
    pub fn with_answer(mut self, domain: Domain, answer: Answer) -> Self {
        self.answers[domain.index()] = answer;
        self
    }
}

/// Reads the answers map entry by entry so a repeated key reaches validation
struct AssessmentVisitor;

impl<'de> Visitor<'de> for AssessmentVisitor {
    type Value = AssessmentResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of assessment domain to answer 0, 1 or 2")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut pairs: Vec<(String, i64)> = Vec::with_capacity(10);
        while let Some(entry) = map.next_entry::<String, i64>()? {
            pairs.push(entry);
        }
        AssessmentResult::from_raw(pairs).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for AssessmentResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AssessmentVisitor)
    }
}

impl From<AssessmentResult> for HashMap<String, i64> {
    fn from(result: AssessmentResult) -> Self {
        result
            .iter()
            .map(|(d, a)| (d.code().to_string(), u8::from(a) as i64))
            .collect()
    }
}
