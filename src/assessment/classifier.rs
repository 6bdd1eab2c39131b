//! Grade classification from a completed assessment grid
//!
//! The simplified grid below is a proxy for the official clinical scale. It
//! counts severe and partial answers and applies ordered rules; results are
//! indicative only and must be confirmed by an on-site evaluation.

use log::debug;

use super::domain::{Answer, AssessmentResult};
use super::grade::Grade;

/// Maps a complete assessment to a dependency grade
pub trait GradeClassifier {
    fn classify(&self, result: &AssessmentResult) -> Grade;
}

/// Ordered-rule classifier: first matching rule wins
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifiedGrid;

/// Severe answers needed (with a cognitive domain among them) for grade 1
const G1_MIN_SEVERE: usize = 4;
const G2_MIN_SEVERE: usize = 2;
const G3_MIN_PARTIAL: usize = 2;

impl GradeClassifier for SimplifiedGrid {
    fn classify(&self, result: &AssessmentResult) -> Grade {
        let severe = result.count(Answer::Frequent);
        let partial = result.count(Answer::Partial);
        let cognitive_severe = result
            .iter()
            .any(|(d, a)| a == Answer::Frequent && d.is_cognitive());

        // Rule order resolves overlapping categories
        let grade = if severe >= G1_MIN_SEVERE && cognitive_severe {
            Grade::G1
        } else if severe >= G2_MIN_SEVERE {
            Grade::G2
        } else if severe >= 1 && partial >= G3_MIN_PARTIAL {
            Grade::G3
        } else if partial >= 1 {
            Grade::G4
        } else if severe == 0 && partial == 0 {
            Grade::G6
        } else {
            // Single severe answer, no partial answer
            Grade::G5
        };

        debug!("classified severe={} partial={} cognitive={} -> grade {}",
            severe, partial, cognitive_severe, grade);

        grade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Domain;

    fn grid() -> AssessmentResult {
        AssessmentResult::uniform(Answer::Autonomous)
    }

    fn classify(result: &AssessmentResult) -> Grade {
        SimplifiedGrid.classify(result)
    }

    #[test]
    fn test_all_autonomous_is_grade_6() {
        assert_eq!(classify(&grid()), Grade::G6);
    }

    #[test]
    fn test_all_frequent_is_grade_1() {
        assert_eq!(classify(&AssessmentResult::uniform(Answer::Frequent)), Grade::G1);
    }

    #[test]
    fn test_four_severe_with_cognitive_domain() {
        for cognitive in [Domain::Coherence, Domain::Orientation] {
            let result = grid()
                .with_answer(cognitive, Answer::Frequent)
                .with_answer(Domain::Hygiene, Answer::Frequent)
                .with_answer(Domain::Dressing, Answer::Frequent)
                .with_answer(Domain::Transfers, Answer::Frequent);
            assert_eq!(classify(&result), Grade::G1);
        }
    }

    #[test]
    fn test_four_severe_without_cognitive_is_grade_2() {
        let result = grid()
            .with_answer(Domain::Hygiene, Answer::Frequent)
            .with_answer(Domain::Dressing, Answer::Frequent)
            .with_answer(Domain::Eating, Answer::Frequent)
            .with_answer(Domain::Transfers, Answer::Frequent);
        assert_eq!(classify(&result), Grade::G2);
    }

    #[test]
    fn test_three_severe_with_cognitive_is_grade_2() {
        let result = grid()
            .with_answer(Domain::Coherence, Answer::Frequent)
            .with_answer(Domain::Orientation, Answer::Frequent)
            .with_answer(Domain::Eating, Answer::Frequent);
        assert_eq!(classify(&result), Grade::G2);
    }

    #[test]
    fn test_one_severe_two_partial_is_grade_3() {
        let result = grid()
            .with_answer(Domain::Transfers, Answer::Frequent)
            .with_answer(Domain::Hygiene, Answer::Partial)
            .with_answer(Domain::Dressing, Answer::Partial);
        assert_eq!(classify(&result), Grade::G3);
    }

    #[test]
    fn test_one_severe_one_partial_is_grade_4() {
        let result = grid()
            .with_answer(Domain::Transfers, Answer::Frequent)
            .with_answer(Domain::Hygiene, Answer::Partial);
        assert_eq!(classify(&result), Grade::G4);
    }

    #[test]
    fn test_partial_only_is_grade_4() {
        let result = grid().with_answer(Domain::OutdoorMobility, Answer::Partial);
        assert_eq!(classify(&result), Grade::G4);

        assert_eq!(classify(&AssessmentResult::uniform(Answer::Partial)), Grade::G4);
    }

    #[test]
    fn test_single_severe_alone_is_grade_5() {
        let result = grid().with_answer(Domain::Communication, Answer::Frequent);
        assert_eq!(classify(&result), Grade::G5);
    }

    /// Every one of the 3^10 grids, in grid order
    fn all_grids() -> impl Iterator<Item = AssessmentResult> {
        const ANSWERS: [Answer; 3] = [Answer::Autonomous, Answer::Partial, Answer::Frequent];
        (0..3usize.pow(10)).map(|mut code| {
            let mut result = grid();
            for domain in Domain::ALL {
                result = result.with_answer(domain, ANSWERS[code % 3]);
                code /= 3;
            }
            result
        })
    }

    #[test]
    fn test_all_grids_follow_rule_table() {
        let mut seen = [0usize; 6];

        for result in all_grids() {
            let severe = result.count(Answer::Frequent);
            let partial = result.count(Answer::Partial);
            let cognitive = result.answer(Domain::Coherence) == Answer::Frequent
                || result.answer(Domain::Orientation) == Answer::Frequent;

            let expected = match (severe, partial) {
                (s, _) if s >= 4 && cognitive => Grade::G1,
                (s, _) if s >= 2 => Grade::G2,
                (1, p) if p >= 2 => Grade::G3,
                (_, p) if p >= 1 => Grade::G4,
                (0, 0) => Grade::G6,
                _ => Grade::G5,
            };

            let grade = classify(&result);
            assert_eq!(grade, expected, "severe={} partial={} cognitive={}", severe, partial, cognitive);
            seen[(grade.value() - 1) as usize] += 1;
        }

        // Every grade is reachable; only the all-autonomous grid gives grade 6
        assert!(seen.iter().all(|&n| n > 0), "grade counts {:?}", seen);
        assert_eq!(seen[5], 1);
        // Grade 5 is exactly one severe answer and nothing else
        assert_eq!(seen[4], 10);
    }

    #[test]
    fn test_all_grids_severe_cognitive_is_grade_1() {
        for result in all_grids() {
            let cognitive = result.iter().any(|(d, a)| a == Answer::Frequent && d.is_cognitive());
            if result.count(Answer::Frequent) >= 4 && cognitive {
                assert_eq!(classify(&result), Grade::G1);
            }
        }
    }

    #[test]
    fn test_every_single_answer_grid_is_deterministic() {
        for domain in Domain::ALL {
            for answer in [Answer::Autonomous, Answer::Partial, Answer::Frequent] {
                let result = grid().with_answer(domain, answer);
                assert_eq!(classify(&result), classify(&result));
            }
        }
    }
}
