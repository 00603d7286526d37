//! Offline accuracy evaluation
//!
//! Replays recorded report sets through an analyzer and compares the
//! strongest-signal and HMM rooms with a known ground truth.

use serde::Serialize;

use super::analyzer::Analyzer;
use super::report::ReportSet;
use super::types::{RoomCode, TOTAL_PETS};

/// A recording together with where the pets really were
#[derive(Debug, Clone)]
pub struct Trial {
    pub name: String,
    pub sets: Vec<ReportSet>,
    pub truth: [RoomCode; TOTAL_PETS],
}

/// Accuracy of both methods for one pet in one trial
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetAccuracy {
    pub trial: String,
    pub pet: usize,
    pub truth: RoomCode,
    pub steps: usize,
    pub strongest: f64,
    pub smoothed: f64,
}

/// Full evaluation outcome
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    pub results: Vec<PetAccuracy>,
}

impl EvaluationReport {
    pub fn mean_strongest(&self) -> f64 {
        mean(self.results.iter().map(|r| r.strongest))
    }

    pub fn mean_smoothed(&self) -> f64 {
        mean(self.results.iter().map(|r| r.smoothed))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Run every trial in order through the same analyzer
///
/// The analyzer is not reset between trials, so later trials start with the
/// observation history of earlier ones, as a live server would.
pub fn evaluate(analyzer: &mut Analyzer, trials: &[Trial]) -> EvaluationReport {
    let mut report = EvaluationReport::default();

    for trial in trials {
        let mut strongest_hits = [0usize; TOTAL_PETS];
        let mut smoothed_hits = [0usize; TOTAL_PETS];

        for set in &trial.sets {
            let step = analyzer.step(set);
            for pet in 0..TOTAL_PETS {
                if step.strongest[pet] == trial.truth[pet] {
                    strongest_hits[pet] += 1;
                }
                if step.smoothed[pet] == trial.truth[pet] {
                    smoothed_hits[pet] += 1;
                }
            }
        }

        let steps = trial.sets.len();
        let ratio = |hits: usize| {
            if steps == 0 {
                0.0
            } else {
                hits as f64 / steps as f64
            }
        };

        for pet in 0..TOTAL_PETS {
            report.results.push(PetAccuracy {
                trial: trial.name.clone(),
                pet,
                truth: trial.truth[pet],
                steps,
                strongest: ratio(strongest_hits[pet]),
                smoothed: ratio(smoothed_hits[pet]),
            });
        }

        tracing::info!(trial = %trial.name, steps, "Trial evaluated");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::report::{parse_recording, RssiReport};
    use crate::tracker::types::PetId;

    const WHITE: &str = "c8:a0:f1:69:d0:9c";
    const BLACK: &str = "c9:f2:08:ec:88:19";

    fn analyzer() -> Analyzer {
        Analyzer::new([(WHITE, PetId::Pet0), (BLACK, PetId::Pet1)])
    }

    #[test]
    fn test_perfect_recording() {
        let text = format!(
            "0\n{w},-40\n{b},-85\n1\n2\n3\n{b},-42\n{w},-90\n",
            w = WHITE,
            b = BLACK
        )
        .repeat(5);
        let trial = Trial {
            name: "steady".to_string(),
            sets: parse_recording(&text).unwrap(),
            truth: [RoomCode::LivingRoom, RoomCode::Bathroom],
        };

        let report = evaluate(&mut analyzer(), &[trial]);

        assert_eq!(report.results.len(), 2);
        for r in &report.results {
            assert_eq!(r.steps, 5);
            assert_eq!(r.strongest, 1.0);
            assert_eq!(r.smoothed, 1.0);
        }
        assert_eq!(report.mean_strongest(), 1.0);
    }

    #[test]
    fn test_smoothing_beats_a_glitch() {
        let mut sets: Vec<ReportSet> = Vec::new();
        let living: ReportSet = [
            RssiReport::new().reading(WHITE, -40.0),
            RssiReport::new(),
            RssiReport::new(),
            RssiReport::new(),
        ];
        let glitch: ReportSet = [
            RssiReport::new(),
            RssiReport::new(),
            RssiReport::new(),
            RssiReport::new().reading(WHITE, -40.0),
        ];
        for _ in 0..9 {
            sets.push(living.clone());
        }
        sets.push(glitch);

        let trial = Trial {
            name: "glitch".to_string(),
            sets,
            truth: [RoomCode::LivingRoom, RoomCode::Outside],
        };
        let report = evaluate(&mut analyzer(), &[trial]);

        let pet0 = &report.results[0];
        assert!((pet0.strongest - 0.9).abs() < 1e-9);
        assert_eq!(pet0.smoothed, 1.0);
    }

    #[test]
    fn test_empty_trial() {
        let trial = Trial {
            name: "empty".to_string(),
            sets: Vec::new(),
            truth: [RoomCode::LivingRoom, RoomCode::Bathroom],
        };
        let report = evaluate(&mut analyzer(), &[trial]);
        assert_eq!(report.mean_smoothed(), 0.0);
        assert_eq!(EvaluationReport::default().mean_strongest(), 0.0);
    }
}
