use serde::{Deserialize, Serialize};

use super::{level, FactorAssessment, FactorKind, FactorScore, InputError, ScoreComponent};
use crate::standards::{RiskBand, StandardsTable};

/// A foreseeable incident rated by likelihood and severity, both 1..=5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardObservation {
    pub label: String,
    pub likelihood: u8,
    pub severity: u8,
}

impl HazardObservation {
    pub fn new(label: impl Into<String>, likelihood: u8, severity: u8) -> Self {
        Self {
            label: label.into(),
            likelihood,
            severity,
        }
    }

    /// Likelihood × severity after range checks.
    pub fn risk_point(&self) -> Result<u8, InputError> {
        let likelihood = level("likelihood", self.likelihood, 1, 5)?;
        let severity = level("severity", self.severity, 1, 5)?;
        Ok(likelihood * severity)
    }
}

pub struct HazardFactorScorer<'a> {
    standards: &'a StandardsTable,
}

impl<'a> HazardFactorScorer<'a> {
    pub fn new(standards: &'a StandardsTable) -> Self {
        Self { standards }
    }

    pub fn score(&self, observations: &[HazardObservation]) -> Result<FactorScore, InputError> {
        self.assess(observations).map(|assessment| assessment.score)
    }

    pub fn assess(&self, observations: &[HazardObservation]) -> Result<FactorAssessment, InputError> {
        let mut components = Vec::with_capacity(observations.len());

        for observation in observations {
            let point = observation.risk_point()?;
            let band = self.band(point)?;
            components.push(ScoreComponent {
                source: observation.label.clone(),
                points: f64::from(band.score),
                notes: format!(
                    "risk point {point} ({} risk): {}",
                    band.level, band.action
                ),
            });
        }

        Ok(FactorAssessment::worst_of(FactorKind::Hazard, components))
    }

    /// Risk band for an already-computed risk point.
    pub fn band(&self, point: u8) -> Result<&'a RiskBand, InputError> {
        self.standards
            .risk_matrix()
            .band_for(point)
            .ok_or(InputError::OutOfRange {
                field: "risk_point",
                value: i64::from(point),
                min: 1,
                max: 25,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::RiskLevel;

    #[test]
    fn empty_observations_score_the_floor() {
        let standards = StandardsTable::builtin();
        let scorer = HazardFactorScorer::new(&standards);
        assert_eq!(scorer.score(&[]).expect("valid"), FactorScore::MIN);
    }

    #[test]
    fn maximum_band_wins() {
        let standards = StandardsTable::builtin();
        let scorer = HazardFactorScorer::new(&standards);
        let observations = vec![
            HazardObservation::new("slip on wet floor", 2, 2),
            HazardObservation::new("forklift collision", 3, 4),
            HazardObservation::new("paper cut", 1, 1),
        ];

        let assessment = scorer.assess(&observations).expect("valid observations");

        assert_eq!(assessment.score.value(), 7);
        assert!(assessment.components[1].notes.contains("high risk"));
    }

    #[test]
    fn band_boundaries_round_up() {
        let standards = StandardsTable::builtin();
        let scorer = HazardFactorScorer::new(&standards);

        let cases = [(1, 4, 2), (1, 5, 4), (3, 3, 4), (2, 5, 7), (5, 3, 7), (4, 4, 10), (5, 5, 10)];
        for (likelihood, severity, expected) in cases {
            let score = scorer
                .score(&[HazardObservation::new("case", likelihood, severity)])
                .expect("valid observation");
            assert_eq!(score.value(), expected, "{likelihood}x{severity}");
        }

        assert_eq!(scorer.band(16).map(|band| band.level).ok(), Some(RiskLevel::Critical));
    }

    #[test]
    fn likelihood_outside_scale_is_rejected() {
        let standards = StandardsTable::builtin();
        let scorer = HazardFactorScorer::new(&standards);

        match scorer.score(&[HazardObservation::new("bad", 6, 1)]) {
            Err(InputError::OutOfRange { field, value, .. }) => {
                assert_eq!(field, "likelihood");
                assert_eq!(value, 6);
            }
            other => panic!("expected out of range, got {other:?}"),
        }
        assert!(scorer.score(&[HazardObservation::new("bad", 1, 0)]).is_err());
    }
}
