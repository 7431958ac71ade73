use serde::{Deserialize, Serialize};

use super::ConfigurationError;

/// Whether larger or smaller readings are worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderDirection {
    /// A reading at or above a step's threshold reaches that step.
    Ascending,
    /// A reading at or below a step's threshold reaches that step.
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LadderStep {
    pub threshold: f64,
    pub score: u8,
}

/// Ordered threshold bands mapping a continuous reading onto a factor score.
///
/// Steps run from the mildest band to the most severe. A reading that reaches
/// no step scores the baseline of 1. When a reading sits exactly on a
/// threshold the more severe band wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    pub direction: LadderDirection,
    pub steps: Vec<LadderStep>,
}

impl ThresholdLadder {
    pub fn ascending(steps: &[(f64, u8)]) -> Self {
        Self::from_pairs(LadderDirection::Ascending, steps)
    }

    pub fn descending(steps: &[(f64, u8)]) -> Self {
        Self::from_pairs(LadderDirection::Descending, steps)
    }

    fn from_pairs(direction: LadderDirection, steps: &[(f64, u8)]) -> Self {
        Self {
            direction,
            steps: steps
                .iter()
                .map(|&(threshold, score)| LadderStep { threshold, score })
                .collect(),
        }
    }

    /// Score for a reading; 1 when no step is reached.
    pub fn band(&self, value: f64) -> u8 {
        self.reached(value).map(|step| step.score).unwrap_or(1)
    }

    /// The step reached by a reading, if any.
    pub fn reached(&self, value: f64) -> Option<&LadderStep> {
        self.steps.iter().rev().find(|step| match self.direction {
            LadderDirection::Ascending => value >= step.threshold,
            LadderDirection::Descending => value <= step.threshold,
        })
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigurationError> {
        let invalid = |detail: String| ConfigurationError::InvalidLadder {
            ladder: name.to_string(),
            detail,
        };

        if self.steps.is_empty() {
            return Err(invalid("ladder has no steps".to_string()));
        }

        for step in &self.steps {
            if !step.threshold.is_finite() {
                return Err(invalid(format!("threshold {} is not finite", step.threshold)));
            }
            if !(2..=10).contains(&step.score) {
                return Err(invalid(format!(
                    "score {} outside 2..=10 at threshold {}",
                    step.score, step.threshold
                )));
            }
        }

        for pair in self.steps.windows(2) {
            let (mild, severe) = (&pair[0], &pair[1]);
            let ordered = match self.direction {
                LadderDirection::Ascending => severe.threshold > mild.threshold,
                LadderDirection::Descending => severe.threshold < mild.threshold,
            };
            if !ordered {
                return Err(invalid(format!(
                    "thresholds {} and {} are not strictly {:?}",
                    mild.threshold, severe.threshold, self.direction
                )));
            }
            if severe.score <= mild.score {
                return Err(invalid(format!(
                    "scores must increase with severity ({} then {})",
                    mild.score, severe.score
                )));
            }
        }

        Ok(())
    }
}
