use serde::{Deserialize, Serialize};

use super::{level, FactorAssessment, FactorKind, FactorScore, InputError, ScoreComponent};
use crate::standards::StandardsTable;

/// Level assumed for a sub-scale the caller left out.
pub const NEUTRAL_LEVEL: u8 = 3;

/// Workload and stress sub-scales, each rated 1 (light) to 5 (severe).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_pressure: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_load: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_burden: Option<u8>,
}

/// Weighted-sum mental load scorer.
///
/// `score = 1 + round_half_up(9 * sum(w * (v - 1)) / (4 * sum(w)))`, evaluated
/// in integers so every platform produces the same result.
pub struct MentalFactorScorer<'a> {
    standards: &'a StandardsTable,
}

impl<'a> MentalFactorScorer<'a> {
    pub fn new(standards: &'a StandardsTable) -> Self {
        Self { standards }
    }

    pub fn score(&self, details: &MentalDetails) -> Result<FactorScore, InputError> {
        self.assess(details).map(|assessment| assessment.score)
    }

    pub fn assess(&self, details: &MentalDetails) -> Result<FactorAssessment, InputError> {
        let weights = self.standards.mental_weights();
        let subscales = [
            ("concentration", details.concentration, weights.concentration),
            ("time_pressure", details.time_pressure, weights.time_pressure),
            ("responsibility", details.responsibility, weights.responsibility),
            ("cognitive_load", details.cognitive_load, weights.cognitive_load),
            ("emotional_burden", details.emotional_burden, weights.emotional_burden),
        ];

        let denominator = 4 * u64::from(weights.total());
        let mut numerator = 0u64;
        let mut components = Vec::with_capacity(subscales.len());

        for (name, value, weight) in subscales {
            let supplied = value.is_some();
            let value = level(name, value.unwrap_or(NEUTRAL_LEVEL), 1, 5)?;
            let weighted = 9 * u64::from(weight) * u64::from(value - 1);
            numerator += weighted;
            components.push(ScoreComponent {
                source: name.to_string(),
                points: weighted as f64 / denominator as f64,
                notes: if supplied {
                    format!("level {value} x weight {weight}")
                } else {
                    format!("not rated, assumed level {value} x weight {weight}")
                },
            });
        }

        let rounded = (2 * numerator + denominator) / (2 * denominator);
        let score = FactorScore::saturating(1 + rounded as u8);

        Ok(FactorAssessment {
            factor: FactorKind::Mental,
            score,
            components,
        })
    }
}
