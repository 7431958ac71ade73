use serde::{Deserialize, Serialize};

use super::{FactorKind, FactorScore};
use crate::standards::{StandardsTable, ThreeKIndex, WorkTimeCategory};

/// Final evaluation value object. Identical inputs produce identical results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub physical: FactorScore,
    pub mental: FactorScore,
    pub environmental: FactorScore,
    pub hazard: FactorScore,
    pub work_time: WorkTimeCategory,
    pub work_time_factor: f64,
    pub kitsusa_score: f64,
    pub index: ThreeKIndex,
    /// Factors whose score equals the maximum, in canonical order.
    pub dominant_factors: Vec<FactorKind>,
    pub standards_version: String,
}

impl EvaluationResult {
    pub fn factor_score(&self, kind: FactorKind) -> FactorScore {
        match kind {
            FactorKind::Physical => self.physical,
            FactorKind::Mental => self.mental,
            FactorKind::Environmental => self.environmental,
            FactorKind::Hazard => self.hazard,
        }
    }

    pub fn max_factor_score(&self) -> FactorScore {
        FactorKind::ALL
            .into_iter()
            .map(|kind| self.factor_score(kind))
            .max()
            .unwrap_or(FactorScore::MIN)
    }
}

/// Worst-factor-dominates combination of the four factor scores.
pub struct CompositeAggregator<'a> {
    standards: &'a StandardsTable,
}

impl<'a> CompositeAggregator<'a> {
    pub fn new(standards: &'a StandardsTable) -> Self {
        Self { standards }
    }

    pub fn aggregate(
        &self,
        physical: FactorScore,
        mental: FactorScore,
        environmental: FactorScore,
        hazard: FactorScore,
        work_time: WorkTimeCategory,
    ) -> EvaluationResult {
        let scores = [
            (FactorKind::Physical, physical),
            (FactorKind::Mental, mental),
            (FactorKind::Environmental, environmental),
            (FactorKind::Hazard, hazard),
        ];
        let max_score = scores
            .iter()
            .map(|(_, score)| *score)
            .max()
            .unwrap_or(FactorScore::MIN);
        let dominant_factors = scores
            .iter()
            .filter(|(_, score)| *score == max_score)
            .map(|(kind, _)| *kind)
            .collect();

        let work_time_factor = self.standards.work_time().factor(work_time);
        let kitsusa_score = f64::from(max_score.value()) * work_time_factor;
        let index = self.standards.index_bands().classify(kitsusa_score);

        EvaluationResult {
            physical,
            mental,
            environmental,
            hazard,
            work_time,
            work_time_factor,
            kitsusa_score,
            index,
            dominant_factors,
            standards_version: self.standards.version().to_string(),
        }
    }
}
