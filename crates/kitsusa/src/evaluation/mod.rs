//! Evaluation façade, persistence seam and HTTP surface.

pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod statistics;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scoring::{
    CompositeAggregator, EnvironmentalDetails, EnvironmentalFactorScorer, EvaluationResult,
    FactorAssessment, FactorKind, HazardFactorScorer, HazardObservation, InputError, MentalDetails,
    MentalFactorScorer, PhysicalDetails, PhysicalFactorScorer, PostureObservation,
    SubstanceReading, WorkTimeAdjuster,
};
use crate::standards::{self, ConfigurationError, StandardsTable, WorkTimeCategory};

pub use report::{EvaluationReport, FactorRecommendation, ReportRiskLevel};
pub use repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, EvaluationSummaryView, RepositoryError,
};
pub use router::evaluation_router;
pub use service::{EvaluationService, EvaluationServiceError};
pub use statistics::{EvaluationStatistics, FactorMeans};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalInput {
    #[serde(default)]
    pub details: PhysicalDetails,
    #[serde(default)]
    pub postures: Vec<PostureObservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalInput {
    #[serde(default)]
    pub details: EnvironmentalDetails,
    #[serde(default)]
    pub substances: Vec<SubstanceReading>,
}

/// Everything needed to evaluate one job or workstation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub physical: PhysicalInput,
    #[serde(default)]
    pub mental: MentalDetails,
    #[serde(default)]
    pub environmental: EnvironmentalInput,
    #[serde(default)]
    pub hazards: Vec<HazardObservation>,
    /// Work-time category code (`a` through `d`).
    pub work_time: String,
}

/// Input for scoring one factor in isolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "factor", content = "input", rename_all = "snake_case")]
pub enum FactorInput {
    Physical(PhysicalInput),
    Mental(MentalDetails),
    Environmental(EnvironmentalInput),
    Hazard(Vec<HazardObservation>),
}

impl FactorInput {
    pub fn kind(&self) -> FactorKind {
        match self {
            FactorInput::Physical(_) => FactorKind::Physical,
            FactorInput::Mental(_) => FactorKind::Mental,
            FactorInput::Environmental(_) => FactorKind::Environmental,
            FactorInput::Hazard(_) => FactorKind::Hazard,
        }
    }

    /// Decode the untagged JSON body sent for a known factor.
    pub fn from_json(kind: FactorKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            FactorKind::Physical => FactorInput::Physical(serde_json::from_value(value)?),
            FactorKind::Mental => FactorInput::Mental(serde_json::from_value(value)?),
            FactorKind::Environmental => FactorInput::Environmental(serde_json::from_value(value)?),
            FactorKind::Hazard => FactorInput::Hazard(serde_json::from_value(value)?),
        })
    }
}

/// Composite result plus the per-factor breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub result: EvaluationResult,
    pub breakdown: Vec<FactorAssessment>,
}

impl EvaluationOutcome {
    pub fn assessment(&self, kind: FactorKind) -> Option<&FactorAssessment> {
        self.breakdown
            .iter()
            .find(|assessment| assessment.factor == kind)
    }
}

/// Stateless evaluator over a shared, read-only standards table.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    standards: Arc<StandardsTable>,
}

impl EvaluationEngine {
    pub fn new(standards: Arc<StandardsTable>) -> Self {
        Self { standards }
    }

    /// Engine over the process-wide tables installed at startup.
    pub fn from_global() -> Result<Self, ConfigurationError> {
        standards::global().map(Self::new)
    }

    pub fn standards(&self) -> &StandardsTable {
        &self.standards
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationOutcome, InputError> {
        let work_time: WorkTimeCategory = request.work_time.parse()?;

        let physical = PhysicalFactorScorer::new(&self.standards)
            .assess(&request.physical.details, &request.physical.postures)?;
        let mental = MentalFactorScorer::new(&self.standards).assess(&request.mental)?;
        let environmental = EnvironmentalFactorScorer::new(&self.standards).assess(
            &request.environmental.details,
            &request.environmental.substances,
        )?;
        let hazard = HazardFactorScorer::new(&self.standards).assess(&request.hazards)?;

        let result = CompositeAggregator::new(&self.standards).aggregate(
            physical.score,
            mental.score,
            environmental.score,
            hazard.score,
            work_time,
        );

        debug!(
            subject = request.subject.as_deref().unwrap_or("-"),
            kitsusa = result.kitsusa_score,
            index = %result.index,
            "evaluation computed"
        );

        Ok(EvaluationOutcome {
            result,
            breakdown: vec![physical, mental, environmental, hazard],
        })
    }

    pub fn assess(&self, input: &FactorInput) -> Result<FactorAssessment, InputError> {
        match input {
            FactorInput::Physical(input) => {
                PhysicalFactorScorer::new(&self.standards).assess(&input.details, &input.postures)
            }
            FactorInput::Mental(details) => MentalFactorScorer::new(&self.standards).assess(details),
            FactorInput::Environmental(input) => EnvironmentalFactorScorer::new(&self.standards)
                .assess(&input.details, &input.substances),
            FactorInput::Hazard(observations) => {
                HazardFactorScorer::new(&self.standards).assess(observations)
            }
        }
    }

    pub fn work_time_factor(&self, category: &str) -> Result<f64, InputError> {
        WorkTimeAdjuster::new(&self.standards).factor_for(category)
    }
}
