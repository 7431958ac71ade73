use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EvaluationOutcome, EvaluationRequest};
use crate::standards::ThreeKIndex;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored evaluation: the original inputs and the engine's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    pub request: EvaluationRequest,
    pub outcome: EvaluationOutcome,
    pub evaluated_at: DateTime<Utc>,
    /// Incremented each time the stored inputs are re-scored.
    pub revision: u32,
}

impl EvaluationRecord {
    pub fn summary_view(&self) -> EvaluationSummaryView {
        let result = &self.outcome.result;
        EvaluationSummaryView {
            id: self.id.clone(),
            subject: self.request.subject.clone(),
            index: result.index,
            kitsusa_score: result.kitsusa_score,
            physical: result.physical.value(),
            mental: result.mental.value(),
            environmental: result.environmental.value(),
            hazard: result.hazard.value(),
            work_time: result.work_time.as_str(),
            standards_version: result.standards_version.clone(),
            evaluated_at: self.evaluated_at,
            revision: self.revision,
        }
    }
}

/// Storage abstraction so the service can run against any backend.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Flattened record shape returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummaryView {
    pub id: EvaluationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub index: ThreeKIndex,
    pub kitsusa_score: f64,
    pub physical: u8,
    pub mental: u8,
    pub environmental: u8,
    pub hazard: u8,
    pub work_time: &'static str,
    pub standards_version: String,
    pub evaluated_at: DateTime<Utc>,
    pub revision: u32,
}
