use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::report::EvaluationReport;
use super::repository::{EvaluationId, EvaluationRecord, EvaluationRepository, RepositoryError};
use super::statistics::EvaluationStatistics;
use super::{EvaluationEngine, EvaluationRequest, FactorInput};
use crate::scoring::{FactorAssessment, InputError};

/// Service composing the evaluation engine with a record store.
pub struct EvaluationService<R> {
    repository: Arc<R>,
    engine: Arc<EvaluationEngine>,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

impl<R> EvaluationService<R>
where
    R: EvaluationRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<EvaluationEngine>) -> Self {
        Self { repository, engine }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// Evaluate a request and persist inputs plus outcome.
    pub fn submit(
        &self,
        request: EvaluationRequest,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let outcome = self.engine.evaluate(&request).map_err(|error| {
            warn!(%error, "evaluation rejected");
            error
        })?;

        let record = EvaluationRecord {
            id: next_evaluation_id(),
            request,
            outcome,
            evaluated_at: Utc::now(),
            revision: 1,
        };

        let stored = self.repository.insert(record)?;
        info!(
            id = %stored.id,
            index = %stored.outcome.result.index,
            kitsusa = stored.outcome.result.kitsusa_score,
            "evaluation stored"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &EvaluationId) -> Result<EvaluationRecord, EvaluationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Re-run the engine over stored inputs, for example after new tables
    /// were installed. Scores are never recomputed outside the engine.
    pub fn rescore(&self, id: &EvaluationId) -> Result<EvaluationRecord, EvaluationServiceError> {
        let mut record = self.get(id)?;
        let previous = record.outcome.result.index;

        record.outcome = self.engine.evaluate(&record.request)?;
        record.evaluated_at = Utc::now();
        record.revision += 1;
        self.repository.update(record.clone())?;

        info!(
            id = %record.id,
            revision = record.revision,
            from = %previous,
            to = %record.outcome.result.index,
            "evaluation rescored"
        );
        Ok(record)
    }

    pub fn report(&self, id: &EvaluationId) -> Result<EvaluationReport, EvaluationServiceError> {
        let record = self.get(id)?;
        Ok(EvaluationReport::from_outcome(&record.outcome))
    }

    pub fn statistics(&self, limit: usize) -> Result<EvaluationStatistics, EvaluationServiceError> {
        let records = self.repository.list(limit)?;
        let results: Vec<_> = records
            .into_iter()
            .map(|record| record.outcome.result)
            .collect();
        Ok(EvaluationStatistics::collect(&results))
    }

    /// Score a single factor without storing anything.
    pub fn assess_factor(
        &self,
        input: &FactorInput,
    ) -> Result<FactorAssessment, EvaluationServiceError> {
        Ok(self.engine.assess(input)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
