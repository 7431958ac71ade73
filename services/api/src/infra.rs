use kitsusa::evaluation::{EvaluationId, EvaluationRecord, EvaluationRepository, RepositoryError};
use kitsusa::standards::{MatrixKind, StandardsTable};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) standards: Arc<StandardsTable>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, EvaluationRecord>>>,
}

impl InMemoryEvaluationRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<EvaluationId, EvaluationRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.guard()?;
        let mut records: Vec<_> = guard.values().cloned().collect();
        // Sequence ids share a prefix; shorter ids were issued first.
        records.sort_by(|left, right| {
            left.id
                .0
                .len()
                .cmp(&right.id.0.len())
                .then_with(|| left.id.cmp(&right.id))
        });
        records.truncate(limit);
        Ok(records)
    }
}

pub(crate) fn parse_matrix_kind(raw: &str) -> Result<MatrixKind, String> {
    MatrixKind::parse(raw).ok_or_else(|| {
        let known = MatrixKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown matrix '{raw}' (expected one of: {known})")
    })
}
