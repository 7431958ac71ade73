use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::evaluation::repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, RepositoryError,
};
use crate::evaluation::{
    evaluation_router, EnvironmentalInput, EvaluationEngine, EvaluationRequest,
    EvaluationService, PhysicalInput,
};
use crate::scoring::{
    HazardObservation, MentalDetails, OwasPosture, PostureObservation, SubstanceReading,
};
use crate::standards::{ConcentrationUnit, StandardsTable};

pub(super) fn engine() -> Arc<EvaluationEngine> {
    Arc::new(EvaluationEngine::new(Arc::new(StandardsTable::builtin())))
}

/// Packing line: squatting posture, tight deadlines, solvent in the air.
pub(super) fn packing_line_request(work_time: &str) -> EvaluationRequest {
    EvaluationRequest {
        subject: Some("packing line".to_string()),
        physical: PhysicalInput {
            postures: vec![PostureObservation::owas(OwasPosture {
                back: 2,
                arms: 1,
                legs: 4,
                load: 1,
            })
            .with_label("squatting at conveyor")],
            ..PhysicalInput::default()
        },
        mental: MentalDetails {
            concentration: Some(4),
            time_pressure: Some(4),
            responsibility: Some(3),
            cognitive_load: Some(3),
            emotional_burden: Some(2),
        },
        environmental: EnvironmentalInput {
            substances: vec![SubstanceReading {
                substance_id: "toluene".to_string(),
                concentration: 12.0,
                unit: ConcentrationUnit::Ppm,
            }],
            ..EnvironmentalInput::default()
        },
        hazards: vec![HazardObservation::new("pinch point", 2, 3)],
        work_time: work_time.to_string(),
    }
}

pub(super) fn unknown_substance_request() -> EvaluationRequest {
    let mut request = packing_line_request("c");
    request.environmental.substances.push(SubstanceReading {
        substance_id: "unknown-xyz".to_string(),
        concentration: 1.0,
        unit: ConcentrationUnit::Ppm,
    });
    request
}

pub(super) fn build_service() -> (EvaluationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = EvaluationService::new(repository.clone(), engine());
    (service, repository)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<BTreeMap<EvaluationId, EvaluationRecord>>,
}

impl EvaluationRepository for MemoryRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Ok(self.records.lock().expect("lock").get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("lock")
            .values()
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl EvaluationRepository for ConflictRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: EvaluationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: EvaluationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: EvaluationService<MemoryRepository>) -> axum::Router {
    evaluation_router(Arc::new(service))
}
