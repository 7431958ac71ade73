use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{EvaluationId, EvaluationRepository, RepositoryError};
use super::service::{EvaluationService, EvaluationServiceError};
use super::{EvaluationRequest, FactorInput};
use crate::scoring::FactorKind;

const DEFAULT_STATISTICS_LIMIT: usize = 1_000;

/// Router exposing evaluation intake, lookup, re-scoring and statistics.
pub fn evaluation_router<R>(service: Arc<EvaluationService<R>>) -> Router
where
    R: EvaluationRepository + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(submit_handler::<R>))
        .route("/api/v1/evaluations/:evaluation_id", get(fetch_handler::<R>))
        .route(
            "/api/v1/evaluations/:evaluation_id/rescore",
            post(rescore_handler::<R>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/report",
            get(report_handler::<R>),
        )
        .route("/api/v1/statistics", get(statistics_handler::<R>))
        .route("/api/v1/factors/:factor", post(factor_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatisticsQuery {
    limit: Option<usize>,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<EvaluationService<R>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    match service.submit(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.summary_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<EvaluationService<R>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    match service.get(&EvaluationId(evaluation_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rescore_handler<R>(
    State(service): State<Arc<EvaluationService<R>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    match service.rescore(&EvaluationId(evaluation_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.summary_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<EvaluationService<R>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    match service.report(&EvaluationId(evaluation_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statistics_handler<R>(
    State(service): State<Arc<EvaluationService<R>>>,
    Query(query): Query<StatisticsQuery>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_STATISTICS_LIMIT);
    match service.statistics(limit) {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn factor_handler<R>(
    State(service): State<Arc<EvaluationService<R>>>,
    Path(factor): Path<String>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Response
where
    R: EvaluationRepository + 'static,
{
    let kind = match factor.parse::<FactorKind>() {
        Ok(kind) => kind,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    let input = match FactorInput::from_json(kind, body) {
        Ok(input) => input,
        Err(error) => {
            let payload = json!({ "error": format!("invalid {kind} input: {error}") });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.assess_factor(&input) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: EvaluationServiceError) -> Response {
    let status = match &error {
        EvaluationServiceError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EvaluationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EvaluationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
