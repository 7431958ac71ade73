use crate::infra::{parse_matrix_kind, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use kitsusa::error::AppError;
use kitsusa::evaluation::{evaluation_router, EvaluationRepository, EvaluationService};
use kitsusa::standards::{export_matrix, IndexBands, WorkTimeFactors};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct StandardsSummary {
    pub(crate) version: String,
    pub(crate) effective_date: NaiveDate,
    pub(crate) substances: Vec<String>,
    pub(crate) work_time: WorkTimeFactors,
    pub(crate) index_bands: IndexBands,
    pub(crate) matrices: Vec<&'static str>,
}

pub(crate) fn with_evaluation_routes<R>(service: Arc<EvaluationService<R>>) -> axum::Router
where
    R: EvaluationRepository + 'static,
{
    evaluation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/standards", axum::routing::get(standards_endpoint))
        .route(
            "/api/v1/standards/matrices/:matrix",
            axum::routing::get(matrix_export_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "standards_version": state.standards.version() })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn standards_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<StandardsSummary> {
    let standards = &state.standards;
    Json(StandardsSummary {
        version: standards.version().to_string(),
        effective_date: standards.effective_date(),
        substances: standards
            .substances()
            .iter()
            .map(|substance| substance.id.clone())
            .collect(),
        work_time: *standards.work_time(),
        index_bands: *standards.index_bands(),
        matrices: kitsusa::standards::MatrixKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect(),
    })
}

pub(crate) async fn matrix_export_endpoint(
    Extension(state): Extension<AppState>,
    Path(matrix): Path<String>,
) -> Result<Response, AppError> {
    let kind = match parse_matrix_kind(&matrix) {
        Ok(kind) => kind,
        Err(message) => {
            return Ok((StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response())
        }
    };

    let mut buffer = Vec::new();
    export_matrix(&state.standards, kind, &mut buffer)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        buffer,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryEvaluationRepository;
    use kitsusa::evaluation::EvaluationEngine;
    use kitsusa::standards::StandardsTable;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let standards = Arc::new(StandardsTable::builtin());
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            standards: standards.clone(),
        };
        let service = Arc::new(EvaluationService::new(
            Arc::new(InMemoryEvaluationRepository::default()),
            Arc::new(EvaluationEngine::new(standards)),
        ));
        with_evaluation_routes(service).layer(Extension(state))
    }

    fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
        axum::http::Request::get(uri)
            .body(axum::body::Body::empty())
            .expect("request builds")
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let initializing = app(false)
            .oneshot(get("/ready"))
            .await
            .expect("route executes");
        assert_eq!(initializing.status(), StatusCode::SERVICE_UNAVAILABLE);

        let ready = app(true).oneshot(get("/ready")).await.expect("route executes");
        assert_eq!(ready.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_text(ready).await).expect("json payload");
        assert_eq!(body["standards_version"], StandardsTable::builtin().version());
    }

    #[tokio::test]
    async fn standards_endpoint_lists_tables() {
        let response = app(true)
            .oneshot(get("/api/v1/standards"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json payload");
        assert_eq!(body["work_time"]["d"], 1.5);
        assert!(body["substances"]
            .as_array()
            .expect("substance list")
            .iter()
            .any(|id| id == "toluene"));
        assert_eq!(body["matrices"].as_array().map(Vec::len), Some(6));
    }

    #[tokio::test]
    async fn matrix_export_streams_csv() {
        let response = app(true)
            .oneshot(get("/api/v1/standards/matrices/rula-c"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );

        let body = body_text(response).await;
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("row,column,score"));
        assert_eq!(lines.count(), 56);
    }

    #[tokio::test]
    async fn unknown_matrix_is_not_found() {
        let response = app(true)
            .oneshot(get("/api/v1/standards/matrices/reba"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn healthcheck_is_always_ok() {
        let response = app(false)
            .oneshot(get("/health"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
