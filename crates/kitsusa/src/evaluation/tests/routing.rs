use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::evaluation::router::submit_handler;
use crate::evaluation::EvaluationService;

fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_creates_evaluations() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let body = serde_json::to_value(packing_line_request("c")).expect("request serializes");

    let response = router
        .oneshot(post_json("/api/v1/evaluations", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["index"], "A");
    assert_eq!(payload["kitsusa_score"], 7.0);
    assert_eq!(payload["work_time"], "c");
}

#[tokio::test]
async fn submit_route_rejects_unknown_substances() {
    let (service, _) = build_service();
    let router = router_with_service(service);
    let body = serde_json::to_value(unknown_substance_request()).expect("request serializes");

    let response = router
        .oneshot(post_json("/api/v1/evaluations", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "unknown substance 'unknown-xyz'");
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(EvaluationService::new(Arc::new(ConflictRepository), engine()));

    let response =
        submit_handler::<ConflictRepository>(State(service), axum::Json(packing_line_request("c")))
            .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(EvaluationService::new(Arc::new(UnavailableRepository), engine()));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        axum::Json(packing_line_request("c")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn fetch_route_returns_stored_records_and_404_for_unknown_ids() {
    let (service, _) = build_service();
    let record = service
        .submit(packing_line_request("d"))
        .expect("submission succeeds");
    let router = router_with_service(service);

    let found = router
        .clone()
        .oneshot(get(&format!("/api/v1/evaluations/{}", record.id)))
        .await
        .expect("route executes");
    assert_eq!(found.status(), StatusCode::OK);
    let payload = read_json_body(found).await;
    assert_eq!(payload["outcome"]["result"]["kitsusa_score"], 10.5);
    assert_eq!(payload["request"]["work_time"], "d");

    let missing = router
        .oneshot(get("/api/v1/evaluations/eval-999999"))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rescore_route_bumps_the_revision() {
    let (service, _) = build_service();
    let record = service
        .submit(packing_line_request("c"))
        .expect("submission succeeds");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/evaluations/{}/rescore", record.id),
            json!({}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["revision"], 2);
}

#[tokio::test]
async fn report_and_statistics_routes_respond() {
    let (service, _) = build_service();
    let record = service
        .submit(packing_line_request("b"))
        .expect("submission succeeds");
    let router = router_with_service(service);

    let report = router
        .clone()
        .oneshot(get(&format!("/api/v1/evaluations/{}/report", record.id)))
        .await
        .expect("route executes");
    assert_eq!(report.status(), StatusCode::OK);
    let payload = read_json_body(report).await;
    assert_eq!(payload["risk_level"], "high");

    let statistics = router
        .oneshot(get("/api/v1/statistics?limit=10"))
        .await
        .expect("route executes");
    assert_eq!(statistics.status(), StatusCode::OK);
    let payload = read_json_body(statistics).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["index_distribution"]["B"], 1);
}

#[tokio::test]
async fn factor_route_scores_a_single_factor() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/factors/environmental",
            json!({
                "details": { "noise_db": 86.0 },
                "substances": [
                    { "substance_id": "xylene", "concentration": 40.0, "unit": "ppm" }
                ]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["factor"], "environmental");
    assert_eq!(payload["score"], 7);
    assert_eq!(payload["components"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn factor_route_rejects_unknown_factors_and_bad_bodies() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let unknown = router
        .clone()
        .oneshot(post_json("/api/v1/factors/boredom", json!({})))
        .await
        .expect("route executes");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let malformed = router
        .clone()
        .oneshot(post_json("/api/v1/factors/hazard", json!({ "label": "not a list" })))
        .await
        .expect("route executes");
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let out_of_range = router
        .oneshot(post_json(
            "/api/v1/factors/hazard",
            json!([{ "label": "drop", "likelihood": 9, "severity": 2 }]),
        ))
        .await
        .expect("route executes");
    assert_eq!(out_of_range.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
