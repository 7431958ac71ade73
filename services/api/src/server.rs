use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEvaluationRepository};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kitsusa::config::{load_standards, AppConfig};
use kitsusa::error::AppError;
use kitsusa::evaluation::{EvaluationEngine, EvaluationService};
use kitsusa::{standards, telemetry};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.standards.take() {
        config.standards.path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let table = standards::install(load_standards(&config.standards)?)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        standards: table.clone(),
    };

    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let engine = Arc::new(EvaluationEngine::new(table));
    let evaluation_service = Arc::new(EvaluationService::new(repository, engine));

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kitsusa scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
