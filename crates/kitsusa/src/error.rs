use crate::config::ConfigError;
use crate::scoring::InputError;
use crate::standards::{ConfigurationError, ExportError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Standards(ConfigurationError),
    Evaluation(InputError),
    Export(ExportError),
    Payload(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Standards(err) => write!(f, "standards error: {}", err),
            AppError::Evaluation(err) => write!(f, "evaluation error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Payload(err) => write!(f, "invalid payload: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Standards(err) => Some(err),
            AppError::Evaluation(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Payload(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Evaluation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Standards(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(value: ConfigurationError) -> Self {
        Self::Standards(value)
    }
}

impl From<InputError> for AppError {
    fn from(value: InputError) -> Self {
        Self::Evaluation(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}
