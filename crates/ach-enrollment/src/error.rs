use crate::admin::AdminError;
use crate::config::ConfigError;
use crate::enrollment::{StoreError, WizardError};
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
    Unauthorized,
    Store(StoreError),
    Wizard(WizardError),
    Admin(AdminError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Wizard(err) => write!(f, "enrollment error: {}", err),
            AppError::Admin(err) => write!(f, "admin error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Unauthorized => None,
            AppError::Store(err) => Some(err),
            AppError::Wizard(err) => Some(err),
            AppError::Admin(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized | AppError::Admin(AdminError::Auth) => StatusCode::UNAUTHORIZED,
            AppError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Wizard(WizardError::Submission(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Wizard(_) | AppError::Admin(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Store(StoreError::Unavailable(_)) => "store unavailable".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({ "error": message }));
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

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<WizardError> for AppError {
    fn from(value: WizardError) -> Self {
        Self::Wizard(value)
    }
}

impl From<AdminError> for AppError {
    fn from(value: AdminError) -> Self {
        Self::Admin(value)
    }
}
