use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use super::domain::mandate_text;
use super::repository::SubmissionStore;
use super::service::{EnrollmentService, SubmissionError};

/// Shared state behind the public enrollment endpoints.
pub struct EnrollmentApi<S> {
    pub service: Arc<EnrollmentService<S>>,
    pub payee_name: String,
}

/// Router builder exposing the capture endpoints used by the enrollment form.
pub fn enrollment_router<S>(api: Arc<EnrollmentApi<S>>) -> Router
where
    S: SubmissionStore + 'static,
{
    Router::new()
        .route("/api/submit", post(submit_handler::<S>))
        .route("/api/mandate", get(mandate_handler::<S>))
        .with_state(api)
}

pub(crate) async fn submit_handler<S>(
    State(api): State<Arc<EnrollmentApi<S>>>,
    axum::Json(payload): axum::Json<Value>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match api.service.submit_payload(&payload) {
        Ok(_) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(SubmissionError::Rejected(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::Store(_)) => {
            let payload = json!({
                "error": "Failed to submit",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn mandate_handler<S>(State(api): State<Arc<EnrollmentApi<S>>>) -> Response
where
    S: SubmissionStore + 'static,
{
    let payload = json!({
        "payee": api.payee_name,
        "text": mandate_text(&api.payee_name),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
