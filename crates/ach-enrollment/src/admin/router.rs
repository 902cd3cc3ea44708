use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::auth::{bearer_token, CredentialCheck};
use crate::enrollment::repository::{SubmissionId, SubmissionStore};
use crate::error::AppError;

/// Shared state behind the authenticated admin endpoints.
pub struct AdminApi<S> {
    pub store: Arc<S>,
    pub credentials: Arc<dyn CredentialCheck>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionRef {
    pub(crate) id: String,
}

/// Router builder for listing, marking, and deleting stored submissions.
pub fn admin_router<S>(api: Arc<AdminApi<S>>) -> Router
where
    S: SubmissionStore + 'static,
{
    Router::new()
        .route(
            "/api/submissions",
            get(list_handler::<S>)
                .patch(mark_viewed_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(api)
}

fn authorize<S>(api: &AdminApi<S>, headers: &HeaderMap) -> Result<(), AppError> {
    match bearer_token(headers) {
        Some(token) if api.credentials.verify(token) => Ok(()),
        _ => {
            warn!("admin request rejected");
            Err(AppError::Unauthorized)
        }
    }
}

pub(crate) async fn list_handler<S>(
    State(api): State<Arc<AdminApi<S>>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError>
where
    S: SubmissionStore + 'static,
{
    authorize(&api, &headers)?;
    let submissions = api.store.list()?;
    Ok(Json(json!({ "submissions": submissions })))
}

pub(crate) async fn mark_viewed_handler<S>(
    State(api): State<Arc<AdminApi<S>>>,
    headers: HeaderMap,
    Json(target): Json<SubmissionRef>,
) -> Result<Json<Value>, AppError>
where
    S: SubmissionStore + 'static,
{
    authorize(&api, &headers)?;
    let id = SubmissionId(target.id);
    api.store.set_viewed(&id, true)?;
    info!(submission_id = %id, "submission marked viewed");
    Ok(Json(json!({ "success": true })))
}

pub(crate) async fn delete_handler<S>(
    State(api): State<Arc<AdminApi<S>>>,
    headers: HeaderMap,
    Query(target): Query<SubmissionRef>,
) -> Result<Json<Value>, AppError>
where
    S: SubmissionStore + 'static,
{
    authorize(&api, &headers)?;
    let id = SubmissionId(target.id);
    api.store.delete(&id)?;
    info!(submission_id = %id, "submission deleted");
    Ok(Json(json!({ "success": true })))
}
