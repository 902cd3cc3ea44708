use crate::infra::AppState;
use ach_enrollment::admin::{admin_router, AdminApi, CredentialCheck};
use ach_enrollment::enrollment::{
    enrollment_router, EnrollmentApi, EnrollmentService, SubmissionStore,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Public intake, reviewer endpoints, and operational probes over one store.
pub(crate) fn with_enrollment_routes<S>(
    store: Arc<S>,
    credentials: Arc<dyn CredentialCheck>,
    payee_name: &str,
) -> axum::Router
where
    S: SubmissionStore + 'static,
{
    let enrollment = Arc::new(EnrollmentApi {
        service: Arc::new(EnrollmentService::new(store.clone())),
        payee_name: payee_name.to_string(),
    });
    let admin = Arc::new(AdminApi { store, credentials });

    enrollment_router(enrollment)
        .merge(admin_router(admin))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySubmissionStore;
    use ach_enrollment::admin::SharedSecret;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<InMemorySubmissionStore>) {
        let store = Arc::new(InMemorySubmissionStore::default());
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_enrollment_routes(
            store.clone(),
            Arc::new(SharedSecret::new("hunter2")),
            "Talis Premium Finance",
        )
        .layer(Extension(state));
        (router, store)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (router, _) = app(false);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (router, _) = app(true);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ready" }));
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (router, _) = app(false);
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submitted_enrollment_shows_up_for_reviewers() {
        let (router, store) = app(true);
        let payload = json!({
            "company": "Acme Freight LLC",
            "name": "Dana Ruiz",
            "email": "dana@acmefreight.com",
            "phone": "515-555-0100",
            "bank": "First Prairie Bank",
            "accountName": "Acme Freight LLC",
            "routingNumber": "021000021",
            "accountNumber": "000123456789",
            "signature": "Dana Ruiz"
        });

        let submitted = router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/submit")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(submitted.status(), StatusCode::OK);
        assert_eq!(store.list().expect("listable").len(), 1);

        let listed = router
            .oneshot(
                Request::get("/api/submissions")
                    .header(header::AUTHORIZATION, "Bearer hunter2")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(listed.status(), StatusCode::OK);
        let body = json_body(listed).await;
        assert_eq!(body["submissions"][0]["company_name"], "Acme Freight LLC");
        assert_eq!(body["submissions"][0]["account_type"], "checking");
        assert_eq!(body["submissions"][0]["viewed"], false);
    }

    #[tokio::test]
    async fn mandate_uses_configured_payee() {
        let (router, _) = app(true);
        let response = router
            .oneshot(Request::get("/api/mandate").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let body = json_body(response).await;
        assert_eq!(body["payee"], "Talis Premium Finance");
    }
}
