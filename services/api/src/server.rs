use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubmissionStore};
use crate::routes::with_enrollment_routes;
use ach_enrollment::admin::SharedSecret;
use ach_enrollment::config::AppConfig;
use ach_enrollment::error::AppError;
use ach_enrollment::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let credentials = SharedSecret::from_config(&config.admin);
    if !credentials.is_configured() {
        warn!("ADMIN_PASSWORD not set; admin endpoints will reject every request");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySubmissionStore::default());
    let app = with_enrollment_routes(store, Arc::new(credentials), &config.enrollment.payee_name)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ach enrollment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
