use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStoreRepository};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use store_compliance::compliance::{ComplianceRegisterImporter, ComplianceService};
use store_compliance::config::AppConfig;
use store_compliance::error::AppError;
use store_compliance::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let stores = match args.register.take() {
        Some(path) => ComplianceRegisterImporter::from_path(path)?,
        None => Vec::new(),
    };
    info!(stores = stores.len(), "compliance register loaded");

    let repository = Arc::new(InMemoryStoreRepository::with_stores(stores));
    let service = Arc::new(ComplianceService::new(repository, config.scoring)?);

    let app = with_operational_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
