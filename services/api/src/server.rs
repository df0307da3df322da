use crate::cli::ServeArgs;
use crate::infra::{AdvisorService, AppState};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use renovation_advisor::archetypes::{CatalogError, HttpArchetypeSource};
use renovation_advisor::config::AppConfig;
use renovation_advisor::error::AppError;
use renovation_advisor::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = HttpArchetypeSource::new(&config.archetypes)
        .map_err(|err| AppError::Catalog(CatalogError::Retrieval(err)))?;
    let service = Arc::new(AdvisorService::new(source));

    // The listing is retried on first use if the archetype service is still down.
    match service.catalog().list_all().await {
        Ok(records) => info!(count = records.len(), "archetype listing preloaded"),
        Err(err) => warn!(error = %err, base_url = %config.archetypes.base_url, "archetype listing unavailable at startup"),
    }

    let app = with_advisor_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "renovation advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
