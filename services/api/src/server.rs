use crate::cli::ServeArgs;
use crate::infra::{default_unit_catalog, AppState, InMemoryKeyValueStore, InMemoryReservationRepository};
use crate::routes::with_quote_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rental_quote::config::AppConfig;
use rental_quote::error::AppError;
use rental_quote::quote::QuoteService;
use rental_quote::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = default_unit_catalog();
    let unit_count = catalog.units().len();
    let quote_service = Arc::new(QuoteService::new(
        catalog,
        Arc::new(InMemoryReservationRepository::default()),
        Arc::new(InMemoryKeyValueStore::default()),
        config.pricing.clone(),
    ));

    let app = with_quote_routes(quote_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, units = unit_count, "rental quote service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
