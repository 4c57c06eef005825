use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rental_quote::error::AppError;
use rental_quote::quote::{
    quote_router, KeyValueStore, QuoteService, ReservationCsvImporter, ReservationRepository,
};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

pub(crate) fn with_quote_routes<R, S>(service: Arc<QuoteService<R, S>>) -> axum::Router
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    let importer = service.clone();
    quote_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/reservations/csv",
            axum::routing::put(move |body: String| reservations_csv_endpoint(importer, body)),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Replace the reservation snapshot from a raw CSV export.
pub(crate) async fn reservations_csv_endpoint<R, S>(
    service: Arc<QuoteService<R, S>>,
    body: String,
) -> Result<Json<serde_json::Value>, AppError>
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    let reservations = ReservationCsvImporter::from_reader(Cursor::new(body.into_bytes()))?;
    let count = service.replace_reservations(reservations)?;
    Ok(Json(json!({ "reservations": count })))
}
