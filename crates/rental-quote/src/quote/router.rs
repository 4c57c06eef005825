use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{QuoteError, Reservation, StayRequestPayload};
use super::repository::ReservationRepository;
use super::service::{QuoteService, QuoteServiceError};
use super::store::KeyValueStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvailabilityRequest {
    pub(crate) check_in: String,
    pub(crate) check_out: String,
}

/// Router builder exposing the quote, availability and snapshot endpoints.
pub fn quote_router<R, S>(service: Arc<QuoteService<R, S>>) -> Router
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/quote", post(quote_handler::<R, S>))
        .route("/api/v1/availability", post(availability_handler::<R, S>))
        .route("/api/v1/units", get(units_handler::<R, S>))
        .route("/api/v1/reservations", put(reservations_handler::<R, S>))
        .route(
            "/api/v1/seasonal-prices/:year",
            put(seasonal_prices_handler::<R, S>),
        )
        .with_state(service)
}

fn error_response(error: QuoteServiceError) -> Response {
    let (status, kind) = match &error {
        QuoteServiceError::Quote(QuoteError::NoUnitsSelected) => {
            (StatusCode::BAD_REQUEST, "no_units_selected")
        }
        QuoteServiceError::Quote(QuoteError::UnknownUnit(_)) => {
            (StatusCode::BAD_REQUEST, "unknown_unit")
        }
        QuoteServiceError::Quote(QuoteError::InvalidDateRange { .. })
        | QuoteServiceError::Quote(QuoteError::UnparsableDate { .. }) => {
            (StatusCode::BAD_REQUEST, "invalid_date_range")
        }
        QuoteServiceError::Repository(_) | QuoteServiceError::Store(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "unavailable")
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn quote_handler<R, S>(
    State(service): State<Arc<QuoteService<R, S>>>,
    axum::Json(payload): axum::Json<StayRequestPayload>,
) -> Response
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    match service.quote(payload) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn availability_handler<R, S>(
    State(service): State<Arc<QuoteService<R, S>>>,
    axum::Json(request): axum::Json<AvailabilityRequest>,
) -> Response
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    match service.availability(&request.check_in, &request.check_out) {
        Ok(units) => (StatusCode::OK, axum::Json(json!({ "units": units }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn units_handler<R, S>(
    State(service): State<Arc<QuoteService<R, S>>>,
) -> Response
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().clone())).into_response()
}

pub(crate) async fn reservations_handler<R, S>(
    State(service): State<Arc<QuoteService<R, S>>>,
    axum::Json(reservations): axum::Json<Vec<Reservation>>,
) -> Response
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    match service.replace_reservations(reservations) {
        Ok(count) => (StatusCode::OK, axum::Json(json!({ "reservations": count }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn seasonal_prices_handler<R, S>(
    State(service): State<Arc<QuoteService<R, S>>>,
    Path(year): Path<i32>,
    body: String,
) -> Response
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    match service.store_seasonal_prices(year, body) {
        Ok(table) => {
            let payload = json!({
                "year": year,
                "entries": table.entries().len(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
