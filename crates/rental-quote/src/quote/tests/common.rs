use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::PricingConfig;
use crate::quote::domain::{
    ChildDetail, Reservation, ReservationStatus, StayRequestPayload, Unit, UnitCatalog,
};
use crate::quote::repository::{RepositoryError, ReservationRepository};
use crate::quote::store::{KeyValueStore, StoreError};
use crate::quote::{quote_router, QuoteService};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn catalog() -> UnitCatalog {
    UnitCatalog::new(vec![
        Unit {
            id: 1,
            slug: "u1".to_string(),
            name: "Casa Uno".to_string(),
            bed_count: 6,
            default_nightly_price: 100,
        },
        Unit {
            id: 2,
            slug: "u2".to_string(),
            name: "Casa Due".to_string(),
            bed_count: 2,
            default_nightly_price: 80,
        },
    ])
}

pub(super) fn reservation(
    id: &str,
    unit: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: ReservationStatus,
) -> Reservation {
    Reservation {
        id: id.to_string(),
        unit_ids: [unit.to_string()].into_iter().collect(),
        start_date: start,
        end_date: end,
        status,
    }
}

pub(super) fn payload(check_in: &str, check_out: &str, units: &[&str], adults: u32) -> StayRequestPayload {
    StayRequestPayload {
        check_in: check_in.to_string(),
        check_out: check_out.to_string(),
        unit_ids: units.iter().map(|unit| unit.to_string()).collect(),
        adults,
        children: Vec::<ChildDetail>::new(),
    }
}

#[derive(Default)]
pub(super) struct MemoryReservations {
    reservations: Mutex<Vec<Reservation>>,
}

impl ReservationRepository for MemoryReservations {
    fn snapshot(&self) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self.reservations.lock().expect("reservations poisoned").clone())
    }

    fn replace(&self, reservations: Vec<Reservation>) -> Result<(), RepositoryError> {
        *self.reservations.lock().expect("reservations poisoned") = reservations;
        Ok(())
    }
}

pub(super) struct UnavailableReservations;

impl ReservationRepository for UnavailableReservations {
    fn snapshot(&self) -> Result<Vec<Reservation>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn replace(&self, _reservations: Vec<Reservation>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().expect("store poisoned").get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values
            .lock()
            .expect("store poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }
}

pub(super) struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn put(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

pub(super) type MemoryService = QuoteService<MemoryReservations, MemoryStore>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryReservations>, Arc<MemoryStore>) {
    let reservations = Arc::new(MemoryReservations::default());
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(QuoteService::new(
        catalog(),
        reservations.clone(),
        store.clone(),
        PricingConfig::default(),
    ));
    (service, reservations, store)
}

pub(super) fn router_with_service<R, S>(service: Arc<QuoteService<R, S>>) -> axum::Router
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    quote_router(service)
}

pub(super) async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}
