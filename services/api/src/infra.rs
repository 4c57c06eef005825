use metrics_exporter_prometheus::PrometheusHandle;
use rental_quote::quote::{
    ChildDetail, KeyValueStore, RepositoryError, Reservation, ReservationRepository, StoreError,
    Unit, UnitCatalog,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReservationRepository {
    reservations: Arc<Mutex<Vec<Reservation>>>,
}

impl ReservationRepository for InMemoryReservationRepository {
    fn snapshot(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let guard = self
            .reservations
            .lock()
            .map_err(|_| RepositoryError::Unavailable("reservation mutex poisoned".into()))?;
        Ok(guard.clone())
    }

    fn replace(&self, reservations: Vec<Reservation>) -> Result<(), RepositoryError> {
        let mut guard = self
            .reservations
            .lock()
            .map_err(|_| RepositoryError::Unavailable("reservation mutex poisoned".into()))?;
        *guard = reservations;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".into()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

/// Units offered by the property.
pub(crate) fn default_unit_catalog() -> UnitCatalog {
    UnitCatalog::new(vec![
        Unit {
            id: 1,
            slug: "u1".to_string(),
            name: "Casa del Mare".to_string(),
            bed_count: 6,
            default_nightly_price: 100,
        },
        Unit {
            id: 2,
            slug: "u2".to_string(),
            name: "Casa Pineta".to_string(),
            bed_count: 4,
            default_nightly_price: 85,
        },
        Unit {
            id: 3,
            slug: "u3".to_string(),
            name: "Monolocale Corte".to_string(),
            bed_count: 2,
            default_nightly_price: 60,
        },
    ])
}

/// Parse a `--child` flag list such as `under12,parents`. An empty value is a
/// child over 12 in their own bed.
pub(crate) fn parse_child(raw: &str) -> Result<ChildDetail, String> {
    let mut child = ChildDetail::default();
    for flag in raw.split(',').map(str::trim).filter(|flag| !flag.is_empty()) {
        match flag.to_ascii_lowercase().as_str() {
            "under12" => child.is_under12 = true,
            "parents" => child.sleeps_with_parents = true,
            "crib" => child.sleeps_in_crib = true,
            other => {
                return Err(format!(
                    "unknown child flag '{other}' (expected under12, parents or crib)"
                ))
            }
        }
    }
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_flags_parse_in_any_order() {
        let child = parse_child("crib, under12").expect("flags parse");
        assert!(child.is_under12);
        assert!(child.sleeps_in_crib);
        assert!(!child.sleeps_with_parents);

        assert_eq!(parse_child("").expect("empty parses"), ChildDetail::default());
        assert!(parse_child("toddler").is_err());
    }

    #[test]
    fn in_memory_store_round_trips_values() {
        let store = InMemoryKeyValueStore::default();
        store
            .put("seasonal_prices:2024", "[]".to_string())
            .expect("put succeeds");
        assert_eq!(
            store.get("seasonal_prices:2024").expect("get succeeds"),
            Some("[]".to_string())
        );
        assert_eq!(store.get("missing").expect("get succeeds"), None);
    }

    #[test]
    fn default_catalog_has_unique_slugs() {
        let catalog = default_unit_catalog();
        let mut slugs: Vec<&str> = catalog.units().iter().map(|unit| unit.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), catalog.units().len());
    }
}
