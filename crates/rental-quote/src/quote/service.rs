use std::sync::{Arc, Mutex, PoisonError};

use chrono::Datelike;

use super::availability::{AvailabilityChecker, UnitAvailability};
use super::domain::{QuoteError, Reservation, StayRange, StayRequestPayload, UnitCatalog};
use super::engine::{Quote, QuoteInputs, QuoteSession};
use super::repository::{RepositoryError, ReservationRepository};
use super::seasonal::SeasonalPriceTable;
use super::store::{KeyValueStore, SeasonalPriceSnapshots, StoreError};
use crate::config::PricingConfig;

/// Service composing the unit catalog, reservation snapshots and seasonal tables.
pub struct QuoteService<R, S> {
    catalog: UnitCatalog,
    reservations: Arc<R>,
    store: Arc<S>,
    pricing: PricingConfig,
    session: Mutex<QuoteSession>,
}

impl<R, S> QuoteService<R, S>
where
    R: ReservationRepository + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(
        catalog: UnitCatalog,
        reservations: Arc<R>,
        store: Arc<S>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            catalog,
            reservations,
            store,
            pricing,
            session: Mutex::new(QuoteSession::default()),
        }
    }

    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Validate a booking form payload and quote it against the current snapshots.
    pub fn quote(&self, payload: StayRequestPayload) -> Result<Quote, QuoteServiceError> {
        let request = payload.validate()?;
        let reservations = self.reservations.snapshot()?;
        let seasonal =
            SeasonalPriceSnapshots::new(self.store.as_ref()).load(request.stay.check_in().year());

        let inputs = QuoteInputs {
            request,
            catalog: self.catalog.clone(),
            reservations,
            seasonal,
            pricing: self.pricing.clone(),
        };

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(session.refresh(inputs)?)
    }

    /// Eligibility of every unit for the window, from one reservation snapshot.
    pub fn availability(
        &self,
        check_in: &str,
        check_out: &str,
    ) -> Result<Vec<UnitAvailability>, QuoteServiceError> {
        let stay = StayRange::parse(check_in, check_out)?;
        let reservations = self.reservations.snapshot()?;
        Ok(AvailabilityChecker::check_all(
            &self.catalog,
            &stay,
            &reservations,
        ))
    }

    pub fn replace_reservations(
        &self,
        reservations: Vec<Reservation>,
    ) -> Result<usize, QuoteServiceError> {
        let count = reservations.len();
        self.reservations.replace(reservations)?;
        Ok(count)
    }

    pub fn store_seasonal_prices(
        &self,
        year: i32,
        raw: String,
    ) -> Result<SeasonalPriceTable, QuoteServiceError> {
        Ok(SeasonalPriceSnapshots::new(self.store.as_ref()).save(year, raw)?)
    }

    pub fn recomputations(&self) -> u64 {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recomputations()
    }
}

/// Error raised by the quote service.
#[derive(Debug, thiserror::Error)]
pub enum QuoteServiceError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
