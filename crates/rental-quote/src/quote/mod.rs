//! Quote and availability engine.
//!
//! Every step is a pure function over immutable snapshots: guest capacity,
//! availability, seasonal price lookup, price aggregation and the payment split.
//! [`QuoteEngine`] runs them as one pipeline; [`QuoteService`] feeds it from the
//! injected reservation repository and key-value store.

pub mod availability;
pub mod calculator;
pub mod domain;
pub mod engine;
pub mod guests;
pub mod import;
pub mod payment;
pub mod repository;
pub mod router;
pub mod seasonal;
pub mod service;
pub mod store;
pub mod summary;

#[cfg(test)]
mod tests;

pub use availability::{AvailabilityChecker, UnitAvailability};
pub use calculator::{PriceCalculation, PriceCalculator, UnitPriceLine};
pub use domain::{
    parse_calendar_date, ChildDetail, GuestComposition, QuoteError, Reservation,
    ReservationStatus, StayRange, StayRequest, StayRequestPayload, Unit, UnitCatalog,
};
pub use engine::{Quote, QuoteEngine, QuoteInputs, QuoteSession};
pub use guests::{reconcile_children, GuestCapacity};
pub use import::{ReservationCsvImporter, ReservationImportError};
pub use payment::PaymentBreakdown;
pub use repository::{RepositoryError, ReservationRepository};
pub use router::quote_router;
pub use seasonal::{PriceSource, ResolvedPrice, SeasonalPriceEntry, SeasonalPriceTable};
pub use service::{QuoteService, QuoteServiceError};
pub use store::{KeyValueStore, SeasonalPriceSnapshots, StoreError};
pub use summary::{format_italian_date, QuoteSummary};
