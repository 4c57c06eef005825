use super::availability::{AvailabilityChecker, UnitAvailability};
use super::calculator::{PriceCalculation, PriceCalculator};
use super::domain::{QuoteError, Reservation, StayRequest, UnitCatalog};
use super::guests::GuestCapacity;
use super::seasonal::SeasonalPriceTable;
use super::summary::QuoteSummary;
use crate::config::PricingConfig;
use serde::Serialize;
use tracing::debug;

/// Every snapshot a quote depends on. Two equal inputs always produce equal quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteInputs {
    pub request: StayRequest,
    pub catalog: UnitCatalog,
    pub reservations: Vec<Reservation>,
    /// Table for the check-in year.
    pub seasonal: SeasonalPriceTable,
    pub pricing: PricingConfig,
}

/// Result of one pipeline run, produced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub request: StayRequest,
    pub guests: GuestCapacity,
    /// Every catalog unit, not only the selected ones.
    pub availability: Vec<UnitAvailability>,
    pub selected_units_available: bool,
    pub total_beds: u32,
    /// Advisory only; a shortfall does not block the quote.
    pub has_enough_beds: bool,
    pub calculation: PriceCalculation,
    pub summary: String,
}

pub struct QuoteEngine;

impl QuoteEngine {
    pub fn quote(inputs: &QuoteInputs) -> Result<Quote, QuoteError> {
        let request = &inputs.request;
        let stay = &request.stay;

        let units = inputs.catalog.resolve_selection(&request.unit_ids)?;
        let guests = GuestCapacity::resolve(&request.guests);
        let availability = AvailabilityChecker::check_all(&inputs.catalog, stay, &inputs.reservations);

        let selected_units_available = availability
            .iter()
            .filter(|entry| units.iter().any(|unit| unit.slug == entry.unit_id))
            .all(|entry| entry.available);
        let total_beds = UnitCatalog::total_beds(&units);
        let has_enough_beds = guests.fits_in(total_beds);

        let calculation =
            PriceCalculator::new(&inputs.pricing).calculate(stay, &units, &guests, &inputs.seasonal)?;

        let summary = QuoteSummary {
            request,
            guests: &guests,
            calculation: &calculation,
            total_beds,
        }
        .render();

        debug!(
            check_in = %stay.check_in(),
            nights = calculation.nights,
            total = calculation.total_price,
            valid = calculation.prices_are_valid,
            "quote computed"
        );

        Ok(Quote {
            request: request.clone(),
            guests,
            availability,
            selected_units_available,
            total_beds,
            has_enough_beds,
            calculation,
            summary,
        })
    }
}

impl Quote {
    /// WhatsApp share link carrying this quote's summary.
    pub fn whatsapp_link(&self, phone: &str) -> String {
        QuoteSummary {
            request: &self.request,
            guests: &self.guests,
            calculation: &self.calculation,
            total_beds: self.total_beds,
        }
        .whatsapp_link(phone)
    }
}

/// Recompute-on-change wrapper: the pipeline only runs again when the inputs differ
/// from the previous call.
#[derive(Debug, Default)]
pub struct QuoteSession {
    last: Option<(QuoteInputs, Result<Quote, QuoteError>)>,
    recomputations: u64,
}

impl QuoteSession {
    pub fn refresh(&mut self, inputs: QuoteInputs) -> Result<Quote, QuoteError> {
        if let Some((previous, outcome)) = &self.last {
            if *previous == inputs {
                return outcome.clone();
            }
        }

        let outcome = QuoteEngine::quote(&inputs);
        self.recomputations += 1;
        self.last = Some((inputs, outcome.clone()));
        outcome
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
