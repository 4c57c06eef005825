use super::domain::{QuoteError, StayRange, Unit};
use super::guests::GuestCapacity;
use super::payment::PaymentBreakdown;
use super::seasonal::{PriceSource, SeasonalPriceTable};
use crate::config::{CleaningFeeMode, PricingConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// One selected unit's share of the base price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPriceLine {
    pub unit_id: String,
    pub unit_name: String,
    pub weekly_price: u32,
    pub source: PriceSource,
    pub amount: u32,
}

/// Itemized quote for a stay. All amounts are whole euros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculation {
    pub nights: u32,
    pub weeks: u32,
    pub base_price: u32,
    /// Unit id to that unit's amount; sums to `base_price`.
    pub unit_prices: BTreeMap<String, u32>,
    pub lines: Vec<UnitPriceLine>,
    pub cleaning_fee: u32,
    pub tourist_tax: u32,
    pub total_price: u32,
    #[serde(flatten)]
    pub payment: PaymentBreakdown,
    /// False when any unit fell back to default pricing; the total is then an estimate.
    pub prices_are_valid: bool,
}

impl PriceCalculation {
    pub fn deposit(&self) -> u32 {
        self.payment.deposit
    }

    pub fn balance_due(&self) -> u32 {
        self.payment.balance_due
    }
}

pub struct PriceCalculator<'a> {
    pricing: &'a PricingConfig,
}

impl<'a> PriceCalculator<'a> {
    pub fn new(pricing: &'a PricingConfig) -> Self {
        Self { pricing }
    }

    /// Price `units` for `stay` at the check-in week's rate.
    ///
    /// A stay crossing into another season keeps the check-in rate for every night.
    /// A unit listed twice is priced once.
    pub fn calculate(
        &self,
        stay: &StayRange,
        units: &[&Unit],
        guests: &GuestCapacity,
        seasonal: &SeasonalPriceTable,
    ) -> Result<PriceCalculation, QuoteError> {
        if units.is_empty() {
            return Err(QuoteError::NoUnitsSelected);
        }

        let mut distinct: Vec<&Unit> = Vec::with_capacity(units.len());
        for &unit in units {
            if !distinct.iter().any(|seen| seen.slug == unit.slug) {
                distinct.push(unit);
            }
        }
        let units = distinct;

        let nights = stay.nights();
        let lines: Vec<UnitPriceLine> = units
            .iter()
            .map(|unit| {
                let resolved = seasonal.weekly_price_for(unit, stay.check_in());
                UnitPriceLine {
                    unit_id: unit.slug.clone(),
                    unit_name: unit.display_name().to_string(),
                    weekly_price: resolved.weekly_price,
                    source: resolved.source,
                    amount: prorate_weekly(resolved.weekly_price, nights),
                }
            })
            .collect();

        let fallback_units: Vec<&str> = lines
            .iter()
            .filter(|line| line.source == PriceSource::Default)
            .map(|line| line.unit_id.as_str())
            .collect();
        if !fallback_units.is_empty() {
            warn!(units = ?fallback_units, check_in = %stay.check_in(), "quoting with default prices");
        }
        let prices_are_valid = nights >= 1 && fallback_units.is_empty();

        let unit_prices: BTreeMap<String, u32> = lines
            .iter()
            .map(|line| (line.unit_id.clone(), line.amount))
            .collect();
        let base_total: u64 = lines.iter().map(|line| u64::from(line.amount)).sum();

        let cleaning_total = match self.pricing.cleaning_fee_mode {
            CleaningFeeMode::PerBooking => u64::from(self.pricing.cleaning_fee),
            CleaningFeeMode::PerUnit => {
                u64::from(self.pricing.cleaning_fee).saturating_mul(units.len() as u64)
            }
        };
        let tax_total = self.tourist_tax(guests.taxable_guests, nights);

        // A total that does not fit the amount type cannot be quoted.
        let total = base_total
            .checked_add(cleaning_total)
            .and_then(|sum| sum.checked_add(tax_total))
            .and_then(|sum| u32::try_from(sum).ok());
        if total.is_none() {
            warn!(check_in = %stay.check_in(), units = units.len(), "quote total out of range");
        }

        Ok(PriceCalculation {
            nights,
            weeks: stay.weeks(),
            base_price: clamp_amount(base_total),
            unit_prices,
            lines,
            cleaning_fee: clamp_amount(cleaning_total),
            tourist_tax: clamp_amount(tax_total),
            total_price: total.unwrap_or(0),
            payment: PaymentBreakdown::from_total(total, self.pricing),
            prices_are_valid,
        })
    }

    fn tourist_tax(&self, taxable_guests: u32, nights: u32) -> u64 {
        let taxed_nights = match self.pricing.tourist_tax_max_nights {
            Some(cap) => nights.min(cap),
            None => nights,
        };
        u64::from(taxable_guests)
            .saturating_mul(u64::from(taxed_nights))
            .saturating_mul(u64::from(self.pricing.tourist_tax_rate))
    }
}

/// `round(weekly / 7 * nights)` in integer arithmetic, halves rounded up.
pub fn prorate_weekly(weekly_price: u32, nights: u32) -> u32 {
    let scaled = u64::from(weekly_price)
        .saturating_mul(u64::from(nights))
        .saturating_mul(2)
        .saturating_add(7)
        / 14;
    clamp_amount(scaled)
}

fn clamp_amount(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
