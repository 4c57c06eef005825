use super::domain::{parse_calendar_date, Unit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Override of a unit's default weekly price for one calendar window (both ends inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPriceEntry {
    pub unit_id: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub price: u32,
}

impl SeasonalPriceEntry {
    fn covers(&self, date: NaiveDate) -> bool {
        self.week_start <= date && date <= self.week_end
    }

    fn applies_to(&self, unit: &Unit) -> bool {
        unit.matches_id(&self.unit_id)
    }

    fn span_days(&self) -> i64 {
        (self.week_end - self.week_start).num_days()
    }
}

/// Where a unit's weekly rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceSource {
    Seasonal {
        week_start: NaiveDate,
        week_end: NaiveDate,
    },
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    pub weekly_price: u32,
    pub source: PriceSource,
}

impl ResolvedPrice {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PriceSource::Default)
    }
}

/// Immutable snapshot of one year's seasonal overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SeasonalPriceTable {
    entries: Vec<SeasonalPriceEntry>,
}

impl SeasonalPriceTable {
    pub fn new(entries: Vec<SeasonalPriceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SeasonalPriceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a persisted table without ever failing.
    ///
    /// Unreadable JSON yields an empty table; rows with bad dates, an inverted
    /// window or a negative price are skipped. Either way the affected units
    /// fall back to default pricing.
    pub fn parse_lenient(raw: &str) -> Self {
        let rows = match serde_json::from_str::<Vec<Value>>(raw) {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "seasonal price table unreadable, using default prices");
                return Self::default();
            }
        };

        let entries = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| {
                let entry = entry_from_row(&row);
                if entry.is_none() {
                    warn!(index, "skipping malformed seasonal price row");
                }
                entry
            })
            .collect();

        Self { entries }
    }

    /// Weekly rate for `unit` in the week containing `check_in`.
    ///
    /// When several entries cover the date the narrowest window wins, then the
    /// latest start, then the lower price.
    pub fn weekly_price_for(&self, unit: &Unit, check_in: NaiveDate) -> ResolvedPrice {
        let matched = self
            .entries
            .iter()
            .filter(|entry| entry.applies_to(unit) && entry.covers(check_in))
            .min_by_key(|entry| (entry.span_days(), Reverse(entry.week_start), entry.price));

        match matched {
            Some(entry) => {
                debug!(unit = %unit.slug, %check_in, price = entry.price, "seasonal price matched");
                ResolvedPrice {
                    weekly_price: entry.price,
                    source: PriceSource::Seasonal {
                        week_start: entry.week_start,
                        week_end: entry.week_end,
                    },
                }
            }
            None => {
                debug!(unit = %unit.slug, %check_in, "no seasonal price, using default rate");
                ResolvedPrice {
                    weekly_price: unit.default_weekly_price(),
                    source: PriceSource::Default,
                }
            }
        }
    }
}

fn entry_from_row(row: &Value) -> Option<SeasonalPriceEntry> {
    let unit_id = match row.get("unitId")? {
        Value::String(value) if !value.trim().is_empty() => value.trim().to_string(),
        Value::Number(value) => value.to_string(),
        _ => return None,
    };
    let week_start = parse_calendar_date(row.get("weekStart")?.as_str()?)?;
    let week_end = parse_calendar_date(row.get("weekEnd")?.as_str()?)?;
    if week_end < week_start {
        return None;
    }

    let price = match row.get("price")? {
        Value::Number(value) => value.as_f64()?,
        Value::String(value) => value.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !price.is_finite() || price < 0.0 || price > f64::from(u32::MAX) {
        return None;
    }

    Some(SeasonalPriceEntry {
        unit_id,
        week_start,
        week_end,
        price: price.round() as u32,
    })
}
