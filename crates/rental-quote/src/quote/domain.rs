use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A single rentable apartment. Reference data owned by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: u32,
    #[serde(rename = "stringId")]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    pub bed_count: u32,
    pub default_nightly_price: u32,
}

impl Unit {
    /// Weekly rate used when no seasonal override covers the check-in date.
    pub fn default_weekly_price(&self) -> u32 {
        self.default_nightly_price.saturating_mul(7)
    }

    /// Whether `id` names this unit, either by slug or by numeric id.
    pub fn matches_id(&self, id: &str) -> bool {
        let id = id.trim();
        id == self.slug || id.parse::<u32>().is_ok_and(|value| value == self.id)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.slug
        } else {
            &self.name
        }
    }
}

/// Ordered, immutable list of the property's units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCatalog {
    units: Vec<Unit>,
}

impl UnitCatalog {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by slug or numeric id.
    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.matches_id(id))
    }

    /// Look up every selected id, keeping the order of the selection.
    /// Two ids naming the same unit select it once.
    pub fn resolve_selection(&self, unit_ids: &[String]) -> Result<Vec<&Unit>, QuoteError> {
        if unit_ids.is_empty() {
            return Err(QuoteError::NoUnitsSelected);
        }

        let mut selected: Vec<&Unit> = Vec::with_capacity(unit_ids.len());
        for id in unit_ids {
            let unit = self
                .get(id)
                .ok_or_else(|| QuoteError::UnknownUnit(id.clone()))?;
            if !selected.iter().any(|seen| seen.slug == unit.slug) {
                selected.push(unit);
            }
        }
        Ok(selected)
    }

    pub fn total_beds(units: &[&Unit]) -> u32 {
        units.iter().map(|unit| unit.bed_count).sum()
    }
}

/// Sleeping arrangement and tax status of one child in the party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDetail {
    #[serde(default)]
    pub is_under12: bool,
    #[serde(default)]
    pub sleeps_with_parents: bool,
    #[serde(default)]
    pub sleeps_in_crib: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestComposition {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub adults: u32,
    #[serde(default)]
    pub children: Vec<ChildDetail>,
}

/// Half-open `[check_in, check_out)` stay window; construction guarantees at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, QuoteError> {
        if check_out <= check_in {
            return Err(QuoteError::InvalidDateRange {
                check_in,
                check_out,
            });
        }

        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, QuoteError> {
        let check_in = parse_date_field("checkIn", check_in)?;
        let check_out = parse_date_field("checkOut", check_out)?;
        Self::new(check_in, check_out)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// Started weeks, `ceil(nights / 7)`.
    pub fn weeks(&self) -> u32 {
        self.nights().div_ceil(7)
    }

    /// Half-open overlap test; touching intervals do not overlap.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start < self.check_out && end > self.check_in
    }
}

/// Raw booking form payload. Dates stay strings until [`StayRequestPayload::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRequestPayload {
    pub check_in: String,
    pub check_out: String,
    #[serde(default, deserialize_with = "deserialize_identifiers")]
    pub unit_ids: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub adults: u32,
    #[serde(default)]
    pub children: Vec<ChildDetail>,
}

impl StayRequestPayload {
    pub fn validate(self) -> Result<StayRequest, QuoteError> {
        let stay = StayRange::parse(&self.check_in, &self.check_out)?;
        StayRequest::new(
            stay,
            self.unit_ids,
            GuestComposition {
                adults: self.adults,
                children: self.children,
            },
        )
    }
}

/// Validated stay request: a proper date range and a non-empty unit selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRequest {
    #[serde(flatten)]
    pub stay: StayRange,
    pub unit_ids: Vec<String>,
    pub guests: GuestComposition,
}

impl StayRequest {
    pub fn new(
        stay: StayRange,
        unit_ids: Vec<String>,
        guests: GuestComposition,
    ) -> Result<Self, QuoteError> {
        let mut seen = BTreeSet::new();
        let unit_ids: Vec<String> = unit_ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();

        if unit_ids.is_empty() {
            return Err(QuoteError::NoUnitsSelected);
        }

        Ok(Self {
            stay,
            unit_ids,
            guests,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Active,
    Cancelled,
}

impl ReservationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" | "confirmed" | "" => Some(Self::Active),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Existing booking as exported by the reservation management surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(deserialize_with = "deserialize_identifier")]
    pub id: String,
    /// Slugs or numeric unit ids, as the export names them.
    #[serde(deserialize_with = "deserialize_identifiers")]
    pub unit_ids: BTreeSet<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: ReservationStatus,
}

impl Reservation {
    /// Whether this reservation keeps `unit` from being booked for `stay`.
    pub fn blocks(&self, unit: &Unit, stay: &StayRange) -> bool {
        self.status == ReservationStatus::Active
            && self.unit_ids.iter().any(|id| unit.matches_id(id))
            && stay.overlaps(self.start_date, self.end_date)
    }
}

/// Errors that stop a quote from being computed at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("{field} '{value}' is not a valid date")]
    UnparsableDate { field: &'static str, value: String },
    #[error("no units selected")]
    NoUnitsSelected,
    #[error("unit '{0}' is not part of the catalog")]
    UnknownUnit(String),
}

/// Accepts `YYYY-MM-DD` or a timestamp; the time of day is dropped.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn parse_date_field(field: &'static str, value: &str) -> Result<NaiveDate, QuoteError> {
    parse_calendar_date(value).ok_or_else(|| QuoteError::UnparsableDate {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a valid date")))
}

/// Guest counts arrive from a form; negatives clamp to zero instead of failing.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(i64),
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        match value {
            Identifier::Text(value) => value,
            Identifier::Number(value) => value.to_string(),
        }
    }
}

fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Identifier::deserialize(deserializer)?.into())
}

fn deserialize_identifiers<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: FromIterator<String>,
{
    let ids = Vec::<Identifier>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}
