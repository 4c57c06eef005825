use super::domain::{parse_calendar_date, Reservation, ReservationStatus};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ReservationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for ReservationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationImportError::Io(err) => write!(f, "failed to read reservation export: {err}"),
            ReservationImportError::Csv(err) => write!(f, "invalid reservation CSV data: {err}"),
            ReservationImportError::InvalidRow { line, reason } => {
                write!(f, "reservation on line {line} rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for ReservationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReservationImportError::Io(err) => Some(err),
            ReservationImportError::Csv(err) => Some(err),
            ReservationImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ReservationImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ReservationImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct ReservationRow {
    id: String,
    units: String,
    start_date: String,
    end_date: String,
    #[serde(default)]
    status: String,
}

impl ReservationRow {
    fn into_reservation(self) -> Result<Reservation, String> {
        let unit_ids: BTreeSet<String> = self
            .units
            .split([';', '|'])
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .map(str::to_string)
            .collect();
        if unit_ids.is_empty() {
            return Err(format!("reservation {} names no units", self.id));
        }

        let start_date = parse_calendar_date(&self.start_date)
            .ok_or_else(|| format!("start_date '{}' is not a date", self.start_date))?;
        let end_date = parse_calendar_date(&self.end_date)
            .ok_or_else(|| format!("end_date '{}' is not a date", self.end_date))?;
        let status = ReservationStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown status '{}'", self.status))?;

        Ok(Reservation {
            id: self.id,
            unit_ids,
            start_date,
            end_date,
            status,
        })
    }
}

/// Reads reservation snapshots exported as `id,units,start_date,end_date,status`.
/// Units are separated by `;` or `|`.
pub struct ReservationCsvImporter;

impl ReservationCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Reservation>, ReservationImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Reservation>, ReservationImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut reservations = Vec::new();

        for (index, record) in csv_reader.deserialize::<ReservationRow>().enumerate() {
            let row = record?;
            // Line 1 is the header.
            let line = index as u64 + 2;
            let reservation = row
                .into_reservation()
                .map_err(|reason| ReservationImportError::InvalidRow { line, reason })?;
            reservations.push(reservation);
        }

        Ok(reservations)
    }
}
