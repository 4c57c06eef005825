use super::domain::{Reservation, StayRange, Unit, UnitCatalog};
use serde::Serialize;

/// Eligibility of one unit for the requested stay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAvailability {
    pub unit_id: String,
    pub available: bool,
    /// Ids of the active reservations that overlap the stay.
    pub conflicts: Vec<String>,
}

pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// Whether no active reservation for `unit` overlaps `stay`.
    pub fn is_available(unit: &Unit, stay: &StayRange, reservations: &[Reservation]) -> bool {
        !reservations
            .iter()
            .any(|reservation| reservation.blocks(unit, stay))
    }

    /// Evaluate every catalog unit against one reservation snapshot, in catalog order.
    pub fn check_all(
        catalog: &UnitCatalog,
        stay: &StayRange,
        reservations: &[Reservation],
    ) -> Vec<UnitAvailability> {
        catalog
            .units()
            .iter()
            .map(|unit| {
                let conflicts: Vec<String> = reservations
                    .iter()
                    .filter(|reservation| reservation.blocks(unit, stay))
                    .map(|reservation| reservation.id.clone())
                    .collect();

                UnitAvailability {
                    unit_id: unit.slug.clone(),
                    available: conflicts.is_empty(),
                    conflicts,
                }
            })
            .collect()
    }

    pub fn available_units(
        catalog: &UnitCatalog,
        stay: &StayRange,
        reservations: &[Reservation],
    ) -> Vec<String> {
        Self::check_all(catalog, stay, reservations)
            .into_iter()
            .filter(|entry| entry.available)
            .map(|entry| entry.unit_id)
            .collect()
    }
}
