use super::domain::{ChildDetail, GuestComposition};
use serde::Serialize;

/// Bed and tax requirements derived from a party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCapacity {
    pub total_guests: u32,
    pub effective_guest_count: u32,
    pub sleeping_with_parents: u32,
    /// Children in a crib who are not also counted in `sleeping_with_parents`.
    /// Lower than the raw number of crib flags when a child carries both.
    pub sleeping_in_cribs: u32,
    pub taxable_guests: u32,
}

impl GuestCapacity {
    /// A child sharing a parent's bed needs no bed slot; a crib counts only
    /// for children not already sharing, so nobody is subtracted twice.
    pub fn resolve(guests: &GuestComposition) -> Self {
        let children = count(guests.children.len());
        let sleeping_with_parents = count(
            guests
                .children
                .iter()
                .filter(|child| child.sleeps_with_parents)
                .count(),
        );
        let sleeping_in_cribs = count(
            guests
                .children
                .iter()
                .filter(|child| child.sleeps_in_crib && !child.sleeps_with_parents)
                .count(),
        );
        let taxed_children = count(
            guests
                .children
                .iter()
                .filter(|child| !child.is_under12)
                .count(),
        );

        let total_guests = guests.adults.saturating_add(children);

        Self {
            total_guests,
            effective_guest_count: total_guests
                .saturating_sub(sleeping_with_parents)
                .saturating_sub(sleeping_in_cribs),
            sleeping_with_parents,
            sleeping_in_cribs,
            taxable_guests: guests.adults.saturating_add(taxed_children),
        }
    }

    pub fn fits_in(&self, beds: u32) -> bool {
        beds >= self.effective_guest_count
    }
}

fn count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Resize the per-child details to `new_count`, padding with defaults.
pub fn reconcile_children(children: &[ChildDetail], new_count: usize) -> Vec<ChildDetail> {
    let mut reconciled: Vec<ChildDetail> = children.iter().take(new_count).copied().collect();
    reconciled.resize(new_count, ChildDetail::default());
    reconciled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(is_under12: bool, sleeps_with_parents: bool, sleeps_in_crib: bool) -> ChildDetail {
        ChildDetail {
            is_under12,
            sleeps_with_parents,
            sleeps_in_crib,
        }
    }

    #[test]
    fn child_sharing_parents_bed_is_neither_bedded_nor_taxed() {
        let guests = GuestComposition {
            adults: 2,
            children: vec![child(true, true, false)],
        };

        let capacity = GuestCapacity::resolve(&guests);

        assert_eq!(capacity.total_guests, 3);
        assert_eq!(capacity.effective_guest_count, 2);
        assert_eq!(capacity.taxable_guests, 2);
        assert_eq!(capacity.sleeping_with_parents, 1);
        assert_eq!(capacity.sleeping_in_cribs, 0);
    }

    #[test]
    fn teenager_in_a_crib_still_pays_tax() {
        let guests = GuestComposition {
            adults: 1,
            children: vec![child(false, false, true), child(false, false, false)],
        };

        let capacity = GuestCapacity::resolve(&guests);

        assert_eq!(capacity.effective_guest_count, 2);
        assert_eq!(capacity.taxable_guests, 3);
    }

    #[test]
    fn effective_count_matches_formula_and_never_goes_negative() {
        let guests = GuestComposition {
            adults: 0,
            children: vec![child(true, true, true), child(true, false, true)],
        };

        let capacity = GuestCapacity::resolve(&guests);

        // Two crib flags, but the first child is already sharing a bed.
        assert_eq!(capacity.sleeping_in_cribs, 1);
        assert_eq!(
            capacity.effective_guest_count,
            guests.adults + 2 - capacity.sleeping_with_parents - capacity.sleeping_in_cribs
        );
        assert_eq!(capacity.effective_guest_count, 0);
        assert!(capacity.fits_in(0));
    }

    #[test]
    fn reconcile_pads_and_truncates_without_touching_input() {
        let original = vec![child(true, true, false), child(false, false, false)];

        let grown = reconcile_children(&original, 4);
        assert_eq!(grown.len(), 4);
        assert_eq!(grown[0], original[0]);
        assert_eq!(grown[3], ChildDetail::default());

        let shrunk = reconcile_children(&original, 1);
        assert_eq!(shrunk, vec![original[0]]);
        assert_eq!(original.len(), 2);
    }
}
