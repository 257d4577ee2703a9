//! Pure marker reconciliation.
//!
//! Given the marker ids currently on the map and the next
//! (center, name, facilities) inputs, [`reconcile`] produces the exact
//! mutations to apply: the user marker is moved in place once it exists,
//! facility markers are fully rebuilt, and facilities without coordinates
//! are reported as skipped rather than failing the render. Keeping this a
//! pure function makes the marker lifecycle testable without a real widget.

use std::collections::HashSet;

use arogya_core::{Coordinates, Facility};

use crate::marker::{user_popup, Marker, MarkerId};

/// An in-place move of an existing marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerUpdate {
    pub id: MarkerId,
    pub position: Coordinates,
    pub popup_html: String,
}

/// Mutations to bring a marker set in sync with the next inputs.
///
/// Removals are applied before additions, so a facility that stays on the
/// map between updates never has two live markers at once.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MarkerPlan {
    pub additions: Vec<Marker>,
    pub updates: Vec<MarkerUpdate>,
    pub removals: Vec<MarkerId>,
    /// Ids of facilities omitted because they carry no coordinates.
    pub skipped: Vec<String>,
}

/// Computes the marker mutations for the next (center, name, facilities).
#[must_use]
pub fn reconcile(
    previous: &HashSet<MarkerId>,
    center: Coordinates,
    location_name: &str,
    facilities: &[Facility],
) -> MarkerPlan {
    let mut plan = MarkerPlan::default();

    if previous.contains(&MarkerId::User) {
        plan.updates.push(MarkerUpdate {
            id: MarkerId::User,
            position: center,
            popup_html: user_popup(location_name),
        });
    } else {
        plan.additions.push(Marker::user(center, location_name));
    }

    // Facility markers are rebuilt wholesale on every update: all existing
    // ones go, one comes back per facility that can be placed.
    plan.removals.extend(
        previous
            .iter()
            .filter(|id| matches!(id, MarkerId::Facility(_)))
            .cloned(),
    );

    let mut seen = HashSet::new();
    for facility in facilities {
        if !seen.insert(facility.id.as_str()) {
            continue;
        }
        match Marker::for_facility(facility) {
            Some(marker) => plan.additions.push(marker),
            None => plan.skipped.push(facility.id.clone()),
        }
    }

    plan
}
