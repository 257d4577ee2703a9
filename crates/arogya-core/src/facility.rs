//! Domain types for the facility directory.
//!
//! A [`Facility`] is either a hospital or a medical store; the fields that
//! only make sense for one kind live in [`FacilityDetails`], so a hospital
//! hotline can never appear on a pharmacy record.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair. Value type, no identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A doctor attached to a facility. `timings` is a free-text schedule
/// string, e.g. `"Mon-Fri: 9 AM - 5 PM"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub timings: String,
}

/// The two kinds of facility in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacilityKind {
    Hospital,
    MedicalStore,
}

impl std::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityKind::Hospital => write!(f, "hospital"),
            FacilityKind::MedicalStore => write!(f, "medical-store"),
        }
    }
}

/// Kind-specific facility fields, tagged by `type` in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FacilityDetails {
    Hospital {
        #[serde(default)]
        departments: Vec<String>,
        #[serde(default)]
        emergency_hotline: Option<String>,
    },
    MedicalStore {
        #[serde(default)]
        services: Vec<String>,
    },
}

/// An immutable facility record from the catalog. Identity is `id`.
///
/// `coordinates` is optional: facilities without one are still listed but
/// cannot be placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Human-readable distance label, e.g. `"1.2 km"`.
    pub distance_label: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(flatten)]
    pub details: FacilityDetails,
}

impl Facility {
    /// The kind tag, derived from the detail variant.
    #[must_use]
    pub fn kind(&self) -> FacilityKind {
        match self.details {
            FacilityDetails::Hospital { .. } => FacilityKind::Hospital,
            FacilityDetails::MedicalStore { .. } => FacilityKind::MedicalStore,
        }
    }

    /// Path to this facility's detail view, used in map popups.
    #[must_use]
    pub fn detail_path(&self) -> String {
        match self.kind() {
            FacilityKind::Hospital => format!("/hospitals/{}", self.id),
            FacilityKind::MedicalStore => format!("/medical-stores/{}", self.id),
        }
    }
}
