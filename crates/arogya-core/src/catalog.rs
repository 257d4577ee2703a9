//! The facility catalog: a fixed, read-only collection of facility records
//! loaded from `config/facilities.yaml`.
//!
//! Consumers take a [`FacilityCatalog`] (or a facility slice) by reference;
//! nothing downstream reads the file, so a live data source could be swapped
//! in without touching the resolver or the map layer.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::facility::{Facility, FacilityKind};

/// Errors from loading or validating the facilities file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read facilities file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse facilities file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid facility data: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
struct FacilitiesFile {
    facilities: Vec<Facility>,
}

/// An immutable, in-memory facility collection. Identity is facility `id`.
#[derive(Debug, Clone)]
pub struct FacilityCatalog {
    facilities: Vec<Facility>,
}

impl FacilityCatalog {
    /// Builds a catalog from records already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] on empty or duplicate ids, or
    /// empty names.
    pub fn new(facilities: Vec<Facility>) -> Result<Self, CatalogError> {
        validate(&facilities)?;
        Ok(Self { facilities })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn all(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn hospitals(&self) -> impl Iterator<Item = &Facility> {
        self.facilities
            .iter()
            .filter(|f| f.kind() == FacilityKind::Hospital)
    }

    pub fn medical_stores(&self) -> impl Iterator<Item = &Facility> {
        self.facilities
            .iter()
            .filter(|f| f.kind() == FacilityKind::MedicalStore)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

/// Load and validate the facility catalog from a YAML file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_catalog(path: &Path) -> Result<FacilityCatalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: FacilitiesFile = serde_yaml::from_str(&content)?;
    FacilityCatalog::new(file.facilities)
}

fn validate(facilities: &[Facility]) -> Result<(), CatalogError> {
    let mut seen_ids = HashSet::new();

    for facility in facilities {
        if facility.id.trim().is_empty() {
            return Err(CatalogError::Validation(
                "facility id must be non-empty".to_string(),
            ));
        }

        if facility.name.trim().is_empty() {
            return Err(CatalogError::Validation(format!(
                "facility '{}' has an empty name",
                facility.id
            )));
        }

        if !seen_ids.insert(facility.id.as_str()) {
            return Err(CatalogError::Validation(format!(
                "duplicate facility id: '{}'",
                facility.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::{Coordinates, FacilityDetails};

    fn store(id: &str) -> Facility {
        Facility {
            id: id.to_string(),
            name: "Apollo Pharmacy".to_string(),
            address: "123 Main Road, Villupuram".to_string(),
            phone: "+919876543210".to_string(),
            distance_label: "1.2 km".to_string(),
            coordinates: Some(Coordinates::new(11.9516, 79.4850)),
            doctors: Vec::new(),
            details: FacilityDetails::MedicalStore {
                services: vec!["24/7 Pharmacy".to_string()],
            },
        }
    }

    fn hospital(id: &str) -> Facility {
        Facility {
            name: "Rural Community Health Centre".to_string(),
            details: FacilityDetails::Hospital {
                departments: vec!["General OPD".to_string()],
                emergency_hotline: None,
            },
            ..store(id)
        }
    }

    #[test]
    fn get_finds_facility_by_id() {
        let catalog = FacilityCatalog::new(vec![store("ms1"), hospital("h1")]).unwrap();
        assert_eq!(catalog.get("h1").unwrap().id, "h1");
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn kind_filters_partition_the_catalog() {
        let catalog =
            FacilityCatalog::new(vec![store("ms1"), store("ms2"), hospital("h1")]).unwrap();
        assert_eq!(catalog.medical_stores().count(), 2);
        assert_eq!(catalog.hospitals().count(), 1);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = FacilityCatalog::new(vec![store("ms1"), hospital("ms1")]).unwrap_err();
        assert!(err.to_string().contains("duplicate facility id"));
    }

    #[test]
    fn rejects_empty_id() {
        let err = FacilityCatalog::new(vec![store("  ")]).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn rejects_empty_name() {
        let mut bad = store("ms1");
        bad.name = String::new();
        let err = FacilityCatalog::new(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn load_catalog_from_seed_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("facilities.yaml");
        assert!(
            path.exists(),
            "facilities.yaml missing at {path:?} — required for this test"
        );
        let catalog = load_catalog(&path).expect("seed catalog should load");
        assert!(!catalog.is_empty());
        assert!(catalog.hospitals().count() > 0);
        assert!(catalog.medical_stores().count() > 0);
    }
}
