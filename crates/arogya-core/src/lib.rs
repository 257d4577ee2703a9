//! Shared domain types, facility catalog, and configuration for the Arogya
//! healthcare-facility directory.

mod app_config;
mod catalog;
mod config;
mod facility;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, LocationDefaults};
pub use catalog::{load_catalog, CatalogError, FacilityCatalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{Coordinates, Doctor, Facility, FacilityDetails, FacilityKind};

/// Errors from loading or validating application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
