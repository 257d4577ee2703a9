use std::path::PathBuf;
use std::time::Duration;

use crate::facility::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// The fallback location handed to the resolver when detection fails and
/// there is no last known good value. Injected, never compiled in, so tests
/// and deployments for other districts can override it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDefaults {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub facilities_path: PathBuf,
    pub default_location_name: String,
    pub default_coordinates: Coordinates,
    pub geolocation_timeout_secs: u64,
    pub geolocation_high_accuracy: bool,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    /// Contact address sent to the geocoding service as the `email` query
    /// parameter, per its usage policy. Optional.
    pub geocoder_email: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn location_defaults(&self) -> LocationDefaults {
        LocationDefaults {
            name: self.default_location_name.clone(),
            coordinates: self.default_coordinates,
        }
    }

    #[must_use]
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}
