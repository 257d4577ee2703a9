use crate::app_config::{AppConfig, Environment};
use crate::facility::Coordinates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<bool>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("AROGYA_ENV", "development"));
    let log_level = or_default("AROGYA_LOG_LEVEL", "info");
    let facilities_path = PathBuf::from(or_default(
        "AROGYA_FACILITIES_PATH",
        "./config/facilities.yaml",
    ));

    let default_location_name =
        or_default("AROGYA_DEFAULT_LOCATION_NAME", "Villupuram, Tamil Nadu");
    let default_coordinates = Coordinates::new(
        parse_f64("AROGYA_DEFAULT_LATITUDE", "11.9416")?,
        parse_f64("AROGYA_DEFAULT_LONGITUDE", "79.4950")?,
    );

    let geolocation_timeout_secs = parse_u64("AROGYA_GEOLOCATION_TIMEOUT_SECS", "10")?;
    let geolocation_high_accuracy = parse_bool("AROGYA_GEOLOCATION_HIGH_ACCURACY", "true")?;

    let geocoder_base_url = or_default(
        "AROGYA_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_user_agent =
        or_default("AROGYA_GEOCODER_USER_AGENT", "arogya/0.1 (facility-finder)");
    let geocoder_email = lookup("AROGYA_GEOCODER_EMAIL").ok();

    Ok(AppConfig {
        env,
        log_level,
        facilities_path,
        default_location_name,
        default_coordinates,
        geolocation_timeout_secs,
        geolocation_high_accuracy,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_email,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.default_location_name, "Villupuram, Tamil Nadu");
        assert!((cfg.default_coordinates.latitude - 11.9416).abs() < f64::EPSILON);
        assert!((cfg.default_coordinates.longitude - 79.4950).abs() < f64::EPSILON);
        assert_eq!(cfg.geolocation_timeout_secs, 10);
        assert!(cfg.geolocation_high_accuracy);
        assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(cfg.geocoder_user_agent, "arogya/0.1 (facility-finder)");
        assert!(cfg.geocoder_email.is_none());
    }

    #[test]
    fn build_app_config_default_location_override() {
        let mut map = HashMap::new();
        map.insert("AROGYA_DEFAULT_LOCATION_NAME", "Kolkata, West Bengal");
        map.insert("AROGYA_DEFAULT_LATITUDE", "22.5726");
        map.insert("AROGYA_DEFAULT_LONGITUDE", "88.3639");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.default_location_name, "Kolkata, West Bengal");
        assert!((cfg.default_coordinates.latitude - 22.5726).abs() < f64::EPSILON);
    }

    #[test]
    fn build_app_config_invalid_latitude() {
        let mut map = HashMap::new();
        map.insert("AROGYA_DEFAULT_LATITUDE", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AROGYA_DEFAULT_LATITUDE"),
            "expected InvalidEnvVar(AROGYA_DEFAULT_LATITUDE), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("AROGYA_GEOLOCATION_TIMEOUT_SECS", "ten");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AROGYA_GEOLOCATION_TIMEOUT_SECS"),
            "expected InvalidEnvVar(AROGYA_GEOLOCATION_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_invalid_high_accuracy_flag() {
        let mut map = HashMap::new();
        map.insert("AROGYA_GEOLOCATION_HIGH_ACCURACY", "yes");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AROGYA_GEOLOCATION_HIGH_ACCURACY"),
            "expected InvalidEnvVar(AROGYA_GEOLOCATION_HIGH_ACCURACY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_geocoder_overrides() {
        let mut map = HashMap::new();
        map.insert("AROGYA_GEOCODER_BASE_URL", "http://localhost:8080");
        map.insert("AROGYA_GEOCODER_USER_AGENT", "custom-agent/2.0");
        map.insert("AROGYA_GEOCODER_EMAIL", "ops@example.org");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geocoder_base_url, "http://localhost:8080");
        assert_eq!(cfg.geocoder_user_agent, "custom-agent/2.0");
        assert_eq!(cfg.geocoder_email.as_deref(), Some("ops@example.org"));
    }

    #[test]
    fn location_defaults_view_copies_name_and_coords() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let defaults = cfg.location_defaults();
        assert_eq!(defaults.name, cfg.default_location_name);
        assert_eq!(defaults.coordinates, cfg.default_coordinates);
    }

    #[test]
    fn geolocation_timeout_is_seconds() {
        let mut map = HashMap::new();
        map.insert("AROGYA_GEOLOCATION_TIMEOUT_SECS", "3");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geolocation_timeout(), std::time::Duration::from_secs(3));
    }
}
