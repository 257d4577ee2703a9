//! HTTP client for a Nominatim-style reverse-geocoding endpoint.
//!
//! Issues one `GET /reverse?format=json&lat={lat}&lon={lon}&addressdetails=1`
//! per lookup with a mandatory `User-Agent` (service usage policy) and picks
//! the most specific locality field out of the structured address. No retry
//! and no caching: every call re-queries the network.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use arogya_core::{AppConfig, Coordinates};

use crate::error::GeocodeError;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Client for a reverse-geocoding service.
///
/// Use [`GeocoderClient::from_config`] for production or
/// [`GeocoderClient::with_base_url`] to point at a mock server in tests.
pub struct GeocoderClient {
    client: Client,
    reverse_url: Url,
    email: Option<String>,
}

impl GeocoderClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: the reverse endpoint must resolve relative to the root
        // path, not replace the base URL's last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let reverse_url = Url::parse(&normalised)
            .and_then(|base| base.join("reverse"))
            .map_err(|e| GeocodeError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            reverse_url,
            email: None,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`GeocoderClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let client = Self::with_base_url(
            &config.geocoder_user_agent,
            config.geolocation_timeout_secs,
            &config.geocoder_base_url,
        )?;
        Ok(client.with_contact_email(config.geocoder_email.clone()))
    }

    /// Sets the contact address sent as the `email` query parameter.
    #[must_use]
    pub fn with_contact_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Resolves coordinates to the most specific human-readable area name
    /// the service knows.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GeocodeError::Api`] if the service reports an `error` field.
    /// - [`GeocodeError::Deserialize`] if the body does not match the
    ///   expected shape.
    /// - [`GeocodeError::Unparseable`] if no field yields a usable name.
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<String, GeocodeError> {
        let url = self.build_url(coordinates);
        let body = self.request_json(&url).await?;
        Self::check_api_error(&body)?;

        let response: ReverseResponse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse({coordinates})"),
                source: e,
            })?;

        area_name(&response).ok_or(GeocodeError::Unparseable)
    }

    /// Builds the reverse-lookup URL with percent-encoded query parameters.
    fn build_url(&self, coordinates: Coordinates) -> Url {
        let mut url = self.reverse_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("lat", &coordinates.latitude.to_string());
            pairs.append_pair("lon", &coordinates.longitude.to_string());
            pairs.append_pair("addressdetails", "1");
            if let Some(email) = &self.email {
                pairs.append_pair("email", email);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body
    /// as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Surfaces the service's in-band `error` field, which Nominatim emits
    /// either as a bare string or as a `{ code, message }` object.
    fn check_api_error(body: &serde_json::Value) -> Result<(), GeocodeError> {
        let Some(error) = body.get("error") else {
            return Ok(());
        };
        let msg = error
            .as_str()
            .map(ToString::to_string)
            .or_else(|| {
                error
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| error.to_string());
        Err(GeocodeError::Api(msg))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<AddressDetails>,
    #[serde(default)]
    display_name: Option<String>,
}

/// Structured address fields, all optional. Only the fields the name
/// selection consults are modeled; the rest of the payload is ignored.
#[derive(Debug, Default, Deserialize)]
struct AddressDetails {
    village: Option<String>,
    town: Option<String>,
    hamlet: Option<String>,
    locality: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    quarter: Option<String>,
    city: Option<String>,
    road: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

/// Picks the area name from a parsed response.
///
/// Priority: the most specific non-empty locality field
/// (village → town → hamlet → locality → neighbourhood → suburb → quarter →
/// city → road), then a county/state/country join, then the first
/// comma-delimited segment of `display_name`.
fn area_name(response: &ReverseResponse) -> Option<String> {
    if let Some(address) = &response.address {
        if let Some(name) = locality_field(address) {
            return Some(name.to_string());
        }

        let region: Vec<&str> = [&address.county, &address.state, &address.country]
            .into_iter()
            .filter_map(|f| non_empty(f))
            .collect();
        if !region.is_empty() {
            return Some(region.join(", "));
        }
    }

    response
        .display_name
        .as_deref()
        .and_then(|name| name.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn locality_field(address: &AddressDetails) -> Option<&str> {
    [
        &address.village,
        &address.town,
        &address.hamlet,
        &address.locality,
        &address.neighbourhood,
        &address.suburb,
        &address.quarter,
        &address.city,
        &address.road,
    ]
    .into_iter()
    .find_map(|f| non_empty(f))
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GeocoderClient {
        GeocoderClient::with_base_url("arogya-test/0.1", 30, base_url)
            .expect("client construction should not fail")
    }

    fn response_with_address(address: AddressDetails) -> ReverseResponse {
        ReverseResponse {
            address: Some(address),
            display_name: None,
        }
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://nominatim.openstreetmap.org");
        let url = client.build_url(Coordinates::new(11.9416, 79.495));
        assert_eq!(
            url.as_str(),
            "https://nominatim.openstreetmap.org/reverse?format=json&lat=11.9416&lon=79.495&addressdetails=1"
        );
    }

    #[test]
    fn build_url_appends_email_when_configured() {
        let client = test_client("https://nominatim.openstreetmap.org")
            .with_contact_email(Some("ops@example.org".to_string()));
        let url = client.build_url(Coordinates::new(0.0, 0.0));
        assert!(url.as_str().contains("email=ops%40example.org"));
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("http://localhost:9999/");
        let url = client.build_url(Coordinates::new(1.0, 2.0));
        assert!(url.as_str().starts_with("http://localhost:9999/reverse?"));
    }

    #[test]
    fn area_name_prefers_village_over_city() {
        let response = response_with_address(AddressDetails {
            village: Some("Keelperumpakkam".to_string()),
            city: Some("Villupuram".to_string()),
            ..AddressDetails::default()
        });
        assert_eq!(area_name(&response).unwrap(), "Keelperumpakkam");
    }

    #[test]
    fn area_name_priority_skips_empty_fields() {
        let response = response_with_address(AddressDetails {
            village: Some("   ".to_string()),
            town: None,
            suburb: Some("Anna Nagar".to_string()),
            ..AddressDetails::default()
        });
        assert_eq!(area_name(&response).unwrap(), "Anna Nagar");
    }

    #[test]
    fn area_name_falls_back_to_region_join() {
        let response = response_with_address(AddressDetails {
            county: Some("Villupuram".to_string()),
            state: Some("Tamil Nadu".to_string()),
            country: Some("India".to_string()),
            ..AddressDetails::default()
        });
        assert_eq!(area_name(&response).unwrap(), "Villupuram, Tamil Nadu, India");
    }

    #[test]
    fn area_name_falls_back_to_display_name_segment() {
        let response = ReverseResponse {
            address: None,
            display_name: Some("Villupuram, Tamil Nadu, 605602, India".to_string()),
        };
        assert_eq!(area_name(&response).unwrap(), "Villupuram");
    }

    #[test]
    fn area_name_empty_response_is_none() {
        assert!(area_name(&ReverseResponse::default()).is_none());
    }

    #[test]
    fn check_api_error_accepts_string_and_object_forms() {
        let string_form = serde_json::json!({ "error": "Unable to geocode" });
        let err = GeocoderClient::check_api_error(&string_form).unwrap_err();
        assert!(err.to_string().contains("Unable to geocode"));

        let object_form = serde_json::json!({ "error": { "code": 400, "message": "bad lat" } });
        let err = GeocoderClient::check_api_error(&object_form).unwrap_err();
        assert!(err.to_string().contains("bad lat"));

        let ok = serde_json::json!({ "display_name": "somewhere" });
        assert!(GeocoderClient::check_api_error(&ok).is_ok());
    }
}
