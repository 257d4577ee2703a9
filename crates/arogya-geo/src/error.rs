use thiserror::Error;

use crate::provider::PositionError;

/// Errors from the reverse-geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// non-2xx statuses and the request timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The geocoding service returned an `error` field in its JSON body.
    #[error("geocoding API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed, but held no usable area name at all.
    #[error("geocoding response had no usable area name")]
    Unparseable,
}

/// Classification of a location-resolution failure, surfaced to callers
/// alongside the (always usable) resolved name and coordinates.
///
/// Every variant is non-fatal: the resolver ends in a terminal state with a
/// name and `is_loading = false` regardless of which of these occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    GeolocationUnsupported,
    GeocodingFailed,
    GeocodingUnparseable,
    Other,
}

impl LocationErrorKind {
    /// Stable machine-readable tag for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            LocationErrorKind::PermissionDenied => "permission-denied",
            LocationErrorKind::PositionUnavailable => "position-unavailable",
            LocationErrorKind::Timeout => "timeout",
            LocationErrorKind::GeolocationUnsupported => "geolocation-unsupported",
            LocationErrorKind::GeocodingFailed => "geocoding-failed",
            LocationErrorKind::GeocodingUnparseable => "geocoding-unparseable",
            LocationErrorKind::Other => "other",
        }
    }

    /// Human-readable message for display next to the location header.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            LocationErrorKind::PermissionDenied => "Location access was denied.",
            LocationErrorKind::PositionUnavailable => "Could not determine your position.",
            LocationErrorKind::Timeout => "Location request timed out.",
            LocationErrorKind::GeolocationUnsupported => {
                "Geolocation is not supported on this device."
            }
            LocationErrorKind::GeocodingFailed | LocationErrorKind::GeocodingUnparseable => {
                "Could not fetch area name."
            }
            LocationErrorKind::Other => "Could not detect location.",
        }
    }
}

impl std::fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&PositionError> for LocationErrorKind {
    fn from(err: &PositionError) -> Self {
        match err {
            PositionError::PermissionDenied => LocationErrorKind::PermissionDenied,
            PositionError::Unavailable => LocationErrorKind::PositionUnavailable,
            PositionError::Timeout => LocationErrorKind::Timeout,
            PositionError::Unsupported => LocationErrorKind::GeolocationUnsupported,
            PositionError::Other(_) => LocationErrorKind::Other,
        }
    }
}

impl From<&GeocodeError> for LocationErrorKind {
    fn from(err: &GeocodeError) -> Self {
        match err {
            GeocodeError::Unparseable => LocationErrorKind::GeocodingUnparseable,
            GeocodeError::Http(_) | GeocodeError::Api(_) | GeocodeError::Deserialize { .. } => {
                LocationErrorKind::GeocodingFailed
            }
        }
    }
}
