//! Seam between the resolver and the device's positioning capability.
//!
//! The real implementation lives in whatever shell embeds this crate (a
//! browser runtime, a mobile bridge); tests use hand-rolled fakes. The
//! resolver only ever talks to the trait.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use arogya_core::Coordinates;

/// Options passed to a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Upper bound on the whole acquisition. The resolver also enforces
    /// this bound externally, so a provider that ignores it cannot wedge
    /// the state machine.
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            high_accuracy: true,
        }
    }
}

/// Classified failure from a position request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location permission was denied")]
    PermissionDenied,

    #[error("position is unavailable")]
    Unavailable,

    #[error("position request timed out")]
    Timeout,

    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("geolocation failed: {0}")]
    Other(String),
}

impl PositionError {
    /// Maps the device geolocation API's numeric error codes
    /// (1 = permission denied, 2 = position unavailable, 3 = timeout).
    /// Unknown codes carry the device message through as [`Self::Other`].
    #[must_use]
    pub fn from_code(code: i32, message: &str) -> Self {
        match code {
            1 => PositionError::PermissionDenied,
            2 => PositionError::Unavailable,
            3 => PositionError::Timeout,
            _ => PositionError::Other(format!("code {code}: {message}")),
        }
    }
}

/// A source of device coordinates.
pub trait GeolocationProvider: Send + Sync {
    /// Requests the device's current position, bounded by
    /// `options.timeout`.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, PositionError>> + Send;
}
