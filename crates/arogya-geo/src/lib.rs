//! Location resolution for the facility directory: device position
//! acquisition behind a provider trait, reverse geocoding over HTTP, and the
//! state machine that always leaves callers with a usable location.

mod error;
mod geocode;
mod provider;
mod resolver;

pub use error::{GeocodeError, LocationErrorKind};
pub use geocode::GeocoderClient;
pub use provider::{GeolocationProvider, PositionError, PositionOptions};
pub use resolver::{LocationResolver, LocationSnapshot, LocationState, ResolvedLocation};
