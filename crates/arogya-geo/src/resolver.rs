//! The location state machine.
//!
//! Owns the session's single mutable location record and guarantees that
//! every flow (detect, manual override, overlay re-detect) terminates in a
//! state with a usable name and `is_loading = false`. Overlapping flows are
//! serialized by outcome, not by execution: each flow takes a generation
//! token when it starts and only the newest token may commit, so a stale
//! position or geocode response can never overwrite fresher state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arogya_core::{Coordinates, LocationDefaults};

use crate::error::LocationErrorKind;
use crate::geocode::GeocoderClient;
use crate::provider::{GeolocationProvider, PositionOptions};

/// A terminal location value. `coordinates` is absent only when the value
/// was restored from a manual override that never had coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub error: Option<LocationErrorKind>,
}

/// Explicit resolver state. Illegal flag combinations of the
/// loading/error/manual booleans are unrepresentable here: `is_loading`
/// means exactly "the state is `Detecting`".
#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    /// Nothing requested yet.
    Uninitialized,
    /// A detect flow is outstanding. `previous` carries the last known good
    /// value so the UI never flashes to empty mid-refresh.
    Detecting { previous: Option<ResolvedLocation> },
    /// A detect flow finished (successfully or with a classified error).
    Resolved(ResolvedLocation),
    /// The user chose a location by hand; geolocation was bypassed.
    ManuallySet {
        name: String,
        coordinates: Option<Coordinates>,
    },
}

/// Read view over [`LocationState`] for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSnapshot {
    pub name: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub is_loading: bool,
    pub error: Option<LocationErrorKind>,
    pub manually_set: bool,
}

/// Best-effort location resolution over a [`GeolocationProvider`] and a
/// [`GeocoderClient`].
///
/// Cheap to clone; clones share state, which is what lets a second
/// `refresh()` overlap a first one the way UI event handlers do. The
/// generation counter makes that overlap safe (see module docs).
pub struct LocationResolver<P> {
    provider: Arc<P>,
    geocoder: Arc<GeocoderClient>,
    defaults: LocationDefaults,
    options: PositionOptions,
    state: Arc<Mutex<LocationState>>,
    generation: Arc<AtomicU64>,
}

impl<P> Clone for LocationResolver<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            geocoder: Arc::clone(&self.geocoder),
            defaults: self.defaults.clone(),
            options: self.options,
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<P: GeolocationProvider> LocationResolver<P> {
    #[must_use]
    pub fn new(
        provider: P,
        geocoder: GeocoderClient,
        defaults: LocationDefaults,
        options: PositionOptions,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            geocoder: Arc::new(geocoder),
            defaults,
            options,
            state: Arc::new(Mutex::new(LocationState::Uninitialized)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// On-mount rule: detect only if no location was ever set. A resolver
    /// that already holds a resolved or manual value is left alone.
    pub async fn initialize(&self) {
        let fresh = matches!(*self.lock(), LocationState::Uninitialized);
        if fresh {
            self.refresh().await;
        }
    }

    /// Re-enters `Detecting` from any state and runs the full detect flow:
    /// position fix, then reverse geocode. The previously resolved
    /// name/coordinates stay visible until the new value commits.
    ///
    /// On position failure the resolver falls back to the configured
    /// defaults; on geocode failure it keeps the real coordinates under a
    /// synthetic `Area @ lat, lon` label.
    pub async fn refresh(&self) {
        let token = self.begin_detecting();
        let outcome = self.detect().await;
        let resolved = match outcome {
            Ok(resolved) => resolved,
            Err(kind) => ResolvedLocation {
                name: self.defaults.name.clone(),
                coordinates: Some(self.defaults.coordinates),
                error: Some(kind),
            },
        };
        self.commit(token, resolved);
    }

    /// Like [`refresh`](Self::refresh), but for modal-driven flows: returns
    /// the resolved name to the caller, and a position failure degrades to
    /// the last known good value instead of the global default. The default
    /// is used only if there was never a previous value.
    pub async fn detect_for_overlay(&self) -> String {
        let token = self.begin_detecting();
        let outcome = self.detect().await;
        let resolved = match outcome {
            Ok(resolved) => resolved,
            Err(kind) => {
                let previous = match &*self.lock() {
                    LocationState::Detecting { previous } => previous.clone(),
                    // Another flow already committed; treat its value as
                    // the one to preserve.
                    other => last_known(other),
                };
                match previous {
                    Some(mut last) => {
                        last.error = Some(kind);
                        last
                    }
                    None => ResolvedLocation {
                        name: self.defaults.name.clone(),
                        coordinates: Some(self.defaults.coordinates),
                        error: Some(kind),
                    },
                }
            }
        };
        let name = resolved.name.clone();
        self.commit(token, resolved);
        name
    }

    /// Immediate synchronous transition to `ManuallySet`. Omitted
    /// coordinates stay absent; callers must treat map display as
    /// unavailable until the location is redetected. Supersedes any
    /// in-flight detect flow.
    pub fn set_manual(&self, name: impl Into<String>, coordinates: Option<Coordinates>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.lock() = LocationState::ManuallySet {
            name: name.into(),
            coordinates,
        };
    }

    /// Current state as a flat read view.
    #[must_use]
    pub fn snapshot(&self) -> LocationSnapshot {
        match &*self.lock() {
            LocationState::Uninitialized => LocationSnapshot {
                name: None,
                coordinates: None,
                is_loading: false,
                error: None,
                manually_set: false,
            },
            LocationState::Detecting { previous } => LocationSnapshot {
                name: previous.as_ref().map(|p| p.name.clone()),
                coordinates: previous.as_ref().and_then(|p| p.coordinates),
                is_loading: true,
                error: None,
                manually_set: false,
            },
            LocationState::Resolved(resolved) => LocationSnapshot {
                name: Some(resolved.name.clone()),
                coordinates: resolved.coordinates,
                is_loading: false,
                error: resolved.error,
                manually_set: false,
            },
            LocationState::ManuallySet { name, coordinates } => LocationSnapshot {
                name: Some(name.clone()),
                coordinates: *coordinates,
                is_loading: false,
                error: None,
                manually_set: true,
            },
        }
    }

    /// Acquires the position and reverse-geocodes it. `Err` carries only
    /// position-acquisition failures; geocode failures are folded into an
    /// `Ok` value with a synthetic label, because by then real coordinates
    /// exist and must not be discarded.
    async fn detect(&self) -> Result<ResolvedLocation, LocationErrorKind> {
        let position = tokio::time::timeout(
            self.options.timeout,
            self.provider.current_position(&self.options),
        )
        .await;

        let coordinates = match position {
            Err(_elapsed) => {
                tracing::warn!(timeout = ?self.options.timeout, "position request timed out");
                return Err(LocationErrorKind::Timeout);
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "position request failed");
                return Err(LocationErrorKind::from(&err));
            }
            Ok(Ok(coordinates)) => coordinates,
        };

        match self.geocoder.reverse(coordinates).await {
            Ok(name) => Ok(ResolvedLocation {
                name,
                coordinates: Some(coordinates),
                error: None,
            }),
            Err(err) => {
                tracing::warn!(error = %err, %coordinates, "reverse geocoding failed");
                Ok(ResolvedLocation {
                    name: synthetic_area_label(coordinates),
                    coordinates: Some(coordinates),
                    error: Some(LocationErrorKind::from(&err)),
                })
            }
        }
    }

    /// Starts a new flow: snapshots the last known good value into
    /// `Detecting` and takes a fresh generation token.
    fn begin_detecting(&self) -> u64 {
        let mut state = self.lock();
        let previous = last_known(&state);
        *state = LocationState::Detecting { previous };
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commits a terminal value, unless a newer flow or a manual override
    /// has taken a later generation in the meantime.
    fn commit(&self, token: u64, resolved: ResolvedLocation) {
        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) == token {
            *state = LocationState::Resolved(resolved);
        } else {
            tracing::debug!(token, "discarding superseded location result");
        }
    }

    fn lock(&self) -> MutexGuard<'_, LocationState> {
        // Never held across an await; recover the data on poison.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The last usable (name, coordinates) pair carried by a state, with any
/// stale error cleared.
fn last_known(state: &LocationState) -> Option<ResolvedLocation> {
    match state {
        LocationState::Uninitialized => None,
        LocationState::Detecting { previous } => previous.clone(),
        LocationState::Resolved(resolved) => Some(ResolvedLocation {
            error: None,
            ..resolved.clone()
        }),
        LocationState::ManuallySet { name, coordinates } => Some(ResolvedLocation {
            name: name.clone(),
            coordinates: *coordinates,
            error: None,
        }),
    }
}

/// Label shown when coordinates are known but no area name could be fetched.
fn synthetic_area_label(coordinates: Coordinates) -> String {
    format!("Area @ {coordinates}")
}
