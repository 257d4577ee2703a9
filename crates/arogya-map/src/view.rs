//! The map view lifecycle: an owned, scoped resource around an imperative
//! map widget.
//!
//! The widget is initialised once (tile layer + first `set_view`) when a
//! center first becomes available; every later update mutates markers in
//! place via a [`MarkerPlan`]. Dropping the view removes every marker it
//! added, so a dismounted map never leaks pins into a reused widget.

use std::collections::HashSet;

use arogya_core::{Coordinates, Facility};

use crate::diff::reconcile;
use crate::marker::{Marker, MarkerId};

/// OpenStreetMap base tile layer.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Street-level default, matching the directory's town-scale use.
pub const DEFAULT_ZOOM: u8 = 13;

/// Imperative surface of a third-party map widget. The real implementation
/// binds to the embedding shell's mapping library; tests use a recording
/// fake.
pub trait MapWidget {
    fn add_tile_layer(&mut self, url: &str, attribution: &str);
    fn set_view(&mut self, center: Coordinates, zoom: u8);
    fn add_marker(&mut self, marker: &Marker);
    fn move_marker(&mut self, id: &MarkerId, position: Coordinates, popup_html: &str);
    fn remove_marker(&mut self, id: &MarkerId);
}

/// What the caller should render after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No center coordinate yet: show the "detecting location" placeholder
    /// instead of an empty map. The widget has not been touched.
    Placeholder,
    /// The map is live and its markers match the inputs.
    Live,
}

/// A mounted map view owning its widget and marker registry.
pub struct MapView<W: MapWidget> {
    widget: W,
    zoom: u8,
    initialized: bool,
    markers: HashSet<MarkerId>,
}

impl<W: MapWidget> MapView<W> {
    #[must_use]
    pub fn new(widget: W) -> Self {
        Self::with_zoom(widget, DEFAULT_ZOOM)
    }

    #[must_use]
    pub fn with_zoom(widget: W, zoom: u8) -> Self {
        Self {
            widget,
            zoom,
            initialized: false,
            markers: HashSet::new(),
        }
    }

    /// Synchronizes the widget with the current location and facility list.
    ///
    /// Stale facility markers are removed before their replacements are
    /// added; the user marker is moved in place. Facilities without
    /// coordinates are logged and omitted, never an error.
    pub fn update(
        &mut self,
        center: Option<Coordinates>,
        location_name: &str,
        facilities: &[Facility],
    ) -> RenderState {
        let Some(center) = center else {
            return RenderState::Placeholder;
        };

        if !self.initialized {
            self.widget.add_tile_layer(OSM_TILE_URL, OSM_ATTRIBUTION);
            self.initialized = true;
        }
        self.widget.set_view(center, self.zoom);

        let plan = reconcile(&self.markers, center, location_name, facilities);

        for id in &plan.removals {
            self.widget.remove_marker(id);
            self.markers.remove(id);
        }
        for update in &plan.updates {
            self.widget
                .move_marker(&update.id, update.position, &update.popup_html);
        }
        for marker in &plan.additions {
            self.widget.add_marker(marker);
            self.markers.insert(marker.id.clone());
        }
        for facility_id in &plan.skipped {
            tracing::warn!(
                facility_id = %facility_id,
                "facility has no coordinates; omitting from map"
            );
        }

        RenderState::Live
    }

    /// Number of markers currently owned by this view.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl<W: MapWidget> Drop for MapView<W> {
    fn drop(&mut self) {
        for id in self.markers.drain() {
            self.widget.remove_marker(&id);
        }
    }
}
