//! Map synchronization for the facility directory: keeps an imperative map
//! widget's marker set consistent with the current location and facility
//! list, without leaking markers or reinitializing the widget.

mod diff;
mod marker;
mod view;

pub use diff::{reconcile, MarkerPlan, MarkerUpdate};
pub use marker::{facility_popup, user_popup, Marker, MarkerIcon, MarkerId};
pub use view::{MapView, MapWidget, RenderState, DEFAULT_ZOOM, OSM_ATTRIBUTION, OSM_TILE_URL};
