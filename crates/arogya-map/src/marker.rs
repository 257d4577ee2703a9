//! Marker model for the facility map.

use arogya_core::{Coordinates, Facility, FacilityKind};

/// Identity of a marker on the map: the single user marker, or one marker
/// per facility id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerId {
    User,
    Facility(String),
}

/// Visual style. Hospitals and medical stores get visually distinct pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    User,
    Hospital,
    MedicalStore,
}

impl From<FacilityKind> for MarkerIcon {
    fn from(kind: FacilityKind) -> Self {
        match kind {
            FacilityKind::Hospital => MarkerIcon::Hospital,
            FacilityKind::MedicalStore => MarkerIcon::MedicalStore,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Coordinates,
    pub icon: MarkerIcon,
    pub popup_html: String,
}

impl Marker {
    /// The user's own pin, labelled with the current location name.
    #[must_use]
    pub fn user(position: Coordinates, location_name: &str) -> Self {
        Self {
            id: MarkerId::User,
            position,
            icon: MarkerIcon::User,
            popup_html: user_popup(location_name),
        }
    }

    /// A facility pin. Returns `None` when the facility has no coordinates.
    #[must_use]
    pub fn for_facility(facility: &Facility) -> Option<Self> {
        let position = facility.coordinates?;
        Some(Self {
            id: MarkerId::Facility(facility.id.clone()),
            position,
            icon: MarkerIcon::from(facility.kind()),
            popup_html: facility_popup(facility),
        })
    }
}

/// Popup body for the user marker.
#[must_use]
pub fn user_popup(location_name: &str) -> String {
    let label = if location_name.trim().is_empty() {
        "Your Location"
    } else {
        location_name
    };
    escape_html(label)
}

/// Popup body for a facility marker: name, address, and a link to the
/// facility's detail view.
#[must_use]
pub fn facility_popup(facility: &Facility) -> String {
    format!(
        "<b>{}</b><br>{}<br/><a href=\"{}\">View Details</a>",
        escape_html(&facility.name),
        escape_html(&facility.address),
        facility.detail_path()
    )
}

/// Catalog names and addresses are trusted data, but they still end up
/// inside widget HTML, so the basic entities are escaped.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arogya_core::FacilityDetails;

    fn facility(id: &str, coordinates: Option<Coordinates>) -> Facility {
        Facility {
            id: id.to_string(),
            name: "Apollo Pharmacy".to_string(),
            address: "123 Main Road, Villupuram".to_string(),
            phone: "+919876543210".to_string(),
            distance_label: "1.2 km".to_string(),
            coordinates,
            doctors: Vec::new(),
            details: FacilityDetails::MedicalStore {
                services: Vec::new(),
            },
        }
    }

    #[test]
    fn for_facility_requires_coordinates() {
        assert!(Marker::for_facility(&facility("ms1", None)).is_none());
        let marker =
            Marker::for_facility(&facility("ms1", Some(Coordinates::new(11.95, 79.48)))).unwrap();
        assert_eq!(marker.id, MarkerId::Facility("ms1".to_string()));
        assert_eq!(marker.icon, MarkerIcon::MedicalStore);
    }

    #[test]
    fn facility_popup_links_to_detail_view() {
        let marker =
            Marker::for_facility(&facility("ms1", Some(Coordinates::new(11.95, 79.48)))).unwrap();
        assert!(marker.popup_html.contains("<b>Apollo Pharmacy</b>"));
        assert!(marker.popup_html.contains("href=\"/medical-stores/ms1\""));
    }

    #[test]
    fn popup_escapes_html_in_names() {
        let mut f = facility("ms1", Some(Coordinates::new(11.95, 79.48)));
        f.name = "A & B <Pharmacy>".to_string();
        let html = facility_popup(&f);
        assert!(html.contains("A &amp; B &lt;Pharmacy&gt;"));
    }

    #[test]
    fn user_popup_falls_back_to_generic_label() {
        assert_eq!(user_popup("  "), "Your Location");
        assert_eq!(user_popup("Villupuram"), "Villupuram");
    }
}
