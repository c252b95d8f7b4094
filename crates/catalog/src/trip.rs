use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub title: String,
    pub desc: String,
}

/// A planned trip pinned on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Free-form label shown on the card, e.g. `"MAY 2025"`.
    #[serde(rename = "date", default)]
    pub date_label: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(rename = "img", default)]
    pub image_url: String,
    #[serde(default)]
    pub itinerary: Vec<ItineraryItem>,
}

impl Trip {
    /// Trip booked from a search result: an outbound leg and a planning note.
    #[allow(clippy::too_many_arguments)]
    pub fn from_booking(
        id: impl Into<String>,
        dest: &str,
        origin: Option<&str>,
        airline: &str,
        price: &str,
        location: GeoPoint,
        date_label: impl Into<String>,
        image_seed: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: dest.to_string(),
            origin: origin.map(str::to_string),
            date_label: date_label.into(),
            location,
            image_url: format!("https://loremflickr.com/800/600/city,{dest}?lock={image_seed}"),
            itinerary: vec![
                ItineraryItem {
                    title: "Outbound flight".to_string(),
                    desc: format!("{airline} • {price}"),
                },
                ItineraryItem {
                    title: "Planning".to_string(),
                    desc: "Hotel research in progress".to_string(),
                },
            ],
        }
    }
}
