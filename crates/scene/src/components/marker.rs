use foundation::math::Vec3;

/// Radius of the sphere drawn (and picked) for each trip marker.
pub const MARKER_RADIUS: f64 = 0.12;

/// Clickable pin on the globe, tagged with the trip it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub key: String,
    pub radius: f64,
}

impl Marker {
    pub fn new(position: Vec3, key: impl Into<String>) -> Self {
        Self {
            position,
            key: key.into(),
            radius: MARKER_RADIUS,
        }
    }
}
