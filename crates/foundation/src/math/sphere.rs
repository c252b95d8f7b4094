//! Latitude/longitude to globe-space projection.
//!
//! The globe mesh is textured with an equirectangular image whose seam sits
//! at the antimeridian, so longitude is offset by 180 degrees and the x axis
//! is mirrored. Under that convention lat/lon 0/0 lands on +X and the north
//! pole on +Y. A different texture orientation needs a different formula.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate: lat {lat_deg}, lon {lon_deg}")]
    InvalidCoordinate { lat_deg: f64, lon_deg: f64 },
}

/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    pub lat_deg: f64,
    #[serde(rename = "lon")]
    pub lon_deg: f64,
}

impl GeoPoint {
    pub const fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// Range-checked constructor for values crossing a trust boundary.
    pub fn validated(lat_deg: f64, lon_deg: f64) -> Result<Self, GeoError> {
        let lat_ok = (-90.0..=90.0).contains(&lat_deg);
        let lon_ok = (-180.0..=180.0).contains(&lon_deg);
        if lat_ok && lon_ok {
            Ok(Self::new(lat_deg, lon_deg))
        } else {
            Err(GeoError::InvalidCoordinate { lat_deg, lon_deg })
        }
    }

    pub fn project(self, radius: f64) -> Vec3 {
        project(self.lat_deg, self.lon_deg, radius)
    }
}

/// Project a lat/lon (degrees) onto a sphere of `radius` centered at the origin.
///
/// No validation: NaN inputs produce NaN components.
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}
