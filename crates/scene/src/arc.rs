//! Flight routes drawn as arcs lifted off the globe surface.
//!
//! A route is a quadratic Bézier between the two projected airports. The
//! control point sits above the chord midpoint, pushed out further for longer
//! chords so that long-haul routes rise higher than short hops.

use catalog::CityDirectory;
use foundation::math::{GeoPoint, QuadraticBezier, Vec3};

/// Radius of the rendered globe mesh.
pub const GLOBE_RADIUS: f64 = 5.0;

/// Radius markers and route endpoints are placed at, just above the mesh.
pub const SURFACE_RADIUS: f64 = 5.05;

/// Number of points in a sampled route, endpoints included.
pub const ARC_SAMPLES: usize = 51;

/// Extra control point height per unit of chord length.
pub const BULGE_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub points: Vec<Vec3>,
    pub control: Vec3,
}

impl ArcPath {
    pub fn start(&self) -> Vec3 {
        self.points.first().copied().unwrap_or(self.control)
    }

    pub fn end(&self) -> Vec3 {
        self.points.last().copied().unwrap_or(self.control)
    }

    /// Vertex buffer layout for line renderers.
    pub fn positions_f32(&self) -> Vec<[f32; 3]> {
        self.points.iter().map(|p| p.to_f32()).collect()
    }

    /// Greatest distance from the globe center along the sampled path.
    pub fn apex_radius(&self) -> f64 {
        self.points.iter().map(|p| p.length()).fold(0.0, f64::max)
    }
}

/// Build the arc from `origin` to `dest` with endpoints at `radius`.
pub fn build_arc(origin: GeoPoint, dest: GeoPoint, radius: f64) -> ArcPath {
    let start = origin.project(radius);
    let end = dest.project(radius);

    let mid = start.midpoint(end);
    let chord = start.distance(end);
    let lift = radius + chord * BULGE_FACTOR;

    let control = match mid.with_length(lift) {
        Some(control) => control,
        None => antipodal_lift(start, lift),
    };

    let curve = QuadraticBezier::new(start, control, end);
    ArcPath {
        points: curve.sample(ARC_SAMPLES - 1),
        control,
    }
}

/// Control point for endpoints on opposite sides of the globe.
///
/// The chord passes through the center so the midpoint has no direction.
/// Lift toward the north pole instead, perpendicular to the chord; for a
/// pole-to-pole route use +X.
fn antipodal_lift(start: Vec3, lift: f64) -> Vec3 {
    let toward_pole = start
        .normalized()
        .and_then(|axis| (Vec3::Y - axis * axis.dot(Vec3::Y)).with_length(lift));
    toward_pole.unwrap_or(Vec3::new(lift, 0.0, 0.0))
}

/// Arc between two codes known to `directory`, or `None` if either is missing.
pub fn route_between(
    directory: &CityDirectory,
    origin: &str,
    dest: &str,
    radius: f64,
) -> Option<ArcPath> {
    let Some(from) = directory.get(origin) else {
        tracing::debug!(code = origin, "no coordinates for route origin");
        return None;
    };
    let Some(to) = directory.get(dest) else {
        tracing::debug!(code = dest, "no coordinates for route destination");
        return None;
    };
    Some(build_arc(from, to, radius))
}

#[cfg(test)]
mod tests {
    use super::{ARC_SAMPLES, BULGE_FACTOR, SURFACE_RADIUS, build_arc, route_between};
    use catalog::CityDirectory;
    use foundation::math::{GeoPoint, project};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b} (eps={eps})");
    }

    #[test]
    fn frankfurt_to_new_york() {
        let fra = GeoPoint::new(50.03, 8.57);
        let jfk = GeoPoint::new(40.64, -73.77);
        let arc = build_arc(fra, jfk, SURFACE_RADIUS);

        assert_eq!(arc.points.len(), ARC_SAMPLES);
        assert_eq!(arc.start(), project(50.03, 8.57, SURFACE_RADIUS));
        assert_eq!(arc.end(), project(40.64, -73.77, SURFACE_RADIUS));

        let chord = arc.start().distance(arc.end());
        assert_close(arc.control.length(), SURFACE_RADIUS + chord * BULGE_FACTOR, 1e-9);
        // Every interior sample floats above the surface.
        for p in &arc.points[1..ARC_SAMPLES - 1] {
            assert!(p.length() > SURFACE_RADIUS);
        }
    }

    #[test]
    fn longer_routes_rise_higher() {
        let fra = GeoPoint::new(50.03, 8.57);
        let short = build_arc(fra, GeoPoint::new(52.36, 13.50), SURFACE_RADIUS);
        let medium = build_arc(fra, GeoPoint::new(40.64, -73.77), SURFACE_RADIUS);
        let long = build_arc(fra, GeoPoint::new(35.67, 139.65), SURFACE_RADIUS);

        assert!(short.control.length() < medium.control.length());
        assert!(medium.control.length() < long.control.length());
        assert!(short.apex_radius() < medium.apex_radius());
    }

    #[test]
    fn identical_endpoints_collapse_to_a_point() {
        let p = GeoPoint::new(25.25, 55.36);
        let arc = build_arc(p, p, SURFACE_RADIUS);
        let expected = p.project(SURFACE_RADIUS);

        assert_eq!(arc.points.len(), ARC_SAMPLES);
        for q in &arc.points {
            assert_close(q.distance(expected), 0.0, 1e-9);
        }
    }

    #[test]
    fn antipodal_endpoints_still_bulge_outward() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let arc = build_arc(a, b, SURFACE_RADIUS);

        assert!(arc.control.y > 0.0);
        assert_close(arc.control.length(), SURFACE_RADIUS * (1.0 + 2.0 * BULGE_FACTOR), 1e-9);
        assert!(arc.points[ARC_SAMPLES / 2].y > 0.0);
        for p in &arc.points {
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        }

        let poles = build_arc(GeoPoint::new(90.0, 0.0), GeoPoint::new(-90.0, 0.0), SURFACE_RADIUS);
        assert!(poles.control.x > 0.0);
    }

    #[test]
    fn unknown_codes_decline_quietly() {
        let dir = CityDirectory::builtin();
        assert!(route_between(&dir, "FRA", "JFK", SURFACE_RADIUS).is_some());
        assert!(route_between(&dir, "FRA", "XXX", SURFACE_RADIUS).is_none());
        assert!(route_between(&dir, "XXX", "JFK", SURFACE_RADIUS).is_none());
    }

    #[test]
    fn vertex_buffer_matches_samples() {
        let arc = build_arc(GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 10.0), 1.0);
        let verts = arc.positions_f32();
        assert_eq!(verts.len(), ARC_SAMPLES);
        assert_close(verts[0][0] as f64, 1.0, 1e-6);
        assert_close(verts[0][1] as f64, 0.0, 1e-6);
    }
}
