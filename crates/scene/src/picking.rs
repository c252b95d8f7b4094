use foundation::math::Vec3;

use crate::World;
use crate::camera::CameraController;
use crate::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Ray through a point on the screen, in normalized device coordinates.
    ///
    /// `ndc` is `[-1, 1]` on both axes with +Y up. `None` if the camera has
    /// no usable orientation.
    pub fn from_camera(camera: &CameraController, ndc: [f64; 2]) -> Option<Self> {
        let basis = camera.look_at();
        let half_h = (camera.fov_y_rad() * 0.5).tan();
        let half_w = half_h * camera.aspect();
        let dir = basis.forward + basis.right * (ndc[0] * half_w) + basis.up * (ndc[1] * half_h);
        Some(Self::new(camera.position(), dir.normalized()?))
    }

    /// Convert a pixel position (origin top-left) to a camera ray.
    pub fn from_screen(
        camera: &CameraController,
        x_px: f64,
        y_px: f64,
        width_px: f64,
        height_px: f64,
    ) -> Option<Self> {
        if width_px <= 0.0 || height_px <= 0.0 {
            return None;
        }
        let ndc = [
            (x_px / width_px) * 2.0 - 1.0,
            1.0 - (y_px / height_px) * 2.0,
        ];
        Self::from_camera(camera, ndc)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub key: String,
    pub distance: f64,
    pub point: Vec3,
}

/// Nearest marker sphere hit by `ray`.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - On equal distance the lower `EntityId::index()` wins.
///
/// Hits behind the ray origin are ignored; a ray starting inside a marker
/// hits it at distance 0.
pub fn pick_marker(world: &World, ray: Ray) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;

    let mut best: Option<(f64, EntityId, &str)> = None;
    for (entity, marker) in world.markers() {
        let Some(t) = ray_sphere_hit_t(ray.origin, dir, marker.position, marker.radius) else {
            continue;
        };
        best = match best {
            Some((bt, be, bk)) => {
                let ord = t.total_cmp(&bt).then_with(|| entity.index().cmp(&be.index()));
                if ord.is_lt() {
                    Some((t, entity, marker.key.as_str()))
                } else {
                    Some((bt, be, bk))
                }
            }
            None => Some((t, entity, marker.key.as_str())),
        };
    }

    let (t, entity, key) = best?;
    Some(PickHit {
        entity,
        key: key.to_string(),
        distance: t,
        point: ray.origin + dir * t,
    })
}

/// Entry distance of a unit-direction ray into a sphere.
fn ray_sphere_hit_t(origin: Vec3, dir: Vec3, center: Vec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let near = -b - sqrt;
    let far = -b + sqrt;
    if far < 0.0 {
        return None;
    }
    Some(near.max(0.0))
}
