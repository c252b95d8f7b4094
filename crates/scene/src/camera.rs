//! Orbit camera with animated fly-to.
//!
//! The camera always looks at the globe center. Its orientation is derived
//! from the position on every update and never animated on its own.

use std::f64::consts::TAU;

use foundation::math::{Easing, GeoPoint, Vec3};
use foundation::time::{Time, TimeSpan};
use runtime::frame::Frame;

/// Length of a fly-to animation.
pub const FLY_DURATION_S: f64 = 1.5;

/// Starting distance from the globe center.
pub const DEFAULT_DISTANCE: f64 = 15.0;

/// Zoom limits.
pub const MIN_DISTANCE: f64 = 7.0;
pub const MAX_DISTANCE: f64 = 30.0;

/// Idle spin rate in orbit-control units; 1.0 is one turn per minute.
pub const AUTO_ROTATE_SPEED: f64 = 0.5;

/// Vertical field of view.
pub const FOV_Y_DEG: f64 = 45.0;

/// Camera basis looking from `position` toward the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LookAt {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl LookAt {
    /// Basis for a camera at `eye` aimed at the origin with +Y as world up.
    ///
    /// Directly above a pole the world up is parallel to the view direction;
    /// +Z is used as the up hint there. `None` only for an eye at the origin.
    pub fn toward_origin(eye: Vec3) -> Option<Self> {
        let forward = (-eye).normalized()?;
        let right = forward
            .cross(Vec3::Y)
            .normalized()
            .or_else(|| forward.cross(Vec3::new(0.0, 0.0, 1.0)).normalized())?;
        let up = right.cross(forward);
        Some(Self { forward, right, up })
    }
}

/// Position interpolation from one point to another over a fixed window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyAnimation {
    pub from: Vec3,
    pub to: Vec3,
    pub span: TimeSpan,
    pub easing: Easing,
}

impl FlyAnimation {
    pub fn new(from: Vec3, to: Vec3, start: Time) -> Self {
        Self {
            from,
            to,
            span: TimeSpan::starting_at(start, FLY_DURATION_S),
            easing: Easing::CubicInOut,
        }
    }

    /// Interpolated position at `t`. Exactly `to` once the span has elapsed.
    pub fn position_at(&self, t: Time) -> Vec3 {
        if self.span.is_finished(t) {
            return self.to;
        }
        let eased = self.easing.apply(self.span.progress(t));
        self.from.lerp(self.to, eased)
    }

    pub fn is_finished(&self, t: Time) -> bool {
        self.span.is_finished(t)
    }
}

/// Plan a flight from `current` to above `target`, keeping the zoom level.
pub fn fly_to(current: Vec3, target: GeoPoint, now: Time) -> FlyAnimation {
    let to = target.project(current.length());
    FlyAnimation::new(current, to, now)
}

#[derive(Debug, Clone)]
pub struct CameraController {
    position: Vec3,
    look_at: LookAt,
    auto_rotate: bool,
    auto_rotate_speed: f64,
    fly: Option<FlyAnimation>,
    aspect: f64,
}

impl Default for CameraController {
    fn default() -> Self {
        let position = Vec3::new(0.0, 0.0, DEFAULT_DISTANCE);
        Self {
            position,
            look_at: LookAt {
                forward: Vec3::new(0.0, 0.0, -1.0),
                right: Vec3::new(1.0, 0.0, 0.0),
                up: Vec3::Y,
            },
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            fly: None,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn distance(&self) -> f64 {
        self.position.length()
    }

    pub fn look_at(&self) -> LookAt {
        self.look_at
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn set_aspect(&mut self, width: f64, height: f64) {
        self.aspect = width.max(1.0) / height.max(1.0);
    }

    pub fn fov_y_rad(&self) -> f64 {
        FOV_Y_DEG.to_radians()
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    pub fn flight(&self) -> Option<&FlyAnimation> {
        self.fly.as_ref()
    }

    pub fn is_flying(&self) -> bool {
        self.fly.is_some()
    }

    /// Start flying toward `target` and stop the idle spin.
    ///
    /// An in-flight animation is replaced; the new one starts wherever the
    /// old one had got to at `now`.
    pub fn fly_to(&mut self, target: GeoPoint, now: Time) -> FlyAnimation {
        let from = match &self.fly {
            Some(fly) => fly.position_at(now),
            None => self.position,
        };
        let animation = fly_to(from, target, now);
        tracing::debug!(
            lat = target.lat_deg,
            lon = target.lon_deg,
            distance = from.length(),
            "camera fly-to"
        );
        self.auto_rotate = false;
        self.fly = Some(animation);
        animation
    }

    /// Advance to `frame`: sample the flight if one is active, otherwise spin
    /// when auto-rotation is on. The view is re-aimed at the origin either way.
    pub fn update(&mut self, frame: Frame) {
        if let Some(fly) = self.fly {
            self.position = fly.position_at(frame.time);
            if fly.is_finished(frame.time) {
                self.fly = None;
            }
        } else if self.auto_rotate {
            let angle = self.auto_rotate_speed * TAU / 60.0 * frame.dt_s;
            self.position = rotate_about_y(self.position, -angle);
        }
        self.reorient();
    }

    /// Scale the orbit distance by `factor`, clamped to the zoom limits.
    pub fn zoom_by(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.set_distance(self.distance() * factor);
    }

    fn set_distance(&mut self, distance: f64) {
        let clamped = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        if let Some(position) = self.position.with_length(clamped) {
            self.position = position;
        }
    }

    fn reorient(&mut self) {
        if let Some(look_at) = LookAt::toward_origin(self.position) {
            self.look_at = look_at;
        }
    }
}

fn rotate_about_y(v: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
}
