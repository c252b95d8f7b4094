/// Time-to-progress curves for animations. Input and output are in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Accelerate through the first half, decelerate through the second.
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => ease_in_out_cubic(t),
        }
    }
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
