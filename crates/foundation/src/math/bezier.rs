use super::Vec3;

/// Quadratic Bézier curve in 3D.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl QuadraticBezier {
    pub fn new(start: Vec3, control: Vec3, end: Vec3) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Vec3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Evaluate at `divisions + 1` evenly spaced parameters, endpoints included.
    ///
    /// The first and last samples are the exact `start` and `end` points.
    pub fn sample(&self, divisions: usize) -> Vec<Vec3> {
        if divisions == 0 {
            return vec![self.start];
        }
        let mut points = Vec::with_capacity(divisions + 1);
        points.push(self.start);
        for i in 1..divisions {
            points.push(self.point_at(i as f64 / divisions as f64));
        }
        points.push(self.end);
        points
    }
}
