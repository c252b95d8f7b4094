/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, dt_s: f64) -> Self {
        Time(self.0 + dt_s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn starting_at(start: Time, duration_s: f64) -> Self {
        Self {
            start,
            end: start.after(duration_s.max(0.0)),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized position of `t` inside the span, clamped to `[0, 1]`.
    ///
    /// A zero-length span is complete as soon as it starts.
    pub fn progress(&self, t: Time) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, t: Time) -> bool {
        t.0 >= self.end.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn progress_is_clamped() {
        let span = TimeSpan::starting_at(Time(2.0), 1.5);
        assert_eq!(span.progress(Time(0.0)), 0.0);
        assert_eq!(span.progress(Time(2.75)), 0.5);
        assert_eq!(span.progress(Time(10.0)), 1.0);
        assert!(!span.is_finished(Time(3.0)));
        assert!(span.is_finished(Time(3.5)));
    }

    #[test]
    fn zero_length_span_completes_immediately() {
        let span = TimeSpan::starting_at(Time(1.0), 0.0);
        assert_eq!(span.duration(), 0.0);
        assert_eq!(span.progress(Time(0.5)), 0.0);
        assert_eq!(span.progress(Time(1.0)), 1.0);
    }

    #[test]
    fn negative_duration_collapses_to_zero() {
        let span = TimeSpan::starting_at(Time(1.0), -3.0);
        assert_eq!(span.end, Time(1.0));
    }
}
