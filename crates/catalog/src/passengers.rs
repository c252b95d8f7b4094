use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PassengerKind {
    Adults,
    Children,
    Infants,
}

/// Party size for a search or alert. At least one adult always travels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassengerCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for PassengerCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

impl PassengerCounts {
    /// Step one counter by `delta`, clamping adults to 1 and the rest to 0.
    pub fn adjust(&mut self, kind: PassengerKind, delta: i32) {
        let (slot, floor) = match kind {
            PassengerKind::Adults => (&mut self.adults, 1),
            PassengerKind::Children => (&mut self.children, 0),
            PassengerKind::Infants => (&mut self.infants, 0),
        };
        let next = (i64::from(*slot) + i64::from(delta)).max(floor);
        *slot = u32::try_from(next).unwrap_or(u32::MAX);
    }

    pub fn get(&self, kind: PassengerKind) -> u32 {
        match kind {
            PassengerKind::Adults => self.adults,
            PassengerKind::Children => self.children,
            PassengerKind::Infants => self.infants,
        }
    }

    /// Everyone, lap infants included.
    pub fn total(&self) -> u32 {
        self.seated().saturating_add(self.infants)
    }

    /// Passengers occupying a seat.
    pub fn seated(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::{PassengerCounts, PassengerKind};

    #[test]
    fn adults_never_drop_below_one() {
        let mut p = PassengerCounts::default();
        p.adjust(PassengerKind::Adults, -1);
        assert_eq!(p.adults, 1);
        p.adjust(PassengerKind::Adults, 2);
        assert_eq!(p.get(PassengerKind::Adults), 3);
    }

    #[test]
    fn children_and_infants_floor_at_zero() {
        let mut p = PassengerCounts::default();
        p.adjust(PassengerKind::Children, -3);
        p.adjust(PassengerKind::Infants, 1);
        p.adjust(PassengerKind::Children, 2);
        assert_eq!(p.children, 2);
        assert_eq!(p.infants, 1);
        assert_eq!(p.total(), 4);
        assert_eq!(p.seated(), 3);
    }

    #[test]
    fn huge_parties_saturate_instead_of_overflowing() {
        let mut p = PassengerCounts::default();
        for _ in 0..3 {
            p.adjust(PassengerKind::Adults, i32::MAX);
        }
        assert_eq!(p.adults, u32::MAX);
        p.adjust(PassengerKind::Children, 1);
        p.adjust(PassengerKind::Infants, 1);
        assert_eq!(p.seated(), u32::MAX);
        assert_eq!(p.total(), u32::MAX);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let p: PassengerCounts = serde_json::from_str(r#"{"children": 2}"#).unwrap();
        assert_eq!(p, PassengerCounts { adults: 1, children: 2, infants: 0 });
    }
}
