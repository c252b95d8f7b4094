/// Top-level screen.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum View {
    /// Globe with the search panel. The globe idles with a slow spin.
    #[default]
    Home,
    /// Trip cards and price alerts.
    Trips,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Trips => "trips",
        }
    }

    pub fn auto_rotates(self) -> bool {
        matches!(self, View::Home)
    }
}

/// Tab shown inside [`View::Trips`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TripsTab {
    #[default]
    Trips,
    Alerts,
}
