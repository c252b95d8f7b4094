use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Days of history generated for a new alert, today included.
pub const MOCK_HISTORY_DAYS: u64 = 15;

/// Parse a display price such as `"€1,024"`, `"420€"` or `"1,234.56"`.
///
/// Currency symbols, whitespace and thousands separators are dropped.
/// Returns `None` for anything that is not a finite number afterwards.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PriceTrend {
    Down,
    Up,
    Flat,
}

impl PriceTrend {
    /// Direction of the latest move; `None` until there are two points.
    pub fn from_history(history: &[PricePoint]) -> Option<Self> {
        let [.., prev, last] = history else {
            return None;
        };
        Some(if last.price < prev.price {
            PriceTrend::Down
        } else if last.price > prev.price {
            PriceTrend::Up
        } else {
            PriceTrend::Flat
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PriceTrend::Down => "📉",
            PriceTrend::Up => "📈",
            PriceTrend::Flat => "→",
        }
    }
}

/// Fabricate two weeks of daily prices ending at `current` on `today`.
///
/// Starts 30 above `current` and random-walks by at most ±10 per day; the
/// final point is pinned to `current`.
pub fn mock_price_history<R: Rng>(
    current: f64,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PricePoint> {
    let mut price = current + 30.0;
    let mut history = Vec::with_capacity(MOCK_HISTORY_DAYS as usize);

    for days_back in (0..MOCK_HISTORY_DAYS).rev() {
        let date = today.checked_sub_days(Days::new(days_back)).unwrap_or(today);
        price += (rng.random::<f64>() - 0.5) * 20.0;
        if days_back == 0 {
            price = current;
        }
        history.push(PricePoint {
            date,
            price: price.round(),
        });
    }
    history
}
