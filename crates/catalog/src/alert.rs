use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{CatalogError, PassengerCounts, PricePoint, PriceTrend, mock_price_history, parse_price};

pub type AlertId = u64;

/// Origin assumed when an alert does not name one.
pub const DEFAULT_ORIGIN: &str = "FRA";
/// Airline label for alerts not tied to a specific carrier.
pub const ANY_AIRLINE: &str = "Various";
/// Alerts created from a search result target this share of the quoted price.
pub const OFFER_TARGET_RATIO: f64 = 0.85;

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_airline() -> String {
    ANY_AIRLINE.to_string()
}

fn default_passengers() -> u32 {
    1
}

/// Watch on a route price. Fires when the observed price reaches the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub id: AlertId,
    #[serde(default = "default_origin")]
    pub origin: String,
    pub dest: String,
    pub target_price: f64,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default = "default_airline")]
    pub airline: String,
    #[serde(default)]
    pub created: NaiveDateTime,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_price: Option<f64>,
}

/// Result of feeding one observed price into an alert.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// Price reached the target and the alert fired.
    Notified,
    /// Price is still at or below target; the alert already fired for this dip.
    AlreadyNotified,
    /// Price climbed back over target; the alert may fire again.
    Rearmed,
    AboveTarget,
}

impl PriceAlert {
    /// Positive while the price is still above target.
    pub fn difference(&self) -> f64 {
        self.current_price - self.target_price
    }

    pub fn is_at_or_below_target(&self) -> bool {
        self.current_price <= self.target_price
    }

    pub fn trend(&self) -> Option<PriceTrend> {
        PriceTrend::from_history(&self.price_history)
    }

    /// Travel date to price: the stored date, otherwise tomorrow.
    pub fn search_date(&self, today: NaiveDate) -> NaiveDate {
        self.date
            .unwrap_or_else(|| today.checked_add_days(Days::new(1)).unwrap_or(today))
    }

    /// Record an observed price and decide whether to notify.
    ///
    /// Fires once per dip below target: it fires if it never fired, or if the
    /// previous observation was above target. Once the price rises above
    /// target after firing, the alert re-arms.
    pub fn apply_price_check(&mut self, observed: f64, now: DateTime<Utc>) -> AlertOutcome {
        let last_seen = self.last_seen_price;
        self.last_seen_price = Some(observed);
        self.current_price = observed;
        self.record_history(now.date_naive(), observed);

        if observed <= self.target_price {
            let was_above = last_seen.is_some_and(|p| p > self.target_price);
            if self.notified_at.is_none() || was_above {
                self.notified_at = Some(now);
                self.triggered_price = Some(observed);
                AlertOutcome::Notified
            } else {
                AlertOutcome::AlreadyNotified
            }
        } else if self.notified_at.is_some() && last_seen.is_some_and(|p| p <= self.target_price) {
            self.notified_at = None;
            AlertOutcome::Rearmed
        } else {
            AlertOutcome::AboveTarget
        }
    }

    fn record_history(&mut self, date: NaiveDate, price: f64) {
        match self.price_history.last_mut() {
            Some(last) if last.date == date => last.price = price,
            _ => self.price_history.push(PricePoint { date, price }),
        }
    }
}

/// Unvalidated alert form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertDraft {
    pub origin: String,
    pub dest: String,
    pub date: String,
    pub target_price: Option<f64>,
    pub current_price: Option<f64>,
    pub airline: String,
    pub passengers: PassengerCounts,
}

impl AlertDraft {
    /// Validate the form and build the alert with a generated price history.
    pub fn into_alert<R: Rng>(
        self,
        id: AlertId,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<PriceAlert, CatalogError> {
        let origin = self.origin.trim().to_uppercase();
        let dest = self.dest.trim().to_uppercase();
        let date = self.date.trim();

        if origin.is_empty() {
            return Err(CatalogError::MissingField("origin"));
        }
        if dest.is_empty() {
            return Err(CatalogError::MissingField("dest"));
        }
        if date.is_empty() {
            return Err(CatalogError::MissingField("date"));
        }
        let target_price = self
            .target_price
            .ok_or(CatalogError::MissingField("targetPrice"))?;
        let current_price = self
            .current_price
            .ok_or(CatalogError::MissingField("currentPrice"))?;

        for code in [&origin, &dest] {
            if !is_iata_code(code) {
                return Err(CatalogError::InvalidIata(code.clone()));
            }
        }
        if target_price <= 0.0 || current_price <= 0.0 {
            return Err(CatalogError::NonPositivePrice);
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| CatalogError::InvalidDate(date.to_string()))?;

        let airline = match self.airline.trim() {
            "" => default_airline(),
            name => name.to_string(),
        };

        Ok(PriceAlert {
            id,
            origin,
            dest,
            target_price,
            current_price,
            date: Some(date),
            passengers: self.passengers.total(),
            airline,
            created: now,
            price_history: mock_price_history(current_price, now.date(), rng),
            last_seen_price: None,
            notified_at: None,
            triggered_price: None,
        })
    }
}

/// Quick alert from a search result row, targeting 15% under the quoted price.
#[allow(clippy::too_many_arguments)]
pub fn alert_from_offer<R: Rng>(
    id: AlertId,
    origin: Option<&str>,
    dest: &str,
    quoted_price: &str,
    date: Option<NaiveDate>,
    passengers: &PassengerCounts,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<PriceAlert, CatalogError> {
    let price = parse_price(quoted_price).ok_or(CatalogError::NonPositivePrice)?;
    if price <= 0.0 {
        return Err(CatalogError::NonPositivePrice);
    }
    let origin = origin
        .map(|o| o.trim().to_uppercase())
        .filter(|o| !o.is_empty())
        .unwrap_or_else(default_origin);

    Ok(PriceAlert {
        id,
        origin,
        dest: dest.trim().to_uppercase(),
        target_price: (price * OFFER_TARGET_RATIO).round(),
        current_price: price,
        date,
        passengers: passengers.seated(),
        airline: default_airline(),
        created: now,
        price_history: mock_price_history(price, now.date(), rng),
        last_seen_price: None,
        notified_at: None,
        triggered_price: None,
    })
}

pub fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

const DEMO_ALERTS: &str = r#"[
  {
    "id": 1, "origin": "BER", "dest": "JFK", "targetPrice": 350, "currentPrice": 420,
    "date": "2026-06-15", "passengers": 1, "airline": "Lufthansa", "created": "2026-01-01T10:00:00",
    "priceHistory": [
      { "date": "2026-01-01", "price": 450 }, { "date": "2026-01-05", "price": 445 },
      { "date": "2026-01-08", "price": 430 }, { "date": "2026-01-12", "price": 425 },
      { "date": "2026-01-15", "price": 420 }, { "date": "2026-01-18", "price": 410 },
      { "date": "2026-01-20", "price": 420 }
    ]
  },
  {
    "id": 2, "origin": "FRA", "dest": "TYO", "targetPrice": 600, "currentPrice": 580,
    "date": "2026-07-20", "passengers": 2, "airline": "Emirates", "created": "2026-01-02T12:00:00",
    "priceHistory": [
      { "date": "2026-01-02", "price": 650 }, { "date": "2026-01-06", "price": 630 },
      { "date": "2026-01-09", "price": 620 }, { "date": "2026-01-13", "price": 600 },
      { "date": "2026-01-16", "price": 590 }, { "date": "2026-01-19", "price": 585 },
      { "date": "2026-01-20", "price": 580 }
    ]
  },
  {
    "id": 3, "origin": "FRA", "dest": "DXB", "targetPrice": 400, "currentPrice": 450,
    "date": "2026-08-10", "passengers": 1, "airline": "Qatar Airways", "created": "2026-01-03T14:00:00",
    "priceHistory": [
      { "date": "2026-01-03", "price": 480 }, { "date": "2026-01-07", "price": 475 },
      { "date": "2026-01-10", "price": 470 }, { "date": "2026-01-14", "price": 460 },
      { "date": "2026-01-17", "price": 455 }, { "date": "2026-01-20", "price": 450 }
    ]
  }
]"#;

/// Sample alerts shown on first launch.
pub fn demo_alerts() -> Vec<PriceAlert> {
    match serde_json::from_str(DEMO_ALERTS) {
        Ok(alerts) => alerts,
        Err(err) => {
            tracing::warn!("demo alerts failed to parse: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 21, 9, 0, 0).unwrap()
    }

    fn alert(target: f64) -> PriceAlert {
        PriceAlert {
            id: 9,
            origin: "FRA".to_string(),
            dest: "JFK".to_string(),
            target_price: target,
            current_price: 500.0,
            date: None,
            passengers: 1,
            airline: ANY_AIRLINE.to_string(),
            created: now().naive_utc(),
            price_history: Vec::new(),
            last_seen_price: None,
            notified_at: None,
            triggered_price: None,
        }
    }

    fn draft() -> AlertDraft {
        AlertDraft {
            origin: "ber".to_string(),
            dest: " jfk".to_string(),
            date: "2026-06-15".to_string(),
            target_price: Some(350.0),
            current_price: Some(420.0),
            airline: String::new(),
            passengers: PassengerCounts {
                adults: 2,
                children: 1,
                infants: 1,
            },
        }
    }

    #[test]
    fn demo_alerts_parse() {
        let alerts = demo_alerts();
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[1].dest, "TYO");
        assert!(alerts[1].is_at_or_below_target());
        assert_eq!(alerts[0].trend(), Some(PriceTrend::Up));
        assert_eq!(alerts[2].trend(), Some(PriceTrend::Down));
    }

    #[test]
    fn fires_once_per_dip_and_rearms_above_target() {
        let mut a = alert(400.0);
        assert_eq!(a.apply_price_check(450.0, now()), AlertOutcome::AboveTarget);
        assert_eq!(a.apply_price_check(390.0, now()), AlertOutcome::Notified);
        assert_eq!(a.triggered_price, Some(390.0));
        assert_eq!(a.notified_at, Some(now()));

        assert_eq!(a.apply_price_check(380.0, now()), AlertOutcome::AlreadyNotified);
        assert_eq!(a.apply_price_check(420.0, now()), AlertOutcome::Rearmed);
        assert_eq!(a.notified_at, None);
        assert_eq!(a.apply_price_check(399.0, now()), AlertOutcome::Notified);
        assert_eq!(a.last_seen_price, Some(399.0));
        assert_eq!(a.current_price, 399.0);
    }

    #[test]
    fn first_check_at_target_fires() {
        let mut a = alert(400.0);
        assert_eq!(a.apply_price_check(400.0, now()), AlertOutcome::Notified);
    }

    #[test]
    fn checks_on_the_same_day_replace_the_history_point() {
        let mut a = alert(100.0);
        a.apply_price_check(300.0, now());
        a.apply_price_check(280.0, now());
        assert_eq!(a.price_history.len(), 1);
        assert_eq!(a.price_history[0].price, 280.0);
    }

    #[test]
    fn search_date_falls_back_to_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let mut a = alert(1.0);
        assert_eq!(a.search_date(today), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        a.date = NaiveDate::from_ymd_opt(2026, 6, 1);
        assert_eq!(a.search_date(today), NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
    }

    #[test]
    fn draft_builds_alert() {
        let mut rng = StdRng::seed_from_u64(1);
        let alert = draft().into_alert(5, now().naive_utc(), &mut rng).unwrap();
        assert_eq!(alert.origin, "BER");
        assert_eq!(alert.dest, "JFK");
        assert_eq!(alert.passengers, 4);
        assert_eq!(alert.airline, ANY_AIRLINE);
        assert_eq!(alert.price_history.len(), 15);
        assert_eq!(alert.price_history.last().map(|p| p.price), Some(420.0));
    }

    #[test]
    fn draft_validation_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let t = now().naive_utc();

        let missing = AlertDraft {
            target_price: None,
            ..draft()
        };
        assert_eq!(
            missing.into_alert(1, t, &mut rng),
            Err(CatalogError::MissingField("targetPrice"))
        );

        let bad_code = AlertDraft {
            dest: "JFKX".to_string(),
            ..draft()
        };
        assert_eq!(
            bad_code.into_alert(1, t, &mut rng),
            Err(CatalogError::InvalidIata("JFKX".to_string()))
        );

        let free = AlertDraft {
            current_price: Some(0.0),
            ..draft()
        };
        assert_eq!(free.into_alert(1, t, &mut rng), Err(CatalogError::NonPositivePrice));

        let bad_date = AlertDraft {
            date: "15.06.2026".to_string(),
            ..draft()
        };
        assert_eq!(
            bad_date.into_alert(1, t, &mut rng),
            Err(CatalogError::InvalidDate("15.06.2026".to_string()))
        );
    }

    #[test]
    fn offer_alert_targets_fifteen_percent_below() {
        let mut rng = StdRng::seed_from_u64(3);
        let passengers = PassengerCounts {
            adults: 1,
            children: 1,
            infants: 1,
        };
        let alert = alert_from_offer(
            7,
            None,
            "jfk",
            "420€",
            None,
            &passengers,
            now().naive_utc(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(alert.origin, DEFAULT_ORIGIN);
        assert_eq!(alert.dest, "JFK");
        assert_eq!(alert.target_price, 357.0);
        assert_eq!(alert.passengers, 2);

        let err = alert_from_offer(
            8,
            None,
            "JFK",
            "n/a",
            None,
            &passengers,
            now().naive_utc(),
            &mut rng,
        );
        assert_eq!(err, Err(CatalogError::NonPositivePrice));
    }
}
