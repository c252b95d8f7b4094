use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PassengerCounts, PriceAlert, normalize_code, parse_price};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("missing search parameters")]
    MissingParameters,
    #[error("flight search unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    /// Departure date as entered, `YYYY-MM-DD`.
    pub date: String,
    pub passengers: PassengerCounts,
}

impl SearchRequest {
    pub fn new(origin: &str, destination: &str, date: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: date.to_string(),
            passengers: PassengerCounts::default(),
        }
    }

    /// Trimmed, upper-cased copy; fails if any required field is empty.
    pub fn normalized(&self) -> Result<Self, SearchError> {
        let normalized = Self {
            origin: normalize_code(&self.origin),
            destination: normalize_code(&self.destination),
            date: self.date.trim().to_string(),
            passengers: self.passengers,
        };
        if normalized.origin.is_empty()
            || normalized.destination.is_empty()
            || normalized.date.is_empty()
        {
            return Err(SearchError::MissingParameters);
        }
        Ok(normalized)
    }
}

/// One bookable result row. Prices stay as the provider formats them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub airline: String,
    pub price: String,
    pub departure: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<u32>,
}

impl FlightOffer {
    pub fn price_value(&self) -> Option<f64> {
        parse_price(&self.price)
    }
}

/// Source of flight offers.
pub trait FlightSearch {
    fn search(&self, request: &SearchRequest) -> Result<Vec<FlightOffer>, SearchError>;
}

/// Fixed offers used when no provider answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockFlightSearch;

impl MockFlightSearch {
    pub fn offers() -> Vec<FlightOffer> {
        vec![
            FlightOffer {
                airline: "Lufthansa".to_string(),
                price: "420€".to_string(),
                departure: "10:30".to_string(),
                arrival: None,
                duration: "11h 20m".to_string(),
                stops: None,
            },
            FlightOffer {
                airline: "Emirates".to_string(),
                price: "389€".to_string(),
                departure: "21:15".to_string(),
                arrival: None,
                duration: "13h 05m".to_string(),
                stops: None,
            },
        ]
    }
}

impl FlightSearch for MockFlightSearch {
    fn search(&self, _request: &SearchRequest) -> Result<Vec<FlightOffer>, SearchError> {
        Ok(Self::offers())
    }
}

/// A provider that is never reachable; searches always fall back.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFlightSearch;

impl FlightSearch for OfflineFlightSearch {
    fn search(&self, _request: &SearchRequest) -> Result<Vec<FlightOffer>, SearchError> {
        Err(SearchError::Unavailable("offline".to_string()))
    }
}

/// Offline provider whose fares drift between calls.
///
/// Each route gets a stable base fare; every search quotes it with up to
/// ±15% noise, so price alerts can both trigger and re-arm without a
/// network backend.
#[derive(Debug, Default)]
pub struct SimulatedFlightSearch {
    seed: u64,
    calls: AtomicU64,
}

const SIMULATED_CARRIERS: &[(&str, &str, &str, u32)] = &[
    ("Lufthansa", "10:30", "11h 20m", 0),
    ("Emirates", "21:15", "13h 05m", 1),
    ("Condor", "07:45", "12h 40m", 1),
];

impl SimulatedFlightSearch {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            calls: AtomicU64::new(0),
        }
    }

    /// Stable per-route fare the quotes wobble around.
    pub fn base_fare(origin: &str, destination: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        (origin, destination).hash(&mut hasher);
        300.0 + (hasher.finish() % 400) as f64
    }
}

impl FlightSearch for SimulatedFlightSearch {
    fn search(&self, request: &SearchRequest) -> Result<Vec<FlightOffer>, SearchError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let base = Self::base_fare(&request.origin, &request.destination);
        let mut rng = StdRng::seed_from_u64(self.seed ^ call.rotate_left(17) ^ base.to_bits());

        Ok(SIMULATED_CARRIERS
            .iter()
            .map(|(airline, departure, duration, stops)| {
                let noise = (rng.random::<f64>() - 0.5) * 0.3;
                FlightOffer {
                    airline: airline.to_string(),
                    price: format!("{}€", (base * (1.0 + noise)).round()),
                    departure: departure.to_string(),
                    arrival: None,
                    duration: duration.to_string(),
                    stops: Some(*stops),
                }
            })
            .collect())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OfferSource {
    Provider,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub request: SearchRequest,
    pub offers: Vec<FlightOffer>,
    pub source: OfferSource,
}

/// Run `provider`; on error or an empty answer, use the mock offers.
///
/// Only an invalid request is an error.
pub fn search_with_fallback(
    provider: &dyn FlightSearch,
    request: &SearchRequest,
) -> Result<SearchOutcome, SearchError> {
    let request = request.normalized()?;

    let (offers, source) = match provider.search(&request) {
        Ok(offers) if !offers.is_empty() => (offers, OfferSource::Provider),
        Ok(_) => {
            tracing::info!(
                origin = %request.origin,
                destination = %request.destination,
                "no offers, using fallback"
            );
            (MockFlightSearch::offers(), OfferSource::Fallback)
        }
        Err(err) => {
            tracing::warn!(
                origin = %request.origin,
                destination = %request.destination,
                "search failed, using fallback: {err}"
            );
            (MockFlightSearch::offers(), OfferSource::Fallback)
        }
    };

    Ok(SearchOutcome {
        request,
        offers,
        source,
    })
}

/// Lowest parseable price among `offers`.
pub fn cheapest_offer(offers: &[FlightOffer]) -> Option<(f64, &FlightOffer)> {
    offers
        .iter()
        .filter_map(|o| o.price_value().map(|p| (p, o)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

/// Cheapest current fare for an alert's route, searched for one adult.
///
/// `Ok(None)` when the provider has no parseable offer.
pub fn quote_alert(
    provider: &dyn FlightSearch,
    alert: &PriceAlert,
    today: NaiveDate,
) -> Result<Option<f64>, SearchError> {
    let request = SearchRequest::new(
        &alert.origin,
        &alert.dest,
        &alert.search_date(today).format("%Y-%m-%d").to_string(),
    )
    .normalized()?;
    let offers = provider.search(&request)?;
    Ok(cheapest_offer(&offers).map(|(price, _)| price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Scripted(Vec<FlightOffer>);

    impl FlightSearch for Scripted {
        fn search(&self, _request: &SearchRequest) -> Result<Vec<FlightOffer>, SearchError> {
            Ok(self.0.clone())
        }
    }

    fn offer(airline: &str, price: &str) -> FlightOffer {
        FlightOffer {
            airline: airline.to_string(),
            price: price.to_string(),
            departure: "08:00".to_string(),
            arrival: Some("16:00".to_string()),
            duration: "8h".to_string(),
            stops: Some(0),
        }
    }

    #[test]
    fn normalizes_request_fields() {
        let req = SearchRequest::new(" fra", "jfk ", " 2026-07-01 ");
        let n = req.normalized().unwrap();
        assert_eq!(n.origin, "FRA");
        assert_eq!(n.destination, "JFK");
        assert_eq!(n.date, "2026-07-01");
    }

    #[test]
    fn rejects_missing_parameters() {
        let req = SearchRequest::new("FRA", "", "2026-07-01");
        assert_eq!(
            search_with_fallback(&MockFlightSearch, &req),
            Err(SearchError::MissingParameters)
        );
    }

    #[test]
    fn provider_results_win() {
        let provider = Scripted(vec![offer("Condor", "€310")]);
        let out = search_with_fallback(&provider, &SearchRequest::new("FRA", "JFK", "2026-07-01"))
            .unwrap();
        assert_eq!(out.source, OfferSource::Provider);
        assert_eq!(out.offers.len(), 1);
    }

    #[test]
    fn falls_back_on_error_or_empty() {
        let req = SearchRequest::new("FRA", "JFK", "2026-07-01");
        let out = search_with_fallback(&OfflineFlightSearch, &req).unwrap();
        assert_eq!(out.source, OfferSource::Fallback);
        assert_eq!(out.offers, MockFlightSearch::offers());

        let out = search_with_fallback(&Scripted(Vec::new()), &req).unwrap();
        assert_eq!(out.source, OfferSource::Fallback);
    }

    #[test]
    fn cheapest_skips_unparseable_prices() {
        let offers = vec![offer("A", "n/a"), offer("B", "€1,020"), offer("C", "389€")];
        let (price, best) = cheapest_offer(&offers).unwrap();
        assert_eq!(price, 389.0);
        assert_eq!(best.airline, "C");
        assert!(cheapest_offer(&[]).is_none());
    }

    #[test]
    fn simulated_fares_stay_near_the_route_base() {
        let provider = SimulatedFlightSearch::new(3);
        let req = SearchRequest::new("FRA", "JFK", "2026-07-01");
        let base = SimulatedFlightSearch::base_fare("FRA", "JFK");

        let mut quotes = Vec::new();
        for _ in 0..10 {
            let offers = provider.search(&req).unwrap();
            assert_eq!(offers.len(), 3);
            let (price, _) = cheapest_offer(&offers).unwrap();
            assert!(price >= (base * 0.85).floor() && price <= (base * 1.15).ceil());
            quotes.push(price);
        }
        assert!(quotes.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn quotes_alert_with_cheapest_offer() {
        let alert = crate::demo_alerts().remove(0);
        let today = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
        assert_eq!(quote_alert(&MockFlightSearch, &alert, today), Ok(Some(389.0)));
        assert_eq!(
            quote_alert(&Scripted(Vec::new()), &alert, today),
            Ok(None)
        );
        assert!(quote_alert(&OfflineFlightSearch, &alert, today).is_err());
    }

    #[test]
    fn request_wire_format_defaults_passengers() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"origin":"FRA","destination":"JFK","date":"2026-07-01"}"#)
                .unwrap();
        assert_eq!(req.passengers, PassengerCounts::default());
    }
}
