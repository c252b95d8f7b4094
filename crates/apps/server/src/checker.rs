//! Periodic price check over every user's alerts.

use std::sync::Arc;
use std::time::Duration;

use catalog::{quote_alert, AlertId, AlertOutcome, FlightSearch};
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::users::UserStores;
use crate::AppState;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub checked: usize,
    pub notified: usize,
    pub rearmed: usize,
    /// Alerts the provider could not price this round.
    pub failed: usize,
}

/// One pass: quote every alert, then record the prices.
///
/// Quotes are fetched without holding the store lock; alerts deleted in the
/// meantime are skipped when the results are written back.
pub fn run_checks(
    users: &UserStores,
    provider: &dyn FlightSearch,
    now: DateTime<Utc>,
) -> CheckSummary {
    let today = now.date_naive();
    let mut summary = CheckSummary::default();

    let mut quotes: Vec<(String, AlertId, f64)> = Vec::new();
    for (user, alert) in users.all_alerts() {
        if alert.dest.trim().is_empty() || alert.target_price <= 0.0 {
            continue;
        }
        match quote_alert(provider, &alert, today) {
            Ok(Some(price)) => quotes.push((user, alert.id, price)),
            Ok(None) => {
                debug!(user = %user, alert = alert.id, dest = %alert.dest, "no priced offers");
                summary.failed += 1;
            }
            Err(err) => {
                warn!(user = %user, alert = alert.id, dest = %alert.dest, "price check failed: {err}");
                summary.failed += 1;
            }
        }
    }

    for (user, id, price) in quotes {
        let outcome = users
            .with_existing_store(&user, |store| {
                store
                    .alerts_mut()
                    .find(|alert| alert.id == id)
                    .map(|alert| (alert.apply_price_check(price, now), alert.target_price))
            })
            .flatten();
        let Some((outcome, target)) = outcome else {
            continue;
        };
        summary.checked += 1;
        match outcome {
            AlertOutcome::Notified => {
                summary.notified += 1;
                info!(user = %user, alert = id, price, target, "price alert triggered");
            }
            AlertOutcome::Rearmed => {
                summary.rearmed += 1;
                debug!(user = %user, alert = id, price, target, "price alert re-armed");
            }
            AlertOutcome::AlreadyNotified | AlertOutcome::AboveTarget => {}
        }
    }

    summary
}

pub fn spawn(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let users = Arc::clone(&state.users);
            let provider = Arc::clone(&state.provider);
            let pass = tokio::task::spawn_blocking(move || {
                run_checks(&users, provider.as_ref(), Utc::now())
            });
            match pass.await {
                Ok(summary) => info!(
                    users = state.users.user_count(),
                    checked = summary.checked,
                    notified = summary.notified,
                    rearmed = summary.rearmed,
                    failed = summary.failed,
                    "price alert pass finished; next in {}s",
                    every.as_secs()
                ),
                Err(err) => warn!("price alert pass aborted: {err}"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{FlightOffer, OfflineFlightSearch, SearchError, SearchRequest, TravelStore};
    use chrono::TimeZone;

    struct Fixed(f64);

    impl FlightSearch for Fixed {
        fn search(&self, _request: &SearchRequest) -> Result<Vec<FlightOffer>, SearchError> {
            Ok(vec![FlightOffer {
                airline: "Lufthansa".to_string(),
                price: format!("{}€", self.0),
                departure: "10:30".to_string(),
                arrival: None,
                duration: "11h 20m".to_string(),
                stops: Some(0),
            }])
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, 8, 0, 0).unwrap()
    }

    #[test]
    fn notifies_once_per_dip_and_rearms() {
        let users = UserStores::new(true);
        users.with_store("u1", |_| ());

        // Targets are 350, 600 and 400.
        let first = run_checks(&users, &Fixed(500.0), at(1));
        assert_eq!(first.checked, 3);
        assert_eq!(first.notified, 1);

        let second = run_checks(&users, &Fixed(300.0), at(2));
        assert_eq!(second.notified, 2);
        assert_eq!(second.rearmed, 0);

        let third = run_checks(&users, &Fixed(700.0), at(3));
        assert_eq!(third.notified, 0);
        assert_eq!(third.rearmed, 3);

        let alert = users.with_store("u1", |store| store.alert(2).unwrap()).unwrap();
        assert_eq!(alert.last_seen_price, Some(700.0));
        assert_eq!(alert.current_price, 700.0);
        assert_eq!(alert.notified_at, None);
        assert_eq!(alert.triggered_price, Some(500.0));
    }

    #[test]
    fn provider_failures_leave_alerts_untouched() {
        let users = UserStores::new(true);
        users.with_store("u1", |_| ());

        let summary = run_checks(&users, &OfflineFlightSearch, at(1));
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.checked, 0);

        let alert = users.with_store("u1", |store| store.alert(1).unwrap()).unwrap();
        assert_eq!(alert.last_seen_price, None);
        assert_eq!(alert.current_price, 420.0);
    }

    #[test]
    fn write_back_skips_users_without_a_store() {
        let users = UserStores::new(true);
        assert_eq!(users.with_existing_store("ghost", |_| ()), None);
        assert_eq!(users.user_count(), 0);

        users.with_store("u1", |_| ());
        assert_eq!(run_checks(&users, &Fixed(500.0), at(1)).checked, 3);
        assert_eq!(users.user_count(), 1);
    }

    #[test]
    fn empty_server_does_nothing() {
        let users = UserStores::new(false);
        assert_eq!(run_checks(&users, &Fixed(1.0), at(1)), CheckSummary::default());
    }
}
