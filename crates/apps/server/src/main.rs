use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use catalog::{
    CityDirectory, FlightSearch, MockFlightSearch, OfflineFlightSearch, SimulatedFlightSearch,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod checker;
mod error;
mod users;

use users::UserStores;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStores>,
    pub provider: Arc<dyn FlightSearch + Send + Sync>,
    pub cities: Arc<CityDirectory>,
}

#[derive(Clone, Debug)]
struct ServerConfig {
    addr: SocketAddr,
    alert_interval: Duration,
    seed_demo: bool,
    provider: ProviderKind,
    provider_seed: u64,
    cities_path: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProviderKind {
    Simulated,
    Mock,
    Offline,
}

impl ProviderKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simulated" => Some(Self::Simulated),
            "mock" => Some(Self::Mock),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }

    fn build(self, seed: u64) -> Arc<dyn FlightSearch + Send + Sync> {
        match self {
            Self::Simulated => Arc::new(SimulatedFlightSearch::new(seed)),
            Self::Mock => Arc::new(MockFlightSearch),
            Self::Offline => Arc::new(OfflineFlightSearch),
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], 8080));
        let addr = match env::var("TRAVEL_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("invalid TRAVEL_ADDR {raw:?}, using {default_addr}");
                default_addr
            }),
            Err(_) => default_addr,
        };
        let provider = env::var("TRAVEL_PROVIDER")
            .ok()
            .and_then(|raw| ProviderKind::parse(&raw))
            .unwrap_or(ProviderKind::Simulated);

        Self {
            addr,
            alert_interval: Duration::from_secs(env_var_u64("TRAVEL_ALERT_INTERVAL_S", 3600).max(1)),
            seed_demo: env_var_bool("TRAVEL_SEED_DEMO", false),
            provider,
            provider_seed: env_var_u64("TRAVEL_PROVIDER_SEED", 7),
            cities_path: env::var("TRAVEL_CITIES").ok(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .expose_headers([users::USER_ID_HEADER])
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/data", get(api::get_data))
        .route("/api/trips", post(api::save_trip))
        .route("/api/trips/:id", delete(api::delete_trip))
        .route("/api/alerts", post(api::save_alert))
        .route("/api/alerts/:id", delete(api::delete_alert))
        .route("/api/check_alerts", post(api::check_alerts))
        .route("/api/search", post(api::search))
        .layer(middleware::from_fn(users::ensure_user_id))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn load_cities(path: Option<&str>) -> CityDirectory {
    let mut cities = CityDirectory::builtin();
    let Some(path) = path else {
        return cities;
    };
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => match CityDirectory::from_json(&raw) {
            Ok(extra) => {
                info!("loaded {} cities from {path}", extra.len());
                cities.extend(extra);
            }
            Err(err) => warn!("ignoring city table {path}: {err}"),
        },
        Err(err) => warn!("failed to read city table {path}: {err}"),
    }
    cities
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();
    let cities = load_cities(config.cities_path.as_deref()).await;

    let state = AppState {
        users: Arc::new(UserStores::new(config.seed_demo)),
        provider: config.provider.build(config.provider_seed),
        cities: Arc::new(cities),
    };

    checker::spawn(state.clone(), config.alert_interval);
    info!(
        provider = ?config.provider,
        interval_s = config.alert_interval.as_secs(),
        "price alert checker started"
    );

    let app = router(state);
    info!("travel server listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse_case_insensitively() {
        assert_eq!(ProviderKind::parse(" Mock "), Some(ProviderKind::Mock));
        assert_eq!(ProviderKind::parse("simulated"), Some(ProviderKind::Simulated));
        assert_eq!(ProviderKind::parse("OFFLINE"), Some(ProviderKind::Offline));
        assert_eq!(ProviderKind::parse("amadeus"), None);
    }

    #[tokio::test]
    async fn missing_city_table_keeps_the_builtins() {
        let cities = load_cities(Some("/nonexistent/cities.json")).await;
        assert_eq!(cities.len(), CityDirectory::builtin().len());
        assert!(load_cities(None).await.contains("DXB"));
    }

    #[tokio::test]
    async fn healthz_says_ok() {
        assert_eq!(healthz().await.status(), StatusCode::OK);
    }

    #[test]
    fn router_builds_with_all_routes() {
        let state = AppState {
            users: Arc::new(UserStores::new(false)),
            provider: Arc::new(MockFlightSearch),
            cities: Arc::new(CityDirectory::builtin()),
        };
        let _app = router(state);
    }
}
