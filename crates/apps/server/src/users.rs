//! Per-user travel data, keyed by the `x-user-id` header.
//!
//! Requests without the header are given a fresh anonymous id. The id is
//! written back into the request (so handlers always find one) and echoed on
//! the response so the client can reuse it.

use std::collections::HashMap;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use catalog::{InMemoryTravelStore, PriceAlert};
use parking_lot::RwLock;
use tracing::debug;

pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

const MAX_USER_ID_LEN: usize = 128;

pub fn anonymous_user_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("anon_{}", &hex[..16])
}

/// The caller's id, if the header carries a usable one.
pub fn user_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(&USER_ID_HEADER)?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > MAX_USER_ID_LEN {
        return None;
    }
    Some(raw.to_string())
}

pub async fn ensure_user_id(mut req: Request, next: Next) -> Response {
    let id = match user_id(req.headers()) {
        Some(id) => id,
        None => {
            let id = anonymous_user_id();
            debug!(user = %id, "new anonymous session");
            id
        }
    };
    let value = HeaderValue::from_str(&id).ok();
    if let Some(value) = &value {
        req.headers_mut().insert(USER_ID_HEADER, value.clone());
    }

    let mut response = next.run(req).await;
    if let Some(value) = value {
        response.headers_mut().insert(USER_ID_HEADER, value);
    }
    response
}

/// All users' stores behind one lock.
///
/// Closures passed to [`UserStores::with_store`] run under the write lock and
/// must not block.
pub struct UserStores {
    stores: RwLock<HashMap<String, InMemoryTravelStore>>,
    seed_demo: bool,
}

impl UserStores {
    /// `seed_demo` gives every new user the three demo alerts.
    pub fn new(seed_demo: bool) -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
            seed_demo,
        }
    }

    /// Run `f` on the user's store, creating it on first use.
    pub fn with_store<R>(&self, user: &str, f: impl FnOnce(&mut InMemoryTravelStore) -> R) -> R {
        let mut stores = self.stores.write();
        let store = stores.entry(user.to_string()).or_insert_with(|| {
            if self.seed_demo {
                InMemoryTravelStore::with_demo_alerts()
            } else {
                InMemoryTravelStore::new()
            }
        });
        f(store)
    }

    /// Like [`UserStores::with_store`], but never creates a store.
    pub fn with_existing_store<R>(
        &self,
        user: &str,
        f: impl FnOnce(&mut InMemoryTravelStore) -> R,
    ) -> Option<R> {
        self.stores.write().get_mut(user).map(f)
    }

    /// Copy of every stored alert with its owner.
    pub fn all_alerts(&self) -> Vec<(String, PriceAlert)> {
        let stores = self.stores.read();
        stores
            .iter()
            .flat_map(|(user, store)| {
                store
                    .snapshot()
                    .alerts
                    .values()
                    .map(move |alert| (user.clone(), alert.clone()))
            })
            .collect()
    }

    pub fn user_count(&self) -> usize {
        self.stores.read().len()
    }
}
