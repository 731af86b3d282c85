use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_models::error::ApiError;
use tracing::debug;

#[cfg(not(test))]
use std::time::Instant;

#[cfg(test)]
use mock_instant::Instant;

/// List reads stay fresh for five minutes; detail reads always revalidate.
pub const STALE_LIST: Duration = Duration::from_secs(300);
pub const STALE_NONE: Duration = Duration::ZERO;

/// Identifies one cached read: a scope shared by every query of the same
/// family plus the parameters that distinguish this one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    scope: &'static str,
    params: String,
}

impl QueryKey {
    pub fn new(scope: &'static str, params: impl Into<String>) -> Self {
        Self {
            scope,
            params: params.into(),
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

enum Slot {
    Ready { value: Value, fetched_at: Instant },
    Pending(SharedFetch),
}

/// Deduplicating read cache shared by every cell.
///
/// A key resolves to at most one in-flight request at a time; concurrent
/// callers of the same key await the same future and each receive a clone of
/// its result. Completed values are served without touching the backend until
/// they pass their staleness window. Failures are never retained, so the next
/// access after an error always retries.
pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Slot>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves `key`, loading through `load` when there is no usable entry.
    ///
    /// `load` is only invoked on a miss (no entry, stale entry, or evicted
    /// error); when another caller already started the same fetch, this call
    /// awaits that flight instead of starting its own.
    pub async fn fetch<F>(
        &self,
        key: QueryKey,
        stale_after: Duration,
        load: F,
    ) -> Result<Value, ApiError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Value, ApiError>>,
    {
        use futures::FutureExt;

        let flight = {
            let mut slots = lock(&self.slots);
            match slots.get(&key) {
                Some(Slot::Ready { value, fetched_at }) if fetched_at.elapsed() < stale_after => {
                    return Ok(value.clone());
                }
                Some(Slot::Pending(flight)) => flight.clone(),
                _ => {
                    debug!(scope = key.scope, params = %key.params, "query miss");
                    let flight = load().shared();
                    slots.insert(key.clone(), Slot::Pending(flight.clone()));
                    flight
                }
            }
        };

        let result = flight.clone().await;

        // Write back only if this flight still owns the slot. An invalidation
        // (or a replacement fetch) that happened mid-flight wins over us.
        let mut slots = lock(&self.slots);
        let still_current = matches!(
            slots.get(&key),
            Some(Slot::Pending(current)) if current.ptr_eq(&flight)
        );
        if still_current {
            match &result {
                Ok(value) => {
                    slots.insert(
                        key,
                        Slot::Ready {
                            value: value.clone(),
                            fetched_at: Instant::now(),
                        },
                    );
                }
                Err(_) => {
                    slots.remove(&key);
                }
            }
        }
        result
    }

    /// Drops a single entry. In-flight fetches for the key keep running but
    /// their completion is discarded.
    pub fn invalidate(&self, key: &QueryKey) {
        lock(&self.slots).remove(key);
    }

    /// Drops every entry whose key belongs to `scope`.
    pub fn invalidate_scope(&self, scope: &str) {
        debug!(scope, "invalidating query scope");
        lock(&self.slots).retain(|key, _| key.scope != scope);
    }

    /// Drops everything. Used when the session ends.
    pub fn clear(&self) {
        lock(&self.slots).clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(slots: &Mutex<HashMap<QueryKey, Slot>>) -> MutexGuard<'_, HashMap<QueryKey, Slot>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decodes a cached JSON value into its typed form.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("unexpected response shape: {}", e)))
}
