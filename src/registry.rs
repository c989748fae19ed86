//! Inspection Registry for caching parsed services.
//!
//! The registry provides:
//! - LRU caching of inspections keyed by service URL
//! - Singleflight pattern so concurrent requests for one service share a fetch
//! - Forced refresh that bypasses the cache
//!
//! Only inspections of a 2xx response that produced a descriptor are
//! cached. Anything else, including a descriptor served with an error
//! status, is returned to every waiter of the fetch that produced it and
//! then forgotten, so the next request retries.
//!
//! A leader whose future is dropped mid-fetch releases its waiters; one of
//! them takes over the fetch.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use iiif_inspector::fetch::HttpInfoSource;
//! use iiif_inspector::registry::InspectionRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpInfoSource::new(Duration::from_secs(30))?;
//! let registry = InspectionRegistry::new(source);
//!
//! let inspection = registry.get("https://example.org/iiif/abc", false).await;
//! println!("{:?}", inspection.descriptor.as_ref().map(|d| d.root_id()));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tokio::sync::{Notify, RwLock};
use tracing::debug;

use crate::fetch::{inspect_service, InfoSource, Inspection};

// =============================================================================
// Configuration
// =============================================================================

/// Default capacity for the inspection cache (number of services).
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

// =============================================================================
// InspectionRegistry
// =============================================================================

/// Registry of inspected services.
pub struct InspectionRegistry<S: InfoSource> {
    /// The source used to fetch `info.json`
    source: S,

    /// Cached inspections indexed by service URL
    cache: RwLock<LruCache<String, Arc<Inspection>>>,

    /// In-flight fetches for singleflight pattern
    in_flight: Mutex<HashMap<String, Arc<InFlightState>>>,
}

/// State for an in-flight inspection.
struct InFlightState {
    /// Notification for waiters
    notify: Notify,
    /// Result of the inspection (set when complete)
    result: Mutex<Option<Arc<Inspection>>>,
}

/// Held by the leader of a fetch. Dropping it, on completion or
/// cancellation, removes the in-flight entry and wakes the waiters.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashMap<String, Arc<InFlightState>>>,
    service_url: &'a str,
    state: Arc<InFlightState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut in_flight = lock(self.in_flight);
            if in_flight
                .get(self.service_url)
                .is_some_and(|state| Arc::ptr_eq(state, &self.state))
            {
                in_flight.remove(self.service_url);
            }
        }
        self.state.notify.notify_waiters();
    }
}

/// Lock a mutex that is never held across an await, ignoring poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: InfoSource> InspectionRegistry<S> {
    /// Create a registry caching up to [`DEFAULT_CACHE_CAPACITY`] services.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a registry with a custom cache capacity. A capacity of zero is
    /// treated as one.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            cache: RwLock::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the inspection of a service, fetching it if not cached.
    ///
    /// With `refresh` set, the cache is skipped and the result replaces any
    /// cached entry. Concurrent callers for the same URL still share one
    /// fetch.
    pub async fn get(&self, service_url: &str, refresh: bool) -> Arc<Inspection> {
        // Fast path: check cache
        if !refresh {
            let mut cache = self.cache.write().await;
            if let Some(inspection) = cache.get(service_url) {
                debug!(service = service_url, "Inspection cache hit");
                return inspection.clone();
            }
        }

        // Slow path: join an in-flight fetch or become leader
        loop {
            let (state, leader) = {
                let mut in_flight = lock(&self.in_flight);
                match in_flight.get(service_url) {
                    Some(state) => (state.clone(), false),
                    None => {
                        let state = Arc::new(InFlightState {
                            notify: Notify::new(),
                            result: Mutex::new(None),
                        });
                        in_flight.insert(service_url.to_string(), state.clone());
                        (state, true)
                    }
                }
            };

            if leader {
                let guard = InFlightGuard {
                    in_flight: &self.in_flight,
                    service_url,
                    state,
                };

                let inspection = Arc::new(inspect_service(&self.source, service_url).await);
                *lock(&guard.state.result) = Some(inspection.clone());

                {
                    let mut cache = self.cache.write().await;
                    if inspection.http.is_success() && inspection.descriptor.is_some() {
                        cache.put(service_url.to_string(), inspection.clone());
                    } else {
                        cache.pop(service_url);
                    }
                }

                drop(guard);
                return inspection;
            }

            // Wait for the leader. The entry is removed before waiters are
            // notified, so checking it after enabling the notification
            // cannot miss the wakeup.
            let notified = state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            let pending = lock(&state.result).is_none() && self.is_in_flight(service_url, &state);
            if pending {
                notified.await;
            }

            let result = lock(&state.result).clone();
            match result {
                Some(inspection) => return inspection,
                None => debug!(service = service_url, "Inspection abandoned, retrying"),
            }
        }
    }

    fn is_in_flight(&self, service_url: &str, state: &Arc<InFlightState>) -> bool {
        lock(&self.in_flight)
            .get(service_url)
            .is_some_and(|current| Arc::ptr_eq(current, state))
    }

    /// Remove a service from the cache.
    pub async fn invalidate(&self, service_url: &str) {
        let mut cache = self.cache.write().await;
        cache.pop(service_url);
    }

    /// Clear all cached inspections.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// Get the number of cached inspections.
    pub async fn cached_count(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
