//! Resolve free-text queries to places, hitting the geocoder as rarely as
//! possible.

use std::sync::Arc;

use log::{debug, warn};

use crate::cache::{LookupKey, PersistentCache};
use crate::location::Place;
use crate::ports::Geocoder;
use crate::rate_limit::RateLimiter;
use crate::Coordinate;

/// Cached, rate-limited geocoding.
///
/// Failures never surface as errors: a query the geocoder cannot answer, or
/// that fails in transit, resolves to `None` and is logged.
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    cache: Arc<PersistentCache<Place>>,
    limiter: Arc<dyn RateLimiter>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl LocationResolver {
    /// Build a resolver over the given geocoder, cache and limiter.
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        cache: Arc<PersistentCache<Place>>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            geocoder,
            cache,
            limiter,
        }
    }

    /// The cache backing this resolver.
    #[must_use]
    pub fn cache(&self) -> &Arc<PersistentCache<Place>> {
        &self.cache
    }

    /// Resolve `query` to a place.
    ///
    /// Cached answers return without waiting on the limiter. Misses wait for
    /// the limiter, take the geocoder's first hit, and cache it.
    pub async fn resolve(&self, query: &str) -> Option<Place> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let key = LookupKey::location(query);
        if let Some(place) = self.cache.get(&key) {
            debug!("geocode cache hit for {key}");
            return Some(place);
        }

        self.limiter.until_ready().await;
        let hits = match self.geocoder.search(query).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!("geocoding {query:?} failed: {err}");
                return None;
            }
        };
        let Some(hit) = hits.into_iter().next() else {
            debug!("no geocoding result for {query:?}");
            return None;
        };
        let coordinate = match Coordinate::new(hit.latitude, hit.longitude) {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!("geocoder returned an invalid coordinate for {query:?}: {err}");
                return None;
            }
        };
        let place = Place {
            coordinate,
            display_name: hit.display_name,
        };
        self.cache.set(key, place.clone()).await;
        Some(place)
    }
}
