//! Write-through caches backed by a [`DurableStore`].
//!
//! A [`PersistentCache`] keeps its entries in memory and rewrites the whole
//! map to the store after every insert. Loading never fails: a missing or
//! unreadable blob starts the cache empty. Persistence failures are logged
//! and otherwise ignored, so a broken disk only costs repeat lookups.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::Coordinate;
use crate::ports::DurableStore;
use crate::route::RouteMode;

/// Namespace used for the geocoding cache.
pub const LOCATION_NAMESPACE: &str = "locations";
/// Namespace used for the route cache.
pub const ROUTE_NAMESPACE: &str = "routes";

/// A normalised cache key.
///
/// # Examples
///
/// ```
/// use tripgeo_core::LookupKey;
///
/// let a = LookupKey::location("  Ritz   PARIS ");
/// let b = LookupKey::location("ritz paris");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "geocode:ritz paris");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey(String);

impl LookupKey {
    /// Key for a geocoding query.
    #[must_use]
    pub fn location(query: &str) -> Self {
        Self(format!("geocode:{}", normalize(query)))
    }

    /// Key for a route between two points.
    ///
    /// Endpoints are rounded so that points within about a metre share a key.
    /// Passing a mode keeps legs of different modes apart.
    #[must_use]
    pub fn route(start: Coordinate, end: Coordinate, mode: Option<RouteMode>) -> Self {
        let mut key = format!("route:{}|{}", start.key_fragment(), end.key_fragment());
        if let Some(mode) = mode {
            key.push('|');
            key.push_str(mode.as_str());
        }
        Self(key)
    }

    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim, lowercase and collapse runs of whitespace into single spaces.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// An in-memory map mirrored to a durable store on every write.
pub struct PersistentCache<V> {
    namespace: String,
    store: Arc<dyn DurableStore>,
    entries: RwLock<HashMap<String, V>>,
    write_gate: Mutex<()>,
}

impl<V> fmt::Debug for PersistentCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCache")
            .field("namespace", &self.namespace)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<V> PersistentCache<V> {
    /// Namespace the cache persists under.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> PersistentCache<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Load the cache for `namespace` from `store`.
    ///
    /// Missing data yields an empty cache. Unreadable or malformed data is
    /// logged at `warn` and also yields an empty cache.
    pub async fn load(store: Arc<dyn DurableStore>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let entries = match store.read(&namespace).await {
            Ok(Some(raw)) => match serde_json::from_str::<HashMap<String, V>>(&raw) {
                Ok(entries) => {
                    debug!("loaded {} cached entries from {namespace}", entries.len());
                    entries
                }
                Err(err) => {
                    warn!("discarding malformed cache data in {namespace}: {err}");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(err) => {
                warn!("could not read cache {namespace}; starting empty: {err}");
                HashMap::new()
            }
        };
        Self {
            namespace,
            store,
            entries: RwLock::new(entries),
            write_gate: Mutex::new(()),
        }
    }

    /// Look up `key` in memory.
    #[must_use]
    pub fn get(&self, key: &LookupKey) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
    }

    /// Insert `value` under `key` and persist the whole map.
    ///
    /// The value is visible to [`get`](Self::get) before persistence starts.
    /// Concurrent writers persist one at a time.
    pub async fn set(&self, key: LookupKey, value: V) {
        let _gate = self.write_gate.lock().await;
        let raw = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(key.0, value);
            let ordered: BTreeMap<&String, &V> = entries.iter().collect();
            serde_json::to_string(&ordered)
        };
        let raw = match raw {
            Ok(raw) => raw,
            Err(err) => {
                warn!("could not serialise cache {}: {err}", self.namespace);
                return;
            }
        };
        if let Err(err) = self.store.write(&self.namespace, &raw).await {
            warn!("could not persist cache {}: {err}", self.namespace);
        }
    }

    /// A sorted copy of every entry.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStore, MemoryStore};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::default())
    }

    #[rstest]
    #[case("Louvre", "LOUVRE")]
    #[case("Gare  de\tLyon", " gare de lyon ")]
    fn equivalent_queries_share_a_key(#[case] a: &str, #[case] b: &str) {
        assert_eq!(LookupKey::location(a), LookupKey::location(b));
    }

    #[rstest]
    fn route_keys_round_endpoints_and_include_mode() {
        let a = Coordinate {
            latitude: 48.856_600_1,
            longitude: 2.352_2,
        };
        let b = Coordinate {
            latitude: 51.507_4,
            longitude: -0.127_8,
        };
        let nudged = Coordinate {
            latitude: 48.856_600_4,
            ..a
        };
        assert_eq!(
            LookupKey::route(a, b, None),
            LookupKey::route(nudged, b, None)
        );
        assert_eq!(
            LookupKey::route(a, b, Some(RouteMode::Train)).as_str(),
            "route:48.85660,2.35220|51.50740,-0.12780|train"
        );
        assert_ne!(
            LookupKey::route(a, b, Some(RouteMode::Train)),
            LookupKey::route(a, b, Some(RouteMode::Flight))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn set_is_visible_and_persisted(store: Arc<MemoryStore>) {
        let cache: PersistentCache<u32> = PersistentCache::load(store.clone(), "numbers").await;
        assert!(cache.is_empty());

        cache.set(LookupKey::location("one"), 1).await;

        assert_eq!(cache.get(&LookupKey::location("ONE")), Some(1));
        let reloaded: PersistentCache<u32> = PersistentCache::load(store, "numbers").await;
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(&LookupKey::location("one")), Some(1));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_data_starts_empty(store: Arc<MemoryStore>) {
        store.insert_raw("numbers", "{ not json");
        let cache: PersistentCache<u32> = PersistentCache::load(store, "numbers").await;
        assert!(cache.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn write_failures_are_swallowed() {
        let cache: PersistentCache<u32> =
            PersistentCache::load(Arc::new(FailingStore), "numbers").await;
        cache.set(LookupKey::location("kept"), 7).await;
        assert_eq!(cache.get(&LookupKey::location("kept")), Some(7));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_writers_all_land(store: Arc<MemoryStore>) {
        let cache: Arc<PersistentCache<u32>> =
            Arc::new(PersistentCache::load(store.clone(), "numbers").await);
        let writes = (0..8).map(|i| {
            let cache = Arc::clone(&cache);
            async move { cache.set(LookupKey::location(&format!("k{i}")), i).await }
        });
        futures_util::future::join_all(writes).await;

        let reloaded: PersistentCache<u32> = PersistentCache::load(store, "numbers").await;
        assert_eq!(reloaded.snapshot().len(), 8);
    }
}
