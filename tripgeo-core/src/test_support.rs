//! In-memory port implementations used by unit and behaviour tests.
//!
//! Each stub counts its calls so tests can assert how often the network
//! would have been hit.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::distance::haversine_meters;
use crate::ports::{
    DurableStore, GeocodeError, GeocodeHit, Geocoder, MapDataError, MapDataService, RoutePath,
    RoutingError, RoutingService, StoreError,
};
use crate::{Bounds, Coordinate};

fn normalise(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Geocoder answering from a fixed table.
///
/// Queries are matched case-insensitively with whitespace collapsed.
/// Unknown queries return no hits.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    places: HashMap<String, GeocodeHit>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// Answer `query` with a hit at the given position.
    #[must_use]
    pub fn with_place(mut self, query: &str, latitude: f64, longitude: f64) -> Self {
        self.places.insert(
            normalise(query),
            GeocodeHit {
                latitude,
                longitude,
                display_name: query.to_owned(),
            },
        );
        self
    }

    /// Fail `query` with a network error.
    #[must_use]
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(normalise(query));
        self
    }

    /// Number of searches performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeHit>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = normalise(query);
        if self.failing.contains(&key) {
            return Err(GeocodeError::network(format!("refused {query}")));
        }
        Ok(self.places.get(&key).cloned().into_iter().collect())
    }
}

/// Routing service returning a three-point path at a fixed road speed.
#[derive(Debug)]
pub struct StubRoutingService {
    speed_meters_per_second: f64,
    fail: bool,
    latency_step: Option<Duration>,
    calls: AtomicUsize,
}

/// Calls answered with a shrinking delay by a staggered router.
const STAGGERED_CALLS: u32 = 16;

impl Default for StubRoutingService {
    fn default() -> Self {
        Self {
            speed_meters_per_second: 20.0,
            fail: false,
            latency_step: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl StubRoutingService {
    /// A service whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// A service where earlier calls answer later than later ones.
    ///
    /// Call `n` waits `(16 - n) * step`, so concurrent requests finish in
    /// reverse order.
    #[must_use]
    pub fn staggered(step: Duration) -> Self {
        Self {
            latency_step: Some(step),
            ..Self::default()
        }
    }

    /// Number of routes requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingService for StubRoutingService {
    async fn route(&self, start: Coordinate, end: Coordinate) -> Result<RoutePath, RoutingError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(step) = self.latency_step {
            let remaining = u32::try_from(call)
                .map_or(0, |call| STAGGERED_CALLS.saturating_sub(call));
            tokio::time::sleep(step * remaining).await;
        }
        if self.fail {
            return Err(RoutingError::http(503_u16, "stub outage"));
        }
        let mid = Coordinate {
            latitude: (start.latitude + end.latitude) / 2.0,
            longitude: (start.longitude + end.longitude) / 2.0,
        };
        let distance_meters = haversine_meters(start, end);
        Ok(RoutePath {
            coordinates: vec![start, mid, end],
            duration_seconds: distance_meters / self.speed_meters_per_second,
            distance_meters,
        })
    }
}

/// Map data service returning a fixed set of rail lines.
#[derive(Debug, Default)]
pub struct StubMapData {
    lines: Vec<Vec<Coordinate>>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubMapData {
    /// Serve `lines` for every query.
    #[must_use]
    pub fn with_lines(lines: Vec<Vec<Coordinate>>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    /// A service whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of lookups performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapDataService for StubMapData {
    async fn lines_near(&self, _bounds: Bounds) -> Result<Vec<Vec<Coordinate>>, MapDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MapDataError::timeout("stub timeout"));
        }
        Ok(self.lines.clone())
    }
}

/// Durable store holding blobs in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Seed `namespace` with `raw` content.
    pub fn insert_raw(&self, namespace: &str, raw: &str) {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(namespace.to_owned(), raw.to_owned());
    }

    /// Current content of `namespace`.
    pub fn raw(&self, namespace: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .cloned()
    }

    /// Number of writes performed.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn read(&self, namespace: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(namespace))
    }

    async fn write(&self, namespace: &str, raw: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert_raw(namespace, raw);
        Ok(())
    }
}

/// Durable store that rejects every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

#[async_trait]
impl DurableStore for FailingStore {
    async fn read(&self, _namespace: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::unavailable("read-only test store"))
    }

    async fn write(&self, _namespace: &str, _raw: &str) -> Result<(), StoreError> {
        Err(StoreError::io("disk full"))
    }
}
