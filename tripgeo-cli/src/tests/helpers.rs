//! Test helpers for writing trip fixtures and building stub services.

use super::*;
use camino::Utf8Path;
use std::sync::Arc;
use tripgeo_core::test_support::{MemoryStore, StubGeocoder, StubRoutingService};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture");
}

/// A trip flying JFK to CDG and then staying at the Ritz.
pub(super) const PARIS_TRIP: &str = r#"{
    "id": "paris",
    "name": "Paris getaway",
    "events": [
        {
            "id": "af23",
            "title": "AF 23",
            "type": "flight",
            "departure_airport": "JFK",
            "arrival_airport": "CDG",
            "departure_time": "2025-06-01T18:00:00Z"
        },
        {
            "id": "ritz",
            "title": "Hotel",
            "type": "stay",
            "name": "Ritz Paris"
        }
    ]
}"#;

pub(super) fn paris_geocoder() -> StubGeocoder {
    StubGeocoder::default()
        .with_place("JFK airport", 40.6413, -73.7781)
        .with_place("CDG airport", 49.0097, 2.5479)
        .with_place("Ritz Paris", 48.8682, 2.3290)
}

/// Hands out stub services that share one geocoder and one store.
pub(super) struct StubServiceFactory {
    pub(super) geocoder: Arc<StubGeocoder>,
    pub(super) store: Arc<MemoryStore>,
}

impl StubServiceFactory {
    pub(super) fn new(geocoder: StubGeocoder) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            store: Arc::new(MemoryStore::default()),
        }
    }
}

impl ServiceFactory for StubServiceFactory {
    fn build(&self, _config: &AssembleConfig) -> Result<Services, CliError> {
        Ok(Services {
            geocoder: self.geocoder.clone(),
            routing: Arc::new(StubRoutingService::default()),
            map_data: None,
            store: self.store.clone(),
        })
    }
}
