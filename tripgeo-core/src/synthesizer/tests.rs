//! Unit tests for route synthesis.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::test_support::{MemoryStore, StubMapData, StubRoutingService};

fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate {
        latitude,
        longitude,
    }
}

const PARIS: Coordinate = Coordinate {
    latitude: 48.8443,
    longitude: 2.3744,
};
const LYON: Coordinate = Coordinate {
    latitude: 45.7606,
    longitude: 4.8593,
};
const JFK: Coordinate = Coordinate {
    latitude: 40.6413,
    longitude: -73.7781,
};
const CDG: Coordinate = Coordinate {
    latitude: 49.0097,
    longitude: 2.5479,
};

#[fixture]
fn routing() -> Arc<StubRoutingService> {
    Arc::new(StubRoutingService::default())
}

async fn synthesizer(routing: Arc<StubRoutingService>) -> RouteSynthesizer {
    let cache = PersistentCache::load(Arc::new(MemoryStore::default()), "routes").await;
    RouteSynthesizer::new(routing, Arc::new(cache))
}

#[rstest]
#[case(RouteMode::Driving)]
#[case(RouteMode::Train)]
#[case(RouteMode::Flight)]
#[tokio::test]
async fn identical_endpoints_give_an_empty_leg(
    routing: Arc<StubRoutingService>,
    #[case] mode: RouteMode,
) {
    let synth = synthesizer(Arc::clone(&routing)).await;
    let route = synth
        .synthesize(RouteRequest::new(PARIS, PARIS, mode))
        .await
        .expect("degenerate legs always succeed");

    assert_eq!(route.coordinates, vec![PARIS, PARIS]);
    assert_eq!(route.distance_meters, 0.0);
    assert_eq!(route.duration_minutes, 0.0);
    assert_eq!(route.mode, mode);
    assert_eq!(routing.calls(), 0);
    if mode == RouteMode::Train {
        assert!(route.departure_time.is_some());
        assert_eq!(route.arrival_time, route.departure_time);
    }
}

#[rstest]
#[tokio::test]
async fn scheduled_empty_legs_keep_their_times(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(routing).await;
    let departure = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single();
    let request = RouteRequest::new(PARIS, PARIS, RouteMode::Flight).with_schedule(Schedule {
        departure,
        arrival: None,
    });
    let route = synth.synthesize(request).await.expect("degenerate leg");
    assert_eq!(route.departure_time, departure);
    assert!(route.arrival_time.is_none());
}

#[rstest]
#[tokio::test]
async fn flights_are_pinned_arcs(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(routing).await;
    let route = synth
        .synthesize(RouteRequest::new(JFK, CDG, RouteMode::Flight))
        .await
        .expect("flights always succeed");

    assert_eq!(route.coordinates.len(), 50);
    assert_eq!(route.start(), Some(JFK));
    assert_eq!(route.end(), Some(CDG));
    let expected_minutes = route.distance_meters / 1_000.0 / 800.0 * 60.0;
    assert!((route.duration_minutes - expected_minutes).abs() < 1e-9);
    assert!(route.departure_time.is_none());
}

#[rstest]
#[tokio::test]
async fn flights_carry_event_times(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(routing).await;
    let departure = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).single();
    let request = RouteRequest::new(JFK, CDG, RouteMode::Flight).with_schedule(Schedule {
        departure,
        arrival: None,
    });
    let route = synth.synthesize(request).await.expect("flight");
    assert_eq!(route.departure_time, departure);
}

#[rstest]
#[tokio::test]
async fn straight_trains_run_at_fixed_speed(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(routing).await;
    let route = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Train))
        .await
        .expect("trains always succeed");

    assert_eq!(route.coordinates, vec![PARIS, LYON]);
    let expected_minutes = haversine_meters(PARIS, LYON) / 1_000.0 / 120.0 * 60.0;
    assert!((route.duration_minutes - expected_minutes).abs() < 1e-9);
    let departure = route.departure_time.expect("departure filled in");
    let arrival = route.arrival_time.expect("arrival filled in");
    let minutes = (arrival - departure).num_seconds() as f64 / 60.0;
    assert!((minutes - expected_minutes).abs() < 0.1);
}

#[rstest]
#[tokio::test]
async fn short_trains_follow_nearby_rail(routing: Arc<StubRoutingService>) {
    let start = coord(48.00, 2.00);
    let end = coord(48.30, 2.30);
    let rail = vec![start, coord(48.10, 2.20), coord(48.20, 2.25), end];
    let map = Arc::new(StubMapData::with_lines(vec![rail]));
    let synth = synthesizer(routing)
        .await
        .with_map_data(Arc::clone(&map) as Arc<dyn MapDataService>);

    let route = synth
        .synthesize(RouteRequest::new(start, end, RouteMode::Train))
        .await
        .expect("train");

    assert_eq!(map.calls(), 1);
    assert_eq!(route.coordinates.len(), 4);
    assert_eq!(route.start(), Some(start));
    assert_eq!(route.end(), Some(end));
    assert!(route.distance_meters > haversine_meters(start, end));
}

#[rstest]
#[tokio::test]
async fn long_trains_skip_the_rail_lookup(routing: Arc<StubRoutingService>) {
    let map = Arc::new(StubMapData::failing());
    let synth = synthesizer(routing)
        .await
        .with_map_data(Arc::clone(&map) as Arc<dyn MapDataService>)
        .with_config(SynthesizerConfig::default().with_rail_lookup_ceiling(100_000.0));

    let route = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Train))
        .await
        .expect("train");

    assert_eq!(map.calls(), 0);
    assert_eq!(route.coordinates, vec![PARIS, LYON]);
}

#[rstest]
#[tokio::test]
async fn rail_lookup_failures_fall_back_to_a_straight_line(routing: Arc<StubRoutingService>) {
    let start = coord(48.00, 2.00);
    let end = coord(48.30, 2.30);
    let map = Arc::new(StubMapData::failing());
    let synth = synthesizer(routing)
        .await
        .with_map_data(Arc::clone(&map) as Arc<dyn MapDataService>);

    let route = synth
        .synthesize(RouteRequest::new(start, end, RouteMode::Train))
        .await
        .expect("train");

    assert_eq!(map.calls(), 1);
    assert_eq!(route.coordinates, vec![start, end]);
}

#[rstest]
#[tokio::test]
async fn driving_uses_the_routing_service_and_caches(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(Arc::clone(&routing)).await;
    let request = RouteRequest::new(PARIS, LYON, RouteMode::Driving);

    let first = synth.synthesize(request).await.expect("drive");
    let second = synth.synthesize(request).await.expect("drive");

    assert_eq!(routing.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(first.coordinates.len(), 3);
    let expected_minutes = haversine_meters(PARIS, LYON) / 20.0 / 60.0;
    assert!((first.duration_minutes - expected_minutes).abs() < 1e-9);
    assert_eq!(synth.cache().len(), 1);
}

#[rstest]
#[tokio::test]
async fn driving_failures_yield_no_route() {
    let synth = synthesizer(Arc::new(StubRoutingService::failing())).await;
    let route = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Driving))
        .await;
    assert!(route.is_none());
    assert!(synth.cache().is_empty());
}

#[rstest]
#[tokio::test]
async fn per_mode_keys_keep_modes_apart(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(Arc::clone(&routing)).await;
    synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Driving))
        .await
        .expect("drive");
    let train = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Train))
        .await
        .expect("train");

    assert_eq!(train.coordinates, vec![PARIS, LYON]);
    assert_eq!(synth.cache().len(), 2);
}

#[rstest]
#[tokio::test]
async fn shared_keys_relabel_the_cached_path(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(Arc::clone(&routing))
        .await
        .with_config(SynthesizerConfig::default().with_keying(RouteKeying::SharedPath));
    let driving = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Driving))
        .await
        .expect("drive");
    let train = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Train))
        .await
        .expect("train");

    assert_eq!(train.mode, RouteMode::Train);
    assert_eq!(train.coordinates, driving.coordinates);
    assert_eq!(synth.cache().len(), 1);
}

#[rstest]
#[tokio::test]
async fn cached_flights_do_not_reuse_earlier_times(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(routing).await;
    let departure = Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).single();
    let scheduled = RouteRequest::new(JFK, CDG, RouteMode::Flight).with_schedule(Schedule {
        departure,
        arrival: None,
    });
    let first = synth.synthesize(scheduled).await.expect("flight");
    let second = synth
        .synthesize(RouteRequest::new(JFK, CDG, RouteMode::Flight))
        .await
        .expect("flight");

    assert_eq!(first.departure_time, departure);
    assert!(second.departure_time.is_none());
    assert!(second.arrival_time.is_none());
    assert_eq!(first.coordinates, second.coordinates);
}

#[rstest]
#[tokio::test]
async fn cached_trains_are_timed_from_their_own_schedule(routing: Arc<StubRoutingService>) {
    let synth = synthesizer(routing).await;
    let morning = Utc.with_ymd_and_hms(2024, 5, 2, 7, 0, 0).single();
    let evening = Utc.with_ymd_and_hms(2024, 5, 2, 19, 0, 0).single();
    let request = |departure| {
        RouteRequest::new(PARIS, LYON, RouteMode::Train).with_schedule(Schedule {
            departure,
            arrival: None,
        })
    };

    let first = synth.synthesize(request(morning)).await.expect("train");
    let second = synth.synthesize(request(evening)).await.expect("train");

    assert_eq!(synth.cache().len(), 1);
    assert_eq!(first.departure_time, morning);
    assert_eq!(second.departure_time, evening);
    let first_leg = first.arrival_time.zip(first.departure_time).map(|(a, d)| a - d);
    let second_leg = second.arrival_time.zip(second.departure_time).map(|(a, d)| a - d);
    assert_eq!(first_leg, second_leg);
    assert!(synth
        .cache()
        .snapshot()
        .values()
        .all(|route| route.departure_time.is_none() && route.arrival_time.is_none()));
}

#[rstest]
#[tokio::test]
async fn crawling_trains_leave_the_arrival_open(routing: Arc<StubRoutingService>) {
    let config = SynthesizerConfig {
        train_speed_kmh: 1e-300,
        ..SynthesizerConfig::default()
    };
    let synth = synthesizer(routing).await.with_config(config);
    let route = synth
        .synthesize(RouteRequest::new(PARIS, LYON, RouteMode::Train))
        .await
        .expect("train");

    assert!(route.departure_time.is_some());
    assert!(route.arrival_time.is_none());
}

#[rstest]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
#[case(1e30)]
fn unrepresentable_durations_have_no_arrival(#[case] minutes: f64) {
    let departure = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
    let (start, arrival) = timetable(
        Schedule {
            departure,
            arrival: None,
        },
        minutes,
    );
    assert_eq!(Some(start), departure);
    assert!(arrival.is_none());
}
