//! Assemble the map geometry for a whole trip.
//!
//! One pass resolves every event to locations in itinerary order, then
//! routes consecutive confirmed locations concurrently. Nothing that goes
//! wrong for a single event or leg aborts the pass; the affected location or
//! route is simply missing from the result.

use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::location::{LocationRole, ResolvedLocation};
use crate::resolver::LocationResolver;
use crate::route::{RouteInfo, RouteMode, RouteRequest};
use crate::synthesizer::RouteSynthesizer;
use crate::trip::{EventKind, Schedule, Trip, TripEvent};
use crate::{Bounds, Coordinate};

/// Everything needed to draw a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripGeometry {
    /// Locations in itinerary order.
    pub locations: Vec<ResolvedLocation>,
    /// Legs between consecutive confirmed locations, in the same order.
    pub routes: Vec<RouteInfo>,
    /// Region covering every location and route point, if any resolved.
    pub bounds: Option<Bounds>,
}

/// Drives the resolver and synthesizer over a trip.
#[derive(Debug)]
pub struct TripGeoAssembler {
    resolver: LocationResolver,
    synthesizer: RouteSynthesizer,
}

impl TripGeoAssembler {
    /// Build an assembler from its two stages.
    #[must_use]
    pub fn new(resolver: LocationResolver, synthesizer: RouteSynthesizer) -> Self {
        Self {
            resolver,
            synthesizer,
        }
    }

    /// The resolver stage.
    #[must_use]
    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// The synthesizer stage.
    #[must_use]
    pub fn synthesizer(&self) -> &RouteSynthesizer {
        &self.synthesizer
    }

    /// Produce the geometry for `trip`.
    pub async fn assemble(&self, trip: &Trip) -> TripGeometry {
        let locations = self.resolve_locations(&trip.events).await;
        let routes = self.route_locations(&trip.events, &locations).await;
        let bounds = Bounds::covering(
            locations.iter().map(|location| location.coordinate).chain(
                routes
                    .iter()
                    .flat_map(|route| route.coordinates.iter().copied()),
            ),
        );
        info!(
            "assembled trip {}: {} of {} events placed, {} routes",
            trip.id,
            locations
                .iter()
                .map(|l| l.source_event_id.as_str())
                .collect::<HashSet<_>>()
                .len(),
            trip.events.len(),
            routes.len()
        );
        TripGeometry {
            locations,
            routes,
            bounds,
        }
    }

    /// Resolve events serially so the rate limiter sees calls in order.
    async fn resolve_locations(&self, events: &[TripEvent]) -> Vec<ResolvedLocation> {
        let mut locations = Vec::with_capacity(events.len());
        for event in events {
            if event.kind == EventKind::Unknown {
                warn!("skipping event {} of unrecognised type", event.id);
                continue;
            }
            let located =
                |coordinate: Coordinate, display_name: String, role: LocationRole| {
                    ResolvedLocation {
                        coordinate,
                        display_name,
                        source_event_id: event.id.clone(),
                        source_event_kind: event.kind.tag(),
                        status: event.status,
                        role,
                    }
                };
            let queries = event.kind.location_queries();

            if let Some(coordinate) = event.coordinate {
                let name = display_name_for(event, queries.first().map(|q| q.text.as_str()));
                locations.push(located(coordinate, name, LocationRole::Single));
                continue;
            }
            for query in queries {
                match self.resolver.resolve(&query.text).await {
                    Some(place) => {
                        locations.push(located(place.coordinate, place.display_name, query.role));
                    }
                    None => debug!("dropping unresolved {:?} for event {}", query.text, event.id),
                }
            }
        }
        locations
    }

    async fn route_locations(
        &self,
        events: &[TripEvent],
        locations: &[ResolvedLocation],
    ) -> Vec<RouteInfo> {
        let schedules: HashMap<&str, Schedule> = events
            .iter()
            .map(|event| (event.id.as_str(), event.kind.schedule()))
            .collect();
        let routable: Vec<&ResolvedLocation> = locations
            .iter()
            .filter(|location| location.is_routable())
            .collect();

        let legs = routable.windows(2).filter_map(|pair| match pair {
            [from, to] => {
                let mode = RouteMode::for_pair(from, to);
                let mut request = RouteRequest::new(from.coordinate, to.coordinate, mode);
                if from.source_event_id == to.source_event_id
                    && let Some(schedule) = schedules.get(from.source_event_id.as_str())
                {
                    request = request.with_schedule(*schedule);
                }
                Some(self.synthesizer.synthesize(request))
            }
            _ => None,
        });
        join_all(legs).await.into_iter().flatten().collect()
    }
}

fn display_name_for(event: &TripEvent, query: Option<&str>) -> String {
    let title = event.title.trim();
    if !title.is_empty() {
        return title.to_owned();
    }
    query.map_or_else(|| event.id.clone(), str::to_owned)
}
