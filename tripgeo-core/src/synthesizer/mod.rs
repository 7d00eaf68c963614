//! Turn a pair of coordinates and a transport mode into a drawable route.
//!
//! Driving legs go through the [`RoutingService`]. Train legs are drawn
//! straight, or along a rail line when [`MapDataService`] knows one nearby.
//! Flights are analytic arcs. Every computed route is cached.

mod arc;
mod rail;

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, warn};

use crate::cache::{LookupKey, PersistentCache};
use crate::distance::{haversine_meters, minutes_at_speed, polyline_length_meters};
use crate::ports::{MapDataService, RoutingService};
use crate::route::{RouteInfo, RouteMode, RouteRequest};
use crate::trip::Schedule;
use crate::{Bounds, Coordinate};

pub use arc::flight_arc;
pub use rail::follow_rail_line;

/// Endpoints closer than this are treated as the same place.
pub const DEGENERATE_METERS: f64 = 1.0;

/// How route cache keys treat the transport mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteKeying {
    /// The mode is part of the key; each mode is computed separately.
    #[default]
    PerMode,
    /// Modes share one entry per endpoint pair; the cached path is reused
    /// and relabelled with the requested mode.
    SharedPath,
}

/// Tunables for [`RouteSynthesizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizerConfig {
    /// Cache keying policy.
    pub keying: RouteKeying,
    /// Assumed train speed.
    pub train_speed_kmh: f64,
    /// Assumed cruising speed for flights.
    pub flight_speed_kmh: f64,
    /// Points in a flight arc.
    pub arc_points: usize,
    /// Peak latitude offset of a flight arc, in degrees.
    pub arc_height_degrees: f64,
    /// Direct distances at or above this skip the rail lookup.
    pub rail_lookup_ceiling_meters: f64,
    /// Padding around the endpoints for the rail lookup, in degrees.
    pub rail_padding_degrees: f64,
    /// How close a rail line must pass to each endpoint.
    pub rail_snap_meters: f64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            keying: RouteKeying::PerMode,
            train_speed_kmh: 120.0,
            flight_speed_kmh: 800.0,
            arc_points: 50,
            arc_height_degrees: 0.5,
            rail_lookup_ceiling_meters: 250_000.0,
            rail_padding_degrees: 0.05,
            rail_snap_meters: 2_000.0,
        }
    }
}

impl SynthesizerConfig {
    /// Override the cache keying policy.
    #[must_use]
    pub fn with_keying(mut self, keying: RouteKeying) -> Self {
        self.keying = keying;
        self
    }

    /// Override the rail lookup ceiling.
    #[must_use]
    pub fn with_rail_lookup_ceiling(mut self, meters: f64) -> Self {
        self.rail_lookup_ceiling_meters = meters;
        self
    }

    /// Override the number of points in a flight arc.
    #[must_use]
    pub fn with_arc_points(mut self, points: usize) -> Self {
        self.arc_points = points;
        self
    }
}

/// Builds and caches [`RouteInfo`] values.
pub struct RouteSynthesizer {
    routing: Arc<dyn RoutingService>,
    map_data: Option<Arc<dyn MapDataService>>,
    cache: Arc<PersistentCache<RouteInfo>>,
    config: SynthesizerConfig,
}

impl std::fmt::Debug for RouteSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteSynthesizer")
            .field("rail_lookup", &self.map_data.is_some())
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouteSynthesizer {
    /// Synthesizer with default tunables and no rail lookup.
    pub fn new(routing: Arc<dyn RoutingService>, cache: Arc<PersistentCache<RouteInfo>>) -> Self {
        Self {
            routing,
            map_data: None,
            cache,
            config: SynthesizerConfig::default(),
        }
    }

    /// Draw train legs along rail lines from `map_data`.
    #[must_use]
    pub fn with_map_data(mut self, map_data: Arc<dyn MapDataService>) -> Self {
        self.map_data = Some(map_data);
        self
    }

    /// Replace the tunables.
    #[must_use]
    pub fn with_config(mut self, config: SynthesizerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active tunables.
    #[must_use]
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// The cache backing this synthesizer.
    #[must_use]
    pub fn cache(&self) -> &Arc<PersistentCache<RouteInfo>> {
        &self.cache
    }

    /// Produce a route for `request`.
    ///
    /// Returns `None` only when a driving leg cannot be routed.
    pub async fn synthesize(&self, request: RouteRequest) -> Option<RouteInfo> {
        let RouteRequest {
            start,
            end,
            mode,
            schedule,
        } = request;

        if haversine_meters(start, end) < DEGENERATE_METERS {
            let still = RouteInfo {
                coordinates: vec![start, end],
                duration_minutes: 0.0,
                distance_meters: 0.0,
                mode,
                departure_time: None,
                arrival_time: None,
            };
            return Some(with_times(still, schedule));
        }

        let key = match self.config.keying {
            RouteKeying::PerMode => LookupKey::route(start, end, Some(mode)),
            RouteKeying::SharedPath => LookupKey::route(start, end, None),
        };
        if let Some(mut cached) = self.cache.get(&key) {
            debug!("route cache hit for {key}");
            cached.mode = mode;
            return Some(with_times(cached, schedule));
        }

        let route = match mode {
            RouteMode::Driving => self.drive(start, end).await?,
            RouteMode::Train => self.train(start, end).await,
            RouteMode::Flight => self.fly(start, end),
        };
        self.cache.set(key, route.clone()).await;
        Some(with_times(route, schedule))
    }

    async fn drive(&self, start: Coordinate, end: Coordinate) -> Option<RouteInfo> {
        let path = match self.routing.route(start, end).await {
            Ok(path) => path,
            Err(err) => {
                warn!("driving route failed: {err}");
                return None;
            }
        };
        let coordinates = if path.coordinates.len() >= 2 {
            path.coordinates
        } else {
            vec![start, end]
        };
        Some(RouteInfo {
            coordinates,
            duration_minutes: (path.duration_seconds / 60.0).max(0.0),
            distance_meters: path.distance_meters.max(0.0),
            mode: RouteMode::Driving,
            departure_time: None,
            arrival_time: None,
        })
    }

    async fn train(&self, start: Coordinate, end: Coordinate) -> RouteInfo {
        let direct = haversine_meters(start, end);
        let followed = match &self.map_data {
            Some(map_data) if direct < self.config.rail_lookup_ceiling_meters => {
                self.rail_path(map_data.as_ref(), start, end).await
            }
            _ => None,
        };
        let (coordinates, distance_meters) = match followed {
            Some(path) => {
                let length = polyline_length_meters(&path);
                (path, length)
            }
            None => (vec![start, end], direct),
        };
        RouteInfo {
            coordinates,
            duration_minutes: minutes_at_speed(distance_meters, self.config.train_speed_kmh),
            distance_meters,
            mode: RouteMode::Train,
            departure_time: None,
            arrival_time: None,
        }
    }

    async fn rail_path(
        &self,
        map_data: &dyn MapDataService,
        start: Coordinate,
        end: Coordinate,
    ) -> Option<Vec<Coordinate>> {
        let bounds = Bounds::covering([start, end])?.padded(self.config.rail_padding_degrees);
        match map_data.lines_near(bounds).await {
            Ok(lines) => {
                let path = follow_rail_line(&lines, start, end, self.config.rail_snap_meters);
                if path.is_none() {
                    debug!("no rail line joins the endpoints; drawing a straight line");
                }
                path
            }
            Err(err) => {
                warn!("rail line lookup failed; drawing a straight line: {err}");
                None
            }
        }
    }

    fn fly(&self, start: Coordinate, end: Coordinate) -> RouteInfo {
        let distance_meters = haversine_meters(start, end);
        RouteInfo {
            coordinates: flight_arc(
                start,
                end,
                self.config.arc_points,
                self.config.arc_height_degrees,
            ),
            duration_minutes: minutes_at_speed(distance_meters, self.config.flight_speed_kmh),
            distance_meters,
            mode: RouteMode::Flight,
            departure_time: None,
            arrival_time: None,
        }
    }
}

/// Stamp a cached or freshly computed route with the request's times.
///
/// Cached routes never carry times, so one event's timetable cannot leak
/// onto another leg between the same endpoints.
fn with_times(mut route: RouteInfo, schedule: Schedule) -> RouteInfo {
    if route.mode == RouteMode::Train {
        let (departure, arrival) = timetable(schedule, route.duration_minutes);
        route.departure_time = Some(departure);
        route.arrival_time = arrival;
    } else {
        route.departure_time = schedule.departure;
        route.arrival_time = schedule.arrival;
    }
    route
}

/// Departure and arrival for a train leg, filling gaps from the current time.
///
/// The arrival is `None` when the duration does not fit a timestamp.
fn timetable(
    schedule: Schedule,
    duration_minutes: f64,
) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    let departure = schedule.departure.unwrap_or_else(Utc::now);
    let arrival = schedule.arrival.or_else(|| {
        let seconds = (duration_minutes * 60.0).round();
        if !seconds.is_finite() {
            return None;
        }
        // Saturates for huge values, which `try_seconds` then rejects.
        let offset = ChronoDuration::try_seconds(seconds as i64)?;
        departure.checked_add_signed(offset)
    });
    (departure, arrival)
}

#[cfg(test)]
mod tests;
