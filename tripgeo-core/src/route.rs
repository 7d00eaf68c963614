//! Routes between consecutive trip locations.
//!
//! A [`RouteInfo`] is the drawable geometry for one leg together with its
//! length, duration, transport mode and optional schedule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Coordinate;
use crate::location::ResolvedLocation;
use crate::trip::{EventKindTag, Schedule};

/// How a leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Road routing through the routing service.
    #[default]
    Driving,
    /// Rail, drawn along a rail line when one is known.
    Train,
    /// Air, drawn as an arc.
    Flight,
}

impl RouteMode {
    /// Stable lowercase name used in cache keys and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Train => "train",
            Self::Flight => "flight",
        }
    }

    /// Pick the mode for a leg between two locations.
    ///
    /// Train wins over flight, and anything else drives.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripgeo_core::{EventKindTag, RouteMode};
    ///
    /// assert_eq!(
    ///     RouteMode::for_kinds(EventKindTag::Flight, EventKindTag::Train),
    ///     RouteMode::Train
    /// );
    /// assert_eq!(
    ///     RouteMode::for_kinds(EventKindTag::Stay, EventKindTag::Flight),
    ///     RouteMode::Flight
    /// );
    /// assert_eq!(
    ///     RouteMode::for_kinds(EventKindTag::Stay, EventKindTag::Bus),
    ///     RouteMode::Driving
    /// );
    /// ```
    #[must_use]
    pub fn for_kinds(from: EventKindTag, to: EventKindTag) -> Self {
        let either = |tag| from == tag || to == tag;
        if either(EventKindTag::Train) {
            Self::Train
        } else if either(EventKindTag::Flight) {
            Self::Flight
        } else {
            Self::Driving
        }
    }

    /// Pick the mode for a leg between two resolved locations.
    #[must_use]
    pub fn for_pair(from: &ResolvedLocation, to: &ResolvedLocation) -> Self {
        Self::for_kinds(from.source_event_kind, to.source_event_kind)
    }
}

impl std::fmt::Display for RouteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to draw one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Start point.
    pub start: Coordinate,
    /// End point.
    pub end: Coordinate,
    /// Transport mode.
    pub mode: RouteMode,
    /// Times forwarded from the source event, if any.
    pub schedule: Schedule,
}

impl RouteRequest {
    /// A request with no schedule.
    #[must_use]
    pub fn new(start: Coordinate, end: Coordinate, mode: RouteMode) -> Self {
        Self {
            start,
            end,
            mode,
            schedule: Schedule::default(),
        }
    }

    /// Attach departure and arrival times.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }
}

/// The drawable geometry and metrics for one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Path from start to end; always at least two points.
    pub coordinates: Vec<Coordinate>,
    /// Travel time in minutes.
    pub duration_minutes: f64,
    /// Path length in metres.
    pub distance_meters: f64,
    /// Transport mode.
    pub mode: RouteMode,
    /// Departure time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
    /// Arrival time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<DateTime<Utc>>,
}

impl RouteInfo {
    /// First point of the path.
    #[must_use]
    pub fn start(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    /// Last point of the path.
    #[must_use]
    pub fn end(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }

    /// Whether `point` is one of the path's endpoints.
    #[must_use]
    pub fn touches(&self, point: Coordinate) -> bool {
        self.start() == Some(point) || self.end() == Some(point)
    }
}
