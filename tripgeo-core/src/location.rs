//! Places returned by geocoding and the locations the assembler builds from
//! them.

use serde::{Deserialize, Serialize};

use crate::Coordinate;
use crate::trip::{EventKindTag, EventStatus};

/// A geocoded place: a coordinate and the name the geocoder gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Position of the place.
    pub coordinate: Coordinate,
    /// Human-readable name.
    pub display_name: String,
}

/// Which end of an event a location represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationRole {
    /// The only place named by a single-location event.
    #[default]
    Single,
    /// Where a journey starts.
    Departure,
    /// Where a journey ends.
    Arrival,
}

/// A location placed on the map for one trip event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Position of the location.
    pub coordinate: Coordinate,
    /// Name shown to the user.
    pub display_name: String,
    /// Identifier of the event that produced this location.
    pub source_event_id: String,
    /// Kind of the event that produced this location.
    pub source_event_kind: EventKindTag,
    /// Status copied from the source event.
    pub status: EventStatus,
    /// Which end of the source event this is.
    pub role: LocationRole,
}

impl ResolvedLocation {
    /// Whether the location takes part in routing.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.status == EventStatus::Confirmed
    }
}
