//! Trips and the events that make them up.
//!
//! Each [`TripEvent`] carries an [`EventKind`] describing what the event is
//! (a flight, a stay, a rental car pickup, ...). The kind decides which
//! free-text fields become geocoding queries and whether the event names one
//! place or two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Coordinate;
use crate::location::LocationRole;

/// A trip: an ordered list of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Stable identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Events in itinerary order.
    #[serde(default)]
    pub events: Vec<TripEvent>,
}

/// Whether an event is part of the settled itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Booked or otherwise settled. Missing statuses default here.
    #[default]
    Confirmed,
    /// Speculative; shown on the map but never connected by a route.
    Exploring,
}

/// One itinerary entry.
///
/// # Examples
///
/// ```
/// use tripgeo_core::{EventKindTag, EventStatus, TripEvent};
///
/// let event: TripEvent = serde_json::from_str(
///     r#"{"id": "e1", "type": "stay", "name": "Ritz Paris"}"#,
/// )?;
/// assert_eq!(event.kind.tag(), EventKindTag::Stay);
/// assert_eq!(event.status, EventStatus::Confirmed);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEvent {
    /// Stable identifier.
    pub id: String,
    /// Free-text title shown in the itinerary.
    #[serde(default)]
    pub title: String,
    /// Itinerary status; absent means confirmed.
    #[serde(default)]
    pub status: EventStatus,
    /// Coordinate attached directly to the event, bypassing geocoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    /// Kind-specific fields.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// The kind of an event together with its location fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Arriving somewhere.
    Arrival {
        /// Free-text place.
        location: String,
    },
    /// Leaving somewhere.
    Departure {
        /// Free-text place.
        location: String,
    },
    /// Overnight accommodation.
    Stay {
        /// Property name.
        name: String,
        /// Street address, preferred over the name when present.
        #[serde(default)]
        address: Option<String>,
        /// City used to disambiguate the name.
        #[serde(default)]
        city: Option<String>,
    },
    /// A place to visit.
    Destination {
        /// Place name.
        name: String,
        /// Street address, preferred over the name when present.
        #[serde(default)]
        address: Option<String>,
        /// City used to disambiguate the name.
        #[serde(default)]
        city: Option<String>,
    },
    /// A flight between two airports.
    Flight {
        /// Airport name or IATA code.
        departure_airport: String,
        /// Airport name or IATA code.
        arrival_airport: String,
        /// Scheduled departure.
        #[serde(default)]
        departure_time: Option<DateTime<Utc>>,
        /// Scheduled arrival.
        #[serde(default)]
        arrival_time: Option<DateTime<Utc>>,
    },
    /// A train journey between two stations.
    Train {
        /// Departure station.
        departure_station: String,
        /// Arrival station.
        arrival_station: String,
        /// Scheduled departure.
        #[serde(default)]
        departure_time: Option<DateTime<Utc>>,
        /// Scheduled arrival.
        #[serde(default)]
        arrival_time: Option<DateTime<Utc>>,
    },
    /// A coach or bus journey between two stops.
    Bus {
        /// Departure stop.
        departure_station: String,
        /// Arrival stop.
        arrival_station: String,
        /// Scheduled departure.
        #[serde(default)]
        departure_time: Option<DateTime<Utc>>,
        /// Scheduled arrival.
        #[serde(default)]
        arrival_time: Option<DateTime<Utc>>,
    },
    /// A hire car collected in one place and returned in another.
    RentalCar {
        /// Pickup desk.
        pickup_location: String,
        /// Drop-off desk.
        dropoff_location: String,
        /// Pickup time.
        #[serde(default)]
        pickup_time: Option<DateTime<Utc>>,
        /// Drop-off time.
        #[serde(default)]
        dropoff_time: Option<DateTime<Utc>>,
    },
    /// Any `type` this crate does not recognise. Such events are skipped.
    #[serde(other)]
    Unknown,
}

/// Field-less mirror of [`EventKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKindTag {
    /// See [`EventKind::Arrival`].
    Arrival,
    /// See [`EventKind::Departure`].
    Departure,
    /// See [`EventKind::Stay`].
    Stay,
    /// See [`EventKind::Destination`].
    Destination,
    /// See [`EventKind::Flight`].
    Flight,
    /// See [`EventKind::Train`].
    Train,
    /// See [`EventKind::Bus`].
    Bus,
    /// See [`EventKind::RentalCar`].
    RentalCar,
    /// See [`EventKind::Unknown`].
    Unknown,
}

/// One geocoding query derived from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    /// Which end of the event the query names.
    pub role: LocationRole,
    /// Text handed to the geocoder.
    pub text: String,
}

/// Departure and arrival times attached to an event, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schedule {
    /// Departure time.
    pub departure: Option<DateTime<Utc>>,
    /// Arrival time.
    pub arrival: Option<DateTime<Utc>>,
}

impl EventKind {
    /// The field-less tag for this kind.
    #[must_use]
    pub const fn tag(&self) -> EventKindTag {
        match self {
            Self::Arrival { .. } => EventKindTag::Arrival,
            Self::Departure { .. } => EventKindTag::Departure,
            Self::Stay { .. } => EventKindTag::Stay,
            Self::Destination { .. } => EventKindTag::Destination,
            Self::Flight { .. } => EventKindTag::Flight,
            Self::Train { .. } => EventKindTag::Train,
            Self::Bus { .. } => EventKindTag::Bus,
            Self::RentalCar { .. } => EventKindTag::RentalCar,
            Self::Unknown => EventKindTag::Unknown,
        }
    }

    /// Derive the geocoding queries for this event.
    ///
    /// Single-place kinds yield one query; journeys yield a departure and an
    /// arrival query. Blank fields produce no query.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripgeo_core::{EventKind, LocationRole};
    ///
    /// let flight = EventKind::Flight {
    ///     departure_airport: "JFK".into(),
    ///     arrival_airport: "Paris Charles de Gaulle".into(),
    ///     departure_time: None,
    ///     arrival_time: None,
    /// };
    /// let queries = flight.location_queries();
    /// assert_eq!(queries[0].text, "JFK airport");
    /// assert_eq!(queries[1].role, LocationRole::Arrival);
    /// ```
    #[must_use]
    pub fn location_queries(&self) -> Vec<LocationQuery> {
        let candidates = match self {
            Self::Arrival { location } | Self::Departure { location } => {
                vec![(LocationRole::Single, location.trim().to_owned())]
            }
            Self::Stay {
                name,
                address,
                city,
            }
            | Self::Destination {
                name,
                address,
                city,
            } => vec![(
                LocationRole::Single,
                venue_query(name, address.as_deref(), city.as_deref()),
            )],
            Self::Flight {
                departure_airport,
                arrival_airport,
                ..
            } => vec![
                (LocationRole::Departure, airport_query(departure_airport)),
                (LocationRole::Arrival, airport_query(arrival_airport)),
            ],
            Self::Train {
                departure_station,
                arrival_station,
                ..
            }
            | Self::Bus {
                departure_station,
                arrival_station,
                ..
            } => vec![
                (LocationRole::Departure, departure_station.trim().to_owned()),
                (LocationRole::Arrival, arrival_station.trim().to_owned()),
            ],
            Self::RentalCar {
                pickup_location,
                dropoff_location,
                ..
            } => vec![
                (LocationRole::Departure, pickup_location.trim().to_owned()),
                (LocationRole::Arrival, dropoff_location.trim().to_owned()),
            ],
            Self::Unknown => Vec::new(),
        };
        candidates
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(role, text)| LocationQuery { role, text })
            .collect()
    }

    /// Times attached to the event, if it is a journey.
    #[must_use]
    pub const fn schedule(&self) -> Schedule {
        match self {
            Self::Flight {
                departure_time,
                arrival_time,
                ..
            }
            | Self::Train {
                departure_time,
                arrival_time,
                ..
            }
            | Self::Bus {
                departure_time,
                arrival_time,
                ..
            } => Schedule {
                departure: *departure_time,
                arrival: *arrival_time,
            },
            Self::RentalCar {
                pickup_time,
                dropoff_time,
                ..
            } => Schedule {
                departure: *pickup_time,
                arrival: *dropoff_time,
            },
            Self::Arrival { .. }
            | Self::Departure { .. }
            | Self::Stay { .. }
            | Self::Destination { .. }
            | Self::Unknown => Schedule {
                departure: None,
                arrival: None,
            },
        }
    }
}

/// Expand a bare IATA code so the geocoder finds the airport, not a town.
fn airport_query(raw: &str) -> String {
    let trimmed = raw.trim();
    let is_iata = trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_uppercase());
    if is_iata {
        format!("{trimmed} airport")
    } else {
        trimmed.to_owned()
    }
}

fn venue_query(name: &str, address: Option<&str>, city: Option<&str>) -> String {
    let name = name.trim();
    if let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) {
        return address.to_owned();
    }
    match city.map(str::trim).filter(|c| !c.is_empty()) {
        Some(city) if !name.is_empty() => format!("{name}, {city}"),
        Some(city) => city.to_owned(),
        None => name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn texts(kind: &EventKind) -> Vec<String> {
        kind.location_queries().into_iter().map(|q| q.text).collect()
    }

    #[rstest]
    #[case("JFK", "JFK airport")]
    #[case(" cdg ", "cdg")]
    #[case("Heathrow", "Heathrow")]
    fn airport_codes_are_expanded(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(airport_query(raw), expected);
    }

    #[rstest]
    #[case(Some("15 Place Vendôme"), Some("Paris"), "15 Place Vendôme")]
    #[case(None, Some("Paris"), "Ritz, Paris")]
    #[case(Some("  "), None, "Ritz")]
    fn venue_prefers_address_then_city(
        #[case] address: Option<&str>,
        #[case] city: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(venue_query("Ritz", address, city), expected);
    }

    #[rstest]
    fn rental_car_yields_pickup_and_dropoff() {
        let kind = EventKind::RentalCar {
            pickup_location: "Nice airport".into(),
            dropoff_location: "Marseille".into(),
            pickup_time: None,
            dropoff_time: None,
        };
        let queries = kind.location_queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].role, LocationRole::Departure);
        assert_eq!(queries[1].text, "Marseille");
    }

    #[rstest]
    fn blank_fields_produce_no_query() {
        let kind = EventKind::Train {
            departure_station: "Paris Gare de Lyon".into(),
            arrival_station: "   ".into(),
            departure_time: None,
            arrival_time: None,
        };
        assert_eq!(texts(&kind), vec!["Paris Gare de Lyon".to_owned()]);
    }

    #[rstest]
    fn deserialises_tagged_events_with_defaults() {
        let json = r#"[
            {"id": "1", "type": "flight", "departure_airport": "JFK",
             "arrival_airport": "CDG", "departure_time": "2025-06-01T18:00:00Z"},
            {"id": "2", "type": "destination", "name": "Louvre", "status": "exploring"},
            {"id": "3", "type": "rental_car", "pickup_location": "Nice",
             "dropoff_location": "Nice", "coordinate": {"lat": 43.66, "lon": 7.21}}
        ]"#;
        let events: Vec<TripEvent> = serde_json::from_str(json).expect("valid events");

        assert_eq!(events[0].kind.tag(), EventKindTag::Flight);
        assert!(events[0].kind.schedule().departure.is_some());
        assert!(events[0].kind.schedule().arrival.is_none());
        assert_eq!(events[1].status, EventStatus::Exploring);
        assert_eq!(events[2].kind.tag(), EventKindTag::RentalCar);
        assert!(events[2].coordinate.is_some());
    }

    #[rstest]
    fn unknown_event_types_decode_as_unknown() {
        let event: TripEvent =
            serde_json::from_str(r#"{"id": "x", "type": "cruise", "ship": "Aurora"}"#)
                .expect("unknown types still decode");
        assert_eq!(event.kind, EventKind::Unknown);
        assert_eq!(event.kind.tag(), EventKindTag::Unknown);
        assert!(event.kind.location_queries().is_empty());
        assert_eq!(event.kind.schedule(), Schedule::default());
    }

    #[rstest]
    fn one_unknown_event_does_not_sink_the_trip() {
        let trip: Trip = serde_json::from_str(
            r#"{"id": "t", "events": [
                {"id": "a", "type": "activity", "name": "Kayaking"},
                {"id": "b", "type": "stay", "name": "Ritz Paris"}
            ]}"#,
        )
        .expect("trip decodes");
        assert_eq!(trip.events.len(), 2);
        assert_eq!(trip.events[0].kind.tag(), EventKindTag::Unknown);
        assert_eq!(trip.events[1].kind.tag(), EventKindTag::Stay);
    }

    #[rstest]
    fn missing_event_type_is_rejected() {
        let result = serde_json::from_str::<TripEvent>(r#"{"id": "x", "name": "Louvre"}"#);
        assert!(result.is_err());
    }
}
