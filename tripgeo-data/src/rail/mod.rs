//! Rail line geometry from the Overpass API, used to draw train legs along
//! real track.

mod overpass;
mod provider;

pub use provider::{DEFAULT_OVERPASS_URL, DEFAULT_QUERY_TIMEOUT_SECS, OverpassRailLines};
