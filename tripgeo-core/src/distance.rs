//! Great-circle distance helpers.

use crate::Coordinate;

/// Mean Earth radius used by [`haversine_meters`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Convert decimal degrees to radians.
#[must_use]
pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Convert radians to decimal degrees.
#[must_use]
pub fn to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Great-circle distance between two points, in metres.
///
/// # Examples
///
/// ```
/// use tripgeo_core::{Coordinate, distance::haversine_meters};
///
/// let paris = Coordinate { latitude: 48.8566, longitude: 2.3522 };
/// let london = Coordinate { latitude: 51.5074, longitude: -0.1278 };
/// let meters = haversine_meters(paris, london);
/// assert!((meters - 343_500.0).abs() < 1_000.0);
/// assert_eq!(haversine_meters(paris, paris), 0.0);
/// ```
#[must_use]
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = to_radians(a.latitude);
    let lat_b = to_radians(b.latitude);
    let half_dlat = to_radians(b.latitude - a.latitude) / 2.0;
    let half_dlon = to_radians(b.longitude - a.longitude) / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    // Rounding can push `h` a hair above one for antipodal points.
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Sum of the great-circle lengths of every segment in `points`.
#[must_use]
pub fn polyline_length_meters(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(haversine_meters(*a, *b)),
            _ => None,
        })
        .sum()
}

/// Minutes needed to cover `meters` at a constant `km_per_hour`.
///
/// Non-positive speeds yield zero rather than infinity.
#[must_use]
pub fn minutes_at_speed(meters: f64, km_per_hour: f64) -> f64 {
    if km_per_hour <= 0.0 {
        return 0.0;
    }
    meters / 1_000.0 / km_per_hour * 60.0
}
