//! Arcs drawn for flights.

use std::f64::consts::PI;

use crate::Coordinate;

/// Interpolate a gently bowed path from `start` to `end`.
///
/// Latitude and longitude are interpolated linearly and the latitude is
/// lifted by `sin(t * PI) * height_degrees`, so the midpoint sits highest.
/// The longitude step takes the short way round, crossing the antimeridian
/// when that is shorter. The first and last points are exactly `start` and
/// `end`.
///
/// # Examples
///
/// ```
/// use tripgeo_core::{Coordinate, synthesizer::flight_arc};
///
/// let jfk = Coordinate { latitude: 40.6413, longitude: -73.7781 };
/// let cdg = Coordinate { latitude: 49.0097, longitude: 2.5479 };
/// let arc = flight_arc(jfk, cdg, 50, 0.5);
/// assert_eq!(arc.len(), 50);
/// assert_eq!(arc.first(), Some(&jfk));
/// assert_eq!(arc.last(), Some(&cdg));
/// ```
#[must_use]
pub fn flight_arc(
    start: Coordinate,
    end: Coordinate,
    points: usize,
    height_degrees: f64,
) -> Vec<Coordinate> {
    let points = points.max(2);
    let mut delta_lon = end.longitude - start.longitude;
    if delta_lon > 180.0 {
        delta_lon -= 360.0;
    } else if delta_lon < -180.0 {
        delta_lon += 360.0;
    }
    let delta_lat = end.latitude - start.latitude;
    let last = points - 1;

    (0..points)
        .map(|i| {
            if i == 0 {
                return start;
            }
            if i == last {
                return end;
            }
            let t = i as f64 / last as f64;
            let bow = (t * PI).sin() * height_degrees;
            Coordinate {
                latitude: (start.latitude + delta_lat * t + bow).clamp(-90.0, 90.0),
                longitude: wrap_longitude(start.longitude + delta_lon * t),
            }
        })
        .collect()
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    #[rstest]
    fn midpoint_is_lifted() {
        let arc = flight_arc(coord(0.0, 0.0), coord(0.0, 10.0), 3, 0.5);
        assert!((arc[1].latitude - 0.5).abs() < 1e-9);
        assert!((arc[1].longitude - 5.0).abs() < 1e-9);
    }

    #[rstest]
    fn crosses_the_antimeridian_the_short_way() {
        let arc = flight_arc(coord(-33.9, 151.2), coord(21.3, -157.9), 50, 0.5);
        assert!(
            arc.iter()
                .all(|p| p.longitude >= 150.0 || p.longitude <= -157.0),
            "arc wandered across the globe"
        );
        assert!(arc.iter().all(|p| (-180.0..=180.0).contains(&p.longitude)));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn degenerate_point_counts_still_pin_endpoints(#[case] points: usize) {
        let a = coord(1.0, 2.0);
        let b = coord(3.0, 4.0);
        assert_eq!(flight_arc(a, b, points, 0.5), vec![a, b]);
    }
}
