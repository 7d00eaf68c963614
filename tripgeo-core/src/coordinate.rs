//! WGS84 coordinates and the bounding regions built from them.
//!
//! [`Coordinate`] stores latitude and longitude in decimal degrees. The
//! constructor rejects values outside the valid ranges, and deserialisation
//! goes through the same check so trip files cannot smuggle in bad input.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places kept when a coordinate takes part in a cache key.
///
/// Five places is roughly one metre at the equator.
pub const KEY_PRECISION: i32 = 5;

/// A geographic position in decimal degrees.
///
/// # Examples
///
/// ```
/// use tripgeo_core::Coordinate;
///
/// # fn main() -> Result<(), tripgeo_core::CoordinateError> {
/// let paris = Coordinate::new(48.8566, 2.3522)?;
/// assert_eq!(paris.latitude, 48.8566);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was outside `[-90, 90]` or not finite.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude was outside `[-180, 180]` or not finite.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinate {
    /// Validates and constructs a [`Coordinate`].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Render the coordinate rounded to [`KEY_PRECISION`] decimal places.
    ///
    /// Negative zero is folded into zero so points either side of the
    /// equator or meridian that round to the same value share a key.
    #[must_use]
    pub fn key_fragment(&self) -> String {
        format!(
            "{:.prec$},{:.prec$}",
            round_for_key(self.latitude),
            round_for_key(self.longitude),
            prec = KEY_PRECISION as usize
        )
    }
}

fn round_for_key(value: f64) -> f64 {
    let scale = 10_f64.powi(KEY_PRECISION);
    (value * scale).round() / scale + 0.0
}

#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

/// An axis-aligned latitude/longitude rectangle.
///
/// `min` holds the south-west corner and `max` the north-east corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// South-west corner.
    pub min: Coordinate,
    /// North-east corner.
    pub max: Coordinate,
}

impl Bounds {
    /// A zero-area region around one point.
    #[must_use]
    pub const fn from_point(point: Coordinate) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// The smallest region covering every point, or `None` when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripgeo_core::{Bounds, Coordinate};
    ///
    /// let a = Coordinate { latitude: 40.0, longitude: -74.0 };
    /// let b = Coordinate { latitude: 49.0, longitude: 2.5 };
    /// let bounds = Bounds::covering([a, b]).expect("two points");
    /// assert!(bounds.contains(a) && bounds.contains(b));
    /// assert!(Bounds::covering(std::iter::empty()).is_none());
    /// ```
    pub fn covering<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |mut bounds, point| {
            bounds.extend(point);
            bounds
        }))
    }

    /// Grow the region so it covers `point`.
    pub fn extend(&mut self, point: Coordinate) {
        self.min.latitude = self.min.latitude.min(point.latitude);
        self.min.longitude = self.min.longitude.min(point.longitude);
        self.max.latitude = self.max.latitude.max(point.latitude);
        self.max.longitude = self.max.longitude.max(point.longitude);
    }

    /// Whether `point` lies inside the region, boundary included.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min.latitude..=self.max.latitude).contains(&point.latitude)
            && (self.min.longitude..=self.max.longitude).contains(&point.longitude)
    }

    /// Expand every side by `degrees`, clamped to the valid coordinate range.
    #[must_use]
    pub fn padded(&self, degrees: f64) -> Self {
        Self {
            min: Coordinate {
                latitude: (self.min.latitude - degrees).max(-90.0),
                longitude: (self.min.longitude - degrees).max(-180.0),
            },
            max: Coordinate {
                latitude: (self.max.latitude + degrees).min(90.0),
                longitude: (self.max.longitude + degrees).min(180.0),
            },
        }
    }
}

impl From<Bounds> for Rect<f64> {
    fn from(value: Bounds) -> Self {
        Rect::new(Coord::from(value.min), Coord::from(value.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_values(#[case] lat: f64, #[case] lon: f64) {
        assert!(Coordinate::new(lat, lon).is_ok());
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_bad_latitude(#[case] lat: f64, #[case] lon: f64) {
        assert!(matches!(
            Coordinate::new(lat, lon),
            Err(CoordinateError::Latitude(_))
        ));
    }

    #[rstest]
    #[case(0.0, 180.1)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_bad_longitude(#[case] lat: f64, #[case] lon: f64) {
        assert!(matches!(
            Coordinate::new(lat, lon),
            Err(CoordinateError::Longitude(_))
        ));
    }

    #[rstest]
    fn key_fragment_rounds_and_folds_negative_zero() {
        let near_origin = Coordinate {
            latitude: -0.000_001,
            longitude: 2.352_219_9,
        };
        assert_eq!(near_origin.key_fragment(), "0.00000,2.35222");
    }

    #[rstest]
    fn deserialises_short_field_names() {
        let coord: Coordinate =
            serde_json::from_str(r#"{"lat": 48.85, "lng": 2.35}"#).expect("valid coordinate");
        assert_eq!(coord.latitude, 48.85);
        assert_eq!(coord.longitude, 2.35);
    }

    #[rstest]
    fn deserialisation_validates_ranges() {
        let result = serde_json::from_str::<Coordinate>(r#"{"latitude": 120.0, "longitude": 0.0}"#);
        assert!(result.is_err());
    }

    #[rstest]
    fn padded_bounds_are_clamped() {
        let bounds = Bounds::from_point(Coordinate {
            latitude: 89.9,
            longitude: 179.9,
        })
        .padded(1.0);
        assert_eq!(bounds.max.latitude, 90.0);
        assert_eq!(bounds.max.longitude, 180.0);
        assert!((bounds.min.latitude - 88.9).abs() < 1e-9);
    }

    #[rstest]
    fn converts_to_geo_rect() {
        let bounds = Bounds {
            min: Coordinate {
                latitude: 10.0,
                longitude: 20.0,
            },
            max: Coordinate {
                latitude: 11.0,
                longitude: 21.0,
            },
        };
        let rect = Rect::from(bounds);
        assert_eq!(rect.min(), Coord { x: 20.0, y: 10.0 });
        assert_eq!(rect.max(), Coord { x: 21.0, y: 11.0 });
    }
}
