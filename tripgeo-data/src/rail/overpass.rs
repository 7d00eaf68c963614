//! Overpass JSON response types for `out geom` queries.

use serde::Deserialize;
use tripgeo_core::{Coordinate, MapDataError};

/// Top-level Overpass response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<ElementDto>,
}

/// One OSM element. Only ways carry a `geometry`.
#[derive(Debug, Deserialize)]
pub struct ElementDto {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Vec<LatLonDto>,
}

#[derive(Debug, Deserialize)]
pub struct LatLonDto {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassResponse {
    /// Polylines for every way with at least two vertices.
    pub fn into_lines(self) -> Result<Vec<Vec<Coordinate>>, MapDataError> {
        self.elements
            .into_iter()
            .filter(|element| element.kind == "way" && element.geometry.len() >= 2)
            .map(|element| {
                element
                    .geometry
                    .into_iter()
                    .map(|point| {
                        Coordinate::new(point.lat, point.lon).map_err(|err| {
                            MapDataError::parse(format!("bad rail vertex: {err}"))
                        })
                    })
                    .collect()
            })
            .collect()
    }
}
