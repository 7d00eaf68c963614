//! Snapping train legs onto known rail lines.

use crate::Coordinate;
use crate::distance::haversine_meters;

/// Follow the rail line that passes closest to both endpoints.
///
/// A line qualifies when it has vertices within `snap_meters` of both
/// `start` and `end`. The best qualifying line is the one with the smallest
/// combined snap distance. The returned path begins at `start`, runs along
/// the line between the two snap vertices and finishes at `end`.
#[must_use]
pub fn follow_rail_line(
    lines: &[Vec<Coordinate>],
    start: Coordinate,
    end: Coordinate,
    snap_meters: f64,
) -> Option<Vec<Coordinate>> {
    let (line, from, to) = lines
        .iter()
        .filter_map(|line| {
            let (from, from_gap) = nearest_vertex(line, start)?;
            let (to, to_gap) = nearest_vertex(line, end)?;
            (from != to && from_gap <= snap_meters && to_gap <= snap_meters)
                .then_some((line, from, to, from_gap + to_gap))
        })
        .min_by(|a, b| a.3.total_cmp(&b.3))
        .map(|(line, from, to, _)| (line, from, to))?;

    let mut path = Vec::with_capacity(from.abs_diff(to) + 3);
    path.push(start);
    if from < to {
        path.extend(line.get(from..=to)?.iter().copied());
    } else {
        path.extend(line.get(to..=from)?.iter().rev().copied());
    }
    path.push(end);
    path.dedup();
    if path.len() < 2 {
        return None;
    }
    Some(path)
}

fn nearest_vertex(line: &[Coordinate], target: Coordinate) -> Option<(usize, f64)> {
    line.iter()
        .enumerate()
        .map(|(index, vertex)| (index, haversine_meters(*vertex, target)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
