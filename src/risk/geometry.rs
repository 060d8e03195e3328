//! Polygon construction and simplicity checks for parcel and zone rings.
//!
//! All polygons use x = longitude, y = latitude.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Coord, Line, LineString, Polygon};

/// Coordinate from a (latitude, longitude) pair
pub fn coord_from_lat_lon((lat, lon): (f64, f64)) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

/// Coordinate from a registry (longitude, latitude) pair
pub fn coord_from_lon_lat([lon, lat]: [f64; 2]) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

/// Build a simple polygon from an open or closed ring.
///
/// Consecutive duplicate vertices are collapsed. Fails with a reason when the
/// ring has fewer than 3 distinct vertices, crosses itself, or encloses no area.
pub fn polygon_from_ring(coords: impl IntoIterator<Item = Coord<f64>>) -> Result<Polygon<f64>, String> {
    let mut ring: Vec<Coord<f64>> = Vec::new();
    for c in coords {
        if !(c.x.is_finite() && c.y.is_finite()) {
            return Err(format!("non-finite vertex ({}, {})", c.x, c.y));
        }
        if ring.last() != Some(&c) {
            ring.push(c);
        }
    }

    // Drop explicit closure, we close it ourselves
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    if ring.len() < 3 {
        return Err(format!("ring has only {} distinct vertices", ring.len()));
    }

    check_simple(&ring)?;

    ring.push(ring[0]);
    let polygon = Polygon::new(LineString::new(ring), vec![]);

    let area = polygon.unsigned_area();
    if !(area > 0.0 && area.is_finite()) {
        return Err("ring encloses no area".to_string());
    }

    Ok(polygon)
}

/// Reject rings whose edges cross or overlap anywhere but at shared vertices
fn check_simple(ring: &[Coord<f64>]) -> Result<(), String> {
    let n = ring.len();
    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| Line::new(ring[i], ring[(i + 1) % n]))
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
                Some(LineIntersection::Collinear { intersection })
                    if adjacent && intersection.start == intersection.end => {}
                Some(LineIntersection::Collinear { .. }) => {
                    return Err(format!("edges {} and {} overlap", i, j));
                }
                Some(LineIntersection::SinglePoint { .. }) => {
                    return Err(format!("edges {} and {} cross", i, j));
                }
            }
        }
    }

    Ok(())
}

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
