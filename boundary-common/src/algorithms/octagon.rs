/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 24/04/2026
Last Modified: 21/08/2026
License: MIT
*/

use crate::error::{Error, Result};
use crate::projection::ProjectionProvider;
use crate::structures::{MultiPolygon, Point2D, Polygon, Ring};

/// Circumradius of the regular octagon with the given area.
/// area = 2 * sqrt(2) * R^2
pub fn octagon_circumradius(area: f64) -> f64 {
    (area / (2f64 * 2f64.sqrt())).sqrt()
}

/// A closed regular octagon with vertices at 0, 45, ..., 315 degrees.
pub fn regular_octagon(centre: Point2D, radius: f64) -> Ring {
    let mut ring = Ring::with_capacity(9);
    for k in 0..8 {
        let a = (45f64 * k as f64).to_radians();
        ring.push(Point2D::new(
            centre.x + radius * a.cos(),
            centre.y + radius * a.sin(),
        ));
    }
    ring.push(ring.first_vertex());
    ring
}

/// Replaces a geographic geometry with a regular octagon of the same
/// metric area, centred on its metric centroid. Returns `Ok(None)` when the
/// geometry is empty or its metric area is zero or not finite.
pub fn equal_area_octagon(
    geometry: &MultiPolygon,
    projection: &dyn ProjectionProvider,
) -> Result<Option<Polygon>> {
    if geometry.is_empty() {
        return Ok(None);
    }
    let mut metric = geometry.clone();
    for ring in metric.rings_mut() {
        for v in ring.vertices.iter_mut() {
            *v = projection.to_metric(v)?;
        }
    }
    let area = metric.area();
    if !area.is_finite() || area <= 0f64 {
        return Ok(None);
    }
    let centre = metric
        .centroid()
        .ok_or_else(|| Error::Other("centroid of a non-empty polygon is undefined".to_string()))?;
    let radius = octagon_circumradius(area);
    let mut ring = regular_octagon(centre, radius);
    for v in ring.vertices.iter_mut() {
        *v = projection.to_geographic(v)?;
    }
    // keep closure exact after the inverse transform
    let n = ring.len();
    ring.vertices[n - 1] = ring.vertices[0];
    Ok(Some(Polygon::new(ring, vec![])))
}
