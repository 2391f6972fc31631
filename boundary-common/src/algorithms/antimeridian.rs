/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 20/04/2026
Last Modified: 21/08/2026
License: MIT
*/

use crate::structures::{MultiPolygon, Polygon, Ring};

/// Snaps a longitude to +180 or -180 if it is within `tolerance` of either.
pub fn snap_longitude(lon: f64, tolerance: f64) -> f64 {
    if (lon - 180f64).abs() <= tolerance {
        180f64
    } else if (lon + 180f64).abs() <= tolerance {
        -180f64
    } else {
        lon
    }
}

/// Moves every vertex whose longitude is within `tolerance` of the
/// antimeridian onto it. Latitudes are never touched. Returns the number of
/// vertices moved.
pub fn snap_ring_to_antimeridian(ring: &mut Ring, tolerance: f64) -> usize {
    let mut snapped = 0usize;
    for v in ring.vertices.iter_mut() {
        let x = snap_longitude(v.x, tolerance);
        if x != v.x {
            v.x = x;
            snapped += 1;
        }
    }
    snapped
}

/// Snaps the exterior ring only; holes are left as they are.
pub fn snap_polygon_to_antimeridian(polygon: &mut Polygon, tolerance: f64) -> usize {
    snap_ring_to_antimeridian(&mut polygon.exterior, tolerance)
}

/// Snaps the exterior of every part. Returns the new geometry and the
/// number of vertices moved.
pub fn snap_multipolygon_to_antimeridian(
    geometry: &MultiPolygon,
    tolerance: f64,
) -> (MultiPolygon, usize) {
    let mut out = geometry.clone();
    let mut snapped = 0usize;
    if !(tolerance >= 0f64) {
        return (out, 0);
    }
    for polygon in out.polygons.iter_mut() {
        snapped += snap_polygon_to_antimeridian(polygon, tolerance);
    }
    (out, snapped)
}
