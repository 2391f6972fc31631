/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 09/03/2026
Last Modified: 02/09/2026
License: MIT
*/

use super::line_ops::douglas_peucker;
use crate::error::Result;
use crate::projection::ProjectionProvider;
use crate::structures::{MultiPolygon, Point2D, Ring};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Parameters for ring simplification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimplifyOptions {
    /// Perpendicular distance tolerance, in metric (projected) units.
    pub tolerance: f64,
    /// Minimum number of vertices in the result, closing vertex included.
    pub min_points: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        SimplifyOptions {
            tolerance: 50f64,
            min_points: 4,
        }
    }
}

impl SimplifyOptions {
    pub fn new(tolerance: f64) -> SimplifyOptions {
        SimplifyOptions {
            tolerance,
            ..Default::default()
        }
    }
}

/// Douglas–Peucker simplification of a single closed ring. The open core
/// is projected to metric space and simplified there; the kept vertices are
/// taken from the original geographic ring so they are not disturbed by the
/// round trip. If the result would fall below `min_points`, the ring is
/// returned unchanged.
pub fn simplify_ring(
    ring: &Ring,
    options: &SimplifyOptions,
    projection: &dyn ProjectionProvider,
) -> Result<(Ring, bool)> {
    if !(options.tolerance > 0f64) || ring.len() < 4 {
        return Ok((ring.clone(), false));
    }
    let core = ring.open_vertices();
    if core.len() < 3 {
        return Ok((ring.clone(), false));
    }
    let projected: Vec<Point2D> = core
        .iter()
        .map(|p| projection.to_metric(p))
        .collect::<Result<Vec<Point2D>>>()?;

    let keep = douglas_peucker(&projected, options.tolerance);
    let kept: Vec<Point2D> = core
        .iter()
        .zip(keep.iter())
        .filter(|(_, k)| **k)
        .map(|(p, _)| *p)
        .collect();

    // the closing duplicate is appended below, so the floor applies to kept + 1
    if kept.len() + 1 < options.min_points {
        trace!(kept = kept.len(), min_points = options.min_points, "simplification reverted");
        return Ok((ring.clone(), false));
    }

    let mut out = Ring::from(kept);
    out.ensure_closed()?;
    let changed = out.len() != ring.len();
    Ok((out, changed))
}

/// Simplifies every ring of every polygon.
pub fn simplify_multipolygon(
    geometry: &MultiPolygon,
    options: &SimplifyOptions,
    projection: &dyn ProjectionProvider,
) -> Result<(MultiPolygon, bool)> {
    let mut out = geometry.clone();
    let mut changed = false;
    for ring in out.rings_mut() {
        let (r, c) = simplify_ring(ring, options, projection)?;
        if c {
            *ring = r;
            changed = true;
        }
    }
    Ok((out, changed))
}
