/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 07/03/2026
Last Modified: 19/10/2026
License: MIT

Notes: Rings are supplied in geographic coordinates. In planar mode the
whole ring is projected once, edges are split by linear interpolation in the
metric space and the new points are projected back. In geodesic mode the
edge lengths and the interior points both come from the geodesic. Either way
the original vertices are copied through unchanged.
*/

use crate::error::Result;
use crate::projection::ProjectionProvider;
use crate::structures::{MultiPolygon, Point2D, Ring};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// How edge length is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensifyMetric {
    /// Euclidean distance in the projected metric space.
    Planar,
    /// Distance along the ellipsoid.
    Geodesic,
}

impl Default for DensifyMetric {
    fn default() -> Self {
        DensifyMetric::Geodesic
    }
}

impl fmt::Display for DensifyMetric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DensifyMetric::Planar => write!(f, "planar"),
            DensifyMetric::Geodesic => write!(f, "geodesic"),
        }
    }
}

impl FromStr for DensifyMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planar" | "euclidean" | "metric" => Ok(DensifyMetric::Planar),
            "geodesic" | "great_circle" | "greatcircle" => Ok(DensifyMetric::Geodesic),
            _ => Err(format!("unrecognized densification metric '{}'", s)),
        }
    }
}

fn edge_lengths(
    ring: &Ring,
    metric: DensifyMetric,
    projection: &dyn ProjectionProvider,
    projected: Option<&[Point2D]>,
) -> Result<Vec<f64>> {
    let mut lengths = Vec::with_capacity(ring.num_segments());
    match metric {
        DensifyMetric::Planar => {
            let owned;
            let pts = match projected {
                Some(p) => p,
                None => {
                    owned = project_all(ring, projection)?;
                    &owned[..]
                }
            };
            for w in pts.windows(2) {
                lengths.push(w[0].distance(&w[1]));
            }
        }
        DensifyMetric::Geodesic => {
            for w in ring.vertices.windows(2) {
                lengths.push(projection.geodesic_distance(&w[0], &w[1])?);
            }
        }
    }
    Ok(lengths)
}

fn project_all(ring: &Ring, projection: &dyn ProjectionProvider) -> Result<Vec<Point2D>> {
    ring.vertices
        .iter()
        .map(|p| projection.to_metric(p))
        .collect()
}

/// An open ring is densified as if closed, so its closing edge is included.
fn as_closed(ring: &Ring) -> Cow<'_, Ring> {
    if ring.is_closed() {
        Cow::Borrowed(ring)
    } else {
        Cow::Owned(ring.closed())
    }
}

/// Returns true if any edge of the ring is longer than `max_length`.
/// Rings with fewer than two vertices never need densifying.
pub fn ring_needs_densify(
    ring: &Ring,
    max_length: f64,
    metric: DensifyMetric,
    projection: &dyn ProjectionProvider,
) -> Result<bool> {
    if ring.is_degenerate() || !(max_length > 0f64) {
        return Ok(false);
    }
    let ring = as_closed(ring);
    match metric {
        DensifyMetric::Planar => {
            // project lazily so the scan stops at the first long edge
            let mut prev = projection.to_metric(&ring.vertices[0])?;
            for v in &ring.vertices[1..] {
                let p = projection.to_metric(v)?;
                if prev.distance(&p) > max_length {
                    return Ok(true);
                }
                prev = p;
            }
        }
        DensifyMetric::Geodesic => {
            for w in ring.vertices.windows(2) {
                if projection.geodesic_distance(&w[0], &w[1])? > max_length {
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

/// Splits every edge longer than `max_length` into `ceil(d / max_length)`
/// equal parts. Returns the new ring and whether anything was inserted.
/// A non-positive `max_length` or a degenerate ring is returned unchanged.
/// An open ring that needs densifying comes back closed.
pub fn densify_ring(
    ring: &Ring,
    max_length: f64,
    metric: DensifyMetric,
    projection: &dyn ProjectionProvider,
) -> Result<(Ring, bool)> {
    if !ring_needs_densify(ring, max_length, metric, projection)? {
        return Ok((ring.clone(), false));
    }
    let closed = as_closed(ring);
    let ring: &Ring = &closed;

    let projected = match metric {
        DensifyMetric::Planar => Some(project_all(ring, projection)?),
        DensifyMetric::Geodesic => None,
    };
    let lengths = edge_lengths(ring, metric, projection, projected.as_deref())?;

    let mut out = Ring::with_capacity(ring.len() * 2);
    let mut changed = false;
    for (i, d) in lengths.iter().enumerate() {
        let p1 = ring.vertices[i];
        let p2 = ring.vertices[i + 1];
        out.push(p1);
        if *d <= max_length {
            continue;
        }
        let n = (d / max_length).ceil() as usize;
        if n <= 1 {
            continue;
        }
        match (&projected, metric) {
            (Some(proj), DensifyMetric::Planar) => {
                let (m1, m2) = (proj[i], proj[i + 1]);
                for k in 1..n {
                    let t = k as f64 / n as f64;
                    out.push(projection.to_geographic(&m1.lerp(&m2, t))?);
                }
            }
            _ => {
                for p in projection.geodesic_interpolate(&p1, &p2, n - 1)? {
                    out.push(p);
                }
            }
        }
        changed = true;
    }
    // the closing vertex is carried through untouched
    out.push(ring.last_vertex());
    Ok((out, changed))
}

/// Densifies every ring of every polygon. The geometry is scanned first and
/// returned untouched if no edge anywhere exceeds `max_length`.
pub fn densify_multipolygon(
    geometry: &MultiPolygon,
    max_length: f64,
    metric: DensifyMetric,
    projection: &dyn ProjectionProvider,
) -> Result<(MultiPolygon, bool)> {
    let mut needs = false;
    for ring in geometry.rings() {
        if ring_needs_densify(ring, max_length, metric, projection)? {
            needs = true;
            break;
        }
    }
    if !needs {
        return Ok((geometry.clone(), false));
    }

    let mut out = geometry.clone();
    let mut changed = false;
    for ring in out.rings_mut() {
        let (r, c) = densify_ring(ring, max_length, metric, projection)?;
        if c {
            *ring = r;
            changed = true;
        }
    }
    Ok((out, changed))
}

#[cfg(test)]
mod test {
    use super::{densify_multipolygon, densify_ring, ring_needs_densify, DensifyMetric};
    use crate::projection::{PlanarIdentity, ProjectionProvider, WebMercator};
    use crate::structures::{MultiPolygon, Point2D, Polygon, Ring};

    fn square(size: f64) -> Ring {
        Ring::new(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, size),
            Point2D::new(size, size),
            Point2D::new(size, 0.0),
            Point2D::new(0.0, 0.0),
        ])
    }

    #[test]
    fn test_each_edge_split_once() {
        let (r, changed) = densify_ring(&square(10.0), 6.0, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(changed);
        assert_eq!(r.len(), 9);
        assert_eq!(r.open_vertices().len(), 8);
        assert_eq!(r[1], Point2D::new(0.0, 5.0));
        assert!(r.is_closed());
    }

    #[test]
    fn test_geodesic_mode_with_planar_identity() {
        let (r, changed) = densify_ring(&square(10.0), 4.0, DensifyMetric::Geodesic, &PlanarIdentity).unwrap();
        assert!(changed);
        // ceil(10 / 4) = 3 parts per edge
        assert_eq!(r.len(), 13);
        for w in r.vertices.windows(2) {
            assert!(w[0].distance(&w[1]) <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn test_no_change_when_short() {
        let sq = square(10.0);
        assert!(!ring_needs_densify(&sq, 10.0, DensifyMetric::Planar, &PlanarIdentity).unwrap());
        let (r, changed) = densify_ring(&sq, 10.0, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(!changed);
        assert_eq!(r, sq);
        let (r, changed) = densify_ring(&sq, 0.0, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(!changed);
        assert_eq!(r, sq);
    }

    #[test]
    fn test_open_ring_closing_edge_densified() {
        // the missing closing edge (10,0)->(0,0) is 10 units long
        let open = Ring::new(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 5.0),
            Point2D::new(10.0, 5.0),
            Point2D::new(10.0, 0.0),
        ]);
        assert!(ring_needs_densify(&open, 6.0, DensifyMetric::Planar, &PlanarIdentity).unwrap());
        let (r, changed) = densify_ring(&open, 6.0, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(changed);
        assert!(r.is_closed());
        assert_eq!(r.len(), 7);
        assert_eq!(r[5], Point2D::new(5.0, 0.0));
        assert_eq!(r.last_vertex(), Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_degenerate_ring() {
        let r = Ring::new(&[Point2D::new(1.0, 1.0)]);
        let (out, changed) = densify_ring(&r, 0.1, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(!changed);
        assert_eq!(out, r);
    }

    #[test]
    fn test_web_mercator_planar_bound() {
        let wm = WebMercator::new();
        let r = square(1.0);
        let max_len = 25_000.0;
        let (out, changed) = densify_ring(&r, max_len, DensifyMetric::Planar, &wm).unwrap();
        assert!(changed);
        assert_eq!(out.first_vertex(), r.first_vertex());
        assert_eq!(out.last_vertex(), r.last_vertex());
        for w in out.vertices.windows(2) {
            let a = wm.to_metric(&w[0]).unwrap();
            let b = wm.to_metric(&w[1]).unwrap();
            assert!(a.distance(&b) <= max_len + 1e-6);
        }
    }

    #[test]
    fn test_web_mercator_geodesic_idempotent() {
        let wm = WebMercator::new();
        let r = square(2.0);
        let (once, changed) = densify_ring(&r, 50_000.0, DensifyMetric::Geodesic, &wm).unwrap();
        assert!(changed);
        let (twice, changed) = densify_ring(&once, 50_000.0, DensifyMetric::Geodesic, &wm).unwrap();
        assert!(!changed);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multipolygon_holes_densified() {
        let hole = Ring::new(&[
            Point2D::new(2.0, 2.0),
            Point2D::new(8.0, 2.0),
            Point2D::new(8.0, 8.0),
            Point2D::new(2.0, 8.0),
            Point2D::new(2.0, 2.0),
        ]);
        let mp = MultiPolygon::from(Polygon::new(square(10.0), vec![hole]));
        let (out, changed) = densify_multipolygon(&mp, 5.0, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(changed);
        assert_eq!(out[0].exterior.len(), 9);
        assert_eq!(out[0].interiors[0].len(), 9);

        let (same, changed) = densify_multipolygon(&mp, 20.0, DensifyMetric::Planar, &PlanarIdentity).unwrap();
        assert!(!changed);
        assert_eq!(same, mp);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Planar".parse::<DensifyMetric>().unwrap(), DensifyMetric::Planar);
        assert_eq!("geodesic".parse::<DensifyMetric>().unwrap(), DensifyMetric::Geodesic);
        assert!("foo".parse::<DensifyMetric>().is_err());
    }
}
