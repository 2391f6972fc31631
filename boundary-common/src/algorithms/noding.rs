/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 12/03/2026
Last Modified: 19/10/2026
License: MIT

Notes: Noding inserts a vertex into a ring edge wherever the edge passes
within tolerance of a target vertex, at the target's orthogonal projection
onto the edge. Existing vertices are never moved or removed. Target
vertices are rounded to a fixed number of decimal places and deduplicated
before they are indexed; points that sit right on a rounding boundary may
be kept apart even when they are conceptually the same location.
*/

use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};
use crate::structures::{BoundingBox, MultiPolygon, Point2D, RoundedKey, Ring};
use std::collections::HashSet;
use tracing::debug;

/// Decimal places used for rounding target vertices by default.
pub const DEFAULT_DECIMALS: u32 = 6;

/// Beyond this, scaled coordinates no longer fit the integer rounding keys.
pub const MAX_DECIMALS: u32 = 15;

/// Projection parameters this close to 0 or 1 count as the edge's endpoints.
pub const ENDPOINT_EPSILON: f64 = 1e-12;

/// A bounding-box range query over a fixed set of keyed points. Any
/// spatial structure (R-tree, grid, k-d tree) can back it.
pub trait PointIndex {
    /// All (key, point) pairs inside `bbox`, boundary included, in
    /// ascending key order.
    fn query(&self, bbox: &BoundingBox) -> Vec<(usize, Point2D)>;
}

type Location = GeomWithData<[f64; 2], usize>;

/// The deduplicated, rounded target vertices of a feature set. Keys are
/// assigned in first-seen order, starting at zero. The index is read-only
/// once built.
pub struct TargetVertexIndex {
    tree: RTree<Location>,
    points: Vec<Point2D>,
    decimals: u32,
}

impl TargetVertexIndex {
    /// Rounds and deduplicates every vertex of every ring and indexes the
    /// distinct points.
    pub fn build<'a, I>(rings: I, decimals: u32) -> TargetVertexIndex
    where
        I: IntoIterator<Item = &'a Ring>,
    {
        let mut seen: HashSet<RoundedKey> = HashSet::new();
        let mut points = vec![];
        for ring in rings {
            for v in &ring.vertices {
                let key = v.rounded_key(decimals);
                if seen.insert(key) {
                    points.push(key.to_point(decimals));
                }
            }
        }
        debug!(targets = points.len(), decimals, "built target vertex index");
        TargetVertexIndex::from_points(points, decimals)
    }

    /// Builds the index over every ring of every geometry, in order.
    pub fn from_geometries<'a, I>(geometries: I, decimals: u32) -> TargetVertexIndex
    where
        I: IntoIterator<Item = &'a MultiPolygon>,
    {
        TargetVertexIndex::build(geometries.into_iter().flat_map(|g| g.rings()), decimals)
    }

    fn from_points(points: Vec<Point2D>, decimals: u32) -> TargetVertexIndex {
        let locations: Vec<Location> = points
            .iter()
            .enumerate()
            .map(|(key, p)| Location::new(p.to_array(), key))
            .collect();
        TargetVertexIndex {
            tree: RTree::bulk_load(locations),
            points,
            decimals,
        }
    }

    /// Number of distinct target vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn get(&self, key: usize) -> Option<Point2D> {
        self.points.get(key).copied()
    }

    /// The target points, indexed by key.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }
}

impl PointIndex for TargetVertexIndex {
    fn query(&self, bbox: &BoundingBox) -> Vec<(usize, Point2D)> {
        if bbox.is_empty() {
            return vec![];
        }
        let envelope = AABB::from_corners(bbox.min_corner(), bbox.max_corner());
        let mut ret: Vec<(usize, Point2D)> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|loc| (loc.data, self.points[loc.data]))
            .collect();
        ret.sort_by_key(|(key, _)| *key);
        ret
    }
}

/// Per-run noding settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodingParams {
    /// Search distance, in the coordinate units of the rings.
    pub tolerance: f64,
    /// Decimal places used to compare inserted points with existing ones.
    pub decimals: u32,
    pub endpoint_epsilon: f64,
}

impl NodingParams {
    pub fn new(tolerance: f64) -> NodingParams {
        NodingParams {
            tolerance,
            decimals: DEFAULT_DECIMALS,
            endpoint_epsilon: ENDPOINT_EPSILON,
        }
    }
}

/// Nodes a single ring against the index. Returns the new ring and the
/// number of inserted vertices. The ring is closed first if necessary;
/// rings with fewer than two vertices are returned as they are.
pub fn node_ring(ring: &Ring, index: &dyn PointIndex, params: &NodingParams) -> (Ring, usize) {
    let ring = ring.closed();
    if ring.is_degenerate() || !(params.tolerance > 0f64) {
        return (ring, 0);
    }
    let tol_sq = params.tolerance * params.tolerance;
    let eps = params.endpoint_epsilon;
    let vertex_keys = ring.vertex_keys(params.decimals);

    let mut inserts: Vec<Vec<Point2D>> = vec![vec![]; ring.num_segments()];
    let mut num_inserts = 0usize;
    for (i, seg) in ring.segments().enumerate() {
        let search_box = seg.get_bounding_box().expanded_by(params.tolerance);
        let candidates = index.query(&search_box);
        if candidates.is_empty() {
            continue;
        }
        let mut seg_inserts: Vec<(f64, Point2D)> = vec![];
        for (_, target) in candidates {
            let (q, t) = seg.closest_point(&target);
            if target.distance_squared(&q) > tol_sq {
                continue;
            }
            if t <= eps || t >= 1f64 - eps {
                continue;
            }
            if vertex_keys.contains(&q.rounded_key(params.decimals)) {
                continue;
            }
            seg_inserts.push((t, q));
        }
        if seg_inserts.is_empty() {
            continue;
        }
        // stable, so equal t keeps candidate order
        seg_inserts.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut seen_seg: HashSet<RoundedKey> = HashSet::new();
        for (_, q) in seg_inserts {
            if seen_seg.insert(q.rounded_key(params.decimals)) {
                inserts[i].push(q);
                num_inserts += 1;
            }
        }
    }

    if num_inserts == 0 {
        return (ring, 0);
    }

    let mut out = Ring::with_capacity(ring.len() + num_inserts);
    for (i, new_points) in inserts.into_iter().enumerate() {
        out.push(ring[i]);
        for q in new_points {
            out.push(q);
        }
    }
    out.push(ring.last_vertex());
    (out, num_inserts)
}

/// Nodes every ring of a multipolygon. Returns the new geometry, the number
/// of inserted vertices and the number of edges examined.
pub fn node_multipolygon(
    geometry: &MultiPolygon,
    index: &dyn PointIndex,
    params: &NodingParams,
) -> (MultiPolygon, usize, usize) {
    let mut out = geometry.clone();
    let mut inserted = 0usize;
    let mut segments = 0usize;
    for ring in out.rings_mut() {
        if ring.is_empty() {
            continue;
        }
        let (r, n) = node_ring(ring, index, params);
        segments += r.num_segments() - n;
        if n > 0 {
            *ring = r;
            inserted += n;
        }
    }
    (out, inserted, segments)
}

#[cfg(test)]
mod test {
    use super::{node_multipolygon, node_ring, NodingParams, PointIndex, TargetVertexIndex};
    use crate::structures::{BoundingBox, MultiPolygon, Point2D, Polygon, Ring};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::new(&[
            Point2D::new(x0, y0),
            Point2D::new(x1, y0),
            Point2D::new(x1, y1),
            Point2D::new(x0, y1),
            Point2D::new(x0, y0),
        ])
    }

    #[test]
    fn test_index_dedupes_rounded_vertices() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = Ring::new(&[
            Point2D::new(1.0000001, 1.0),
            Point2D::new(2.0, 1.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(1.0000001, 1.0),
        ]);
        let index = TargetVertexIndex::build(vec![&a, &b], 6);
        // four corners of a, plus (2,1) and (2,2); (1.0000001, 1) rounds onto a corner
        assert_eq!(index.len(), 6);
        assert_eq!(index.get(0), Some(Point2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_query_is_inclusive_and_sorted() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let index = TargetVertexIndex::build(vec![&a], 6);
        let found = index.query(&BoundingBox::new(0.0, 1.0, 0.0, 0.0));
        let keys: Vec<usize> = found.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![0, 1]);
        assert!(index.query(&BoundingBox::default()).is_empty());
    }

    #[test]
    fn test_node_inserts_projection() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = Ring::new(&[
            Point2D::new(5.0, 10.4),
            Point2D::new(7.0, 14.0),
            Point2D::new(3.0, 14.0),
            Point2D::new(5.0, 10.4),
        ]);
        let index = TargetVertexIndex::build(vec![&a, &b], 6);
        let (out, n) = node_ring(&a, &index, &NodingParams::new(0.5));
        assert_eq!(n, 1);
        assert_eq!(out.len(), 6);
        assert_eq!(out[3], Point2D::new(5.0, 10.0));
        assert!(out.is_closed());

        // b's edges are all further than 0.5 from a's corners
        let (out, n) = node_ring(&b, &index, &NodingParams::new(0.5));
        assert_eq!(n, 0);
        assert_eq!(out, b);
    }

    #[test]
    fn test_candidates_ordered_along_edge() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let targets = Ring::new(&[
            Point2D::new(7.0, 0.1),
            Point2D::new(2.0, -0.1),
            Point2D::new(4.0, 0.05),
        ]);
        let index = TargetVertexIndex::build(vec![&targets], 6);
        let (out, n) = node_ring(&a, &index, &NodingParams::new(0.2));
        assert_eq!(n, 3);
        assert_eq!(out[1], Point2D::new(2.0, 0.0));
        assert_eq!(out[2], Point2D::new(4.0, 0.0));
        assert_eq!(out[3], Point2D::new(7.0, 0.0));
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_near_endpoint_candidates_skipped() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let targets = Ring::new(&[Point2D::new(-0.1, 0.0), Point2D::new(0.0000001, -0.05)]);
        let index = TargetVertexIndex::build(vec![&targets], 6);
        let (_, n) = node_ring(&a, &index, &NodingParams::new(0.2));
        // one clamps onto a corner, the other projects to a point rounding onto it
        assert_eq!(n, 0);
    }

    #[test]
    fn test_zero_tolerance_and_degenerate() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let index = TargetVertexIndex::build(vec![&a], 6);
        let (out, n) = node_ring(&a, &index, &NodingParams::new(0.0));
        assert_eq!(n, 0);
        assert_eq!(out, a);
        let single = Ring::new(&[Point2D::new(1.0, 1.0)]);
        let (out, n) = node_ring(&single, &index, &NodingParams::new(1.0));
        assert_eq!(n, 0);
        assert_eq!(out, single);
    }

    #[test]
    fn test_node_multipolygon_counts_segments() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let hole = rect(2.0, 2.0, 4.0, 4.0);
        let mp = MultiPolygon::from(Polygon::new(a.clone(), vec![hole]));
        let targets = Ring::new(&[Point2D::new(5.0, 0.1)]);
        let index = TargetVertexIndex::build(vec![&targets], 6);
        let (out, inserted, segments) = node_multipolygon(&mp, &index, &NodingParams::new(0.2));
        assert_eq!(inserted, 1);
        assert_eq!(segments, 8);
        assert_eq!(out[0].exterior.len(), 6);
        assert_eq!(out[0].interiors[0], mp[0].interiors[0]);
    }
}
