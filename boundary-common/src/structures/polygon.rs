/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 03/03/2026
Last Modified: 28/08/2026
License: MIT
*/

use super::{BoundingBox, Point2D, Ring};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// One outer ring plus zero or more holes, all in the same coordinate space.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Polygon {
        Polygon {
            exterior,
            interiors,
        }
    }

    /// Builds a polygon from a list of rings, the first being the exterior.
    pub fn from_rings(mut rings: Vec<Ring>) -> Option<Polygon> {
        if rings.is_empty() {
            return None;
        }
        let exterior = rings.remove(0);
        Some(Polygon::new(exterior, rings))
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// The exterior followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    pub fn rings_mut(&mut self) -> impl Iterator<Item = &mut Ring> {
        std::iter::once(&mut self.exterior).chain(self.interiors.iter_mut())
    }

    pub fn num_vertices(&self) -> usize {
        self.rings().map(|r| r.len()).sum()
    }

    /// Planar area, exterior minus holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|r| r.signed_area().abs()).sum();
        self.exterior.signed_area().abs() - holes
    }

    /// Area-weighted centroid of the polygon, holes subtracted. Returns
    /// `None` when the area is zero.
    pub fn centroid(&self) -> Option<Point2D> {
        let mut a_sum = 0f64;
        let mut cx = 0f64;
        let mut cy = 0f64;
        for (k, ring) in self.rings().enumerate() {
            let pts = ring.open_vertices();
            let n = pts.len();
            if n < 3 {
                continue;
            }
            let mut a = 0f64;
            let mut rx = 0f64;
            let mut ry = 0f64;
            for i in 0..n {
                let j = (i + 1) % n;
                let cross = pts[i].x * pts[j].y - pts[j].x * pts[i].y;
                a += cross;
                rx += (pts[i].x + pts[j].x) * cross;
                ry += (pts[i].y + pts[j].y) * cross;
            }
            // orient the exterior positive and holes negative
            let sign = if (a >= 0f64) == (k == 0) { 1f64 } else { -1f64 };
            a_sum += sign * a / 2f64;
            cx += sign * rx / 6f64;
            cy += sign * ry / 6f64;
        }
        if a_sum == 0f64 || !a_sum.is_finite() {
            return None;
        }
        Some(Point2D::new(cx / a_sum, cy / a_sum))
    }
}

/// An ordered collection of polygons. Order carries no meaning but is kept
/// so geometries round-trip unchanged.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

impl Index<usize> for MultiPolygon {
    type Output = Polygon;

    fn index<'a>(&'a self, index: usize) -> &'a Polygon {
        &self.polygons[index]
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(p: Polygon) -> Self {
        MultiPolygon { polygons: vec![p] }
    }
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> MultiPolygon {
        MultiPolygon { polygons }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// True when there are no polygons, or none of them has vertices.
    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(|p| p.is_empty())
    }

    /// Every ring of every polygon, exterior first within each polygon.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flat_map(|p| p.rings())
    }

    pub fn rings_mut(&mut self) -> impl Iterator<Item = &mut Ring> {
        self.polygons.iter_mut().flat_map(|p| p.rings_mut())
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point2D> {
        self.rings().flat_map(|r| r.vertices.iter())
    }

    pub fn num_vertices(&self) -> usize {
        self.rings().map(|r| r.len()).sum()
    }

    /// Number of edges over all rings, counted on closed copies.
    pub fn num_segments(&self) -> usize {
        self.rings().map(|r| r.closed().num_segments()).sum()
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for r in self.rings() {
            bb.expand_to(r.get_bounding_box());
        }
        bb
    }

    pub fn area(&self) -> f64 {
        self.polygons.iter().map(|p| p.area()).sum()
    }

    /// Area-weighted centroid over all parts.
    pub fn centroid(&self) -> Option<Point2D> {
        let mut a_sum = 0f64;
        let mut x = 0f64;
        let mut y = 0f64;
        for p in &self.polygons {
            if let Some(c) = p.centroid() {
                let a = p.area();
                a_sum += a;
                x += c.x * a;
                y += c.y * a;
            }
        }
        if a_sum == 0f64 || !a_sum.is_finite() {
            return None;
        }
        Some(Point2D::new(x / a_sum, y / a_sum))
    }
}

#[cfg(test)]
mod test {
    use super::{MultiPolygon, Polygon};
    use crate::structures::{Point2D, Ring};

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
    fn test_area_with_hole() {
        let p = Polygon::new(rect(0.0, 0.0, 10.0, 10.0), vec![rect(2.0, 2.0, 4.0, 4.0)]);
        assert_eq!(p.area(), 96.0);
        assert_eq!(p.num_vertices(), 10);
        assert_eq!(p.rings().count(), 2);
    }

    #[test]
    fn test_centroid() {
        let p = Polygon::new(rect(0.0, 0.0, 4.0, 2.0), vec![]);
        assert_eq!(p.centroid(), Some(Point2D::new(2.0, 1.0)));

        let mp = MultiPolygon::new(vec![
            Polygon::new(rect(0.0, 0.0, 2.0, 2.0), vec![]),
            Polygon::new(rect(4.0, 0.0, 6.0, 2.0), vec![]),
        ]);
        assert_eq!(mp.centroid(), Some(Point2D::new(3.0, 1.0)));
        assert_eq!(mp.num_segments(), 8);
    }

    #[test]
    fn test_empty() {
        assert!(MultiPolygon::default().is_empty());
        assert!(MultiPolygon::new(vec![Polygon::default()]).is_empty());
        assert!(Polygon::from_rings(vec![]).is_none());
    }
}
