/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 03/03/2026
Last Modified: 28/08/2026
License: MIT
*/

use super::{BoundingBox, LineSegment, Point2D, RoundedKey};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Index;

/// A polygon ring: an ordered sequence of vertices that is semantically
/// closed, i.e. the first vertex equals the last by exact coordinate
/// equality. A closed, non-degenerate ring has at least four vertices
/// (three distinct vertices plus the closing duplicate).
///
/// Rings are plain values owned by the polygon that holds them.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub vertices: Vec<Point2D>,
}

impl Index<usize> for Ring {
    type Output = Point2D;

    fn index<'a>(&'a self, index: usize) -> &'a Point2D {
        &self.vertices[index]
    }
}

impl From<Vec<Point2D>> for Ring {
    fn from(vertices: Vec<Point2D>) -> Self {
        Ring { vertices }
    }
}

impl Ring {
    /// Creates a new Ring from vertices. The vertices are taken as-is; use
    /// `ensure_closed` to append the closing vertex if it is missing.
    pub fn new(vertices: &[Point2D]) -> Ring {
        Ring {
            vertices: vertices.to_vec(),
        }
    }

    /// Creates a new Ring with capacity
    pub fn with_capacity(capacity: usize) -> Ring {
        Ring {
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// returns the number of vertices, including the closing duplicate
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fewer than two vertices; ring operations leave these untouched.
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 2
    }

    pub fn first_vertex(&self) -> Point2D {
        self.vertices[0]
    }

    pub fn last_vertex(&self) -> Point2D {
        self.vertices[self.vertices.len() - 1]
    }

    pub fn push(&mut self, v: Point2D) {
        self.vertices.push(v);
    }

    pub fn is_closed(&self) -> bool {
        !self.vertices.is_empty() && self.first_vertex() == self.last_vertex()
    }

    /// Appends a copy of the first vertex if the ring is not already closed.
    /// Returns whether a vertex was appended.
    pub fn ensure_closed(&mut self) -> Result<bool> {
        if self.vertices.is_empty() {
            return Err(Error::EmptyRing);
        }
        if self.is_closed() {
            return Ok(false);
        }
        let v = self.first_vertex();
        self.push(v);
        Ok(true)
    }

    /// A closed copy of this ring. Empty rings are returned unchanged.
    pub fn closed(&self) -> Ring {
        let mut r = self.clone();
        let _ = r.ensure_closed();
        r
    }

    /// The vertices without the closing duplicate.
    pub fn open_vertices(&self) -> &[Point2D] {
        if self.is_closed() && self.vertices.len() > 1 {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }

    pub fn num_segments(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// The consecutive vertex pairs of the ring, in order.
    pub fn segments(&self) -> impl Iterator<Item = LineSegment> + '_ {
        self.vertices
            .windows(2)
            .map(|w| LineSegment::new(w[0], w[1]))
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// The set of vertex coordinates rounded to `decimals` places.
    pub fn vertex_keys(&self, decimals: u32) -> HashSet<RoundedKey> {
        self.vertices
            .iter()
            .map(|p| p.rounded_key(decimals))
            .collect()
    }

    /// Signed planar area of the ring (shoelace); positive when
    /// counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let mut area = 0f64;
        let pts = self.open_vertices();
        let n = pts.len();
        if n < 3 {
            return 0f64;
        }
        for i in 0..n {
            let j = (i + 1) % n;
            area += pts[i].x * pts[j].y - pts[j].x * pts[i].y;
        }
        area / 2f64
    }
}
