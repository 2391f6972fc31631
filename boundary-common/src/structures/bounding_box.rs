/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 02/06/2026
License: MIT
*/
use super::Point2D;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    /// An inverted (empty) box that any expansion will overwrite.
    fn default() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        let (x1, x2) = if min_x < max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (y1, y2) = if min_y < max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        BoundingBox {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        }
    }

    /// The box spanned by two points, e.g. the endpoints of a segment.
    pub fn from_corners(p1: &Point2D, p2: &Point2D) -> BoundingBox {
        BoundingBox::new(p1.x, p2.x, p1.y, p2.y)
    }

    pub fn from_points(points: &[Point2D]) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for p in points {
            bb.expand_to_point(p);
        }
        bb
    }

    /// A box with no points in it has inverted extents.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn get_height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn get_width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn overlaps(&self, other: BoundingBox) -> bool {
        if self.max_y < other.min_y
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.min_x > other.max_x
        {
            return false;
        }
        true
    }

    pub fn contains(&self, other: BoundingBox) -> bool {
        other.max_y <= self.max_y
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.min_x >= self.min_x
    }

    pub fn is_point_in_box(&self, x: f64, y: f64) -> bool {
        !(self.max_y < y || self.max_x < x || self.min_y > y || self.min_x > x)
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        self.max_y = self.max_y.max(other.max_y);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.min_x = self.min_x.min(other.min_x);
    }

    pub fn expand_to_point(&mut self, p: &Point2D) {
        self.max_y = self.max_y.max(p.y);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.min_x = self.min_x.min(p.x);
    }

    /// Grows the box by `value` in every direction.
    pub fn expand_by(&mut self, value: f64) {
        self.max_y += value;
        self.max_x += value;
        self.min_y -= value;
        self.min_x -= value;
    }

    pub fn expanded_by(&self, value: f64) -> BoundingBox {
        let mut bb = *self;
        bb.expand_by(value);
        bb
    }

    pub fn min_corner(&self) -> [f64; 2] {
        [self.min_x, self.min_y]
    }

    pub fn max_corner(&self) -> [f64; 2] {
        [self.max_x, self.max_y]
    }
}
