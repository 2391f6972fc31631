/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 03/03/2026
Last Modified: 20/07/2026
License: MIT
*/

use super::{BoundingBox, Point2D};

/// A data structure to hold line segments, defined by
/// starting and ending points.
#[derive(Default, Copy, Clone, Debug)]
pub struct LineSegment {
    pub p1: Point2D,
    pub p2: Point2D,
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        (self.p1.nearly_equals(&other.p1) && self.p2.nearly_equals(&other.p2))
            || (self.p1.nearly_equals(&other.p2) && self.p2.nearly_equals(&other.p1))
    }
}

impl LineSegment {
    /// Creates a new LineSegment.
    pub fn new(p1: Point2D, p2: Point2D) -> LineSegment {
        LineSegment { p1, p2 }
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(&self.p1, &self.p2)
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    /// Finds the point on the segment closest to `p`, together with its
    /// projection parameter `t`, clamped to [0, 1]. Points projecting beyond
    /// either end resolve to that endpoint. A degenerate segment returns
    /// `(p1, 0.0)`.
    pub fn closest_point(&self, p: &Point2D) -> (Point2D, f64) {
        let dx = self.p2.x - self.p1.x;
        let dy = self.p2.y - self.p1.y;
        let denom = dx * dx + dy * dy;
        if denom <= 0f64 {
            return (self.p1, 0f64);
        }
        let t = ((p.x - self.p1.x) * dx + (p.y - self.p1.y) * dy) / denom;
        if t <= 0f64 {
            return (self.p1, 0f64);
        }
        if t >= 1f64 {
            return (self.p2, 1f64);
        }
        (Point2D::new(self.p1.x + t * dx, self.p1.y + t * dy), t)
    }

    /// Distance from `p` to the nearest point of the segment (not the
    /// infinite line through it).
    pub fn distance_to_point(&self, p: &Point2D) -> f64 {
        let (q, _) = self.closest_point(p);
        p.distance(&q)
    }
}

#[cfg(test)]
mod test {
    use super::LineSegment;
    use crate::structures::Point2D;

    #[test]
    fn test_closest_point_interior() {
        let ls = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));
        let (q, t) = ls.closest_point(&Point2D::new(2.5, 3.0));
        assert_eq!(q, Point2D::new(2.5, 0.0));
        assert_eq!(t, 0.25);
        assert_eq!(ls.distance_to_point(&Point2D::new(2.5, 3.0)), 3.0);
    }

    #[test]
    fn test_closest_point_clamped() {
        let ls = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));
        let (q, t) = ls.closest_point(&Point2D::new(-3.0, 4.0));
        assert_eq!(q, Point2D::new(0.0, 0.0));
        assert_eq!(t, 0.0);
        assert_eq!(ls.distance_to_point(&Point2D::new(-3.0, 4.0)), 5.0);

        let (q, t) = ls.closest_point(&Point2D::new(14.0, -3.0));
        assert_eq!(q, Point2D::new(10.0, 0.0));
        assert_eq!(t, 1.0);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Point2D::new(1.0, 1.0);
        let ls = LineSegment::new(p, p);
        assert_eq!(ls.closest_point(&Point2D::new(4.0, 5.0)), (p, 0.0));
        assert_eq!(ls.distance_to_point(&Point2D::new(4.0, 5.0)), 5.0);
    }
}
