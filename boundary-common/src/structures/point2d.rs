/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 11/06/2026
License: MIT
*/
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2-D point, with x and y fields.
///
/// A point never records which coordinate space it lives in. Geographic
/// points hold (longitude, latitude) in degrees and projected points hold
/// (x, y) in linear units; each function taking points states which it expects.
#[derive(Default, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(x: {}, y: {})", self.x, self.y)
    }
}

impl Point2D {
    /// Creates a new Point2D,
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    /// Calculates the midpoint between two Point2Ds.
    pub fn midpoint(p1: &Point2D, p2: &Point2D) -> Point2D {
        Point2D::new((p1.x + p2.x) / 2f64, (p1.y + p2.y) / 2f64)
    }

    /// Calculate Euclidean distance between the point and another.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x) * (self.x - other.x) + (self.y - other.y) * (self.y - other.y)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Point2D {
        Point2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn nearly_equals(&self, other: &Self) -> bool {
        (self.x - other.x).abs() <= f64::EPSILON && (self.y - other.y).abs() <= f64::EPSILON
    }

    /// Is the point within the axis-aligned box spanned by p1 and p2?
    pub fn is_between(&self, p1: &Self, p2: &Self) -> bool {
        self.x >= p1.x.min(p2.x)
            && self.x <= p1.x.max(p2.x)
            && self.y >= p1.y.min(p2.y)
            && self.y <= p1.y.max(p2.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the point with both coordinates rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Point2D {
        let key = self.rounded_key(decimals);
        key.to_point(decimals)
    }

    /// Integer key of the point rounded to `decimals` places, suitable for
    /// hashing. Two points share a key exactly when their rounded coordinates
    /// are equal.
    pub fn rounded_key(&self, decimals: u32) -> RoundedKey {
        let scale = 10f64.powi(decimals as i32);
        RoundedKey((self.x * scale).round() as i64, (self.y * scale).round() as i64)
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Eq for Point2D {}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(p: [f64; 2]) -> Self {
        Point2D::new(p[0], p[1])
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Self) -> Point2D {
        Point2D {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

// dot product
impl Mul for Point2D {
    type Output = f64;
    fn mul(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }
}

/// Fixed-precision coordinate key. Rounding is half away from zero, which can
/// split values that sit right on a precision boundary depending on their
/// binary representation. That approximation is accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoundedKey(pub i64, pub i64);

impl RoundedKey {
    pub fn to_point(&self, decimals: u32) -> Point2D {
        let scale = 10f64.powi(decimals as i32);
        Point2D::new(self.0 as f64 / scale, self.1 as f64 / scale)
    }
}

#[cfg(test)]
mod test {
    use super::Point2D;

    #[test]
    fn test_rounded_key_merges_nearby_points() {
        let p1 = Point2D::new(10.1234564, -5.0000001);
        let p2 = Point2D::new(10.1234556, -4.9999996);
        assert_eq!(p1.rounded_key(6), p2.rounded_key(6));
        assert_ne!(p1.rounded_key(7), p2.rounded_key(7));
    }

    #[test]
    fn test_rounded() {
        let p = Point2D::new(1.23456789, -0.5);
        assert_eq!(p.rounded(4), Point2D::new(1.2346, -0.5));
    }

    #[test]
    fn test_lerp() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(10.0, -4.0);
        assert_eq!(a.lerp(&b, 0.5), Point2D::new(5.0, -2.0));
        assert_eq!(a.lerp(&b, 1.0), b);
    }
}
