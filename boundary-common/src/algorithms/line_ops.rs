/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 06/03/2026
Last Modified: 11/08/2026
License: MIT
*/

use crate::structures::{LineSegment, Point2D};

/// Distance from a point to the segment start-end. The projection is
/// clamped, so points beyond either end measure to that endpoint.
pub fn point_segment_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    LineSegment::new(*start, *end).distance_to_point(point)
}

/// The Ramer–Douglas–Peucker line-simplification algorithm, driven by an
/// explicit stack of index ranges rather than recursion. Returns a keep-mask
/// the same length as `points`; the first and last points are always kept.
///
/// References:
/// Douglas, D.H., Peucker, T.K., 1973. Algorithms for the reduction of the number of points required to
/// represent a digitized line or its caricature. Cartographica: The International Journal for Geographic
/// Information and Geovisualization 10, 112–122.
///
/// Ramer, U., 1972. An iterative procedure for the polygonal approximation of plane curves. Computer
/// Graphics and Image Processing 1, 244–256.
pub fn douglas_peucker(points: &[Point2D], epsilon: f64) -> Vec<bool> {
    let n = points.len();
    let mut keep = vec![false; n];
    if n == 0 {
        return keep;
    }
    keep[0] = true;
    keep[n - 1] = true;
    if n < 3 {
        return keep;
    }

    let mut stack: Vec<(usize, usize)> = vec![(0, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut dmax = 0f64;
        let mut index = start;
        for i in start + 1..end {
            let d = point_segment_distance(&points[i], &points[start], &points[end]);
            if d > dmax {
                dmax = d;
                index = i;
            }
        }
        if dmax > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }
    keep
}
