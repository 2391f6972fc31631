/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 14/03/2026
Last Modified: 21/08/2026
License: MIT
*/

use crate::geometry::FeatureId;
use boundary_common::error::{Error, Result};
use boundary_common::structures::{MultiPolygon, Point2D};
use rstar::primitives::GeomWithData;
use rstar::RTree;

/// One geometry handed to a snap operation. The correlation id is echoed
/// back on the output so results can be matched to their features.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapInput {
    pub correlation_id: FeatureId,
    pub geometry: MultiPolygon,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnapOutput {
    pub correlation_id: FeatureId,
    pub geometry: MultiPolygon,
}

/// Moves every vertex within `tolerance` of a reference point exactly onto
/// that point and leaves all other vertices alone, one output per input.
pub trait SnapOperation {
    fn snap(
        &self,
        inputs: &[SnapInput],
        reference: &[Point2D],
        tolerance: f64,
    ) -> Result<Vec<SnapOutput>>;
}

/// Snaps each vertex to its nearest reference point, if that point is
/// within tolerance.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferencePointSnapper;

impl ReferencePointSnapper {
    pub fn new() -> ReferencePointSnapper {
        ReferencePointSnapper
    }
}

impl SnapOperation for ReferencePointSnapper {
    fn snap(
        &self,
        inputs: &[SnapInput],
        reference: &[Point2D],
        tolerance: f64,
    ) -> Result<Vec<SnapOutput>> {
        if !(tolerance >= 0f64) {
            return Err(Error::Snap(format!("invalid tolerance {}", tolerance)));
        }
        type Location = GeomWithData<[f64; 2], usize>;
        let tree = RTree::bulk_load(
            reference
                .iter()
                .enumerate()
                .map(|(i, p)| Location::new(p.to_array(), i))
                .collect(),
        );
        let tol_sq = tolerance * tolerance;

        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let mut geometry = input.geometry.clone();
            for ring in geometry.rings_mut() {
                let was_closed = ring.is_closed() && ring.len() > 1;
                for v in ring.vertices.iter_mut() {
                    if let Some(nearest) = tree.nearest_neighbor(&v.to_array()) {
                        let r = reference[nearest.data];
                        if v.distance_squared(&r) <= tol_sq {
                            *v = r;
                        }
                    }
                }
                if was_closed {
                    let first = ring.first_vertex();
                    let n = ring.len();
                    ring.vertices[n - 1] = first;
                }
            }
            outputs.push(SnapOutput {
                correlation_id: input.correlation_id,
                geometry,
            });
        }
        Ok(outputs)
    }
}
