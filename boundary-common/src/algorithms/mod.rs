/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 06/03/2026
Last Modified: 19/10/2026
License: MIT
*/
// private sub-module defined in other files
mod antimeridian;
mod densify;
mod line_ops;
mod noding;
mod octagon;
mod simplify;

// exports identifiers from private sub-modules in the current module namespace
pub use self::antimeridian::{
    snap_longitude, snap_multipolygon_to_antimeridian, snap_polygon_to_antimeridian,
    snap_ring_to_antimeridian,
};
pub use self::densify::{densify_multipolygon, densify_ring, ring_needs_densify, DensifyMetric};
pub use self::line_ops::{douglas_peucker, point_segment_distance};
pub use self::noding::{
    node_multipolygon, node_ring, NodingParams, PointIndex, TargetVertexIndex, DEFAULT_DECIMALS,
    ENDPOINT_EPSILON, MAX_DECIMALS,
};
pub use self::octagon::{equal_area_octagon, octagon_circumradius, regular_octagon};
pub use self::simplify::{simplify_multipolygon, simplify_ring, SimplifyOptions};
