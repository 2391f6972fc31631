/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 03/03/2026
Last Modified: 28/08/2026
License: MIT
*/

use boundary_common::structures::{MultiPolygon, Polygon};
use serde_json::{Map, Value};
use std::fmt;

/// Feature identifiers are opaque to the processing code; it never invents
/// or destroys them.
pub type FeatureId = u64;

/// The geometry of a feature. Only polygonal geometries are processed;
/// anything else is carried through as its raw GeoJSON value.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Empty,
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    Other(Value),
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::Empty
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Geometry::Empty => write!(f, "Empty"),
            Geometry::Polygon(_) => write!(f, "Polygon"),
            Geometry::MultiPolygon(_) => write!(f, "MultiPolygon"),
            Geometry::Other(v) => write!(
                f,
                "{}",
                v.get("type").and_then(|t| t.as_str()).unwrap_or("Unknown")
            ),
        }
    }
}

impl Geometry {
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Empty => true,
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPolygon(mp) => mp.is_empty(),
            Geometry::Other(_) => false,
        }
    }

    /// The polygonal content as a multipolygon, or `None` for empty or
    /// non-polygonal geometries.
    pub fn to_multipolygon(&self) -> Option<MultiPolygon> {
        if self.is_empty() {
            return None;
        }
        match self {
            Geometry::Polygon(p) => Some(MultiPolygon::from(p.clone())),
            Geometry::MultiPolygon(mp) => Some(mp.clone()),
            _ => None,
        }
    }

    /// Wraps a processed multipolygon in the same geometry type as `self`.
    /// A single polygon stays a Polygon unless the result gained parts.
    pub fn with_multipolygon(&self, mut geometry: MultiPolygon) -> Geometry {
        match self {
            Geometry::Polygon(_) if geometry.len() == 1 => {
                Geometry::Polygon(geometry.polygons.remove(0))
            }
            _ => Geometry::MultiPolygon(geometry),
        }
    }
}

/// An identifier, a geometry and the attribute table row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry) -> Feature {
        Feature {
            id,
            geometry,
            properties: Map::new(),
        }
    }
}
