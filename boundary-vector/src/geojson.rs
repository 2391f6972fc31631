/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 04/03/2026
Last Modified: 19/10/2026
License: MIT

Notes: Reads and writes GeoJSON FeatureCollections. Polygon and MultiPolygon
geometries are parsed into rings; every other geometry type is kept as its
raw JSON value and written back untouched. Feature ids come from the
numeric `id` member where present and unique, and are otherwise assigned
sequentially. The legacy `crs` member is honoured so that non-geographic
inputs can be detected and rejected.
*/

use crate::geometry::{Feature, FeatureId, Geometry};
use boundary_common::error::{Error, Result};
use boundary_common::projection::GEOGRAPHIC_CRS;
use boundary_common::structures::{MultiPolygon, Point2D, Polygon, Ring};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// An in-memory GeoJSON FeatureCollection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    pub name: Option<String>,
    /// Authority id of the coordinate reference system, e.g. `EPSG:4326`.
    pub crs: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            name: None,
            crs: GEOGRAPHIC_CRS.to_string(),
            features,
        }
    }

    pub fn read<P: AsRef<Path>>(file_name: P) -> Result<FeatureCollection> {
        let contents = fs::read_to_string(file_name.as_ref())?;
        let fc = FeatureCollection::from_json_str(&contents)?;
        debug!(
            file = %file_name.as_ref().display(),
            features = fc.features.len(),
            "read feature collection"
        );
        Ok(fc)
    }

    pub fn from_json_str(contents: &str) -> Result<FeatureCollection> {
        let value: Value = serde_json::from_str(contents)?;
        FeatureCollection::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<FeatureCollection> {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
        if kind != "FeatureCollection" {
            return Err(Error::Format(format!(
                "expected a FeatureCollection, found '{}'",
                kind
            )));
        }
        let raw_features = value
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Format("missing 'features' array".to_string()))?;

        // numeric ids are kept when they are all present and unique
        let mut ids: Vec<Option<FeatureId>> = raw_features
            .iter()
            .map(|f| f.get("id").and_then(Value::as_u64))
            .collect();
        let unique: HashSet<FeatureId> = ids.iter().flatten().copied().collect();
        if unique.len() != raw_features.len() {
            ids = vec![None; raw_features.len()];
        }

        let mut features = Vec::with_capacity(raw_features.len());
        for (i, f) in raw_features.iter().enumerate() {
            let geometry = match f.get("geometry") {
                None | Some(Value::Null) => Geometry::Empty,
                Some(g) => parse_geometry(g)?,
            };
            let mut properties = f
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            // a non-numeric id is preserved as a property
            if let Some(Value::String(s)) = f.get("id") {
                properties
                    .entry("id".to_string())
                    .or_insert_with(|| Value::String(s.clone()));
            }
            features.push(Feature {
                id: ids[i].unwrap_or(i as FeatureId),
                geometry,
                properties,
            });
        }

        Ok(FeatureCollection {
            name: value.get("name").and_then(Value::as_str).map(str::to_string),
            crs: parse_crs(value.get("crs")),
            features,
        })
    }

    pub fn to_value(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                json!({
                    "type": "Feature",
                    "id": f.id,
                    "properties": Value::Object(f.properties.clone()),
                    "geometry": geometry_to_value(&f.geometry),
                })
            })
            .collect();
        let mut fc = Map::new();
        fc.insert("type".to_string(), json!("FeatureCollection"));
        if let Some(name) = &self.name {
            fc.insert("name".to_string(), json!(name));
        }
        if self.crs != GEOGRAPHIC_CRS {
            fc.insert(
                "crs".to_string(),
                json!({"type": "name", "properties": {"name": self.crs}}),
            );
        }
        fc.insert("features".to_string(), Value::Array(features));
        Value::Object(fc)
    }

    pub fn write<P: AsRef<Path>>(&self, file_name: P) -> Result<()> {
        let f = File::create(file_name.as_ref())?;
        let mut writer = BufWriter::new(f);
        serde_json::to_writer(&mut writer, &self.to_value())?;
        writer.flush()?;
        Ok(())
    }
}

fn parse_crs(crs: Option<&Value>) -> String {
    let name = crs
        .and_then(|c| c.get("properties"))
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str);
    match name {
        None => GEOGRAPHIC_CRS.to_string(),
        Some(n) => {
            let upper = n.to_uppercase();
            if upper.ends_with("CRS84") || upper.ends_with("CRS:84") {
                GEOGRAPHIC_CRS.to_string()
            } else if let Some(code) = upper.rsplit(':').next().filter(|_| upper.contains("EPSG")) {
                format!("EPSG:{}", code)
            } else {
                n.to_string()
            }
        }
    }
}

fn parse_position(v: &Value) -> Result<Point2D> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::Format("a position must be an array".to_string()))?;
    if arr.len() < 2 {
        return Err(Error::Format("a position needs two coordinates".to_string()));
    }
    let x = arr[0]
        .as_f64()
        .ok_or_else(|| Error::Format("non-numeric coordinate".to_string()))?;
    let y = arr[1]
        .as_f64()
        .ok_or_else(|| Error::Format("non-numeric coordinate".to_string()))?;
    Ok(Point2D::new(x, y))
}

fn parse_ring(v: &Value) -> Result<Ring> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::Format("a ring must be an array of positions".to_string()))?;
    let vertices = arr.iter().map(parse_position).collect::<Result<Vec<Point2D>>>()?;
    let mut ring = Ring::from(vertices);
    // linear rings are closed on read
    if !ring.is_empty() {
        ring.ensure_closed()?;
    }
    Ok(ring)
}

fn parse_polygon(v: &Value) -> Result<Polygon> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::Format("a polygon must be an array of rings".to_string()))?;
    let rings = arr.iter().map(parse_ring).collect::<Result<Vec<Ring>>>()?;
    Ok(Polygon::from_rings(rings).unwrap_or_default())
}

fn parse_geometry(g: &Value) -> Result<Geometry> {
    let kind = g.get("type").and_then(Value::as_str).unwrap_or("");
    let coords = g.get("coordinates");
    match (kind, coords) {
        ("Polygon", Some(c)) => Ok(Geometry::Polygon(parse_polygon(c)?)),
        ("MultiPolygon", Some(c)) => {
            let arr = c.as_array().ok_or_else(|| {
                Error::Format("a multipolygon must be an array of polygons".to_string())
            })?;
            let polygons = arr.iter().map(parse_polygon).collect::<Result<Vec<Polygon>>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon::new(polygons)))
        }
        ("Polygon", None) | ("MultiPolygon", None) => Err(Error::Format(format!(
            "{} without coordinates",
            kind
        ))),
        _ => Ok(Geometry::Other(g.clone())),
    }
}

fn ring_to_value(r: &Ring) -> Value {
    Value::Array(r.vertices.iter().map(|p| json!([p.x, p.y])).collect())
}

fn polygon_to_value(p: &Polygon) -> Value {
    if p.is_empty() && p.interiors.is_empty() {
        return json!([]);
    }
    Value::Array(p.rings().map(ring_to_value).collect())
}

fn geometry_to_value(g: &Geometry) -> Value {
    match g {
        Geometry::Empty => Value::Null,
        Geometry::Polygon(p) => json!({"type": "Polygon", "coordinates": polygon_to_value(p)}),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": Value::Array(mp.polygons.iter().map(polygon_to_value).collect()),
        }),
        Geometry::Other(v) => v.clone(),
    }
}
