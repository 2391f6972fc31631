/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 20/05/2026
Last Modified: 14/09/2026
License: MIT
*/

use boundary_common::algorithms::{
    densify_multipolygon, simplify_multipolygon, DensifyMetric, SimplifyOptions,
};
use boundary_common::projection::PlanarIdentity;
use boundary_common::structures::{Point2D, Polygon, Ring};
use boundary_vector::{
    rewrite_features, AlignmentEngine, AlignmentOptions, Feature, FeatureCollection, FeatureStore,
    Geometry, MemoryFeatureStore, MessageLevel, RecordingProgress, ReferencePointSnapper, Rewrite,
    Selection,
};

fn polygon(points: &[(f64, f64)]) -> Geometry {
    let vertices: Vec<Point2D> = points.iter().map(|(x, y)| Point2D::new(*x, *y)).collect();
    Geometry::Polygon(Polygon::new(Ring::from(vertices), vec![]))
}

fn editable(features: Vec<Feature>) -> MemoryFeatureStore {
    let mut store = MemoryFeatureStore::new(features, "EPSG:4326").unwrap();
    store.start_editing();
    store
}

fn exterior(store: &MemoryFeatureStore, id: u64) -> Ring {
    match store.get_geometry(id) {
        Some(Geometry::Polygon(p)) => p.exterior,
        other => panic!("feature {} is not a polygon: {:?}", id, other),
    }
}

#[test]
fn densify_square_adds_one_midpoint_per_edge() {
    let square = polygon(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
    let mut store = editable(vec![Feature::new(1, square)]);
    store.select(&[1]);
    let mut progress = RecordingProgress::new();
    let report = rewrite_features(&mut store, Selection::Selected, "Densify", &mut progress, |_, mp| {
        let (out, changed) = densify_multipolygon(mp, 6.0, DensifyMetric::Planar, &PlanarIdentity)?;
        Ok(if changed { Rewrite::Replace(out) } else { Rewrite::Unchanged })
    })
    .unwrap();
    assert_eq!(report.modified, 1);

    let ring = exterior(&store, 1);
    assert_eq!(ring.open_vertices().len(), 8);
    assert!(ring.is_closed());
    assert_eq!(ring[1], Point2D::new(0.0, 5.0));
    assert_eq!(
        progress.last_message().unwrap().1,
        "Finished. Modified 1 of 1 feature(s). Edits are NOT saved."
    );
}

#[test]
fn simplify_drops_nearly_collinear_vertex() {
    let ring = polygon(&[(0.0, 0.0), (0.01, 5.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
    let mut store = editable(vec![Feature::new(1, ring)]);
    let mut progress = RecordingProgress::new();
    rewrite_features(&mut store, Selection::All, "Simplify", &mut progress, |_, mp| {
        let (out, changed) = simplify_multipolygon(mp, &SimplifyOptions::new(1.0), &PlanarIdentity)?;
        Ok(if changed { Rewrite::Replace(out) } else { Rewrite::Unchanged })
    })
    .unwrap();
    let out = exterior(&store, 1);
    assert_eq!(
        out.vertices,
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]
    );
}

#[test]
fn alignment_makes_near_boundaries_share_a_vertex() {
    let a = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
    let b = polygon(&[(5.0, 10.00005), (7.0, 14.0), (3.0, 14.0), (5.0, 10.00005)]);
    let mut store = editable(vec![Feature::new(1, a), Feature::new(2, b)]);
    store.select(&[1, 2]);

    let engine = AlignmentEngine::new(AlignmentOptions::new(0.0001), &ReferencePointSnapper);
    let mut progress = RecordingProgress::new();
    let report = engine.run(&mut store, Selection::Selected, &mut progress).unwrap();

    assert!(report.targets >= 2);
    assert_eq!(report.targets, 7);
    assert_eq!(report.noded_ids, vec![1]);
    assert_eq!(report.inserted_vertices, 1);
    assert_eq!(report.snapped, 1);

    let shared = Point2D::new(5.0, 10.00005);
    let ra = exterior(&store, 1);
    let rb = exterior(&store, 2);
    assert_eq!(ra.len(), 6);
    assert!(ra.vertices.contains(&shared));
    assert!(rb.vertices.contains(&shared));
    assert!(ra.is_closed());

    let (level, text) = progress.last_message().unwrap();
    assert_eq!(*level, MessageLevel::Success);
    assert_eq!(
        text,
        "Finished. Targets: 7. Noded features: 1. Snapped features: 1. Skipped: 0. Edits are NOT saved."
    );
}

#[test]
fn geojson_file_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.geojson");
    std::fs::write(
        &input,
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": 4, "properties": {"name": "lot"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,10],[10,10],[10,0],[0,0]]]}},
            {"type": "Feature", "id": 5, "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}}
        ]}"#,
    )
    .unwrap();

    let fc = FeatureCollection::read(&input).unwrap();
    let mut store = MemoryFeatureStore::from_feature_collection(fc).unwrap();
    store.start_editing();
    let mut progress = RecordingProgress::new();
    let report = rewrite_features(&mut store, Selection::All, "Densify", &mut progress, |_, mp| {
        let (out, changed) = densify_multipolygon(mp, 6.0, DensifyMetric::Planar, &PlanarIdentity)?;
        Ok(if changed { Rewrite::Replace(out) } else { Rewrite::Unchanged })
    })
    .unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(store.commit().unwrap(), 1);

    let output = dir.path().join("out.geojson");
    store.to_feature_collection().write(&output).unwrap();
    let back = FeatureCollection::read(&output).unwrap();
    assert_eq!(back.features.len(), 2);
    assert_eq!(back.features[0].id, 4);
    assert_eq!(back.features[0].properties["name"], "lot");
    match &back.features[0].geometry {
        Geometry::Polygon(p) => assert_eq!(p.exterior.len(), 9),
        g => panic!("unexpected geometry {}", g),
    }
    assert!(matches!(back.features[1].geometry, Geometry::Other(_)));
}
