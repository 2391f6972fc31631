/*
This tool is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 24/03/2026
Last Modified: 18/09/2026
License: MIT
*/

use super::*;
use crate::tools::*;
use boundary_common::algorithms::{densify_multipolygon, DensifyMetric};
use boundary_common::projection::WebMercator;
use boundary_common::utils::get_formatted_elapsed_time;
use boundary_common::Error as ToolError;
use boundary_vector::{
    rewrite_features, run_guarded, BatchReport, ConsoleProgress, FeatureStore, ProgressSink,
    Rewrite, Selection,
};
use std::io::{Error, ErrorKind};
use std::time::Instant;

/// This tool inserts vertices into polygon edges so that no edge of the
/// selected features is longer than `--max_length` kilometres. With
/// `--metric=geodesic` (the default) edge length is the WGS84 geodesic
/// distance and the new vertices are evenly spaced along the geodesic; with
/// `--metric=planar` length is measured in Web Mercator (EPSG:3857) and the
/// new vertices are evenly spaced along the projected straight edge. Existing
/// vertices are never moved and features that need no densification are
/// left untouched.
pub struct DensifyPolygons {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl DensifyPolygons {
    pub fn new() -> DensifyPolygons {
        // public constructor
        let name = "DensifyPolygons".to_string();
        let toolbox = TOOLBOX.to_string();
        let description =
            "Adds vertices so that no polygon edge exceeds a maximum length.".to_string();

        let mut parameters = common_parameters();
        parameters.push(ToolParameter {
            name: "Maximum Segment Length (km)".to_owned(),
            flags: vec!["--max_length".to_owned()],
            description: "Maximum edge length, in kilometres.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("100.0".to_owned()),
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Length Metric".to_owned(),
            flags: vec!["--metric".to_owned()],
            description: "How edge length is measured; 'geodesic' or 'planar' (EPSG:3857).".to_owned(),
            parameter_type: ParameterType::OptionList(vec![
                "geodesic".to_owned(),
                "planar".to_owned(),
            ]),
            default_value: Some("geodesic".to_owned()),
            optional: true,
        });

        let usage = example_usage(&name, "--all --max_length=50.0 --metric=planar");

        DensifyPolygons {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl BoundaryTool for DensifyPolygons {
    fn get_source_file(&self) -> String {
        String::from(file!())
    }

    fn get_tool_name(&self) -> String {
        self.name.clone()
    }

    fn get_tool_description(&self) -> String {
        self.description.clone()
    }

    fn get_tool_parameters(&self) -> String {
        parameters_json(&self.parameters)
    }

    fn get_example_usage(&self) -> String {
        self.example_usage.clone()
    }

    fn get_toolbox(&self) -> String {
        self.toolbox.clone()
    }

    fn run<'a>(
        &self,
        args: Vec<String>,
        working_directory: &'a str,
        verbose: bool,
    ) -> Result<(), Error> {
        let configs = get_configs()?;
        let mut common = CommonArgs::default();
        let mut max_length_km = configs.last_densify_length_km;
        let mut metric = DensifyMetric::default();

        // read the arguments
        if args.len() == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Tool run with no parameters.",
            ));
        }
        for i in 0..args.len() {
            let (flag_val, keyval) = split_flag(&args[i]);
            if common.accept(&flag_val, &keyval, &args, i)? {
                continue;
            }
            if flag_val == "-max_length" || flag_val == "-max_length_km" {
                max_length_km = parse_f64(&flag_val, &flag_value(&flag_val, &keyval, &args, i)?)?;
            } else if flag_val == "-metric" {
                metric = flag_value(&flag_val, &keyval, &args, i)?
                    .parse::<DensifyMetric>()
                    .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
            }
        }
        common.validate()?;
        common.resolve(working_directory);

        if verbose {
            print_welcome(&self.get_tool_name());
        }

        let start = Instant::now();

        let (mut store, selection) = common.open_store()?;
        let mut progress = ConsoleProgress::new(verbose);
        let report = run_guarded(&mut progress, |p| {
            densify_features(&mut store, selection, max_length_km, metric, p)
        })?;

        if verbose {
            println!("Saving data...")
        };
        save_store(&mut store, &common.output_file)?;
        remember_settings(|c| c.last_densify_length_km = max_length_km)?;

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!(
                "{}",
                &format!(
                    "Modified {} of {} feature(s).\nElapsed Time (excluding I/O): {}",
                    report.modified, report.total, elapsed_time
                )
            );
        }

        Ok(())
    }
}

/// Densifies the chosen features so that no edge is longer than
/// `max_length_km`, proposing the changed geometries as one edit command.
pub fn densify_features(
    store: &mut dyn FeatureStore,
    selection: Selection,
    max_length_km: f64,
    metric: DensifyMetric,
    progress: &mut dyn ProgressSink,
) -> Result<BatchReport, ToolError> {
    if !(max_length_km > 0f64) || !max_length_km.is_finite() {
        return Err(ToolError::invalid_parameter(
            "max_length",
            max_length_km,
            "must be a positive number of kilometres",
        ));
    }
    let max_length = max_length_km * 1000f64;
    let projection = WebMercator::new();
    let command_name = match metric {
        DensifyMetric::Planar => "Mercator densify polygons",
        DensifyMetric::Geodesic => "Geodesic densify polygons",
    };
    rewrite_features(store, selection, command_name, progress, |_, mp| {
        let (out, changed) = densify_multipolygon(mp, max_length, metric, &projection)?;
        Ok(if changed {
            Rewrite::Replace(out)
        } else {
            Rewrite::Unchanged
        })
    })
}

#[cfg(test)]
mod test {
    use super::densify_features;
    use boundary_common::algorithms::DensifyMetric;
    use boundary_common::structures::{Point2D, Polygon, Ring};
    use boundary_common::Error;
    use boundary_vector::{
        Feature, FeatureStore, Geometry, MemoryFeatureStore, RecordingProgress, Selection,
    };

    fn store() -> MemoryFeatureStore {
        // one degree square on the equator, edges of roughly 111 km
        let square = Ring::new(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        let features = vec![Feature::new(1, Geometry::Polygon(Polygon::new(square, vec![])))];
        let mut s = MemoryFeatureStore::new(features, "EPSG:4326").unwrap();
        s.start_editing();
        s
    }

    #[test]
    fn test_geodesic_densify_splits_every_edge() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let report =
            densify_features(&mut s, Selection::All, 60.0, DensifyMetric::Geodesic, &mut progress)
                .unwrap();
        assert_eq!(report.modified, 1);
        assert_eq!(s.edit_log()[0].name, "Geodesic densify polygons");
        match s.get_geometry(1) {
            Some(Geometry::Polygon(p)) => {
                // each ~111 km edge becomes two pieces
                assert_eq!(p.exterior.open_vertices().len(), 8);
                assert!(p.exterior.is_closed());
                assert_eq!(p.exterior[0], Point2D::new(0.0, 0.0));
            }
            g => panic!("unexpected geometry {:?}", g),
        }
    }

    #[test]
    fn test_long_limit_changes_nothing() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let report =
            densify_features(&mut s, Selection::All, 500.0, DensifyMetric::Planar, &mut progress)
                .unwrap();
        assert_eq!(report.modified, 0);
        assert!(s.edit_log().is_empty());
        assert_eq!(
            progress.last_message().unwrap().1,
            "Finished. No geometry changes were necessary."
        );
    }

    #[test]
    fn test_rejects_non_positive_length() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let e = densify_features(&mut s, Selection::All, 0.0, DensifyMetric::Planar, &mut progress)
            .unwrap_err();
        assert!(matches!(e, Error::InvalidParameter { name: "max_length", .. }));
    }
}
