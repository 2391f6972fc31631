/*
This tool is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/04/2026
Last Modified: 18/09/2026
License: MIT
*/

use super::*;
use crate::tools::*;
use boundary_common::algorithms::snap_multipolygon_to_antimeridian;
use boundary_common::utils::get_formatted_elapsed_time;
use boundary_common::Error as ToolError;
use boundary_vector::{
    rewrite_features, run_guarded, BatchReport, ConsoleProgress, FeatureStore, MessageLevel,
    ProgressSink, Rewrite, Selection,
};
use std::io::{Error, ErrorKind};
use std::time::Instant;

pub const ANTIMERIDIAN_COMMAND: &str = "Snap features to dateline (±180°) [outer rings only]";

/// This tool moves outer-ring vertices whose longitude lies within
/// `--tolerance` degrees of +180 or -180 exactly onto the antimeridian.
/// Latitudes are unchanged and interior rings (holes) are never touched.
/// It is typically used to close slivers left between polygons that were
/// split at the dateline.
pub struct SnapToAntimeridian {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl SnapToAntimeridian {
    pub fn new() -> SnapToAntimeridian {
        // public constructor
        let name = "SnapToAntimeridian".to_string();
        let toolbox = TOOLBOX.to_string();
        let description =
            "Snaps outer-ring vertices near the antimeridian to exactly +/-180 degrees.".to_string();

        let mut parameters = common_parameters();
        parameters.push(ToolParameter {
            name: "Tolerance (degrees)".to_owned(),
            flags: vec!["--tolerance".to_owned()],
            description: "Longitude distance from +/-180 within which vertices are snapped.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("0.007".to_owned()),
            optional: true,
        });

        let usage = example_usage(&name, "--all --tolerance=0.01");

        SnapToAntimeridian {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl BoundaryTool for SnapToAntimeridian {
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
        let mut tolerance = configs.last_antimeridian_tolerance;

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
            if flag_val == "-tolerance" || flag_val == "-tol" {
                tolerance = parse_f64(&flag_val, &flag_value(&flag_val, &keyval, &args, i)?)?;
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
        let (report, vertices) = run_guarded(&mut progress, |p| {
            snap_features_to_antimeridian(&mut store, selection, tolerance, p)
        })?;

        if verbose {
            println!("Saving data...")
        };
        save_store(&mut store, &common.output_file)?;
        remember_settings(|c| c.last_antimeridian_tolerance = tolerance)?;

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!(
                "{}",
                &format!(
                    "Modified {} of {} feature(s); snapped {} vertices.\nElapsed Time (excluding I/O): {}",
                    report.modified, report.total, vertices, elapsed_time
                )
            );
        }

        Ok(())
    }
}

/// Snaps the outer rings of the chosen features to the antimeridian.
/// Returns the batch counts and the number of vertices moved.
pub fn snap_features_to_antimeridian(
    store: &mut dyn FeatureStore,
    selection: Selection,
    tolerance: f64,
    progress: &mut dyn ProgressSink,
) -> Result<(BatchReport, usize), ToolError> {
    if tolerance.is_nan() || tolerance < 0f64 || tolerance >= 180f64 {
        return Err(ToolError::invalid_parameter(
            "tolerance",
            tolerance,
            "must be between 0 and 180 degrees",
        ));
    }
    let mut vertices = 0usize;
    let report = rewrite_features(store, selection, ANTIMERIDIAN_COMMAND, progress, |_, mp| {
        let (out, snapped) = snap_multipolygon_to_antimeridian(mp, tolerance);
        if snapped > 0 && out != *mp {
            vertices += snapped;
            Ok(Rewrite::Replace(out))
        } else {
            Ok(Rewrite::Unchanged)
        }
    })?;
    if report.modified > 0 {
        progress.notify(
            MessageLevel::Info,
            &format!(
                "Modified {}/{} feature(s); snapped {} outer-ring vertex/vertices.",
                report.modified, report.total, vertices
            ),
        );
    }
    Ok((report, vertices))
}

#[cfg(test)]
mod test {
    use super::{snap_features_to_antimeridian, ANTIMERIDIAN_COMMAND};
    use boundary_common::structures::{Point2D, Polygon, Ring};
    use boundary_vector::{
        Feature, FeatureStore, Geometry, MemoryFeatureStore, MessageLevel, RecordingProgress,
        Selection,
    };

    fn ring(points: &[(f64, f64)]) -> Ring {
        let v: Vec<Point2D> = points.iter().map(|(x, y)| Point2D::new(*x, *y)).collect();
        Ring::from(v)
    }

    fn store() -> MemoryFeatureStore {
        let exterior = ring(&[(179.0, 0.0), (179.995, 0.0), (179.995, 1.0), (179.0, 1.0), (179.0, 0.0)]);
        let hole = ring(&[(179.2, 0.2), (179.996, 0.2), (179.996, 0.8), (179.2, 0.2)]);
        let east = Geometry::Polygon(Polygon::new(exterior, vec![hole]));
        let west = Geometry::Polygon(Polygon::new(
            ring(&[(-179.998, 0.0), (-179.0, 0.0), (-179.0, 1.0), (-179.998, 0.0)]),
            vec![],
        ));
        let far = Geometry::Polygon(Polygon::new(
            ring(&[(10.0, 0.0), (11.0, 0.0), (11.0, 1.0), (10.0, 0.0)]),
            vec![],
        ));
        let features = vec![Feature::new(1, east), Feature::new(2, west), Feature::new(3, far)];
        let mut s = MemoryFeatureStore::new(features, "EPSG:4326").unwrap();
        s.start_editing();
        s
    }

    #[test]
    fn test_outer_rings_snapped_holes_untouched() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let (report, vertices) =
            snap_features_to_antimeridian(&mut s, Selection::All, 0.007, &mut progress).unwrap();
        assert_eq!(report.modified_ids, vec![1, 2]);
        // two on the eastern exterior, two on the western one (first and closing vertex)
        assert_eq!(vertices, 4);
        assert_eq!(s.edit_log()[0].name, ANTIMERIDIAN_COMMAND);

        match s.get_geometry(1) {
            Some(Geometry::Polygon(p)) => {
                assert_eq!(p.exterior[1], Point2D::new(180.0, 0.0));
                assert_eq!(p.exterior[2], Point2D::new(180.0, 1.0));
                assert_eq!(p.interiors[0][1], Point2D::new(179.996, 0.2));
            }
            g => panic!("unexpected geometry {:?}", g),
        }
        match s.get_geometry(2) {
            Some(Geometry::Polygon(p)) => {
                assert_eq!(p.exterior[0], Point2D::new(-180.0, 0.0));
                assert!(p.exterior.is_closed());
            }
            g => panic!("unexpected geometry {:?}", g),
        }
        assert_eq!(
            progress.messages[0],
            (MessageLevel::Success, "Finished. Modified 2 of 3 feature(s). Edits are NOT saved.".to_string())
        );
        assert_eq!(
            progress.last_message().unwrap().1,
            "Modified 2/3 feature(s); snapped 4 outer-ring vertex/vertices."
        );
    }

    #[test]
    fn test_nothing_within_tolerance() {
        let mut s = store();
        let mut progress = RecordingProgress::new();
        let (report, vertices) =
            snap_features_to_antimeridian(&mut s, Selection::All, 0.001, &mut progress).unwrap();
        assert_eq!(report.modified, 0);
        assert_eq!(vertices, 0);
        assert!(s.pending_ids().is_empty());
        assert!(snap_features_to_antimeridian(&mut s, Selection::All, -1.0, &mut progress).is_err());
    }
}
