/*
This tool is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 07/04/2026
Last Modified: 18/09/2026
License: MIT
*/

use super::*;
use crate::tools::*;
use boundary_common::algorithms::equal_area_octagon;
use boundary_common::projection::WebMercator;
use boundary_common::structures::MultiPolygon;
use boundary_common::utils::get_formatted_elapsed_time;
use boundary_common::Error as ToolError;
use boundary_vector::{
    rewrite_features, run_guarded, BatchReport, ConsoleProgress, FeatureStore, MessageLevel,
    ProgressSink, Rewrite, Selection,
};
use std::io::{Error, ErrorKind};
use std::time::Instant;

pub const OCTAGON_COMMAND: &str = "Replace polygons with equal-area octagons";

/// This tool replaces each selected polygon with a regular octagon of the
/// same area. Area and centroid are computed in Web Mercator (EPSG:3857),
/// the octagon's vertices are placed at 0, 45, ..., 315 degrees around the
/// centroid and the result is projected back to geographic coordinates.
/// Empty features and features whose area is zero or not finite are
/// skipped.
pub struct PolygonToOctagon {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl PolygonToOctagon {
    pub fn new() -> PolygonToOctagon {
        // public constructor
        let name = "PolygonToOctagon".to_string();
        let toolbox = TOOLBOX.to_string();
        let description =
            "Replaces polygons with regular octagons of equal area.".to_string();

        let parameters = common_parameters();
        let usage = example_usage(&name, "--select=12");

        PolygonToOctagon {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl BoundaryTool for PolygonToOctagon {
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
        let mut common = CommonArgs::default();

        if args.len() == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Tool run with no parameters.",
            ));
        }
        for i in 0..args.len() {
            let (flag_val, keyval) = split_flag(&args[i]);
            common.accept(&flag_val, &keyval, &args, i)?;
        }
        common.validate()?;
        common.resolve(working_directory);

        if verbose {
            print_welcome(&self.get_tool_name());
        }

        let start = Instant::now();

        let (mut store, selection) = common.open_store()?;
        let mut progress = ConsoleProgress::new(verbose);
        let counts = run_guarded(&mut progress, |p| {
            replace_with_octagons(&mut store, selection, p)
        })?;

        if verbose {
            println!("Saving data...")
        };
        save_store(&mut store, &common.output_file)?;

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!(
                "{}",
                &format!(
                    "Replaced {} feature(s).\nElapsed Time (excluding I/O): {}",
                    counts.report.modified, elapsed_time
                )
            );
        }

        Ok(())
    }
}

/// Counts from an octagon run. The empty and zero-area skips are kept
/// apart; `report.skipped` is their sum.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OctagonCounts {
    pub report: BatchReport,
    pub skipped_empty: usize,
    pub skipped_zero_area: usize,
}

pub fn replace_with_octagons(
    store: &mut dyn FeatureStore,
    selection: Selection,
    progress: &mut dyn ProgressSink,
) -> Result<OctagonCounts, ToolError> {
    let projection = WebMercator::new();
    let mut skipped_zero_area = 0usize;
    let report = rewrite_features(store, selection, OCTAGON_COMMAND, progress, |_, mp| {
        match equal_area_octagon(mp, &projection)? {
            Some(octagon) => Ok(Rewrite::Replace(MultiPolygon::from(octagon))),
            None => {
                skipped_zero_area += 1;
                Ok(Rewrite::Skip)
            }
        }
    })?;
    let counts = OctagonCounts {
        skipped_empty: report.skipped - skipped_zero_area,
        skipped_zero_area,
        report,
    };
    if counts.report.skipped > 0 {
        progress.notify(
            MessageLevel::Info,
            &format!(
                "Skipped empty={}, invalid/zero-area={}.",
                counts.skipped_empty, counts.skipped_zero_area
            ),
        );
    }
    Ok(counts)
}

#[cfg(test)]
mod test {
    use super::{replace_with_octagons, OCTAGON_COMMAND};
    use boundary_common::projection::{ProjectionProvider, WebMercator};
    use boundary_common::structures::{Point2D, Polygon, Ring};
    use boundary_vector::{
        Feature, FeatureStore, Geometry, MemoryFeatureStore, RecordingProgress, Selection,
    };

    fn square(x: f64, size: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(
            Ring::new(&[
                Point2D::new(x, 0.0),
                Point2D::new(x, size),
                Point2D::new(x + size, size),
                Point2D::new(x + size, 0.0),
                Point2D::new(x, 0.0),
            ]),
            vec![],
        ))
    }

    #[test]
    fn test_octagon_replaces_polygon_with_equal_area() {
        let features = vec![
            Feature::new(1, square(0.0, 0.5)),
            Feature::new(2, Geometry::Empty),
            Feature::new(3, square(5.0, 0.0)),
        ];
        let mut s = MemoryFeatureStore::new(features, "EPSG:4326").unwrap();
        s.start_editing();
        let mut progress = RecordingProgress::new();
        let counts = replace_with_octagons(&mut s, Selection::All, &mut progress).unwrap();
        assert_eq!(counts.report.modified_ids, vec![1]);
        assert_eq!(counts.skipped_empty, 1);
        assert_eq!(counts.skipped_zero_area, 1);
        assert_eq!(s.edit_log()[0].name, OCTAGON_COMMAND);
        assert_eq!(
            progress.last_message().unwrap().1,
            "Skipped empty=1, invalid/zero-area=1."
        );

        let proj = WebMercator::new();
        let metric_area = |g: &Geometry| {
            let mut mp = g.to_multipolygon().unwrap();
            for r in mp.rings_mut() {
                for v in r.vertices.iter_mut() {
                    *v = proj.to_metric(v).unwrap();
                }
            }
            mp.area()
        };
        let before = metric_area(&square(0.0, 0.5));
        match s.get_geometry(1) {
            Some(g @ Geometry::Polygon(_)) => {
                let after = metric_area(&g);
                assert!((after - before).abs() / before < 1e-9);
                if let Geometry::Polygon(p) = g {
                    assert_eq!(p.exterior.len(), 9);
                    assert!(p.exterior.is_closed());
                }
            }
            g => panic!("unexpected geometry {:?}", g),
        }
    }
}
