/*
This tool is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 28/03/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::*;
use crate::tools::*;
use boundary_common::algorithms::MAX_DECIMALS;
use boundary_common::utils::get_formatted_elapsed_time;
use boundary_vector::{
    run_guarded, AlignmentEngine, AlignmentOptions, ConsoleProgress, ReferencePointSnapper,
    SnapScope,
};
use std::io::{Error, ErrorKind};
use std::time::Instant;

/// This tool makes the boundaries of neighbouring polygons share exact
/// vertices. It works in three stages. First, every vertex of every chosen
/// feature is rounded to `--decimals` places and collected into a spatial
/// index of target vertices. Second, each edge is tested against the targets
/// within `--tolerance` degrees, and every target whose projection falls
/// strictly inside the edge is inserted into it, in order along the edge.
/// Third, the vertices of the noded features (or of every feature, with
/// `--snap_all`) are snapped onto the nearest target within tolerance.
///
/// The input must be in geographic coordinates (EPSG:4326) and at least two
/// polygon features must be chosen.
pub struct AlignPolygonVertices {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl AlignPolygonVertices {
    pub fn new() -> AlignPolygonVertices {
        // public constructor
        let name = "AlignPolygonVertices".to_string();
        let toolbox = TOOLBOX.to_string();
        let description =
            "Nodes and snaps polygon edges so that adjacent boundaries share vertices.".to_string();

        let mut parameters = common_parameters();
        parameters.push(ToolParameter {
            name: "Tolerance (degrees)".to_owned(),
            flags: vec!["--tolerance".to_owned()],
            description: "Search and snap distance, in degrees.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("0.0001".to_owned()),
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Decimal Places".to_owned(),
            flags: vec!["--decimals".to_owned()],
            description: "Decimal places used to round and de-duplicate target vertices.".to_owned(),
            parameter_type: ParameterType::Integer,
            default_value: Some("6".to_owned()),
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Snap All Features".to_owned(),
            flags: vec!["--snap_all".to_owned()],
            description: "Snap every chosen feature, not only those that gained vertices.".to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("false".to_owned()),
            optional: true,
        });

        let usage = example_usage(&name, "--all --tolerance=0.0001 --decimals=6");

        AlignPolygonVertices {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl BoundaryTool for AlignPolygonVertices {
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
        let mut options = AlignmentOptions::new(configs.last_alignment_tolerance);
        options.decimals = configs.decimal_precision;

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
                options.tolerance =
                    parse_f64(&flag_val, &flag_value(&flag_val, &keyval, &args, i)?)?;
            } else if flag_val == "-decimals" {
                let v = flag_value(&flag_val, &keyval, &args, i)?;
                options.decimals = v.parse::<u32>().map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidInput,
                        format!("Error parsing {} value '{}'.", flag_val, v),
                    )
                })?;
                if options.decimals > MAX_DECIMALS {
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        format!("--decimals must be between 0 and {}.", MAX_DECIMALS),
                    ));
                }
            } else if flag_val == "-snap_all" {
                options.snap_scope = if parse_bool(&keyval) {
                    SnapScope::All
                } else {
                    SnapScope::Touched
                };
            }
        }
        common.validate()?;
        common.resolve(working_directory);

        if verbose {
            print_welcome(&self.get_tool_name());
        }

        let start = Instant::now();

        let (mut store, selection) = common.open_store()?;
        let snapper = ReferencePointSnapper::new();
        let engine = AlignmentEngine::new(options, &snapper);
        let mut progress = ConsoleProgress::new(verbose);
        let report = run_guarded(&mut progress, |p| engine.run(&mut store, selection, p))?;

        if verbose {
            println!("Saving data...")
        };
        save_store(&mut store, &common.output_file)?;
        remember_settings(|c| {
            c.last_alignment_tolerance = options.tolerance;
            c.decimal_precision = options.decimals;
        })?;

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!(
                "{}",
                &format!(
                    "Inserted {} vertices into {} feature(s).\nElapsed Time (excluding I/O): {}",
                    report.inserted_vertices,
                    report.noded_ids.len(),
                    elapsed_time
                )
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::AlignPolygonVertices;
    use crate::tools::BoundaryTool;
    use boundary_vector::{FeatureCollection, Geometry};
    use std::fs;

    #[test]
    fn test_rejects_missing_output() {
        let tool = AlignPolygonVertices::new();
        let e = tool
            .run(vec!["-i=in.geojson".to_string()], "", false)
            .unwrap_err();
        assert_eq!(e.to_string(), "No output file was specified.");
        assert!(tool.run(vec![], "", false).is_err());
    }

    #[test]
    fn test_rejects_bad_decimals() {
        let tool = AlignPolygonVertices::new();
        let args = vec![
            "-i=in.geojson".to_string(),
            "-o=out.geojson".to_string(),
            "--decimals=x".to_string(),
        ];
        assert!(tool.run(args, "", false).is_err());
    }

    #[test]
    fn test_precondition_error_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("one.geojson");
        fs::write(
            &input,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": 1, "properties": {},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[0,0]]]}}
            ]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.geojson");
        let args = vec![
            format!("-i={}", input.display()),
            format!("-o={}", output.display()),
            "--all".to_string(),
        ];
        let e = AlignPolygonVertices::new().run(args, "", false).unwrap_err();
        assert_eq!(
            e.to_string(),
            "Need at least 2 polygon features (selection or layer) to run."
        );
        assert!(!output.exists());
        // the input is untouched
        let fc = FeatureCollection::read(&input).unwrap();
        assert!(matches!(fc.features[0].geometry, Geometry::Polygon(_)));
    }
}
