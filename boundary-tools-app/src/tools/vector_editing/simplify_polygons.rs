/*
This tool is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 26/03/2026
Last Modified: 18/09/2026
License: MIT
*/

use super::*;
use crate::tools::*;
use boundary_common::algorithms::{simplify_multipolygon, SimplifyOptions};
use boundary_common::projection::WebMercator;
use boundary_common::utils::get_formatted_elapsed_time;
use boundary_common::Error as ToolError;
use boundary_vector::{
    rewrite_features, run_guarded, BatchReport, ConsoleProgress, FeatureStore, MessageLevel,
    ProgressSink, Rewrite, Selection,
};
use std::io::{Error, ErrorKind};
use std::time::Instant;

pub const SIMPLIFY_COMMAND: &str = "Douglas–Peucker simplify polygons (EPSG:3857)";

/// This tool simplifies the rings of the selected polygon features with the
/// Douglas-Peucker algorithm. Distances are measured in Web Mercator
/// (EPSG:3857) metres, so `--tolerance` is a ground distance rather than an
/// angle. Only original vertices are kept. A ring that would be left with
/// fewer than three distinct vertices is not simplified.
pub struct SimplifyPolygons {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl SimplifyPolygons {
    pub fn new() -> SimplifyPolygons {
        // public constructor
        let name = "SimplifyPolygons".to_string();
        let toolbox = TOOLBOX.to_string();
        let description =
            "Simplifies polygon rings using the Douglas-Peucker algorithm in EPSG:3857.".to_string();

        let mut parameters = common_parameters();
        parameters.push(ToolParameter {
            name: "Tolerance (m)".to_owned(),
            flags: vec!["--tolerance".to_owned()],
            description: "Simplification tolerance, in metres.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("50.0".to_owned()),
            optional: true,
        });

        let usage = example_usage(&name, "--select=1,4,9 --tolerance=25.0");

        SimplifyPolygons {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl BoundaryTool for SimplifyPolygons {
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
        let mut tolerance = configs.last_simplify_tolerance_m;

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
        let report = run_guarded(&mut progress, |p| {
            simplify_features(&mut store, selection, tolerance, p)
        })?;

        if verbose {
            println!("Saving data...")
        };
        save_store(&mut store, &common.output_file)?;
        remember_settings(|c| c.last_simplify_tolerance_m = tolerance)?;

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

/// Simplifies the chosen features with a tolerance in metres. A zero
/// tolerance is a warning and leaves the store untouched.
pub fn simplify_features(
    store: &mut dyn FeatureStore,
    selection: Selection,
    tolerance: f64,
    progress: &mut dyn ProgressSink,
) -> Result<BatchReport, ToolError> {
    if tolerance.is_nan() || tolerance < 0f64 {
        return Err(ToolError::invalid_parameter(
            "tolerance",
            tolerance,
            "must not be negative",
        ));
    }
    if tolerance == 0f64 {
        boundary_vector::check_preconditions(store, selection)?;
        progress.notify(MessageLevel::Warning, "Tolerance is 0. No changes were made.");
        return Ok(BatchReport::default());
    }
    let options = SimplifyOptions::new(tolerance);
    let projection = WebMercator::new();
    rewrite_features(store, selection, SIMPLIFY_COMMAND, progress, |_, mp| {
        let (out, changed) = simplify_multipolygon(mp, &options, &projection)?;
        Ok(if changed {
            Rewrite::Replace(out)
        } else {
            Rewrite::Unchanged
        })
    })
}
