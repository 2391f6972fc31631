/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 23/03/2026
Last Modified: 18/09/2026
License: MIT
*/

/*!
BoundaryTools is a command-line program for editing polygon boundaries stored
in geographic (EPSG:4326) GeoJSON files: densifying long edges, simplifying
rings, aligning the vertices of neighbouring polygons, snapping vertices to
the antimeridian and replacing polygons with equal-area octagons. The
following commands are recognized:

| Command           | Description                                                                    |
| ----------------- | ------------------------------------------------------------------------------ |
| --cd, --wd        | Changes the working directory; used in conjunction with --run flag.            |
| -h, --help        | Prints help information.                                                       |
| --listtools       | Lists all available tools. Keywords may also be used, --listtools densify.     |
| -r, --run         | Runs a tool; used in conjunction with --wd flag; -r="DensifyPolygons".         |
| --toolbox         | Prints the toolbox associated with a tool; --toolbox=DensifyPolygons.          |
| --toolhelp        | Prints the help associated with a tool; --toolhelp="DensifyPolygons".         |
| --toolparameters  | Prints the parameters (in json form) for a tool; --toolparameters="Tool".      |
| -v                | Verbose mode. Without this flag, tool outputs will not be printed.             |
| --viewcode        | Prints the source file of a tool; --viewcode="DensifyPolygons".                |
| --version         | Prints the version information.                                                |

Diagnostic logging is controlled by the RUST_LOG environment variable and is
off (warnings only) by default.
*/

pub mod tools;

use crate::tools::ToolManager;
use boundary_common::configs::{get_configs, save_configs};
use std::env;
use std::io::{Error, ErrorKind};
use std::path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[macro_use]
extern crate serde_derive;

/// BoundaryTools edits polygon boundaries in GeoJSON files.
///
/// # Examples
///
/// ```
/// >>./boundary_tools --wd='/Users/jane/data/' --run=DensifyPolygons --input='parcels.geojson' --output='dense.geojson' --all --max_length=50 -v
/// ```
fn main() {
    init_logging();
    match run() {
        Ok(()) => {}
        Err(err) => panic!("{}", err),
    }
}

/// Sends `tracing` events to stderr, filtered by RUST_LOG (default: warn).
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    // a second initialisation (e.g. under a test harness) is not an error
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

fn run() -> Result<(), Error> {
    let sep: &str = &path::MAIN_SEPARATOR.to_string();
    let mut working_dir = String::new();
    let mut tool_name = String::new();
    let mut run_tool = false;
    let mut tool_help = false;
    let mut tool_parameters = false;
    let mut toolbox = false;
    let mut list_tools = false;
    let mut keywords: Vec<String> = vec![];
    let mut view_code = false;
    let mut tool_args_vec: Vec<String> = vec![];
    let mut finding_working_dir = false;
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        version();
        help();
        let tm = ToolManager::new(&working_dir, &false)?;
        tm.list_tools();
        return Ok(());
    }

    let mut configs = get_configs()?;
    let mut configs_modified = false;

    for arg in args.iter().skip(1) {
        let flag_val = arg.to_lowercase().replace("--", "-");
        if flag_val == "-h" || flag_val == "-help" {
            help();
            return Ok(());
        } else if flag_val.starts_with("-cd")
            || flag_val.starts_with("-wd")
            || flag_val.starts_with("-working_directory")
        {
            let mut v = arg
                .replace("--cd", "")
                .replace("--wd", "")
                .replace("--working_directory", "")
                .replace("-cd", "")
                .replace("-wd", "")
                .replace("-working_directory", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            if v.trim().is_empty() {
                finding_working_dir = true;
                continue;
            }
            if !v.ends_with(sep) {
                v.push_str(sep);
            }
            working_dir = v;
            if configs.working_directory != working_dir {
                configs.working_directory = working_dir.clone();
                configs_modified = true;
            }
        } else if flag_val.starts_with("-run") || flag_val.starts_with("-r=") || flag_val == "-r" {
            let mut v = arg
                .replace("--run", "")
                .replace("-run", "")
                .replace("-r", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            run_tool = true;
        } else if flag_val.starts_with("-toolhelp") {
            tool_name = flag_argument(arg, "toolhelp");
            tool_help = true;
        } else if flag_val.starts_with("-toolparameters") {
            tool_name = flag_argument(arg, "toolparameters");
            tool_parameters = true;
        } else if flag_val.starts_with("-toolbox") {
            tool_name = flag_argument(arg, "toolbox");
            toolbox = true;
        } else if flag_val.starts_with("-listtools") || flag_val.starts_with("-list_tools") {
            list_tools = true;
        } else if flag_val.starts_with("-viewcode") {
            tool_name = flag_argument(arg, "viewcode");
            view_code = true;
        } else if flag_val == "-v" || flag_val.starts_with("-v=") || flag_val.starts_with("-verbose") {
            let mut v = arg
                .replace("--verbose", "")
                .replace("-verbose", "")
                .replace("-v", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            let verbose = v.to_lowercase().contains("t") || v.is_empty();
            if configs.verbose_mode != verbose {
                configs.verbose_mode = verbose;
                configs_modified = true;
            }
        } else if flag_val.starts_with("-version") {
            version();
            return Ok(());
        } else if arg.starts_with("-") {
            // it's an arg to be fed to the tool
            tool_args_vec.push(arg.trim().to_string());
        } else if finding_working_dir {
            working_dir = arg.trim().replace("\"", "").replace("\'", "");
            if !working_dir.ends_with(sep) {
                working_dir.push_str(sep);
            }
            finding_working_dir = false;
            configs.working_directory = working_dir.clone();
            configs_modified = true;
        } else if tool_args_vec.len() > 0 {
            // value of a space-separated tool flag
            tool_args_vec.push(arg.trim().to_string());
        } else {
            keywords.push(arg.trim().replace("\"", "").replace("\'", ""));
        }
    }

    if configs_modified {
        save_configs(&configs)?;
    }

    let tm = ToolManager::new(&configs.working_directory, &configs.verbose_mode)?;
    if tool_name.is_empty() && keywords.len() > 0 && (run_tool || tool_help || tool_parameters || view_code) {
        tool_name = keywords[0].clone();
    }
    if run_tool {
        if tool_name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "No tool name was given to --run.",
            ));
        }
        return tm.run_tool(tool_name, tool_args_vec);
    } else if tool_help {
        return tm.tool_help(tool_name);
    } else if tool_parameters {
        return tm.tool_parameters(tool_name);
    } else if toolbox {
        if tool_name.is_empty() && keywords.len() > 0 {
            tool_name = keywords[0].clone();
        }
        return tm.toolbox(tool_name);
    } else if list_tools {
        if keywords.len() == 0 {
            tm.list_tools();
        } else {
            tm.list_tools_with_keywords(keywords);
        }
    } else if view_code {
        return tm.get_tool_source_code(tool_name);
    }

    Ok(())
}

/// The value of a `--flag=value` command, with quotes removed.
fn flag_argument(arg: &str, flag: &str) -> String {
    let mut v = arg
        .replace(&format!("--{}", flag), "")
        .replace(&format!("-{}", flag), "")
        .replace("\"", "")
        .replace("\'", "");
    if v.starts_with("=") {
        v = v[1..v.len()].to_string();
    }
    v
}

fn help() {
    let mut ext = "";
    if cfg!(target_os = "windows") {
        ext = ".exe";
    }

    let exe_name = &format!("boundary_tools{}", ext);
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let s = "BoundaryTools Help

The following commands are recognized:
--cd, --wd          Changes the working directory; used in conjunction with --run flag.
-h, --help          Prints help information.
--listtools         Lists all available tools. Keywords may also be used, --listtools densify.
-r, --run           Runs a tool; used in conjunction with --wd flag; -r=\"DensifyPolygons\".
--toolbox           Prints the toolbox associated with a tool; --toolbox=DensifyPolygons.
--toolhelp          Prints the help associated with a tool; --toolhelp=\"DensifyPolygons\".
--toolparameters    Prints the parameters (in json form) for a specific tool; --toolparameters=\"DensifyPolygons\".
-v                  Verbose mode. Without this flag, tool outputs will not be printed.
--viewcode          Prints the source file of a tool; --viewcode=\"DensifyPolygons\".
--version           Prints the version information.

Tools operate on the features named with --select=1,2,3, or on every feature
with --all. The input must be GeoJSON in EPSG:4326.

Example Usage:
>> .*EXE_NAME -r=AlignPolygonVertices --wd=\"*path*to*data*\" -i=parcels.geojson -o=aligned.geojson --all --tolerance=0.0001 -v
"
    .replace("*", &sep)
    .replace("EXE_NAME", exe_name);
    println!("{}", s);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!(
        "BoundaryTools v{} by the Boundary Tools Contributors (c) 2026

BoundaryTools is a polygon boundary editing library and command-line
program for geographic (EPSG:4326) vector data. It is released under
the MIT license.",
        VERSION.unwrap_or("unknown")
    );
}
