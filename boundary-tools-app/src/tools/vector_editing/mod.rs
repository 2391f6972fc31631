/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 23/03/2026
Last Modified: 18/09/2026
License: MIT

Notes: Every tool in this toolbox reads a GeoJSON FeatureCollection into an
in-memory store, runs one edit operation against the chosen features,
commits the proposed geometries and writes the collection back out.
*/

// private sub-module defined in other files
mod align_polygon_vertices;
mod densify_polygons;
mod polygon_to_octagon;
mod simplify_polygons;
mod snap_to_antimeridian;

// exports identifiers from private sub-modules in the current module namespace
pub use self::align_polygon_vertices::AlignPolygonVertices;
pub use self::densify_polygons::DensifyPolygons;
pub use self::polygon_to_octagon::PolygonToOctagon;
pub use self::simplify_polygons::SimplifyPolygons;
pub use self::snap_to_antimeridian::SnapToAntimeridian;

use super::{ParameterFileType, ParameterType, ToolParameter, VectorGeometryType};
use boundary_common::configs::{get_configs, save_configs, Configs};
use boundary_vector::{FeatureCollection, FeatureId, MemoryFeatureStore, Selection};
use std::env;
use std::io::{Error, ErrorKind};
use std::path;
use tracing::debug;

const TOOLBOX: &str = "Vector Editing";

/// Splits one command-line argument into its normalised flag (`-flag`) and
/// the value following an equals sign, if any.
fn split_flag(arg: &str) -> (String, Option<String>) {
    let arg = arg.replace("\"", "").replace("\'", "");
    let mut parts = arg.splitn(2, '=');
    let flag = parts
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
        .replace("--", "-");
    let value = parts.next().map(|v| v.trim().to_string());
    (flag, value)
}

/// The value of a flag, given either as `--flag=value` or as the next
/// argument.
fn flag_value(
    flag: &str,
    keyval: &Option<String>,
    args: &[String],
    i: usize,
) -> Result<String, Error> {
    match keyval {
        Some(v) => Ok(v.clone()),
        None => args
            .get(i + 1)
            .map(|v| v.replace("\"", "").replace("\'", "").trim().to_string())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidInput,
                    format!("No value was provided for {}.", flag),
                )
            }),
    }
}

fn parse_f64(flag: &str, value: &str) -> Result<f64, Error> {
    value.parse::<f64>().map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Error parsing {} value '{}'.", flag, value),
        )
    })
}

/// True for a bare boolean flag or one whose value reads as true.
fn parse_bool(keyval: &Option<String>) -> bool {
    match keyval {
        Some(v) => v.to_lowercase().contains("t"),
        None => true,
    }
}

/// Parses a comma or space separated list of feature ids.
fn parse_ids(value: &str) -> Result<Vec<FeatureId>, Error> {
    value
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<FeatureId>().map_err(|_| {
                Error::new(
                    ErrorKind::InvalidInput,
                    format!("'{}' is not a valid feature id.", s),
                )
            })
        })
        .collect()
}

/// The input, output and feature-selection arguments shared by every tool.
#[derive(Clone, Debug, Default, PartialEq)]
struct CommonArgs {
    input_file: String,
    output_file: String,
    selected_ids: Option<Vec<FeatureId>>,
    all_features: bool,
}

impl CommonArgs {
    /// Consumes a shared flag. Returns false for flags the tool must handle.
    fn accept(
        &mut self,
        flag_val: &str,
        keyval: &Option<String>,
        args: &[String],
        i: usize,
    ) -> Result<bool, Error> {
        if flag_val == "-i" || flag_val == "-input" {
            self.input_file = flag_value(flag_val, keyval, args, i)?;
        } else if flag_val == "-o" || flag_val == "-output" {
            self.output_file = flag_value(flag_val, keyval, args, i)?;
        } else if flag_val == "-select" || flag_val == "-selected" {
            let ids = parse_ids(&flag_value(flag_val, keyval, args, i)?)?;
            self.selected_ids = Some(ids);
        } else if flag_val == "-all" {
            self.all_features = parse_bool(keyval);
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.input_file.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "No input file was specified.",
            ));
        }
        if self.output_file.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "No output file was specified.",
            ));
        }
        Ok(())
    }

    /// Resolves bare file names against the working directory.
    fn resolve(&mut self, working_directory: &str) {
        self.input_file = resolve_path(&self.input_file, working_directory);
        self.output_file = resolve_path(&self.output_file, working_directory);
    }

    /// Loads the input into an editable store and applies the selection.
    /// `--all` opts into every feature; otherwise only the `--select` ids
    /// are processed.
    fn open_store(&self) -> Result<(MemoryFeatureStore, Selection), Error> {
        let fc = FeatureCollection::read(&self.input_file)?;
        let mut store = MemoryFeatureStore::from_feature_collection(fc)?;
        store.start_editing();
        if self.all_features {
            return Ok((store, Selection::All));
        }
        if let Some(ids) = &self.selected_ids {
            store.select(ids);
        }
        Ok((store, Selection::Selected))
    }
}

/// Commits the buffered edits and writes the collection to `output_file`.
/// Returns the number of features written with a new geometry.
fn save_store(store: &mut MemoryFeatureStore, output_file: &str) -> Result<usize, Error> {
    let n = store.commit()?;
    store.to_feature_collection().write(output_file)?;
    debug!(output = output_file, committed = n, "output written");
    Ok(n)
}

fn resolve_path(file_name: &str, working_directory: &str) -> String {
    if file_name.is_empty()
        || file_name.contains(path::MAIN_SEPARATOR)
        || file_name.contains("/")
    {
        return file_name.to_string();
    }
    format!("{}{}", working_directory, file_name)
}

/// Applies `update` to the stored settings and saves them if anything
/// changed.
fn remember_settings<F: FnOnce(&mut Configs)>(update: F) -> Result<(), Error> {
    let mut configs = get_configs()?;
    let before = configs.clone();
    update(&mut configs);
    if configs != before {
        save_configs(&configs)?;
    }
    Ok(())
}

/// The input, output and selection parameters, in the order they appear in
/// every tool's help.
fn common_parameters() -> Vec<ToolParameter> {
    let mut parameters = vec![];
    parameters.push(ToolParameter {
        name: "Input Vector Polygon File".to_owned(),
        flags: vec!["-i".to_owned(), "--input".to_owned()],
        description: "Input GeoJSON polygon file (EPSG:4326).".to_owned(),
        parameter_type: ParameterType::ExistingFile(ParameterFileType::Vector(
            VectorGeometryType::Polygon,
        )),
        default_value: None,
        optional: false,
    });

    parameters.push(ToolParameter {
        name: "Output Vector Polygon File".to_owned(),
        flags: vec!["-o".to_owned(), "--output".to_owned()],
        description: "Output GeoJSON polygon file.".to_owned(),
        parameter_type: ParameterType::NewFile(ParameterFileType::Vector(
            VectorGeometryType::Polygon,
        )),
        default_value: None,
        optional: false,
    });

    parameters.push(ToolParameter {
        name: "Selected Feature IDs".to_owned(),
        flags: vec!["--select".to_owned()],
        description: "Comma-separated ids of the features to process.".to_owned(),
        parameter_type: ParameterType::String,
        default_value: None,
        optional: true,
    });

    parameters.push(ToolParameter {
        name: "Process All Features".to_owned(),
        flags: vec!["--all".to_owned()],
        description: "Process every feature in the file instead of a selection.".to_owned(),
        parameter_type: ParameterType::Boolean,
        default_value: Some("false".to_owned()),
        optional: true,
    });
    parameters
}

/// `>>./boundary_tools -r=ToolName ...` with the executable's short name.
fn example_usage(tool_name: &str, tool_args: &str) -> String {
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let short_exe = match env::current_exe() {
        Ok(exe) => {
            let e = format!("{}", exe.display());
            let mut parent = exe.clone();
            parent.pop();
            let p = format!("{}", parent.display());
            let mut short_exe = e
                .replace(&p, "")
                .replace(".exe", "")
                .replace(".", "")
                .replace(&sep, "");
            if e.contains(".exe") {
                short_exe += ".exe";
            }
            short_exe
        }
        Err(_) => "boundary_tools".to_string(),
    };
    format!(
        ">>.*{0} -r={1} -v --wd=\"*path*to*data*\" -i=parcels.geojson -o=output.geojson {2}",
        short_exe, tool_name, tool_args
    )
    .replace("*", &sep)
}

#[cfg(test)]
mod test {
    use super::{parse_ids, resolve_path, split_flag, CommonArgs};
    use boundary_vector::Selection;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_flag() {
        assert_eq!(split_flag("--input=\"a b.geojson\""), ("-input".to_string(), Some("a b.geojson".to_string())));
        assert_eq!(split_flag("-O"), ("-o".to_string(), None));
        assert_eq!(split_flag("--tolerance=-0.5"), ("-tolerance".to_string(), Some("-0.5".to_string())));
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("1,2, 7").unwrap(), vec![1, 2, 7]);
        assert!(parse_ids("1,x").is_err());
        assert!(parse_ids("").unwrap().is_empty());
    }

    #[test]
    fn test_common_args() {
        let a = args(&["-i", "in.geojson", "--output=out.geojson", "--select=3,4", "--all=false", "--other=1"]);
        let mut common = CommonArgs::default();
        let mut unhandled = vec![];
        for i in 0..a.len() {
            let (flag, keyval) = split_flag(&a[i]);
            if !flag.starts_with('-') {
                continue;
            }
            if !common.accept(&flag, &keyval, &a, i).unwrap() {
                unhandled.push(flag);
            }
        }
        assert_eq!(common.input_file, "in.geojson");
        assert_eq!(common.output_file, "out.geojson");
        assert_eq!(common.selected_ids, Some(vec![3, 4]));
        assert!(!common.all_features);
        assert_eq!(unhandled, vec!["-other".to_string()]);
        assert!(common.validate().is_ok());
        assert!(CommonArgs::default().validate().is_err());

        let missing = args(&["-i"]);
        let (flag, keyval) = split_flag(&missing[0]);
        assert!(CommonArgs::default().accept(&flag, &keyval, &missing, 0).is_err());
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path("a.geojson", "/data/"), "/data/a.geojson");
        assert_eq!(resolve_path("/tmp/a.geojson", "/data/"), "/tmp/a.geojson");
    }

    #[test]
    fn test_open_store_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        std::fs::write(
            &input,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "id": 1, "properties": {}, "geometry": null},
                {"type": "Feature", "id": 2, "properties": {}, "geometry": null}
            ]}"#,
        )
        .unwrap();
        let mut common = CommonArgs {
            input_file: input.to_string_lossy().to_string(),
            output_file: "unused".to_string(),
            selected_ids: Some(vec![2]),
            all_features: false,
        };
        let (store, selection) = common.open_store().unwrap();
        assert_eq!(selection, Selection::Selected);
        assert_eq!(boundary_vector::FeatureStore::selected_count(&store), 1);

        common.all_features = true;
        let (_, selection) = common.open_store().unwrap();
        assert_eq!(selection, Selection::All);
    }
}
