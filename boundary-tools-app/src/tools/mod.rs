/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 23/03/2026
Last Modified: 18/09/2026
License: MIT
*/

pub mod vector_editing;

use boundary_common::utils::wrapped_text;
use serde_json;
use std::io::{Error, ErrorKind};

#[derive(Default)]
pub struct ToolManager {
    pub working_dir: String,
    pub verbose: bool,
    tool_names: Vec<String>,
}

impl ToolManager {
    pub fn new<'a>(
        working_directory: &'a str,
        verbose_mode: &'a bool,
    ) -> Result<ToolManager, Error> {
        let mut tool_names = vec![];
        // vector_editing
        tool_names.push("AlignPolygonVertices".to_string());
        tool_names.push("DensifyPolygons".to_string());
        tool_names.push("PolygonToOctagon".to_string());
        tool_names.push("SimplifyPolygons".to_string());
        tool_names.push("SnapToAntimeridian".to_string());

        tool_names.sort();

        let tm = ToolManager {
            working_dir: working_directory.to_string(),
            verbose: *verbose_mode,
            tool_names: tool_names,
        };
        Ok(tm)
    }

    fn get_tool(&self, tool_name: &str) -> Option<Box<dyn BoundaryTool + 'static>> {
        match tool_name.to_lowercase().replace("_", "").as_ref() {
            // vector_editing
            "alignpolygonvertices" => Some(Box::new(vector_editing::AlignPolygonVertices::new())),
            "densifypolygons" => Some(Box::new(vector_editing::DensifyPolygons::new())),
            "polygontooctagon" => Some(Box::new(vector_editing::PolygonToOctagon::new())),
            "simplifypolygons" => Some(Box::new(vector_editing::SimplifyPolygons::new())),
            "snaptoantimeridian" => Some(Box::new(vector_editing::SnapToAntimeridian::new())),

            _ => None,
        }
    }

    pub fn run_tool(&self, tool_name: String, args: Vec<String>) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => tool.run(args, &self.working_dir, self.verbose),
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("Unrecognized tool name {}.", tool_name),
            )),
        }
    }

    pub fn tool_help(&self, tool_name: String) -> Result<(), Error> {
        if tool_name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "A tool name must be specified, e.g. --toolhelp=DensifyPolygons.",
            ));
        }
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => {
                println!("{}", get_help(tool)?);
                Ok(())
            }
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("Unrecognized tool name {}.", tool_name),
            )),
        }
    }

    pub fn tool_parameters(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => println!("{}", tool.get_tool_parameters()),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("Unrecognized tool name {}.", tool_name),
                ))
            }
        }
        Ok(())
    }

    pub fn toolbox(&self, tool_name: String) -> Result<(), Error> {
        if !tool_name.is_empty() {
            match self.get_tool(tool_name.as_ref()) {
                Some(tool) => println!("{}", tool.get_toolbox()),
                None => {
                    return Err(Error::new(
                        ErrorKind::NotFound,
                        format!("Unrecognized tool name {}.", tool_name),
                    ))
                }
            }
        } else {
            let mut tool_details: Vec<(String, String)> = Vec::new();
            for val in &self.tool_names {
                if let Some(tool) = self.get_tool(&val) {
                    tool_details.push((val.to_string(), tool.get_toolbox()));
                }
            }
            tool_details.sort();
            for (name, toolbox) in &tool_details {
                println!("{}: {}", name, toolbox);
            }
        }
        Ok(())
    }

    pub fn list_tools(&self) {
        println!("{}", self.tool_listing(&[]));
    }

    pub fn list_tools_with_keywords(&self, keywords: Vec<String>) {
        println!("{}", self.tool_listing(&keywords));
    }

    /// Names and descriptions of the tools whose name, description or
    /// toolbox contains any of `keywords`, or of every tool if there are
    /// none.
    fn tool_listing(&self, keywords: &[String]) -> String {
        let mut tool_details: Vec<(String, String)> = Vec::new();
        for val in &self.tool_names {
            let tool = match self.get_tool(&val) {
                Some(t) => t,
                None => continue,
            };
            let toolbox = tool.get_toolbox().to_lowercase();
            let (nm, des) = get_name_and_description(tool);
            let matched = keywords.is_empty()
                || keywords.iter().any(|kw| {
                    let kw = kw.to_lowercase();
                    nm.to_lowercase().contains(&kw)
                        || des.to_lowercase().contains(&kw)
                        || toolbox.contains(&kw)
                });
            if matched {
                tool_details.push((nm, des));
            }
        }
        tool_details.sort();

        let mut ret = if keywords.is_empty() {
            format!("All {} Available Tools:\n", tool_details.len())
        } else {
            format!("All {} Tools containing keywords:\n", tool_details.len())
        };
        for (nm, des) in &tool_details {
            ret.push_str(&format!("{}: {}\n\n", nm, des));
        }
        ret
    }

    pub fn get_tool_source_code(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => println!("{}", tool.get_source_file()),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("Unrecognized tool name {}.", tool_name),
                ))
            }
        }
        Ok(())
    }
}

pub trait BoundaryTool {
    fn get_tool_name(&self) -> String;
    fn get_tool_description(&self) -> String;
    fn get_tool_parameters(&self) -> String;
    fn get_example_usage(&self) -> String;
    fn get_toolbox(&self) -> String;
    fn get_source_file(&self) -> String;
    fn run<'a>(
        &self,
        args: Vec<String>,
        working_directory: &'a str,
        verbose: bool,
    ) -> Result<(), Error>;
}

fn get_help<'a>(wt: Box<dyn BoundaryTool + 'a>) -> Result<String, Error> {
    let tool_name = wt.get_tool_name();
    let description = wrapped_text(&wt.get_tool_description(), 79);
    let parameters = wt.get_tool_parameters();
    let toolbox = wt.get_toolbox();
    let o: serde_json::Value = serde_json::from_str(&parameters)?;
    let mut p = String::new();
    p.push_str("Flag               Description\n");
    p.push_str("-----------------  -----------\n");
    if let Some(a) = o["parameters"].as_array() {
        for d in a {
            let mut s = String::new();
            if let Some(flags) = d["flags"].as_array() {
                for f in flags {
                    s.push_str(&format!("{}, ", f.as_str().unwrap_or("")));
                }
            }
            p.push_str(&format!(
                "{:width$} {}\n",
                s.trim().trim_matches(','),
                d["description"].as_str().unwrap_or(""),
                width = 18
            ));
        }
    }
    let example = wt.get_example_usage();
    let s = if example.len() <= 1 {
        format!(
            "{}

Description:\n{}
Toolbox: {}
Parameters:\n
{}
",
            tool_name, description, toolbox, p
        )
    } else {
        format!(
            "{}
Description:\n{}
Toolbox: {}
Parameters:\n
{}

Example usage:
{}
",
            tool_name, description, toolbox, p, example
        )
    };
    Ok(s)
}

fn get_name_and_description<'a>(wt: Box<dyn BoundaryTool + 'a>) -> (String, String) {
    (wt.get_tool_name(), wt.get_tool_description())
}

/// Prints the boxed welcome banner shown at the start of a verbose run.
fn print_welcome(tool_name: &str) {
    let powered_by = "* Powered by BoundaryTools ";
    let welcome_len = format!("* Welcome to {} *", tool_name)
        .len()
        .max(powered_by.len() + 1);
    println!("{}", "*".repeat(welcome_len));
    println!(
        "* Welcome to {} {}*",
        tool_name,
        " ".repeat(welcome_len - 15 - tool_name.len())
    );
    println!(
        "{}{}*",
        powered_by,
        " ".repeat(welcome_len - powered_by.len() - 1)
    );
    println!("{}", "*".repeat(welcome_len));
}

/// Joins the parameter list into the `{"parameters": [...]}` document
/// returned by `get_tool_parameters`.
fn parameters_json(parameters: &[ToolParameter]) -> String {
    let mut s = String::from("{\"parameters\": [");
    for i in 0..parameters.len() {
        if i < parameters.len() - 1 {
            s.push_str(&(parameters[i].to_string()));
            s.push_str(",");
        } else {
            s.push_str(&(parameters[i].to_string()));
        }
    }
    s.push_str("]}");
    s
}

#[derive(Serialize, Deserialize, Debug)]
struct ToolParameter {
    name: String,
    flags: Vec<String>,
    description: String,
    parameter_type: ParameterType,
    default_value: Option<String>,
    optional: bool,
}

impl ToolParameter {
    pub fn to_string(&self) -> String {
        let v = match serde_json::to_string(&self) {
            Ok(json_str) => json_str,
            Err(err) => format!("{:?}", err),
        };
        v
    }
}

#[derive(Serialize, Deserialize, Debug)]
enum ParameterType {
    Boolean,
    String,
    Integer,
    Float,
    ExistingFile(ParameterFileType),
    NewFile(ParameterFileType),
    OptionList(Vec<String>),
}

#[derive(Serialize, Deserialize, Debug)]
enum ParameterFileType {
    Vector(VectorGeometryType),
}

#[derive(Serialize, Deserialize, Debug)]
enum VectorGeometryType {
    Polygon,
}

#[cfg(test)]
mod test {
    use super::{get_help, ToolManager};

    #[test]
    fn test_tool_names_resolve() {
        let tm = ToolManager::new("", &false).unwrap();
        for name in &tm.tool_names {
            assert!(tm.get_tool(name).is_some(), "{} is not registered", name);
        }
        assert!(tm.get_tool("densify_polygons").is_some());
        assert!(tm.get_tool("SNAPTOANTIMERIDIAN").is_some());
        assert!(tm.get_tool("Slope").is_none());
        assert!(tm.run_tool("Slope".to_string(), vec![]).is_err());
    }

    #[test]
    fn test_parameters_are_valid_json() {
        let tm = ToolManager::new("", &false).unwrap();
        for name in &tm.tool_names {
            let tool = tm.get_tool(name).unwrap();
            let v: serde_json::Value = serde_json::from_str(&tool.get_tool_parameters()).unwrap();
            let params = v["parameters"].as_array().unwrap();
            assert!(params.iter().any(|p| p["flags"][0] == "-i"));
            assert!(params.iter().any(|p| p["flags"][0] == "-o"));
        }
    }

    #[test]
    fn test_help_lists_flags() {
        let tm = ToolManager::new("", &false).unwrap();
        let help = get_help(tm.get_tool("DensifyPolygons").unwrap()).unwrap();
        assert!(help.starts_with("DensifyPolygons"));
        assert!(help.contains("--max_length"));
        assert!(help.contains("Toolbox: Vector Editing"));
    }

    #[test]
    fn test_keyword_listing() {
        let tm = ToolManager::new("", &false).unwrap();
        let all = tm.tool_listing(&[]);
        assert!(all.starts_with("All 5 Available Tools:"));
        let some = tm.tool_listing(&["octagon".to_string()]);
        assert!(some.starts_with("All 1 Tools containing keywords:"));
        assert!(some.contains("PolygonToOctagon"));
    }
}
