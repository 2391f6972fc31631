/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 02/09/2026
License: MIT
*/

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A structure to hold environment settings and the last parameter values
/// used by each tool. Backed by a settings.json file in the current
/// directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub verbose_mode: bool,
    pub working_directory: String,
    /// Decimal places used when rounding target vertices for alignment.
    pub decimal_precision: u32,
    /// Degrees.
    pub last_alignment_tolerance: f64,
    /// Kilometres.
    pub last_densify_length_km: f64,
    /// Metres.
    pub last_simplify_tolerance_m: f64,
    /// Degrees of longitude.
    pub last_antimeridian_tolerance: f64,
}

impl Default for Configs {
    fn default() -> Self {
        Configs {
            verbose_mode: true,
            working_directory: String::new(),
            decimal_precision: 6,
            last_alignment_tolerance: 0.0001,
            last_densify_length_km: 100.0,
            last_simplify_tolerance_m: 50.0,
            last_antimeridian_tolerance: 0.007,
        }
    }
}

impl Configs {
    pub fn new() -> Configs {
        Configs::default()
    }
}

fn config_file() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join("settings.json"))
}

/// Reads settings.json from the current directory, falling back to the
/// defaults if it is missing or unreadable.
pub fn get_configs() -> Result<Configs> {
    let path = config_file()?;
    Ok(read_configs(&path))
}

pub fn save_configs(configs: &Configs) -> Result<()> {
    let path = config_file()?;
    write_configs(&path, configs)
}

/// Reads the settings at `path`. A missing file gives the defaults; a file
/// that cannot be parsed is reported and also gives the defaults.
pub fn read_configs(path: &Path) -> Configs {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(configs) => configs,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not parse settings file; using defaults");
                Configs::new()
            }
        },
        Err(_) => Configs::new(),
    }
}

pub fn write_configs(path: &Path, configs: &Configs) -> Result<()> {
    let configs_json = serde_json::to_string_pretty(configs)?;
    let mut file = File::create(path)?;
    file.write_all(configs_json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{read_configs, write_configs, Configs};
    use std::fs;

    #[test]
    fn test_missing_fields_take_defaults() {
        let c: Configs = serde_json::from_str(r#"{"verbose_mode": false}"#).unwrap();
        assert!(!c.verbose_mode);
        assert_eq!(c.decimal_precision, 6);
        assert_eq!(c.last_antimeridian_tolerance, 0.007);
    }

    #[test]
    fn test_round_trip_and_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut c = Configs::new();
        c.last_alignment_tolerance = 0.5;
        write_configs(&path, &c).unwrap();
        assert_eq!(read_configs(&path), c);

        fs::write(&path, "not json").unwrap();
        assert_eq!(read_configs(&path), Configs::new());
        assert_eq!(read_configs(&dir.path().join("missing.json")), Configs::new());
    }
}
