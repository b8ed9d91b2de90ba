/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use serde::{Deserialize, Serialize};
use serde_json;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

/// A structure to hold environment settings. Backed by settings.json file in the current directory
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub verbose_mode: bool,
    pub working_directory: String,
    pub max_procs: isize,
    pub keep_intermediate_files: bool,
}

impl Default for Configs {
    fn default() -> Configs {
        Configs {
            verbose_mode: true,
            working_directory: String::new(),
            max_procs: -1,
            keep_intermediate_files: false,
        }
    }
}

impl Configs {
    pub fn new() -> Configs {
        Configs::default()
    }
}

fn settings_path() -> std::result::Result<PathBuf, Error> {
    Ok(std::env::current_dir()?.join(SETTINGS_FILE))
}

pub fn get_configs() -> std::result::Result<Configs, Error> {
    read_configs(&settings_path()?)
}

pub fn save_configs(configs: &Configs) -> std::result::Result<(), Error> {
    write_configs(configs, &settings_path()?)
}

/// Reads configs from a file. A missing file yields the defaults; a file
/// that exists but cannot be parsed is an error.
pub fn read_configs(config_file: &Path) -> std::result::Result<Configs, Error> {
    match fs::read_to_string(config_file) {
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Failed to parse {}: {}", config_file.display(), e),
            )
        }),
        Err(ref e) if e.kind() == ErrorKind::NotFound => Ok(Configs::new()),
        Err(e) => Err(e),
    }
}

pub fn write_configs(configs: &Configs, config_file: &Path) -> std::result::Result<(), Error> {
    let configs_json = serde_json::to_string_pretty(configs)
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;
    let mut file = File::create(config_file)?;
    file.write_all(configs_json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{read_configs, write_configs, Configs};
    use std::fs;
    use std::io::ErrorKind;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("trapline_configs_missing_91c2.json");
        let _ = fs::remove_file(&path);
        let configs = read_configs(&path).unwrap();
        assert_eq!(configs, Configs::default());
        assert!(configs.verbose_mode);
        assert_eq!(configs.max_procs, -1);
    }

    #[test]
    fn test_configs_round_trip() {
        let path = std::env::temp_dir().join("trapline_configs_round_trip_91c2.json");
        let configs = Configs {
            verbose_mode: false,
            working_directory: "/data/sites".to_string(),
            max_procs: 4,
            keep_intermediate_files: true,
        };
        write_configs(&configs, &path).unwrap();
        assert_eq!(read_configs(&path).unwrap(), configs);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_and_malformed_files() {
        let path = std::env::temp_dir().join("trapline_configs_partial_91c2.json");
        fs::write(&path, r#"{"max_procs": 2}"#).unwrap();
        let configs = read_configs(&path).unwrap();
        assert_eq!(configs.max_procs, 2);
        assert!(configs.verbose_mode);

        fs::write(&path, "{ not json").unwrap();
        let err = read_configs(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        let _ = fs::remove_file(&path);
    }
}
