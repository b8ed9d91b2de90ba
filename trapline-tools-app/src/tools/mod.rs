/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
pub mod data_tools;
pub mod gis_analysis;
#[cfg(test)]
mod test_utils;

use serde_json;
use std::collections::HashMap;
use std::env;
use std::io::{Error, ErrorKind};
use std::path;
use std::path::Path;
use trapline_common::configs;
use trapline_vector::{FieldData, Shapefile};

#[derive(Default)]
pub struct ToolManager {
    pub working_dir: String,
    pub verbose: bool,
    tool_names: Vec<String>,
}

impl ToolManager {
    pub fn new(working_directory: &str, verbose_mode: &bool) -> Result<ToolManager, Error> {
        let mut tool_names = vec![];
        // data_tools
        tool_names.push("ReprojectNztmToWgs84".to_string());

        // gis_analysis
        tool_names.push("ClipLinesToPolygon".to_string());
        tool_names.push("CreateFishnetLines".to_string());
        tool_names.push("GenerateTraplines".to_string());
        tool_names.push("PointsAlongLines".to_string());
        tool_names.push("RotateVector".to_string());
        tool_names.push("SimplifyLines".to_string());

        tool_names.sort();

        let tm = ToolManager {
            working_dir: working_directory.to_string(),
            verbose: *verbose_mode,
            tool_names: tool_names,
        };
        Ok(tm)
    }

    fn get_tool(&self, tool_name: &str) -> Option<Box<dyn TraplineTool + 'static>> {
        match tool_name.to_lowercase().replace("_", "").as_ref() {
            // data_tools
            "reprojectnztmtowgs84" => Some(Box::new(data_tools::ReprojectNztmToWgs84::new())),

            // gis_analysis
            "cliplinestopolygon" => Some(Box::new(gis_analysis::ClipLinesToPolygon::new())),
            "createfishnetlines" => Some(Box::new(gis_analysis::CreateFishnetLines::new())),
            "generatetraplines" => Some(Box::new(gis_analysis::GenerateTraplines::new())),
            "pointsalonglines" => Some(Box::new(gis_analysis::PointsAlongLines::new())),
            "rotatevector" => Some(Box::new(gis_analysis::RotateVector::new())),
            "simplifylines" => Some(Box::new(gis_analysis::SimplifyLines::new())),

            _ => None,
        }
    }

    fn unrecognized(tool_name: &str) -> Error {
        Error::new(
            ErrorKind::NotFound,
            format!("Unrecognized tool name {}.", tool_name),
        )
    }

    pub fn run_tool(&self, tool_name: String, args: Vec<String>) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => tool.run(args, &self.working_dir, self.verbose),
            None => Err(ToolManager::unrecognized(&tool_name)),
        }
    }

    pub fn tool_help(&self, tool_name: String) -> Result<(), Error> {
        if !tool_name.is_empty() {
            match self.get_tool(tool_name.as_ref()) {
                Some(tool) => println!("{}", get_help(tool)?),
                None => return Err(ToolManager::unrecognized(&tool_name)),
            }
        } else {
            for (i, val) in self.tool_names.iter().enumerate() {
                if let Some(tool) = self.get_tool(val) {
                    println!("{}. {}\n", i + 1, get_help(tool)?);
                }
            }
        }
        Ok(())
    }

    pub fn tool_license(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(_tool) => println!("MIT"),
            None => return Err(ToolManager::unrecognized(&tool_name)),
        }
        Ok(())
    }

    pub fn tool_parameters(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => println!("{}", tool.get_tool_parameters()),
            None => return Err(ToolManager::unrecognized(&tool_name)),
        }
        Ok(())
    }

    pub fn toolbox(&self, tool_name: String) -> Result<(), Error> {
        if !tool_name.is_empty() {
            match self.get_tool(tool_name.as_ref()) {
                Some(tool) => println!("{}", tool.get_toolbox()),
                None => return Err(ToolManager::unrecognized(&tool_name)),
            }
        } else {
            let mut tool_details: Vec<(String, String)> = Vec::new();
            for val in &self.tool_names {
                if let Some(tool) = self.get_tool(val) {
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

    fn get_tool_details(&self, keywords: &[String]) -> Vec<(String, String)> {
        let mut tool_details: Vec<(String, String)> = Vec::new();
        for val in &self.tool_names {
            if let Some(tool) = self.get_tool(val) {
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
        }
        tool_details.sort();
        tool_details
    }

    pub fn list_tools(&self) {
        let tool_details = self.get_tool_details(&[]);
        let mut ret = format!("All {} Available Tools:\n", tool_details.len());
        for (name, description) in &tool_details {
            ret.push_str(&format!("{}: {}\n\n", name, description));
        }
        println!("{}", ret);
    }

    pub fn list_tools_with_keywords(&self, keywords: Vec<String>) {
        let tool_details = self.get_tool_details(&keywords);
        let mut ret = format!("All {} Tools containing keywords:\n", tool_details.len());
        for (name, description) in &tool_details {
            ret.push_str(&format!("{}: {}\n\n", name, description));
        }
        println!("{}", ret);
    }
}

pub trait TraplineTool {
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

fn get_help<'a>(wt: Box<dyn TraplineTool + 'a>) -> Result<String, Error> {
    let tool_name = wt.get_tool_name();
    let description = wt.get_tool_description();
    let parameters = wt.get_tool_parameters();
    let toolbox = wt.get_toolbox();
    let o: serde_json::Value = serde_json::from_str(&parameters)?;
    let mut p = String::new();
    p.push_str("Flag               Description\n");
    p.push_str("-----------------  -----------\n");
    if let Some(a) = o["parameters"].as_array() {
        for d in a {
            let mut s = String::new();
            for f in d["flags"].as_array().into_iter().flatten() {
                s.push_str(&format!("{}, ", f.as_str().unwrap_or_default()));
            }
            p.push_str(&format!(
                "{:width$} {}\n",
                s.trim().trim_matches(','),
                d["description"].as_str().unwrap_or_default(),
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

fn get_name_and_description<'a>(wt: Box<dyn TraplineTool + 'a>) -> (String, String) {
    (wt.get_tool_name(), wt.get_tool_description())
}

/// Serialises a tool's parameter list into the `{"parameters": [...]}`
/// form printed by `--toolparameters`.
fn parameters_to_json(parameters: &[ToolParameter]) -> String {
    let list: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
    format!("{{\"parameters\": [{}]}}", list.join(","))
}

/// Builds the example usage string shown in a tool's help.
fn example_usage(tool_name: &str, tool_args: &str) -> String {
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let short_exe = env::current_exe()
        .ok()
        .and_then(|e| {
            e.file_stem()
                .map(|s| s.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "trapline_tools".to_string());
    let short_exe = if cfg!(target_os = "windows") {
        format!("{}.exe", short_exe)
    } else {
        short_exe
    };
    format!(
        ">>.*{0} -r={1} -v --wd=\"*path*to*data*\" {2}",
        short_exe, tool_name, tool_args
    )
    .replace("*", &sep)
}

/// File names without a directory component are taken relative to the
/// working directory.
fn resolve_file(file_name: &str, working_directory: &str) -> String {
    if file_name.contains(path::MAIN_SEPARATOR) || file_name.contains('/') {
        return file_name.to_string();
    }
    if working_directory.is_empty() {
        return file_name.to_string();
    }
    Path::new(working_directory)
        .join(file_name)
        .to_string_lossy()
        .to_string()
}

/// The number of worker threads to use, capped by the max_procs setting.
fn get_num_procs() -> Result<usize, Error> {
    let mut num_procs = num_cpus::get() as isize;
    let configs = configs::get_configs()?;
    let max_procs = configs.max_procs;
    if max_procs > 0 && max_procs < num_procs {
        num_procs = max_procs;
    }
    Ok(num_procs.max(1) as usize)
}

/// The attribute values of an input record, for copying into an output
/// file that shares the input's fields.
fn copy_attributes(input: &Shapefile, index: usize) -> Vec<FieldData> {
    match input.attributes.get_record(index) {
        Some(rec) => rec.clone(),
        None => vec![FieldData::Null; input.attributes.get_num_fields()],
    }
}

fn parse_f64(flag: &str, value: &str) -> Result<f64, Error> {
    value.trim().parse::<f64>().map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Error parsing {}: '{}' is not a number.", flag, value),
        )
    })
}

/// Parsed command-line arguments for a single tool run. Flags are matched
/// against the tool's parameter list and stored under the parameter's long
/// flag without dashes (e.g. `--input` becomes `input`). Anything that is
/// not a flag, including negative numbers, is kept as a positional value.
#[derive(Debug, Default)]
pub struct ToolArgs {
    values: HashMap<String, String>,
    positional: Vec<String>,
}

impl ToolArgs {
    pub fn parse(args: &[String], parameters: &[ToolParameter]) -> Result<ToolArgs, Error> {
        if args.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Tool run with no parameters.",
            ));
        }
        let mut ret = ToolArgs::default();
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].replace("\"", "").replace("\'", "");
            let (flag_part, value) = match arg.split_once('=') {
                Some((f, v)) => (f.to_string(), Some(v.to_string())),
                None => (arg.clone(), None),
            };
            let flag_val = flag_part.to_lowercase().replace("--", "-");
            let is_number = arg.trim().parse::<f64>().is_ok();
            if flag_val.starts_with('-') && !is_number {
                if let Some(param) = parameters.iter().find(|p| p.matches_flag(&flag_val)) {
                    let v = match (value, &param.parameter_type) {
                        (Some(v), _) => v,
                        (None, ParameterType::Boolean) => "true".to_string(),
                        (None, _) => {
                            i += 1;
                            match args.get(i) {
                                Some(next) => next.replace("\"", "").replace("\'", ""),
                                None => {
                                    return Err(Error::new(
                                        ErrorKind::InvalidInput,
                                        format!("No value given for {}.", flag_part),
                                    ))
                                }
                            }
                        }
                    };
                    ret.values.insert(param.key(), v);
                }
                // unknown flags are ignored
            } else {
                ret.positional.push(arg.trim().to_string());
            }
            i += 1;
        }
        Ok(ret)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Returns a required string value, or an InvalidInput error naming the flag.
    pub fn require(&self, key: &str) -> Result<String, Error> {
        match self.values.get(key) {
            Some(v) if !v.trim().is_empty() => Ok(v.clone()),
            _ => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("The --{} parameter is required.", key),
            )),
        }
    }

    pub fn require_f64(&self, key: &str) -> Result<f64, Error> {
        let v = self.require(key)?;
        parse_f64(&format!("--{}", key), &v)
    }

    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, Error> {
        match self.values.get(key) {
            Some(v) => Ok(Some(parse_f64(&format!("--{}", key), v)?)),
            None => Ok(None),
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).map(|v| {
            let v = v.to_lowercase();
            v.is_empty() || v.contains('t') || v == "1" || v == "y" || v == "yes"
        })
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Fills any unset keys from the positional values, in order.
    pub fn apply_positional(&mut self, keys: &[&str]) {
        for (key, v) in keys.iter().zip(self.positional.iter()) {
            if !self.values.contains_key(*key) {
                self.values.insert(key.to_string(), v.clone());
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ToolParameter {
    name: String,
    flags: Vec<String>,
    description: String,
    parameter_type: ParameterType,
    default_value: Option<String>,
    optional: bool,
}

impl ToolParameter {
    pub fn to_string(&self) -> String {
        match serde_json::to_string(&self) {
            Ok(json_str) => json_str,
            Err(err) => format!("{:?}", err),
        }
    }

    fn matches_flag(&self, flag_val: &str) -> bool {
        self.flags
            .iter()
            .any(|f| f.to_lowercase().replace("--", "-") == flag_val)
    }

    fn key(&self) -> String {
        self.flags
            .last()
            .map(|f| f.trim_start_matches('-').to_lowercase())
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Debug)]
enum ParameterType {
    Boolean,
    String,
    Float,
    ExistingFile(ParameterFileType),
    NewFile(ParameterFileType),
    Directory,
}

#[derive(Serialize, Deserialize, Debug)]
enum ParameterFileType {
    Vector(VectorGeometryType),
}

#[derive(Serialize, Deserialize, Debug)]
enum VectorGeometryType {
    Any,
    Point,
    Line,
    Polygon,
}
