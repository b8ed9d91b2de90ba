/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

/*!
TraplineTools lays out pest-control trap stations on a grid of parallel lines
inside a boundary polygon, and writes them as GPS-ready WGS84 waypoints.

TraplineTools is a command-line program. The following commands are recognized:

| Command           | Description                                                                  |
| ----------------- | ---------------------------------------------------------------------------- |
| --cd, --wd        | Changes the working directory; used in conjunction with --run flag.          |
| -h, --help        | Prints help information.                                                     |
| -l, --license     | Prints the license. Tool names may also be used, --license="GenerateTraplines" |
| --listtools       | Lists all available tools. Keywords may also be used, --listtools clip.      |
| --max_procs       | Sets the maximum number of processors used. -1 = all available processors.  |
| -r, --run         | Runs a tool; used in conjunction with --wd flag; -r="GenerateTraplines".     |
| --toolbox         | Prints the toolbox associated with a tool; --toolbox=RotateVector.           |
| --toolhelp        | Prints the help associated with a tool; --toolhelp="GenerateTraplines".      |
| --toolparameters  | Prints the parameters (in json form) for a specific tool.                    |
| -v                | Verbose mode. Without this flag, tool outputs will not be printed.           |
| --version         | Prints the version information.                                              |

*/

pub mod tools;

use crate::tools::ToolManager;
use std::env;
use std::io::{Error, ErrorKind};
use std::path;
use std::process;
use trapline_common::configs;

#[macro_use]
extern crate serde_derive;

/// TraplineTools generates trapline waypoints for field deployment.
///
/// # Examples
///
/// ```
/// >>./trapline_tools --wd='/Users/fieldteam/data/' --run=GenerateTraplines boundary.shp Kapiti 200 100 30 output -v
/// ```
fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

/// Splits `--flag=value` into the normalized flag (lowercase, single
/// leading dash) and its value, if one was attached.
fn split_flag(arg: &str) -> (String, Option<String>) {
    let arg = arg.replace("\"", "").replace("\'", "");
    match arg.split_once('=') {
        Some((f, v)) => (f.to_lowercase().replace("--", "-"), Some(v.to_string())),
        None => (arg.to_lowercase().replace("--", "-"), None),
    }
}

fn is_true(value: &Option<String>) -> bool {
    match value {
        Some(v) => v.is_empty() || v.to_lowercase().contains('t'),
        None => true,
    }
}

#[derive(PartialEq)]
enum Command {
    None,
    Run,
    ToolHelp,
    ToolParameters,
    Toolbox,
    ListTools,
}

fn run() -> Result<(), Error> {
    let sep = path::MAIN_SEPARATOR;
    let mut tool_name = String::new();
    let mut command = Command::None;
    let mut keywords: Vec<String> = vec![];
    let mut tool_args_vec: Vec<String> = vec![];
    let mut finding_working_dir = false;
    let mut finding_tool_name = false;
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        version();
        // print help
        help();
        // list tools
        let tm = ToolManager::new("", &false)?;
        tm.list_tools();

        return Ok(());
    }

    let mut configs = configs::get_configs()?;
    let mut configs_modified = false;

    for arg in args {
        let (flag_val, value) = split_flag(&arg);
        match flag_val.as_str() {
            "-h" | "-help" => {
                help();
                return Ok(());
            }
            "-cd" | "-wd" | "-working_directory" => match value {
                Some(mut v) if !v.trim().is_empty() => {
                    if !v.ends_with(sep) {
                        v.push(sep);
                    }
                    if configs.working_directory != v {
                        configs.working_directory = v;
                        configs_modified = true;
                    }
                }
                _ => finding_working_dir = true,
            },
            "-r" | "-run" | "-toolhelp" | "-toolparameters" | "-toolbox" => {
                command = match flag_val.as_str() {
                    "-r" | "-run" => Command::Run,
                    "-toolhelp" => Command::ToolHelp,
                    "-toolparameters" => Command::ToolParameters,
                    _ => Command::Toolbox,
                };
                match value {
                    Some(v) if !v.is_empty() => tool_name = v,
                    _ => finding_tool_name = true,
                }
            }
            "-listtools" | "-list_tools" => command = Command::ListTools,
            "-l" | "-license" | "-licence" => {
                match value {
                    Some(v) if !v.is_empty() => {
                        let tm =
                            ToolManager::new(&configs.working_directory, &configs.verbose_mode)?;
                        return tm.tool_license(v);
                    }
                    _ => license(),
                }
                return Ok(());
            }
            "-v" | "-verbose" => {
                let verbose = is_true(&value);
                if configs.verbose_mode != verbose {
                    configs.verbose_mode = verbose;
                    configs_modified = true;
                }
            }
            "-max_procs" => {
                let v = value.unwrap_or_default();
                let val = v.trim().parse::<isize>().map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidInput,
                        format!("Error parsing --max_procs value '{}'", v),
                    )
                })?;
                if val != configs.max_procs {
                    configs.max_procs = val;
                    configs_modified = true;
                }
            }
            "-version" => {
                version();
                return Ok(());
            }
            _ => {
                let trimmed = arg.trim().to_string();
                if finding_working_dir {
                    let mut v = trimmed.replace("\"", "").replace("\'", "");
                    if !v.ends_with(sep) {
                        v.push(sep);
                    }
                    configs.working_directory = v;
                    configs_modified = true;
                    finding_working_dir = false;
                } else if finding_tool_name && !trimmed.starts_with('-') {
                    tool_name = trimmed.replace("\"", "").replace("\'", "");
                    finding_tool_name = false;
                } else if command == Command::Run || trimmed.starts_with('-') {
                    // everything else belongs to the tool, negative numbers included
                    tool_args_vec.push(trimmed);
                } else {
                    keywords.push(trimmed.replace("\"", "").replace("\'", ""));
                }
            }
        }
    }

    if configs_modified {
        configs::save_configs(&configs)?;
    }

    let tm = ToolManager::new(&configs.working_directory, &configs.verbose_mode)?;
    match command {
        Command::Run => tm.run_tool(tool_name, tool_args_vec),
        Command::ToolHelp => tm.tool_help(tool_name),
        Command::ToolParameters => tm.tool_parameters(tool_name),
        Command::Toolbox => tm.toolbox(tool_name),
        Command::ListTools => {
            if keywords.is_empty() {
                tm.list_tools();
            } else {
                tm.list_tools_with_keywords(keywords);
            }
            Ok(())
        }
        Command::None => Ok(()),
    }
}

fn help() {
    let mut ext = "";
    if cfg!(target_os = "windows") {
        ext = ".exe";
    }

    let exe_name = &format!("trapline_tools{}", ext);
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let s = "TraplineTools Help

The following commands are recognized:
--cd, --wd          Changes the working directory; used in conjunction with --run flag.
-h, --help          Prints help information.
-l, --license       Prints the trapline-tools license. Tool names may also be used, --license=\"GenerateTraplines\"
--listtools         Lists all available tools. Keywords may also be used, --listtools clip.
--max_procs         Sets the maximum number of processors used. -1 = all available processors. e.g. --max_procs=2
-r, --run           Runs a tool; used in conjunction with --wd flag; -r=\"GenerateTraplines\".
--toolbox           Prints the toolbox associated with a tool; --toolbox=RotateVector.
--toolhelp          Prints the help associated with a tool; --toolhelp=\"GenerateTraplines\".
--toolparameters    Prints the parameters (in json form) for a specific tool; --toolparameters=\"GenerateTraplines\".
-v                  Verbose mode. Without this flag, tool outputs will not be printed.
--version           Prints the version information.

Example Usage:
>> .*EXE_NAME -r=GenerateTraplines --wd=\"*path*to*data*\" boundary.shp Kapiti 200 100 30 output -v
"
    .replace("*", &sep)
    .replace("EXE_NAME", exe_name);
    println!("{}", s);
}

fn license() {
    let license_text = "TraplineTools License
Copyright 2026 Vector Control Services
Portions derived from WhiteboxTools, Copyright 2017-2021 John Lindsay

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the \"Software\"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.";
    println!("{}", license_text);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!(
        "TraplineTools v{} by Vector Control Services (c) 2026

TraplineTools generates evenly spaced trap stations within a boundary
polygon for field deployment, as WGS84 waypoints.",
        VERSION.unwrap_or("unknown")
    );
}

#[cfg(test)]
mod test {
    use super::{is_true, split_flag};

    #[test]
    fn test_split_flag() {
        assert_eq!(
            split_flag("--run=\"GenerateTraplines\""),
            ("-run".to_string(), Some("GenerateTraplines".to_string()))
        );
        assert_eq!(split_flag("-V"), ("-v".to_string(), None));
        assert_eq!(split_flag("-45"), ("-45".to_string(), None));
        assert_eq!(
            split_flag("--wd=/data/site=1"),
            ("-wd".to_string(), Some("/data/site=1".to_string()))
        );
    }

    #[test]
    fn test_is_true() {
        assert!(is_true(&None));
        assert!(is_true(&Some("True".to_string())));
        assert!(!is_true(&Some("false".to_string())));
    }
}
