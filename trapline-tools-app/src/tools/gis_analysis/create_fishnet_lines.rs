/*
This tool is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::traplines::*;
use crate::tools::*;
use std::io::Error;
use std::time::Instant;
use trapline_common::spatial_ref_system::esri_wkt_from_epsg;
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner};
use trapline_vector::Shapefile;

/// Creates a fishnet of parallel north-south lines covering a boundary
/// polygon. Lines are `--spacing` metres apart, starting 10 km (or the
/// boundary's radius, if larger) west and south of the boundary extent and
/// reaching the same distance past it to the east and north, so that the
/// grid still covers the boundary once rotated about its centroid.
///
/// Geographic boundaries are projected to NZTM2000; the output is always in
/// NZTM2000 metres.
///
/// # See Also
/// `GenerateTraplines`, `RotateVector`
pub struct CreateFishnetLines {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl CreateFishnetLines {
    pub fn new() -> CreateFishnetLines {
        // public constructor
        let name = "CreateFishnetLines".to_string();
        let toolbox = "GIS Analysis".to_string();
        let description =
            "Creates a grid of parallel north-south lines covering a boundary polygon.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Boundary File".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input boundary polygon file.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Vector(
                VectorGeometryType::Polygon,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Output Vector File".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output polyline file.".to_owned(),
            parameter_type: ParameterType::NewFile(ParameterFileType::Vector(
                VectorGeometryType::Line,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Line Spacing".to_owned(),
            flags: vec!["--spacing".to_owned()],
            description: "Distance between lines, in metres.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });

        let usage = example_usage(&name, "-i=boundary.shp -o=fishnet.shp --spacing=200");

        CreateFishnetLines {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl TraplineTool for CreateFishnetLines {
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
        parameters_to_json(&self.parameters)
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
        let tool_args = ToolArgs::parse(&args, &self.parameters)?;
        let input_file = resolve_file(&tool_args.require("input")?, working_directory);
        let output_file = resolve_file(&tool_args.require("output")?, working_directory);
        let spacing = tool_args.require_f64("spacing")?;
        check_positive("line spacing", spacing)?;

        if verbose {
            print_welcome_banner(&self.get_tool_name());
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;

        let start = Instant::now();

        let boundary = Boundary::from_shapefile(&input)?;
        if let Some(warning) = boundary.crs_warning() {
            println!("{}", warning);
        }
        let lines = create_fishnet(&boundary, spacing);
        if verbose {
            println!(">> Created fishnet of {} lines", lines.len());
        }

        let elapsed_time = get_formatted_elapsed_time(start);

        let projection = if boundary.crs == BoundaryCrs::OtherProjected {
            input.projection.clone()
        } else {
            esri_wkt_from_epsg(2193)
        };
        if verbose {
            println!("Saving data...")
        };
        write_polylines(&output_file, &lines, &projection)?;
        if verbose {
            println!("Output file written");
            println!(
                "{}",
                &format!("Elapsed Time (excluding I/O): {}", elapsed_time)
            );
        }

        Ok(())
    }
}
