/*
This tool is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::tools::*;
use std::io::{Error, ErrorKind};
use std::time::Instant;
use trapline_common::spatial_ref_system::{
    esri_wkt_from_epsg, is_geographic_wkt, is_nztm_wkt, TransverseMercator,
};
use trapline_common::structures::Point2D;
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner, ProgressReporter};
use trapline_vector::{ShapeType, Shapefile};

/// Converts a vector file from New Zealand Transverse Mercator (NZTM2000,
/// EPSG:2193) to WGS84 longitude/latitude (EPSG:4326). NZGD2000 and WGS84
/// are treated as the same datum, so no datum shift is applied. Attributes,
/// z and m values are copied unchanged.
pub struct ReprojectNztmToWgs84 {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl ReprojectNztmToWgs84 {
    pub fn new() -> ReprojectNztmToWgs84 {
        // public constructor
        let name = "ReprojectNztmToWgs84".to_string();
        let toolbox = "Data Tools".to_string();
        let description = "Reprojects a vector file from NZTM2000 to WGS84.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Vector File".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input vector file, in NZTM2000.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Vector(
                VectorGeometryType::Any,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Output Vector File".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output vector file.".to_owned(),
            parameter_type: ParameterType::NewFile(ParameterFileType::Vector(
                VectorGeometryType::Any,
            )),
            default_value: None,
            optional: false,
        });

        let usage = example_usage(&name, "-i=points_nztm.shp -o=points_wgs84.shp");

        ReprojectNztmToWgs84 {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl TraplineTool for ReprojectNztmToWgs84 {
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

        if verbose {
            print_welcome_banner(&self.get_tool_name());
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;
        if is_geographic_wkt(&input.projection) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "The input file is already in geographic coordinates.",
            ));
        }
        if input.projection.trim().is_empty() {
            println!("Warning: The input file has no .prj file; NZTM2000 coordinates are assumed.");
        } else if !is_nztm_wkt(&input.projection) {
            println!("Warning: The input file does not appear to be in NZTM2000.");
        }

        let start = Instant::now();

        let tm = TransverseMercator::nztm2000();
        let mut output = Shapefile::initialize_using_file(
            &output_file,
            &input,
            input.header.shape_type,
            true,
        )?;
        output.projection = esri_wkt_from_epsg(4326);
        let mut progress = ProgressReporter::new("Progress", input.num_records, verbose);
        for record_num in 0..input.num_records {
            let mut geometry = input.records[record_num].clone();
            if geometry.shape_type != ShapeType::Null {
                let mut points = Vec::with_capacity(geometry.points.len());
                for p in &geometry.points {
                    let (lat, lon) = tm.inverse(p.x, p.y)?;
                    points.push(Point2D::new(lon, lat));
                }
                geometry.set_points(points)?;
            }
            output.add_record(geometry)?;
            output
                .attributes
                .add_record(copy_attributes(&input, record_num), false);
            progress.update(record_num + 1);
        }

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!(">> Converted data to WGS84 coordinate system");
            println!("Saving data...")
        };
        output.write()?;
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
