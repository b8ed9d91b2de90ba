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
use trapline_common::algorithms::{rotate_points, union_centroid};
use trapline_common::structures::Point2D;
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner, ProgressReporter};
use trapline_vector::{ShapeType, Shapefile};

/// Rotates every feature of a vector file clockwise by `--angle` degrees
/// about a pivot point. The pivot is `(--pivot_x, --pivot_y)` when given;
/// otherwise it is the area-weighted centroid of the union of a polygon
/// layer's records, or the mean vertex position of a point or line layer. Attributes, z and m values
/// are carried over unchanged.
pub struct RotateVector {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl RotateVector {
    pub fn new() -> RotateVector {
        // public constructor
        let name = "RotateVector".to_string();
        let toolbox = "GIS Analysis".to_string();
        let description = "Rotates a vector layer clockwise about a pivot point.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Vector File".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input vector file.".to_owned(),
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

        parameters.push(ToolParameter {
            name: "Rotation Angle".to_owned(),
            flags: vec!["--angle".to_owned()],
            description: "Clockwise rotation angle, in degrees.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Pivot X".to_owned(),
            flags: vec!["--pivot_x".to_owned()],
            description: "Optional x-coordinate of the pivot point.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Pivot Y".to_owned(),
            flags: vec!["--pivot_y".to_owned()],
            description: "Optional y-coordinate of the pivot point.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: true,
        });

        let usage = example_usage(&name, "-i=fishnet.shp -o=rotated.shp --angle=30");

        RotateVector {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

/// The default pivot of a layer.
fn layer_centroid(input: &Shapefile) -> Option<Point2D> {
    let records = input.records.iter().filter(|r| r.shape_type != ShapeType::Null);
    if input.header.shape_type.base_shape_type() == ShapeType::Polygon {
        let features: Vec<Vec<Vec<Point2D>>> = records.map(|r| r.get_parts()).collect();
        if let Some(c) = union_centroid(&features) {
            return Some(c);
        }
    }
    let (mut sum_x, mut sum_y, mut n) = (0f64, 0f64, 0usize);
    for p in input.records.iter().flat_map(|r| r.points.iter()) {
        sum_x += p.x;
        sum_y += p.y;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(Point2D::new(sum_x / n as f64, sum_y / n as f64))
}

impl TraplineTool for RotateVector {
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
        let angle = tool_args.require_f64("angle")?;
        if !angle.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "The rotation angle must be a finite number.",
            ));
        }
        let pivot_x = tool_args.get_f64("pivot_x")?;
        let pivot_y = tool_args.get_f64("pivot_y")?;

        if verbose {
            print_welcome_banner(&self.get_tool_name());
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;

        let start = Instant::now();

        let pivot = match (pivot_x, pivot_y) {
            (Some(x), Some(y)) => Point2D::new(x, y),
            (None, None) => layer_centroid(&input).ok_or_else(|| {
                Error::new(ErrorKind::InvalidInput, "The input file contains no vertices.")
            })?,
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "Both --pivot_x and --pivot_y must be specified, or neither.",
                ))
            }
        };
        if verbose {
            println!("Pivot point: ({:.3}, {:.3})", pivot.x, pivot.y);
        }

        let mut output = Shapefile::initialize_using_file(
            &output_file,
            &input,
            input.header.shape_type,
            true,
        )?;
        let mut progress = ProgressReporter::new("Progress", input.num_records, verbose);
        for record_num in 0..input.num_records {
            let mut geometry = input.records[record_num].clone();
            if geometry.shape_type != ShapeType::Null {
                geometry.set_points(rotate_points(&geometry.points, &pivot, angle))?;
            }
            output.add_record(geometry)?;
            output
                .attributes
                .add_record(copy_attributes(&input, record_num), false);
            progress.update(record_num + 1);
        }

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
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
