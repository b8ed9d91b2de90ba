/*
This tool is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::traplines::{check_positive, SIMPLIFY_TOLERANCE};
use crate::tools::*;
use std::io::{Error, ErrorKind};
use std::time::Instant;
use trapline_common::algorithms::simplify_rdp;
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner, ProgressReporter};
use trapline_vector::{ShapeType, Shapefile, ShapefileGeometry};

/// Simplifies the lines of a polyline or polygon file using the
/// Ramer-Douglas-Peucker algorithm. Vertices closer than `--tolerance`
/// (default 10 m) to the simplified line are removed. Polygon rings that
/// would collapse below four vertices are left as they are. Z and M values
/// are not carried over; the output is always a plain XY file.
///
/// # See Also
/// `GenerateTraplines`
pub struct SimplifyLines {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl SimplifyLines {
    pub fn new() -> SimplifyLines {
        // public constructor
        let name = "SimplifyLines".to_string();
        let toolbox = "GIS Analysis".to_string();
        let description =
            "Simplifies polylines and polygons using the Ramer-Douglas-Peucker algorithm.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Vector File".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input polyline or polygon file.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Vector(
                VectorGeometryType::Line,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Output Vector File".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output vector file.".to_owned(),
            parameter_type: ParameterType::NewFile(ParameterFileType::Vector(
                VectorGeometryType::Line,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Tolerance".to_owned(),
            flags: vec!["--tolerance".to_owned()],
            description: "Simplification tolerance, in map units.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some(format!("{}", SIMPLIFY_TOLERANCE)),
            optional: true,
        });

        let usage = example_usage(&name, "-i=rotated.shp -o=simplified.shp --tolerance=10");

        SimplifyLines {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl TraplineTool for SimplifyLines {
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
        let tolerance = tool_args
            .get_f64("tolerance")?
            .unwrap_or(SIMPLIFY_TOLERANCE);
        check_positive("tolerance", tolerance)?;

        if verbose {
            print_welcome_banner(&self.get_tool_name());
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;
        let shape_type = input.header.shape_type.base_shape_type();
        let min_points = match shape_type {
            ShapeType::PolyLine => 2,
            ShapeType::Polygon => 4,
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "The input vector data must be of POLYLINE or POLYGON base shape type.",
                ))
            }
        };

        let start = Instant::now();

        let mut output = Shapefile::initialize_using_file(&output_file, &input, shape_type, true)?;
        let (mut before, mut after) = (0usize, 0usize);
        let mut progress = ProgressReporter::new("Progress", input.num_records, verbose);
        for record_num in 0..input.num_records {
            let record = &input.records[record_num];
            let geometry = if record.shape_type == ShapeType::Null {
                ShapefileGeometry::new(ShapeType::Null)
            } else {
                let mut sfg = ShapefileGeometry::new(shape_type);
                for part in record.get_parts() {
                    let simplified = simplify_rdp(&part, tolerance);
                    before += part.len();
                    if simplified.len() >= min_points {
                        after += simplified.len();
                        sfg.add_part(&simplified);
                    } else {
                        after += part.len();
                        sfg.add_part(&part);
                    }
                }
                sfg
            };
            output.add_record(geometry)?;
            output
                .attributes
                .add_record(copy_attributes(&input, record_num), false);
            progress.update(record_num + 1);
        }

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!("Vertices reduced from {} to {}", before, after);
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::test_utils::*;
    use trapline_common::structures::{Point2D, Polyline};

    #[test]
    fn test_default_tolerance() {
        let dir = scratch_dir("simplify");
        let wiggle = Polyline::new(
            &[
                Point2D::new(0.0, 0.0),
                Point2D::new(100.0, 4.0),
                Point2D::new(200.0, -3.0),
                Point2D::new(300.0, 50.0),
                Point2D::new(400.0, 0.0),
            ],
            1,
        );
        write_lines(&join(&dir, "in.shp"), &[wiggle], "");
        SimplifyLines::new()
            .run(to_args(&["-i=in.shp", "-o=out.shp"]), &dir, false)
            .unwrap();
        let output = Shapefile::read(&join(&dir, "out.shp")).unwrap();
        assert_eq!(
            output.records[0].points,
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(200.0, -3.0),
                Point2D::new(300.0, 50.0),
                Point2D::new(400.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_rings_do_not_collapse() {
        let dir = scratch_dir("simplify_poly");
        write_polygon(&join(&dir, "sq.shp"), &[square(0.0, 0.0, 5.0)], "");
        SimplifyLines::new()
            .run(to_args(&["-i=sq.shp", "-o=out.shp", "--tolerance=10"]), &dir, false)
            .unwrap();
        let output = Shapefile::read(&join(&dir, "out.shp")).unwrap();
        assert_eq!(output.records[0].points.len(), 5);
    }

    #[test]
    fn test_points_rejected() {
        let dir = scratch_dir("simplify_points");
        let mut sf = Shapefile::new(&join(&dir, "pts.shp"), ShapeType::Point).unwrap();
        sf.add_point_record(1.0, 2.0).unwrap();
        sf.write().unwrap();
        let err = SimplifyLines::new()
            .run(to_args(&["-i=pts.shp", "-o=out.shp"]), &dir, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
