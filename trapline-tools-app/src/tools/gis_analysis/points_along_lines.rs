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
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner};
use trapline_vector::Shapefile;

/// Places points every `--interval` map units along each line of a polyline
/// file, starting at the first vertex. The last vertex of a line gets a
/// point only with `--include_end_points`. Points carry the `LINE_ID` of the
/// record they came from (1-based), a `POINT_NUM` counting from 1 along
/// that line, and a `LABEL` of the form `<site>-L<line>-P<point>`.
///
/// # See Also
/// `GenerateTraplines`, `ClipLinesToPolygon`
pub struct PointsAlongLines {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl PointsAlongLines {
    pub fn new() -> PointsAlongLines {
        // public constructor
        let name = "PointsAlongLines".to_string();
        let toolbox = "GIS Analysis".to_string();
        let description = "Places evenly spaced points along polylines.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Lines File".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input polyline file.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Vector(
                VectorGeometryType::Line,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Output Vector File".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output point file.".to_owned(),
            parameter_type: ParameterType::NewFile(ParameterFileType::Vector(
                VectorGeometryType::Point,
            )),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Point Interval".to_owned(),
            flags: vec!["--interval".to_owned()],
            description: "Distance between points along a line.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Include End Points?".to_owned(),
            flags: vec!["--include_end_points".to_owned()],
            description: "Also place a point at the end of each line.".to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("false".to_owned()),
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Site Name".to_owned(),
            flags: vec!["--site".to_owned()],
            description: "Label prefix; defaults to the input file name.".to_owned(),
            parameter_type: ParameterType::String,
            default_value: None,
            optional: true,
        });

        let usage = example_usage(&name, "-i=traplines.shp -o=points.shp --interval=100");

        PointsAlongLines {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl TraplineTool for PointsAlongLines {
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
        let interval = tool_args.require_f64("interval")?;
        check_positive("point interval", interval)?;
        let include_end_points = tool_args.get_bool("include_end_points").unwrap_or(false);

        if verbose {
            print_welcome_banner(&self.get_tool_name());
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;
        let site = match tool_args.get("site") {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => input.get_short_filename(),
        };

        let start = Instant::now();

        let traplines: Vec<Trapline> = read_polylines(&input)?
            .into_iter()
            .map(|pl| Trapline {
                line_id: pl.id,
                source_id: pl.id,
                vertices: pl.vertices,
            })
            .collect();
        let points = place_trap_points(&traplines, interval, include_end_points);

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!("{} points placed", points.len());
            println!("Saving data...")
        };
        write_trap_points(&output_file, &site, &points, false, &input.projection)?;
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
    use trapline_vector::FieldData;

    fn lines(dir: &str) {
        write_lines(
            &join(dir, "lines.shp"),
            &[
                Polyline::new(&[Point2D::new(0.0, 0.0), Point2D::new(0.0, 250.0)], 1),
                Polyline::new(
                    &[
                        Point2D::new(100.0, 0.0),
                        Point2D::new(100.0, 60.0),
                        Point2D::new(160.0, 60.0),
                    ],
                    2,
                ),
            ],
            "",
        );
    }

    #[test]
    fn test_points_along_lines() {
        let dir = scratch_dir("points");
        lines(&dir);
        PointsAlongLines::new()
            .run(
                to_args(&["-i=lines.shp", "-o=pts.shp", "--interval=100"]),
                &dir,
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "pts.shp")).unwrap();
        // 0, 100, 200 on the first line; 0, 100 (round the corner) on the second
        assert_eq!(output.num_records, 5);
        assert_eq!(output.records[2].points[0], Point2D::new(0.0, 200.0));
        assert!(output.records[4].points[0].nearly_equals(&Point2D::new(140.0, 60.0)));
        assert_eq!(
            output.attributes.get_value(4, "LABEL"),
            FieldData::Text("lines-L2-P2".to_string())
        );
        assert_eq!(output.attributes.get_field_num("LAT"), None);
    }

    #[test]
    fn test_end_points() {
        let dir = scratch_dir("points_end");
        lines(&dir);
        PointsAlongLines::new()
            .run(
                to_args(&[
                    "-i=lines.shp",
                    "-o=pts.shp",
                    "--interval=100",
                    "--include_end_points",
                    "--site=A",
                ]),
                &dir,
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "pts.shp")).unwrap();
        assert_eq!(output.num_records, 7);
        assert_eq!(output.records[3].points[0], Point2D::new(0.0, 250.0));
        assert_eq!(
            output.attributes.get_value(3, "LABEL"),
            FieldData::Text("A-L1-P4".to_string())
        );
    }
}
