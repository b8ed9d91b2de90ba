/*
This tool is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::traplines::*;
use crate::tools::*;
use std::io::{Error, ErrorKind};
use std::time::Instant;
use trapline_common::spatial_ref_system::{is_geographic_wkt, is_nztm_wkt};
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner};
use trapline_vector::Shapefile;

/// Clips the lines of a polyline file to a polygon layer. Every stretch of a
/// line that lies inside the polygon layer becomes its own output feature,
/// numbered 1, 2, ... in input order in the `LINE_ID` field. `SRC_LINE` holds
/// the record number of the input line it came from. Holes are respected
/// within each polygon record, and the layer is the union of its records.
/// Lines are processed in parallel.
///
/// When one file is in NZTM2000 and the other is geographic, the clip layer
/// is converted to the coordinate system of the lines. A file with no .prj
/// is taken to be NZTM2000. Any other pair of differing coordinate systems
/// is an error.
///
/// # See Also
/// `GenerateTraplines`, `PointsAlongLines`
pub struct ClipLinesToPolygon {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl ClipLinesToPolygon {
    pub fn new() -> ClipLinesToPolygon {
        // public constructor
        let name = "ClipLinesToPolygon".to_string();
        let toolbox = "GIS Analysis".to_string();
        let description =
            "Clips polylines to a polygon, splitting them where they leave it.".to_string();

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
            name: "Clip Polygon File".to_owned(),
            flags: vec!["--clip".to_owned()],
            description: "Polygon file to clip to.".to_owned(),
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

        let usage = example_usage(&name, "-i=lines.shp --clip=boundary.shp -o=traplines.shp");

        ClipLinesToPolygon {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl TraplineTool for ClipLinesToPolygon {
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
        let clip_file = resolve_file(&tool_args.require("clip")?, working_directory);
        let output_file = resolve_file(&tool_args.require("output")?, working_directory);

        if verbose {
            print_welcome_banner(&self.get_tool_name());
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;
        let clip = Shapefile::read(&clip_file)?;

        let start = Instant::now();

        let lines = read_polylines(&input)?;
        let mut features = Boundary::read_features(&clip)?;
        match (layer_crs(&input.projection), layer_crs(&clip.projection)) {
            (LayerCrs::Nztm, LayerCrs::Nztm) | (LayerCrs::Geographic, LayerCrs::Geographic) => {}
            (LayerCrs::Other, LayerCrs::Other)
                if input.projection.trim() == clip.projection.trim() => {}
            (LayerCrs::Nztm, LayerCrs::Geographic) => {
                project_features_to_nztm(&mut features)?;
                if verbose {
                    println!(">> Projected clip layer to NZTM2000");
                }
            }
            (LayerCrs::Geographic, LayerCrs::Nztm) => {
                project_features_to_geographic(&mut features)?;
                if verbose {
                    println!(">> Converted clip layer to geographic coordinates");
                }
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!(
                        "The clip file {} and the input file {} are in different coordinate systems. Only NZTM2000 and geographic layers can be reconciled.",
                        clip.get_short_filename(),
                        input.get_short_filename()
                    ),
                ));
            }
        }

        let num_procs = get_num_procs()?;
        let traplines = clip_lines(lines, features, num_procs, verbose);

        let elapsed_time = get_formatted_elapsed_time(start);
        if verbose {
            println!("{} lines produced", traplines.len());
            println!("Saving data...")
        };
        write_traplines(&output_file, &traplines, &input.projection)?;
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

#[derive(Clone, Copy, Debug, PartialEq)]
enum LayerCrs {
    Nztm,
    Geographic,
    Other,
}

fn layer_crs(wkt: &str) -> LayerCrs {
    if wkt.trim().is_empty() || is_nztm_wkt(wkt) {
        LayerCrs::Nztm
    } else if is_geographic_wkt(wkt) {
        LayerCrs::Geographic
    } else {
        LayerCrs::Other
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::test_utils::*;
    use std::io::ErrorKind;
    use trapline_common::spatial_ref_system::{esri_wkt_from_epsg, TransverseMercator};
    use trapline_common::structures::{Point2D, Polyline};
    use trapline_vector::FieldData;

    const X0: f64 = 1_480_000.0;
    const Y0: f64 = 5_277_000.0;

    fn lon_lat(tm: &TransverseMercator, x: f64, y: f64) -> Point2D {
        let (lat, lon) = tm.inverse(x, y).unwrap();
        Point2D::new(lon, lat)
    }

    #[test]
    fn test_clip_with_hole() {
        let dir = scratch_dir("clip");
        let mut hole = square(40.0, 40.0, 20.0);
        hole.reverse();
        write_polygon(&join(&dir, "bdy.shp"), &[square(0.0, 0.0, 100.0), hole], "");
        write_lines(
            &join(&dir, "lines.shp"),
            &[
                Polyline::new(&[Point2D::new(-10.0, 50.0), Point2D::new(110.0, 50.0)], 1),
                Polyline::new(&[Point2D::new(200.0, 0.0), Point2D::new(200.0, 100.0)], 2),
                Polyline::new(&[Point2D::new(20.0, -5.0), Point2D::new(20.0, 105.0)], 3),
            ],
            "",
        );
        ClipLinesToPolygon::new()
            .run(
                to_args(&["-i=lines.shp", "--clip=bdy.shp", "-o=out.shp"]),
                &dir,
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "out.shp")).unwrap();
        assert_eq!(output.num_records, 3);
        let first = &output.records[0].points;
        assert!(first[0].nearly_equals(&Point2D::new(0.0, 50.0)));
        assert!(first[1].nearly_equals(&Point2D::new(40.0, 50.0)));
        let second = &output.records[1].points;
        assert!(second[0].nearly_equals(&Point2D::new(60.0, 50.0)));
        assert!(second[1].nearly_equals(&Point2D::new(100.0, 50.0)));
        assert_eq!(output.attributes.get_value(1, "LINE_ID"), FieldData::Int(2));
        assert_eq!(output.attributes.get_value(1, "SRC_LINE"), FieldData::Int(1));
        assert_eq!(output.attributes.get_value(2, "SRC_LINE"), FieldData::Int(3));
    }

    #[test]
    fn test_geographic_lines_with_nztm_clip() {
        let dir = scratch_dir("clip_geo_lines");
        write_polygon(
            &join(&dir, "bdy.shp"),
            &[square(X0, Y0, 1000.0)],
            &esri_wkt_from_epsg(2193),
        );
        let tm = TransverseMercator::nztm2000();
        let line = vec![
            lon_lat(&tm, X0 + 500.0, Y0 - 500.0),
            lon_lat(&tm, X0 + 500.0, Y0 + 1500.0),
        ];
        write_lines(
            &join(&dir, "lines.shp"),
            &[Polyline::new(&line, 1)],
            &esri_wkt_from_epsg(4326),
        );
        ClipLinesToPolygon::new()
            .run(
                to_args(&["-i=lines.shp", "--clip=bdy.shp", "-o=out.shp"]),
                &dir,
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "out.shp")).unwrap();
        assert_eq!(output.num_records, 1);
        assert!(is_geographic_wkt(&output.projection));
        let pts = &output.records[0].points;
        let (e, n) = tm.forward(pts[0].y, pts[0].x).unwrap();
        assert!((e - (X0 + 500.0)).abs() < 0.5 && (n - Y0).abs() < 0.5);
        let last = pts[pts.len() - 1];
        let (e, n) = tm.forward(last.y, last.x).unwrap();
        assert!((e - (X0 + 500.0)).abs() < 0.5 && (n - (Y0 + 1000.0)).abs() < 0.5);
    }

    #[test]
    fn test_nztm_lines_with_geographic_clip() {
        let dir = scratch_dir("clip_geo_clip");
        let tm = TransverseMercator::nztm2000();
        let ring: Vec<Point2D> = square(X0, Y0, 1000.0)
            .iter()
            .map(|p| lon_lat(&tm, p.x, p.y))
            .collect();
        write_polygon(&join(&dir, "bdy.shp"), &[ring], &esri_wkt_from_epsg(4167));
        write_lines(
            &join(&dir, "lines.shp"),
            &[Polyline::new(
                &[Point2D::new(X0 + 500.0, Y0 - 500.0), Point2D::new(X0 + 500.0, Y0 + 1500.0)],
                1,
            )],
            &esri_wkt_from_epsg(2193),
        );
        ClipLinesToPolygon::new()
            .run(
                to_args(&["-i=lines.shp", "--clip=bdy.shp", "-o=out.shp"]),
                &dir,
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "out.shp")).unwrap();
        assert_eq!(output.num_records, 1);
        let pts = &output.records[0].points;
        assert!((pts[0].y - Y0).abs() < 1e-3);
        assert!((pts[pts.len() - 1].y - (Y0 + 1000.0)).abs() < 1e-3);
    }

    #[test]
    fn test_mismatched_coordinate_systems() {
        let dir = scratch_dir("clip_mismatch");
        let utm = "PROJCS[\"WGS_1984_UTM_Zone_60S\",GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"False_Easting\",500000.0],PARAMETER[\"False_Northing\",10000000.0],PARAMETER[\"Central_Meridian\",177.0],PARAMETER[\"Scale_Factor\",0.9996],PARAMETER[\"Latitude_Of_Origin\",0.0],UNIT[\"Meter\",1.0]]";
        write_polygon(
            &join(&dir, "bdy.shp"),
            &[square(174.0, -41.0, 0.01)],
            &esri_wkt_from_epsg(4326),
        );
        write_lines(
            &join(&dir, "lines.shp"),
            &[Polyline::new(
                &[Point2D::new(300_000.0, 5_450_000.0), Point2D::new(300_000.0, 5_460_000.0)],
                1,
            )],
            utm,
        );
        let err = ClipLinesToPolygon::new()
            .run(
                to_args(&["-i=lines.shp", "--clip=bdy.shp", "-o=out.shp"]),
                &dir,
                false,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // an NZTM clip layer cannot be matched to these lines either
        write_polygon(
            &join(&dir, "bdy2.shp"),
            &[square(X0, Y0, 1000.0)],
            &esri_wkt_from_epsg(2193),
        );
        let err = ClipLinesToPolygon::new()
            .run(
                to_args(&["-i=lines.shp", "--clip=bdy2.shp", "-o=out.shp"]),
                &dir,
                false,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!std::path::Path::new(&join(&dir, "out.shp")).exists());
    }
}
