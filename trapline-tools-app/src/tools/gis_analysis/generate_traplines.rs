/*
This tool is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use super::traplines::*;
use crate::tools::*;
use std::fs;
use std::io::Error;
use std::path::Path;
use std::time::Instant;
use trapline_common::configs;
use trapline_common::spatial_ref_system::esri_wkt_from_epsg;
use trapline_common::utils::{get_formatted_elapsed_time, print_welcome_banner};
use trapline_vector::Shapefile;

/// This tool lays out a grid of trap stations ("traplines") inside a
/// boundary polygon, ready to be loaded onto a GPS unit for field work.
///
/// Parallel north-south lines are placed `--spacing` metres apart over the
/// boundary, rotated clockwise by `--rotation` degrees about the boundary's
/// area-weighted centroid, simplified, and clipped to the boundary. Each
/// inside run of a line becomes a trapline and stations are placed along it
/// every `--interval` metres, starting at the line's start. The final point
/// file is written in WGS84 as `<site>_traplines_WGS84.shp` in `--out_dir`,
/// with `SITE`, `LINE_ID`, `POINT_NUM`, `LABEL`, `LAT` and `LON` attributes.
///
/// The boundary may be in NZTM2000 or in geographic coordinates, in which case
/// it is projected to NZTM2000 first. A boundary with no `.prj` file is
/// assumed to be NZTM2000.
///
/// The six main parameters may also be given positionally, in the order
/// boundary, site, spacing, interval, rotation, output folder.
///
/// # See Also
/// `CreateFishnetLines`, `RotateVector`, `SimplifyLines`, `ClipLinesToPolygon`,
/// `PointsAlongLines`, `ReprojectNztmToWgs84`
pub struct GenerateTraplines {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl GenerateTraplines {
    pub fn new() -> GenerateTraplines {
        // public constructor
        let name = "GenerateTraplines".to_string();
        let toolbox = "GIS Analysis".to_string();
        let description =
            "Generates evenly spaced trap points along rotated parallel lines within a boundary polygon."
                .to_string();

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
            name: "Site Name".to_owned(),
            flags: vec!["--site".to_owned()],
            description: "Site name, used in the output file name and point labels.".to_owned(),
            parameter_type: ParameterType::String,
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Line Spacing".to_owned(),
            flags: vec!["--spacing".to_owned()],
            description: "Distance between traplines, in metres.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Point Interval".to_owned(),
            flags: vec!["--interval".to_owned()],
            description: "Distance between trap points along a line, in metres.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Rotation".to_owned(),
            flags: vec!["--rotation".to_owned()],
            description: "Clockwise rotation of the lines from north, in degrees.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("0.0".to_owned()),
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Output Folder".to_owned(),
            flags: vec!["--out_dir".to_owned()],
            description: "Output folder; created if it does not exist.".to_owned(),
            parameter_type: ParameterType::Directory,
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Include End Points?".to_owned(),
            flags: vec!["--include_end_points".to_owned()],
            description: "Also place a trap at the end of each line.".to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("false".to_owned()),
            optional: true,
        });

        parameters.push(ToolParameter {
            name: "Keep Intermediate Files?".to_owned(),
            flags: vec!["--keep_intermediates".to_owned()],
            description: "Write the output of each step to a tmp sub-folder of the output folder."
                .to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("false".to_owned()),
            optional: true,
        });

        let usage = example_usage(
            &name,
            "-i=boundary.shp --site=Kapiti --spacing=200 --interval=100 --rotation=30 --out_dir=output",
        );

        GenerateTraplines {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl TraplineTool for GenerateTraplines {
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
        let mut tool_args = ToolArgs::parse(&args, &self.parameters)?;
        tool_args.apply_positional(&["input", "site", "spacing", "interval", "rotation", "out_dir"]);

        let input_file = resolve_file(&tool_args.require("input")?, working_directory);
        let out_dir = resolve_file(&tool_args.require("out_dir")?, working_directory);
        let params = TraplineParameters {
            site_name: tool_args.require("site")?.trim().to_string(),
            line_spacing: tool_args.require_f64("spacing")?,
            point_interval: tool_args.require_f64("interval")?,
            rotation: tool_args.get_f64("rotation")?.unwrap_or(0f64),
            include_end_points: tool_args.get_bool("include_end_points").unwrap_or(false),
        };
        params.validate()?;
        let keep_intermediates = match tool_args.get_bool("keep_intermediates") {
            Some(v) => v,
            None => configs::get_configs()?.keep_intermediate_files,
        };

        if verbose {
            print_welcome_banner(&self.get_tool_name());
        }

        let site = params.file_safe_site_name();
        fs::create_dir_all(&out_dir)?;
        let tmp_dir = Path::new(&out_dir).join("tmp");
        if keep_intermediates {
            fs::create_dir_all(&tmp_dir)?;
        }
        let tmp_file = |suffix: &str| -> String {
            tmp_dir
                .join(format!("{}_{}.shp", site, suffix))
                .to_string_lossy()
                .to_string()
        };

        if verbose {
            println!("Reading data...")
        };
        let input = Shapefile::read(&input_file)?;

        let start = Instant::now();

        let boundary = Boundary::from_shapefile(&input)?;
        if let Some(warning) = boundary.crs_warning() {
            println!("{}", warning);
        }
        let working_wkt = if boundary.crs == BoundaryCrs::OtherProjected {
            input.projection.clone()
        } else {
            esri_wkt_from_epsg(2193)
        };
        if verbose {
            if boundary.crs == BoundaryCrs::ProjectedFromGeographic {
                println!(">> Projected boundary to NZTM2000");
            }
            println!(
                ">> Boundary extent: ({:.3}, {:.3}) to ({:.3}, {:.3})",
                boundary.extent.min_x,
                boundary.extent.min_y,
                boundary.extent.max_x,
                boundary.extent.max_y
            );
            println!(
                ">> Boundary centroid: ({:.3}, {:.3})",
                boundary.pivot.x, boundary.pivot.y
            );
        }
        if keep_intermediates {
            write_boundary(&tmp_file("bdy"), &boundary)?;
        }

        let lines = create_fishnet(&boundary, params.line_spacing);
        if verbose {
            println!(">> Created fishnet of {} lines", lines.len());
        }
        if keep_intermediates {
            write_polylines(&tmp_file("fishnet"), &lines, &working_wkt)?;
        }

        let lines = rotate_lines(&lines, &boundary.pivot, params.rotation);
        if verbose {
            println!(">> Rotated data by specified value: {} degrees", params.rotation);
        }
        if keep_intermediates {
            write_polylines(&tmp_file("fishnet_r"), &lines, &working_wkt)?;
        }

        let lines = simplify_lines(&lines, SIMPLIFY_TOLERANCE);
        if verbose {
            println!(">> Simplified lines");
        }
        if keep_intermediates {
            write_polylines(&tmp_file("fishnet_r_s"), &lines, &working_wkt)?;
        }

        let num_procs = get_num_procs()?;
        let traplines = clip_lines(lines, boundary.features.clone(), num_procs, verbose);
        if verbose {
            println!(">> Clipped new trap lines to input boundary");
        }
        if keep_intermediates {
            write_traplines(&tmp_file("fishnet_r_s_c"), &traplines, &working_wkt)?;
        }

        let points = place_trap_points(
            &traplines,
            params.point_interval,
            params.include_end_points,
        );
        if verbose {
            println!(
                ">> Generated points along lines at interval: {} meters",
                params.point_interval
            );
        }
        if keep_intermediates {
            write_trap_points(
                &tmp_file("fishnet_r_s_c_pts"),
                &params.site_name,
                &points,
                false,
                &working_wkt,
            )?;
        }
        if points.is_empty() {
            println!("Warning: No trap points fell inside the boundary; the output file will be empty.");
        }

        let elapsed_time = get_formatted_elapsed_time(start);

        let output_file = Path::new(&out_dir)
            .join(format!("{}_traplines_WGS84.shp", site))
            .to_string_lossy()
            .to_string();
        if verbose {
            println!("Saving data...")
        };
        write_trap_points(&output_file, &params.site_name, &points, true, "")?;
        if verbose {
            println!(">> Converted data to WGS84 coordinate system");
            println!(">> Exported shp to: {}", output_file);
            println!(
                "{} trap points on {} traplines",
                points.len(),
                traplines.len()
            );
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
    use std::io::ErrorKind;
    use trapline_common::spatial_ref_system::TransverseMercator;
    use trapline_common::structures::{BoundingBox, Point2D, Polyline};
    use trapline_vector::FieldData;

    const X0: f64 = 1_480_000.0;
    const Y0: f64 = 5_277_000.0;

    fn nztm_boundary(dir: &str) -> String {
        let file = join(dir, "boundary.shp");
        write_polygon(&file, &[square(X0, Y0, 1000.0)], &esri_wkt_from_epsg(2193));
        file
    }

    fn back_to_nztm(output: &Shapefile) -> Vec<Point2D> {
        let tm = TransverseMercator::nztm2000();
        output
            .records
            .iter()
            .map(|r| {
                let (e, n) = tm.forward(r.points[0].y, r.points[0].x).unwrap();
                Point2D::new(e, n)
            })
            .collect()
    }

    #[test]
    fn test_square_boundary() {
        let dir = scratch_dir("gen_square");
        let input_arg = format!("-i={}", nztm_boundary(&dir));
        let out_dir = join(&dir, "out");
        let out_arg = format!("--out_dir={}", out_dir);
        GenerateTraplines::new()
            .run(
                to_args(&[
                    input_arg.as_str(),
                    "--site=Test",
                    "--spacing=200",
                    "--interval=100",
                    "--rotation=0",
                    out_arg.as_str(),
                ]),
                "",
                false,
            )
            .unwrap();

        let output = Shapefile::read(&join(&out_dir, "Test_traplines_WGS84.shp")).unwrap();
        assert_eq!(output.num_records, 50);
        assert!(output.projection.contains("WGS_1984"));

        let mut per_line = vec![0usize; 6];
        for i in 0..output.num_records {
            match output.attributes.get_value(i, "LINE_ID") {
                FieldData::Int(id) => per_line[id as usize] += 1,
                v => panic!("unexpected LINE_ID {:?}", v),
            }
        }
        assert_eq!(&per_line[1..], &[10, 10, 10, 10, 10]);
        assert_eq!(
            output.attributes.get_value(0, "LABEL"),
            FieldData::Text("Test-L1-P1".to_string())
        );
        assert_eq!(
            output.attributes.get_value(0, "SITE"),
            FieldData::Text("Test".to_string())
        );
        match output.attributes.get_value(0, "LAT") {
            FieldData::Real(lat) => assert!((lat - output.records[0].points[0].y).abs() < 1e-7),
            v => panic!("unexpected LAT {:?}", v),
        }

        // every station lies inside the square, on lines x0, x0+200, ..., x0+800
        let points = back_to_nztm(&output);
        assert!(points[0].distance(&Point2D::new(X0, Y0)) < 1e-4);
        for p in &points {
            assert!(p.x > X0 - 1e-4 && p.x < X0 + 800.0 + 1e-4);
            assert!(p.y > Y0 - 1e-4 && p.y < Y0 + 900.0 + 1e-4);
            let offset = (p.x - X0) / 200.0;
            assert!((offset - offset.round()).abs() < 1e-6);
        }
        assert!(!Path::new(&join(&out_dir, "tmp")).exists());
    }

    fn run_on(dir: &str, site: &str) -> Shapefile {
        GenerateTraplines::new()
            .run(
                to_args(&["boundary.shp", site, "200", "100", "0", "out"]),
                dir,
                false,
            )
            .unwrap();
        Shapefile::read(&join(dir, &format!("out/{}_traplines_WGS84.shp", site))).unwrap()
    }

    #[test]
    fn test_nested_boundary_records() {
        let dir = scratch_dir("gen_nested");
        write_polygons(
            &join(&dir, "boundary.shp"),
            &[
                vec![square(X0, Y0, 1000.0)],
                vec![square(X0 + 300.0, Y0 + 300.0, 400.0)],
            ],
            &esri_wkt_from_epsg(2193),
        );
        let output = run_on(&dir, "Nested");
        assert_eq!(output.num_records, 50);
        // lines x0+400 and x0+600 keep their stations at 400, 500 and 600 m
        let inner = back_to_nztm(&output)
            .iter()
            .filter(|p| {
                p.x > X0 + 301.0 && p.x < X0 + 699.0 && p.y > Y0 + 350.0 && p.y < Y0 + 650.0
            })
            .count();
        assert_eq!(inner, 6);
    }

    #[test]
    fn test_overlapping_boundary_records() {
        let dir = scratch_dir("gen_overlap");
        write_polygons(
            &join(&dir, "boundary.shp"),
            &[
                vec![square(X0, Y0, 1000.0)],
                vec![square(X0 + 600.0, Y0, 1000.0)],
            ],
            &esri_wkt_from_epsg(2193),
        );
        let output = run_on(&dir, "Overlap");
        // the union is 1600 m wide: lines x0, x0+200, ..., x0+1400
        assert_eq!(output.num_records, 80);
        let mut per_line = vec![0usize; 9];
        for i in 0..output.num_records {
            match output.attributes.get_value(i, "LINE_ID") {
                FieldData::Int(id) => per_line[id as usize] += 1,
                v => panic!("unexpected LINE_ID {:?}", v),
            }
        }
        assert!(per_line[1..].iter().all(|n| *n == 10));
    }

    #[test]
    fn test_positional_args_and_intermediates() {
        let dir = scratch_dir("gen_positional");
        nztm_boundary(&dir);
        GenerateTraplines::new()
            .run(
                to_args(&[
                    "boundary.shp",
                    "North Block",
                    "250",
                    "50",
                    "-30",
                    "out",
                    "--keep_intermediates",
                    "--include_end_points",
                ]),
                &dir,
                false,
            )
            .unwrap();
        let out_dir = join(&dir, "out");
        let output =
            Shapefile::read(&join(&out_dir, "North Block_traplines_WGS84.shp")).unwrap();
        assert!(output.num_records > 0);
        let tmp_dir = join(&out_dir, "tmp");
        for suffix in &[
            "bdy",
            "fishnet",
            "fishnet_r",
            "fishnet_r_s",
            "fishnet_r_s_c",
            "fishnet_r_s_c_pts",
        ] {
            let f = join(&tmp_dir, &format!("North Block_{}.shp", suffix));
            assert!(Path::new(&f).exists(), "missing {}", f);
        }

        let mut bb = BoundingBox::from_points(&square(X0, Y0, 1000.0));
        bb.expand_by(1e-4);
        for p in back_to_nztm(&output) {
            assert!(bb.is_point_in_box(p.x, p.y));
        }
    }

    #[test]
    fn test_geographic_boundary_with_hole() {
        let dir = scratch_dir("gen_geographic");
        let tm = TransverseMercator::nztm2000();
        let to_ll = |ring: Vec<Point2D>| -> Vec<Point2D> {
            ring.iter()
                .map(|p| {
                    let (lat, lon) = tm.inverse(p.x, p.y).unwrap();
                    Point2D::new(lon, lat)
                })
                .collect()
        };
        let mut hole = square(X0 + 300.0, Y0 + 300.0, 400.0);
        hole.reverse();
        let boundary = join(&dir, "bdy_ll.shp");
        write_polygon(
            &boundary,
            &[to_ll(square(X0, Y0, 1000.0)), to_ll(hole)],
            &esri_wkt_from_epsg(4326),
        );
        let input_arg = format!("--input={}", boundary);
        let out_arg = format!("--out_dir={}", dir);
        GenerateTraplines::new()
            .run(
                to_args(&[
                    input_arg.as_str(),
                    "--site=Hole",
                    "--spacing=100",
                    "--interval=50",
                    out_arg.as_str(),
                ]),
                "",
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "Hole_traplines_WGS84.shp")).unwrap();
        assert!(output.num_records > 0);
        for p in back_to_nztm(&output) {
            let in_hole = p.x > X0 + 300.0 + 1e-3
                && p.x < X0 + 700.0 - 1e-3
                && p.y > Y0 + 300.0 + 1e-3
                && p.y < Y0 + 700.0 - 1e-3;
            assert!(!in_hole);
        }
    }

    #[test]
    fn test_empty_output() {
        let dir = scratch_dir("gen_empty");
        let boundary = join(&dir, "small.shp");
        // 20 m wide and falls between two lines 300 m apart
        write_polygon(
            &boundary,
            &[square(X0, Y0, 20.0)],
            &esri_wkt_from_epsg(2193),
        );
        GenerateTraplines::new()
            .run(
                to_args(&[boundary.as_str(), "Tiny", "300", "100", "0", dir.as_str()]),
                "",
                false,
            )
            .unwrap();
        let output = Shapefile::read(&join(&dir, "Tiny_traplines_WGS84.shp")).unwrap();
        assert_eq!(output.num_records, 0);
    }

    #[test]
    fn test_invalid_parameters() {
        let dir = scratch_dir("gen_invalid");
        let boundary = nztm_boundary(&dir);
        let b = boundary.as_str();
        let d = dir.as_str();
        let tool = GenerateTraplines::new();
        let run = |args: &[&str]| tool.run(to_args(args), "", false).unwrap_err().kind();
        assert_eq!(run(&[b, "Site", "0", "100", "0", d]), ErrorKind::InvalidInput);
        assert_eq!(run(&[b, "Site", "200", "-5", "0", d]), ErrorKind::InvalidInput);
        assert_eq!(run(&[b, "Site", "200", "100", "abc", d]), ErrorKind::InvalidInput);
        assert_eq!(run(&[b, "Site", "200"]), ErrorKind::InvalidInput);

        let lines = join(&dir, "lines.shp");
        write_lines(
            &lines,
            &[Polyline::new(
                &[Point2D::new(X0, Y0), Point2D::new(X0, Y0 + 10.0)],
                1,
            )],
            "",
        );
        assert_eq!(
            run(&[lines.as_str(), "Site", "200", "100", "0", d]),
            ErrorKind::InvalidInput
        );
    }
}
