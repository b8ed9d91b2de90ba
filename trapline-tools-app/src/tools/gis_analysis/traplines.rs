/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

//! The steps of the trapline pipeline, shared by `GenerateTraplines` and the
//! single-step tools.

use std::io::{Error, ErrorKind};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use trapline_common::algorithms::{
    clip_line_to_polygon, fishnet_lines, points_along_line, rotate_points, simplify_rdp,
    union_centroid,
};
use trapline_common::spatial_ref_system::{
    esri_wkt_from_epsg, is_geographic_wkt, is_nztm_wkt, TransverseMercator,
};
use trapline_common::structures::{BoundingBox, Point2D, Polyline};
use trapline_common::utils::ProgressReporter;
use trapline_vector::{
    AttributeField, FieldData, FieldDataType, ShapeType, Shapefile, ShapefileGeometry,
};

/// RDP tolerance applied to the rotated fishnet, in metres.
pub const SIMPLIFY_TOLERANCE: f64 = 10.0;

/// The fishnet always reaches at least this far past the boundary extent.
pub const MIN_GRID_BUFFER: f64 = 10_000.0;

const SITE_FIELD_WIDTH: usize = 40;
const LABEL_FIELD_WIDTH: usize = 60;

#[derive(Clone, Debug)]
pub struct TraplineParameters {
    pub site_name: String,
    pub line_spacing: f64,
    pub point_interval: f64,
    pub rotation: f64,
    pub include_end_points: bool,
}

impl TraplineParameters {
    pub fn validate(&self) -> Result<(), Error> {
        if self.site_name.trim().is_empty() {
            return Err(invalid_input("The site name must not be empty."));
        }
        check_positive("line spacing", self.line_spacing)?;
        check_positive("point interval", self.point_interval)?;
        if !self.rotation.is_finite() {
            return Err(invalid_input("The rotation angle must be a finite number."));
        }
        Ok(())
    }

    /// The site name made safe for use in a file name.
    pub fn file_safe_site_name(&self) -> String {
        self.site_name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                _ => c,
            })
            .collect()
    }
}

fn invalid_input(msg: &str) -> Error {
    Error::new(ErrorKind::InvalidInput, msg)
}

pub fn check_positive(name: &str, value: f64) -> Result<(), Error> {
    if !value.is_finite() || value <= 0f64 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("The {} must be a finite number greater than zero.", name),
        ));
    }
    Ok(())
}

/// One inside run of a clipped fishnet line.
#[derive(Clone, Debug, PartialEq)]
pub struct Trapline {
    pub line_id: usize,
    /// Id of the fishnet line the run was cut from.
    pub source_id: usize,
    pub vertices: Vec<Point2D>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrapPoint {
    pub line_id: usize,
    pub point_num: usize,
    pub position: Point2D,
}

/// How the boundary's coordinate system was interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryCrs {
    Nztm,
    /// Geographic input, projected to NZTM on read.
    ProjectedFromGeographic,
    /// No .prj file; NZTM assumed.
    Unknown,
    /// Projected, but not recognisably NZTM. Used as-is.
    OtherProjected,
}

/// A boundary polygon layer in NZTM metres. The boundary is the union of
/// its features; holes only apply within the feature they belong to.
#[derive(Clone, Debug)]
pub struct Boundary {
    /// The rings of each polygon record.
    pub features: Vec<Vec<Vec<Point2D>>>,
    pub extent: BoundingBox,
    /// Area-weighted centroid of the union, the rotation pivot.
    pub pivot: Point2D,
    /// Greatest distance from the pivot to any vertex.
    pub max_radius: f64,
    pub crs: BoundaryCrs,
}

impl Boundary {
    /// The polygon rings of every non-null record, grouped by record, in
    /// file coordinates.
    pub fn read_features(sf: &Shapefile) -> Result<Vec<Vec<Vec<Point2D>>>, Error> {
        if sf.header.shape_type.base_shape_type() != ShapeType::Polygon {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "The boundary file {} must be of a POLYGON base shape type.",
                    sf.get_short_filename()
                ),
            ));
        }
        let mut features: Vec<Vec<Vec<Point2D>>> = vec![];
        for record in &sf.records {
            if record.shape_type == ShapeType::Null {
                continue;
            }
            let rings: Vec<Vec<Point2D>> = record
                .get_parts()
                .into_iter()
                .filter(|ring| ring.len() >= 3)
                .collect();
            if !rings.is_empty() {
                features.push(rings);
            }
        }
        if features.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "The boundary file {} does not contain any polygon records.",
                    sf.get_short_filename()
                ),
            ));
        }
        Ok(features)
    }

    pub fn from_shapefile(sf: &Shapefile) -> Result<Boundary, Error> {
        let mut features = Boundary::read_features(sf)?;
        let crs = if sf.projection.trim().is_empty() {
            BoundaryCrs::Unknown
        } else if is_geographic_wkt(&sf.projection) {
            project_features_to_nztm(&mut features)?;
            BoundaryCrs::ProjectedFromGeographic
        } else if is_nztm_wkt(&sf.projection) {
            BoundaryCrs::Nztm
        } else {
            BoundaryCrs::OtherProjected
        };

        Boundary::from_features(features, crs)
    }

    pub fn from_features(
        features: Vec<Vec<Vec<Point2D>>>,
        crs: BoundaryCrs,
    ) -> Result<Boundary, Error> {
        let pivot = union_centroid(&features).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                "The boundary polygon has zero area.",
            )
        })?;
        let mut extent = BoundingBox::default();
        let mut max_radius = 0f64;
        for p in features.iter().flatten().flatten() {
            extent.expand_to_point(p);
            max_radius = max_radius.max(p.distance(&pivot));
        }
        Ok(Boundary {
            features: features,
            extent: extent,
            pivot: pivot,
            max_radius: max_radius,
            crs: crs,
        })
    }

    /// The distance the fishnet extends past the extent on every side, large
    /// enough that the rotated grid still covers the boundary.
    pub fn grid_buffer(&self) -> f64 {
        MIN_GRID_BUFFER.max(self.max_radius)
    }

    pub fn crs_warning(&self) -> Option<&'static str> {
        match self.crs {
            BoundaryCrs::Unknown => {
                Some("Warning: The boundary file has no .prj file; NZTM2000 coordinates are assumed.")
            }
            BoundaryCrs::OtherProjected => Some(
                "Warning: The boundary file is not in NZTM2000; coordinates are treated as NZTM2000 metres.",
            ),
            _ => None,
        }
    }
}

/// Projects geographic (longitude, latitude) features to NZTM2000 in place.
pub fn project_features_to_nztm(features: &mut [Vec<Vec<Point2D>>]) -> Result<(), Error> {
    let tm = TransverseMercator::nztm2000();
    for p in features.iter_mut().flatten().flatten() {
        let (e, n) = tm.forward(p.y, p.x)?;
        *p = Point2D::new(e, n);
    }
    Ok(())
}

/// Unprojects NZTM2000 features to geographic (longitude, latitude) in place.
pub fn project_features_to_geographic(features: &mut [Vec<Vec<Point2D>>]) -> Result<(), Error> {
    let tm = TransverseMercator::nztm2000();
    for p in features.iter_mut().flatten().flatten() {
        let (lat, lon) = tm.inverse(p.x, p.y)?;
        *p = Point2D::new(lon, lat);
    }
    Ok(())
}

/// North-south fishnet lines covering the buffered boundary extent.
pub fn create_fishnet(boundary: &Boundary, spacing: f64) -> Vec<Polyline> {
    let buffer = boundary.grid_buffer();
    let origin = Point2D::new(
        boundary.extent.min_x - buffer,
        boundary.extent.min_y - buffer,
    );
    let extent = BoundingBox::new(
        origin.x,
        boundary.extent.max_x + buffer,
        origin.y,
        boundary.extent.max_y + buffer,
    );
    fishnet_lines(&extent, &origin, spacing)
}

pub fn rotate_lines(lines: &[Polyline], pivot: &Point2D, clockwise_degrees: f64) -> Vec<Polyline> {
    lines
        .iter()
        .map(|pl| Polyline::new(&rotate_points(&pl.vertices, pivot, clockwise_degrees), pl.id))
        .collect()
}

pub fn simplify_lines(lines: &[Polyline], tolerance: f64) -> Vec<Polyline> {
    lines
        .iter()
        .map(|pl| Polyline::new(&simplify_rdp(&pl.vertices, tolerance), pl.id))
        .collect()
}

/// Clips every line to the union of the polygon features on `num_procs`
/// threads. Each inside run becomes a trapline; line ids are assigned
/// 1, 2, ... in input order.
pub fn clip_lines(
    lines: Vec<Polyline>,
    features: Vec<Vec<Vec<Point2D>>>,
    num_procs: usize,
    verbose: bool,
) -> Vec<Trapline> {
    let num_lines = lines.len();
    let lines = Arc::new(lines);
    let features = Arc::new(features);
    let line_list = Arc::new(Mutex::new(0..num_lines));
    let num_procs = num_procs.max(1).min(num_lines.max(1));
    let (tx, rx) = mpsc::channel();
    for _ in 0..num_procs {
        let lines = lines.clone();
        let features = features.clone();
        let line_list = line_list.clone();
        let tx = tx.clone();
        thread::spawn(move || loop {
            let index = match line_list.lock() {
                Ok(mut list) => list.next(),
                Err(_) => None,
            };
            let i = match index {
                Some(i) => i,
                None => break,
            };
            let runs = clip_line_to_polygon(&lines[i].vertices, &features);
            if tx.send((i, runs)).is_err() {
                break;
            }
        });
    }
    drop(tx);

    let mut progress = ProgressReporter::new("Clipping lines", num_lines, verbose);
    let mut results: Vec<(usize, Vec<Vec<Point2D>>)> = Vec::with_capacity(num_lines);
    for data in rx {
        results.push(data);
        progress.update(results.len());
    }
    results.sort_by_key(|r| r.0);

    let mut traplines = vec![];
    for (i, runs) in results {
        for run in runs {
            traplines.push(Trapline {
                line_id: traplines.len() + 1,
                source_id: lines[i].id,
                vertices: run,
            });
        }
    }
    traplines
}

/// Stations every `interval` metres along each trapline. Point numbers start
/// at 1 and continue across consecutive traplines sharing a line id.
pub fn place_trap_points(
    traplines: &[Trapline],
    interval: f64,
    include_end_points: bool,
) -> Vec<TrapPoint> {
    let mut points = vec![];
    let mut last_line = None;
    let mut point_num = 0;
    for tl in traplines {
        if last_line != Some(tl.line_id) {
            point_num = 0;
            last_line = Some(tl.line_id);
        }
        for p in points_along_line(&tl.vertices, interval, include_end_points) {
            point_num += 1;
            points.push(TrapPoint {
                line_id: tl.line_id,
                point_num: point_num,
                position: p,
            });
        }
    }
    points
}

/// NZTM2000 to WGS84, returned as (longitude, latitude) points.
pub fn nztm_to_wgs84(points: &[Point2D]) -> Result<Vec<Point2D>, Error> {
    let tm = TransverseMercator::nztm2000();
    points
        .iter()
        .map(|p| {
            let (lat, lon) = tm.inverse(p.x, p.y)?;
            Ok(Point2D::new(lon, lat))
        })
        .collect()
}

pub fn trap_label(site: &str, line_id: usize, point_num: usize) -> String {
    format!("{}-L{}-P{}", site, line_id, point_num)
}

/// Reads every part of every PolyLine record as a line. Parts share the id
/// of their record, which is 1-based.
pub fn read_polylines(sf: &Shapefile) -> Result<Vec<Polyline>, Error> {
    if sf.header.shape_type.base_shape_type() != ShapeType::PolyLine {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "The input file {} must be of a POLYLINE base shape type.",
                sf.get_short_filename()
            ),
        ));
    }
    let mut lines = vec![];
    for (record_num, record) in sf.records.iter().enumerate() {
        if record.shape_type == ShapeType::Null {
            continue;
        }
        for part in record.get_parts() {
            if part.len() >= 2 {
                lines.push(Polyline::new(&part, record_num + 1));
            }
        }
    }
    Ok(lines)
}

pub fn write_boundary(file_name: &str, boundary: &Boundary) -> Result<(), Error> {
    let mut output = Shapefile::new(file_name, ShapeType::Polygon)?;
    output.projection = esri_wkt_from_epsg(2193);
    output
        .attributes
        .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
    for (i, rings) in boundary.features.iter().enumerate() {
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        for ring in rings {
            sfg.add_part(ring);
        }
        output.add_record(sfg)?;
        output
            .attributes
            .add_record(vec![FieldData::Int(i as i32 + 1)], false);
    }
    output.write()
}

pub fn write_polylines(file_name: &str, lines: &[Polyline], projection: &str) -> Result<(), Error> {
    let mut output = Shapefile::new(file_name, ShapeType::PolyLine)?;
    output.projection = projection.to_string();
    output
        .attributes
        .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
    output
        .attributes
        .add_field(&AttributeField::new("LINE_ID", FieldDataType::Int, 7u8, 0u8));
    for (i, pl) in lines.iter().enumerate() {
        let mut sfg = ShapefileGeometry::new(ShapeType::PolyLine);
        sfg.add_part(&pl.vertices);
        output.add_record(sfg)?;
        output.attributes.add_record(
            vec![FieldData::Int(i as i32 + 1), FieldData::Int(pl.id as i32)],
            false,
        );
    }
    output.write()
}

pub fn write_traplines(
    file_name: &str,
    traplines: &[Trapline],
    projection: &str,
) -> Result<(), Error> {
    let mut output = Shapefile::new(file_name, ShapeType::PolyLine)?;
    output.projection = projection.to_string();
    output
        .attributes
        .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
    output
        .attributes
        .add_field(&AttributeField::new("LINE_ID", FieldDataType::Int, 7u8, 0u8));
    output
        .attributes
        .add_field(&AttributeField::new("SRC_LINE", FieldDataType::Int, 7u8, 0u8));
    for (i, tl) in traplines.iter().enumerate() {
        let mut sfg = ShapefileGeometry::new(ShapeType::PolyLine);
        sfg.add_part(&tl.vertices);
        output.add_record(sfg)?;
        output.attributes.add_record(
            vec![
                FieldData::Int(i as i32 + 1),
                FieldData::Int(tl.line_id as i32),
                FieldData::Int(tl.source_id as i32),
            ],
            false,
        );
    }
    output.write()
}

/// Writes trap points, given in NZTM2000. With `wgs84` set the points are
/// reprojected and LAT/LON fields are added; otherwise they are written with
/// `projection` as given.
pub fn write_trap_points(
    file_name: &str,
    site: &str,
    points: &[TrapPoint],
    wgs84: bool,
    projection: &str,
) -> Result<(), Error> {
    let mut output = Shapefile::new(file_name, ShapeType::Point)?;
    let positions: Vec<Point2D> = points.iter().map(|tp| tp.position).collect();
    let positions = if wgs84 {
        output.projection = esri_wkt_from_epsg(4326);
        nztm_to_wgs84(&positions)?
    } else {
        output.projection = projection.to_string();
        positions
    };

    output
        .attributes
        .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
    output.attributes.add_field(&AttributeField::new(
        "SITE",
        FieldDataType::Text,
        SITE_FIELD_WIDTH as u8,
        0u8,
    ));
    output
        .attributes
        .add_field(&AttributeField::new("LINE_ID", FieldDataType::Int, 7u8, 0u8));
    output
        .attributes
        .add_field(&AttributeField::new("POINT_NUM", FieldDataType::Int, 7u8, 0u8));
    output.attributes.add_field(&AttributeField::new(
        "LABEL",
        FieldDataType::Text,
        LABEL_FIELD_WIDTH as u8,
        0u8,
    ));
    if wgs84 {
        output
            .attributes
            .add_field(&AttributeField::new("LAT", FieldDataType::Real, 14u8, 8u8));
        output
            .attributes
            .add_field(&AttributeField::new("LON", FieldDataType::Real, 14u8, 8u8));
    }

    let site_value: String = site.chars().take(SITE_FIELD_WIDTH).collect();
    for (i, (tp, p)) in points.iter().zip(positions.iter()).enumerate() {
        output.add_point_record(p.x, p.y)?;
        let mut rec = vec![
            FieldData::Int(i as i32 + 1),
            FieldData::Text(site_value.clone()),
            FieldData::Int(tp.line_id as i32),
            FieldData::Int(tp.point_num as i32),
            FieldData::Text(
                trap_label(site, tp.line_id, tp.point_num)
                    .chars()
                    .take(LABEL_FIELD_WIDTH)
                    .collect(),
            ),
        ];
        if wgs84 {
            rec.push(FieldData::Real(p.y));
            rec.push(FieldData::Real(p.x));
        }
        output.attributes.add_record(rec, false);
    }
    output.write()
}
