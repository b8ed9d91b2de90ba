/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use std::env;
use std::fs;
use trapline_common::structures::{Point2D, Polyline};
use trapline_vector::{ShapeType, Shapefile, ShapefileGeometry};

/// A fresh, empty scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> String {
    let dir = env::temp_dir().join(format!("trapline_tools_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir.to_string_lossy().to_string()
}

pub fn join(dir: &str, file_name: &str) -> String {
    std::path::Path::new(dir)
        .join(file_name)
        .to_string_lossy()
        .to_string()
}

pub fn to_args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Clockwise square ring, closed.
pub fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2D> {
    vec![
        Point2D::new(x0, y0),
        Point2D::new(x0, y0 + size),
        Point2D::new(x0 + size, y0 + size),
        Point2D::new(x0 + size, y0),
        Point2D::new(x0, y0),
    ]
}

/// Writes a single polygon record made of the given rings.
pub fn write_polygon(file_name: &str, rings: &[Vec<Point2D>], projection: &str) {
    write_polygons(file_name, &[rings.to_vec()], projection);
}

/// Writes one polygon record per feature.
pub fn write_polygons(file_name: &str, features: &[Vec<Vec<Point2D>>], projection: &str) {
    let mut output = Shapefile::new(file_name, ShapeType::Polygon).unwrap();
    output.projection = projection.to_string();
    for rings in features {
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        for ring in rings {
            sfg.add_part(ring);
        }
        output.add_record(sfg).unwrap();
    }
    output.write().unwrap();
}

/// Writes one PolyLine record per line.
pub fn write_lines(file_name: &str, lines: &[Polyline], projection: &str) {
    let mut output = Shapefile::new(file_name, ShapeType::PolyLine).unwrap();
    output.projection = projection.to_string();
    for pl in lines {
        let mut sfg = ShapefileGeometry::new(ShapeType::PolyLine);
        sfg.add_part(&pl.vertices);
        output.add_record(sfg).unwrap();
    }
    output.write().unwrap();
}
