/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use std::f64;
use std::fmt;
use std::io::{Error, ErrorKind};
use trapline_common::structures::{BoundingBox, Point2D};

#[derive(Clone, Debug)]
pub struct ShapefileGeometry {
    pub shape_type: ShapeType,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub num_parts: i32,
    pub num_points: i32,
    pub parts: Vec<i32>,
    pub points: Vec<Point2D>,
    pub z_min: f64,
    pub z_max: f64,
    pub z_array: Vec<f64>,
    pub m_min: f64,
    pub m_max: f64,
    pub m_array: Vec<f64>,
}

impl Default for ShapefileGeometry {
    fn default() -> ShapefileGeometry {
        ShapefileGeometry {
            shape_type: ShapeType::Null,
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
            num_parts: 0i32,
            num_points: 0i32,
            parts: vec![],
            points: vec![],
            z_min: f64::INFINITY,
            z_max: f64::NEG_INFINITY,
            z_array: vec![],
            m_min: f64::INFINITY,
            m_max: f64::NEG_INFINITY,
            m_array: vec![],
        }
    }
}

impl ShapefileGeometry {
    /// ShapefileGeometry constructor method.
    pub fn new(shape_type: ShapeType) -> ShapefileGeometry {
        ShapefileGeometry {
            shape_type: shape_type,
            ..Default::default()
        }
    }

    fn expand_extent(&mut self, p: &Point2D) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    /// Adds a single Point2D to the ShapefileGeometry's points array.
    pub fn add_point(&mut self, p: Point2D) {
        self.expand_extent(&p);
        self.points.push(p);
        self.num_points += 1;
    }

    /// Adds a part of Point2Ds to the ShapefileGeometry.
    pub fn add_part(&mut self, points: &[Point2D]) {
        self.parts.push(self.points.len() as i32);
        self.num_parts += 1i32;
        for p in points {
            self.expand_extent(p);
            self.points.push(*p);
        }
        self.num_points += points.len() as i32;
    }

    /// Adds a part along with its z-values.
    pub fn add_partz(&mut self, points: &[Point2D], z_values: &[f64]) {
        self.add_part(points);
        for z in z_values {
            self.z_min = self.z_min.min(*z);
            self.z_max = self.z_max.max(*z);
            self.z_array.push(*z);
        }
    }

    /// Replaces the vertex coordinates, keeping the part structure and any
    /// z/m values, and recomputes the extent. Used when geometries are
    /// rotated or reprojected.
    pub fn set_points(&mut self, points: Vec<Point2D>) -> Result<(), Error> {
        if points.len() != self.points.len() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Replacement vertex count does not match the geometry.",
            ));
        }
        self.x_min = f64::INFINITY;
        self.x_max = f64::NEG_INFINITY;
        self.y_min = f64::INFINITY;
        self.y_max = f64::NEG_INFINITY;
        for p in &points {
            self.expand_extent(p);
        }
        self.points = points;
        Ok(())
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    /// Returns the vertices of a part, or all vertices for point-based types.
    pub fn get_part(&self, part: usize) -> &[Point2D] {
        if self.parts.is_empty() {
            return &self.points;
        }
        let start = self.parts.get(part).map(|v| *v as usize).unwrap_or(self.points.len());
        let end = self
            .parts
            .get(part + 1)
            .map(|v| *v as usize)
            .unwrap_or(self.points.len());
        &self.points[start.min(end)..end]
    }

    /// All parts as owned vertex lists. For polygons these are the rings.
    pub fn get_parts(&self) -> Vec<Vec<Point2D>> {
        (0..self.num_parts.max(0) as usize)
            .map(|p| self.get_part(p).to_vec())
            .collect()
    }

    pub fn has_m_data(&self) -> bool {
        !self.m_array.is_empty() && self.m_array.len() == self.points.len()
    }

    /// Returns the length of the ShapefileGeometry record content, in bytes.
    pub fn get_length(&self) -> i32 {
        let np = self.num_points;
        let nparts = self.num_parts;
        // 4 bytes for the shape type
        let mut ret = 4i32;
        ret += match self.shape_type.base_shape_type() {
            ShapeType::Null => 0i32,
            ShapeType::Point => 16i32,
            ShapeType::MultiPoint => 36i32 + np * 16i32,
            _ => 40i32 + nparts * 4i32 + np * 16i32,
        };
        let is_point = self.shape_type.base_shape_type() == ShapeType::Point;
        match self.shape_type.dimension() {
            ShapeTypeDimension::XY => {}
            ShapeTypeDimension::Measure => {
                ret += if is_point { 8i32 } else { 16i32 + np * 8i32 };
            }
            ShapeTypeDimension::Z => {
                ret += if is_point { 8i32 } else { 16i32 + np * 8i32 };
                if self.has_m_data() {
                    ret += if is_point { 8i32 } else { 16i32 + np * 8i32 };
                }
            }
        }
        ret
    }
}

impl fmt::Display for ShapefileGeometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "shape_type: {}\nnum_parts: {}\nnum_points: {}\nx_min: {} x_max: {} y_min: {} y_max: {}",
            self.shape_type,
            self.num_parts,
            self.num_points,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
}

impl ShapeType {
    pub fn from_int(value: i32) -> Result<ShapeType, Error> {
        match value {
            0 => Ok(ShapeType::Null),
            1 => Ok(ShapeType::Point),
            3 => Ok(ShapeType::PolyLine),
            5 => Ok(ShapeType::Polygon),
            8 => Ok(ShapeType::MultiPoint),
            11 => Ok(ShapeType::PointZ),
            13 => Ok(ShapeType::PolyLineZ),
            15 => Ok(ShapeType::PolygonZ),
            18 => Ok(ShapeType::MultiPointZ),
            21 => Ok(ShapeType::PointM),
            23 => Ok(ShapeType::PolyLineM),
            25 => Ok(ShapeType::PolygonM),
            28 => Ok(ShapeType::MultiPointM),
            _ => Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unrecognized ShapeType: {}", value),
            )),
        }
    }

    pub fn to_int(&self) -> i32 {
        match self {
            ShapeType::Null => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
        }
    }

    pub fn base_shape_type(&self) -> ShapeType {
        match self {
            ShapeType::Null => ShapeType::Null,
            ShapeType::Point | ShapeType::PointZ | ShapeType::PointM => ShapeType::Point,
            ShapeType::PolyLine | ShapeType::PolyLineZ | ShapeType::PolyLineM => {
                ShapeType::PolyLine
            }
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM => ShapeType::Polygon,
            ShapeType::MultiPoint | ShapeType::MultiPointZ | ShapeType::MultiPointM => {
                ShapeType::MultiPoint
            }
        }
    }

    pub fn dimension(&self) -> ShapeTypeDimension {
        match self {
            ShapeType::Null
            | ShapeType::MultiPoint
            | ShapeType::Point
            | ShapeType::Polygon
            | ShapeType::PolyLine => ShapeTypeDimension::XY,
            ShapeType::MultiPointM
            | ShapeType::PointM
            | ShapeType::PolygonM
            | ShapeType::PolyLineM => ShapeTypeDimension::Measure,
            ShapeType::MultiPointZ
            | ShapeType::PointZ
            | ShapeType::PolygonZ
            | ShapeType::PolyLineZ => ShapeTypeDimension::Z,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeTypeDimension {
    XY,
    Measure,
    Z,
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
        };
        write!(f, "{}", printable)
    }
}
