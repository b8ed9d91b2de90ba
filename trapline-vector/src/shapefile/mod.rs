/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT

Notes: Reading and writing ESRI Shapefiles (.shp, .shx, .dbf and .prj).
*/

pub mod attributes;
pub mod geometry;

use self::attributes::*;
use self::geometry::*;
use chrono::prelude::*;
use std::f64;
use std::fmt;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufWriter, Cursor, Error, ErrorKind};
use std::path::Path;
use trapline_common::structures::{BoundingBox, Point2D};
use trapline_common::utils::{ByteOrderReader, ByteOrderWriter, Endianness};

const FILE_CODE: i32 = 9994;
const HEADER_SIZE: usize = 100;
const MAX_COUNT: i32 = 100_000_000;

#[derive(Debug, Default, Clone)]
pub struct ShapefileHeader {
    file_code: i32,            // BigEndian; value is 9994
    pub file_length: i32,      // BigEndian, in 16-bit words
    pub version: i32,          // LittleEndian
    pub shape_type: ShapeType, // LittleEndian
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub z_min: f64, // 0f64 if shape type has no z
    pub z_max: f64,
    pub m_min: f64, // 0f64 if shape type has no measures
    pub m_max: f64,
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "file_code: {}\nfile_length: {}\nversion: {}\nshape_type: {}\nx_min: {}\nx_max: {}\ny_min: {}\ny_max: {}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max
        )
    }
}

/// `Shapefile` is an in-memory ESRI Shapefile.
///
/// Examples:
///
/// ```ignore
/// // Read a Shapefile from a file.
/// let input = Shapefile::read(&input_file)?;
///
/// // Create a new output Shapefile
/// let mut output = Shapefile::initialize_using_file(&output_file, &input, ShapeType::PolyLine, false)?;
///
/// // add attributes
/// let fid = AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8);
/// output.attributes.add_field(&fid);
/// ```
#[derive(Default, Clone)]
pub struct Shapefile {
    pub file_name: String,
    pub file_mode: String,
    pub header: ShapefileHeader,
    pub num_records: usize,
    pub records: Vec<ShapefileGeometry>,
    pub attributes: ShapefileAttributes,
    pub projection: String,
}

fn sibling_file(file_name: &str, extension: &str) -> String {
    Path::new(file_name)
        .with_extension(extension)
        .to_string_lossy()
        .to_string()
}

fn with_shp_extension(file_name: &str) -> String {
    if Path::new(file_name).extension().is_some() {
        file_name.to_string()
    } else {
        // likely no extension provided; default to .shp
        format!("{}.shp", file_name)
    }
}

fn invalid_data(msg: String) -> Error {
    Error::new(ErrorKind::InvalidData, msg)
}

impl Shapefile {
    pub fn read(file_name: &str) -> Result<Shapefile, Error> {
        let mut sf = Shapefile {
            file_name: file_name.to_string(),
            file_mode: "r".to_string(),
            ..Default::default()
        };
        sf.read_file()?;
        Ok(sf)
    }

    pub fn new(file_name: &str, file_type: ShapeType) -> Result<Shapefile, Error> {
        let mut sf = Shapefile {
            file_name: with_shp_extension(file_name),
            file_mode: "w".to_string(),
            ..Default::default()
        };
        sf.header.shape_type = file_type;
        Ok(sf)
    }

    pub fn initialize_using_file(
        file_name: &str,
        other: &Shapefile,
        shape_type: ShapeType,
        copy_fields: bool,
    ) -> Result<Shapefile, Error> {
        let mut sf = Shapefile {
            file_name: with_shp_extension(file_name),
            file_mode: "w".to_string(),
            projection: other.projection.clone(),
            ..Default::default()
        };
        sf.header.shape_type = shape_type;
        if copy_fields {
            for field in &other.attributes.fields {
                sf.attributes.add_field(field);
            }
        }
        Ok(sf)
    }

    /// Returns the filename, in shortened form (e.g. file.shp becomes file).
    pub fn get_short_filename(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Returns the ShapefileGeometry for a specified index, starting at zero.
    pub fn get_record(&self, index: usize) -> Option<&ShapefileGeometry> {
        self.records.get(index)
    }

    /// Adds a new ShapefileGeometry.
    pub fn add_record(&mut self, geometry: ShapefileGeometry) -> Result<(), Error> {
        if self.file_mode == "r" {
            return Err(Error::new(
                ErrorKind::Other,
                "The file was opened in read-only mode.",
            ));
        }
        if geometry.shape_type != self.header.shape_type && geometry.shape_type != ShapeType::Null
        {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "Attempt to add a {} record to a {} shapefile.",
                    geometry.shape_type, self.header.shape_type
                ),
            ));
        }
        self.records.push(geometry);
        self.num_records = self.records.len();
        Ok(())
    }

    /// Adds a new Point record.
    pub fn add_point_record(&mut self, x: f64, y: f64) -> Result<(), Error> {
        let mut sfg = ShapefileGeometry::new(ShapeType::Point);
        sfg.add_point(Point2D::new(x, y));
        self.add_record(sfg)
    }

    fn read_file(&mut self) -> Result<(), Error> {
        ///////////////////////////////
        // First read the geometries //
        ///////////////////////////////
        let buffer = fs::read(&self.file_name)?;
        let file_size = buffer.len();
        if file_size < HEADER_SIZE {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("{} is too short to be a shapefile.", self.file_name),
            ));
        }

        // Note: the shapefile format uses mixed endianness, so the reader's
        // byte order is switched frequently.
        let mut bor = ByteOrderReader::new(Cursor::new(buffer), Endianness::BigEndian)?;
        self.header.file_code = bor.read_i32()?;
        if self.header.file_code != FILE_CODE {
            return Err(invalid_data(format!(
                "{} is not a shapefile (file code {}).",
                self.file_name, self.header.file_code
            )));
        }
        bor.seek(24)?;
        self.header.file_length = bor.read_i32()?;

        // the rest of the header is in LittleEndian format
        bor.set_byte_order(Endianness::LittleEndian);
        self.header.version = bor.read_i32()?;
        self.header.shape_type = ShapeType::from_int(bor.read_i32()?)?;
        self.header.x_min = bor.read_f64()?;
        self.header.y_min = bor.read_f64()?;
        self.header.x_max = bor.read_f64()?;
        self.header.y_max = bor.read_f64()?;
        self.header.z_min = bor.read_f64()?;
        self.header.z_max = bor.read_f64()?;
        self.header.m_min = bor.read_f64()?;
        self.header.m_max = bor.read_f64()?;

        let declared_size = (self.header.file_length.max(0) as usize) * 2;
        let end = if declared_size >= HEADER_SIZE {
            declared_size.min(file_size)
        } else {
            file_size
        };
        while bor.pos() + 8 <= end {
            bor.set_byte_order(Endianness::BigEndian);
            bor.inc_pos(4)?; // record number
            let content_length = bor.read_i32()?.max(0) as usize * 2; // in bytes
            let start = bor.pos();
            if start + content_length > file_size {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("{} ends part way through a record.", self.file_name),
                ));
            }
            bor.set_byte_order(Endianness::LittleEndian);
            let sfg = read_record(&mut bor, start, content_length)?;
            self.records.push(sfg);
            bor.seek(start + content_length)?;
        }
        self.num_records = self.records.len();

        //////////////////////////////
        // Read the projection file //
        //////////////////////////////
        let prj_file = sibling_file(&self.file_name, "prj");
        if let Ok(s) = fs::read_to_string(&prj_file) {
            self.projection = s.trim().to_string();
        }

        ///////////////////////////////
        // Read the attributes table //
        ///////////////////////////////
        let dbf_file = sibling_file(&self.file_name, "dbf");
        match fs::read(&dbf_file) {
            Ok(buffer) => self.read_dbf(buffer)?,
            Err(ref e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        Ok(())
    }

    fn read_dbf(&mut self, buffer: Vec<u8>) -> Result<(), Error> {
        let mut bor = ByteOrderReader::new(Cursor::new(buffer), Endianness::LittleEndian)?;
        self.attributes.header.version = bor.read_u8()?;
        self.attributes.header.year = 1900u32 + bor.read_u8()? as u32;
        self.attributes.header.month = bor.read_u8()?;
        self.attributes.header.day = bor.read_u8()?;
        let num_records = bor.read_u32()?;
        self.attributes.header.bytes_in_header = bor.read_u16()?;
        self.attributes.header.bytes_in_record = bor.read_u16()?;
        bor.seek(32)?;

        // field descriptor array, terminated by 0x0d
        while bor.peek_u8()? != 0x0d {
            let name = bor.read_utf8(11)?.replace(char::from(0), "");
            let field_type = char::from(bor.read_u8()?);
            bor.inc_pos(4)?;
            let field_length = bor.read_u8()?;
            let decimal_count = bor.read_u8()?;
            bor.inc_pos(14)?;
            self.attributes.add_field(&AttributeField {
                name: name.trim().to_string(),
                field_type: field_type,
                field_length: field_length,
                decimal_count: decimal_count,
            });
        }
        bor.seek(self.attributes.header.bytes_in_header as usize)?;

        for _ in 0..num_records {
            let deleted = bor.read_u8()? == 0x2A;
            let mut rec: Vec<FieldData> = Vec::with_capacity(self.attributes.fields.len());
            for field in &self.attributes.fields {
                let s = bor.read_utf8(field.field_length as usize)?;
                rec.push(parse_field_value(field, s.replace(char::from(0), "").trim()));
            }
            self.attributes.add_record(rec, deleted);
        }
        Ok(())
    }

    pub fn write(&mut self) -> Result<(), Error> {
        if self.file_mode == "r" {
            return Err(Error::new(
                ErrorKind::Other,
                "The file was opened in read-only mode.",
            ));
        }
        self.num_records = self.records.len(); // make sure they are the same.

        if self.attributes.get_num_fields() == 0 {
            // dBase needs at least one field
            self.attributes
                .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
            for i in 0..self.num_records {
                self.attributes.add_record(vec![FieldData::Int(i as i32 + 1)], false);
            }
        }
        if self.attributes.get_num_records() != self.num_records {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "The attribute table has {} records but there are {} geometries.",
                    self.attributes.get_num_records(),
                    self.num_records
                ),
            ));
        }

        self.calculate_extent();
        self.write_shp()?;
        self.write_shx()?;

        if !self.projection.is_empty() {
            let mut writer = BufWriter::new(File::create(sibling_file(&self.file_name, "prj"))?);
            writer.write_all(self.projection.as_bytes())?;
        }

        self.write_dbf()
    }

    fn write_file_header<W: Write>(
        &self,
        writer: &mut ByteOrderWriter<W>,
        file_length: i32,
    ) -> Result<(), Error> {
        writer.set_byte_order(Endianness::BigEndian);
        writer.write_i32(FILE_CODE)?;
        // unused header bytes
        for _ in 0..5 {
            writer.write_i32(0i32)?;
        }
        writer.write_i32(file_length)?;
        writer.set_byte_order(Endianness::LittleEndian);
        writer.write_i32(1000i32)?; // version
        writer.write_i32(self.header.shape_type.to_int())?;
        writer.write_f64(self.header.x_min)?;
        writer.write_f64(self.header.y_min)?;
        writer.write_f64(self.header.x_max)?;
        writer.write_f64(self.header.y_max)?;
        writer.write_f64(self.header.z_min)?;
        writer.write_f64(self.header.z_max)?;
        writer.write_f64(self.header.m_min)?;
        writer.write_f64(self.header.m_max)?;
        Ok(())
    }

    fn write_shp(&self) -> Result<(), Error> {
        let f = File::create(&self.file_name)?;
        let mut writer = ByteOrderWriter::new(BufWriter::new(f), Endianness::BigEndian);

        let mut size = HEADER_SIZE as i32;
        for rec in &self.records {
            size += 8 + rec.get_length();
        }
        self.write_file_header(&mut writer, size / 2i32)?;

        for (i, rec) in self.records.iter().enumerate() {
            writer.set_byte_order(Endianness::BigEndian);
            writer.write_i32(i as i32 + 1i32)?; // Record number
            writer.write_i32(rec.get_length() / 2)?; // Content length in 16-bit words
            writer.set_byte_order(Endianness::LittleEndian);
            write_record(&mut writer, rec)?;
        }
        writer.flush()
    }

    fn write_shx(&self) -> Result<(), Error> {
        let f = File::create(sibling_file(&self.file_name, "shx"))?;
        let mut writer = ByteOrderWriter::new(BufWriter::new(f), Endianness::BigEndian);
        let file_length = (HEADER_SIZE + 8 * self.num_records) as i32 / 2i32; // in 16-bit words
        self.write_file_header(&mut writer, file_length)?;

        writer.set_byte_order(Endianness::BigEndian);
        let mut pos = HEADER_SIZE as i32;
        for rec in &self.records {
            writer.write_i32(pos / 2)?; // offset
            writer.write_i32(rec.get_length() / 2)?; // Content length in 16-bit words
            pos += 8 + rec.get_length();
        }
        writer.flush()
    }

    fn write_dbf(&mut self) -> Result<(), Error> {
        let f = File::create(sibling_file(&self.file_name, "dbf"))?;
        let mut writer = ByteOrderWriter::new(BufWriter::new(f), Endianness::LittleEndian);

        self.attributes.header.version = 3;
        writer.write_u8(3u8)?;
        let now = Local::now();
        writer.write_u8((now.year() - 1900) as u8)?;
        writer.write_u8(now.month() as u8)?;
        writer.write_u8(now.day() as u8)?;

        writer.write_u32(self.attributes.get_num_records() as u32)?;
        let header_size = 32u16 + self.attributes.get_num_fields() as u16 * 32u16 + 1u16;
        self.attributes.header.bytes_in_header = header_size;
        writer.write_u16(header_size)?;

        let bytes_in_record: u16 = 1 + self
            .attributes
            .fields
            .iter()
            .map(|f| f.field_length as u16)
            .sum::<u16>();
        self.attributes.header.bytes_in_record = bytes_in_record;
        writer.write_u16(bytes_in_record)?;

        // reserved or unused bytes
        for _ in 0..20 {
            writer.write_u8(0u8)?;
        }

        // Field descriptor array
        for field in &self.attributes.fields {
            let mut name = field.name.as_bytes().to_vec();
            name.truncate(10);
            name.resize(11, 0u8);
            writer.write_bytes(&name)?;
            writer.write_u8(field.field_type as u8)?;
            for _ in 0..4 {
                writer.write_u8(0u8)?;
            }
            writer.write_u8(field.field_length)?;
            writer.write_u8(field.decimal_count)?;
            for _ in 0..14 {
                writer.write_u8(0u8)?;
            }
        }
        writer.write_u8(0x0D)?; // terminator byte

        let null = FieldData::Null;
        for i in 0..self.attributes.get_num_records() {
            writer.write_u8(if self.attributes.is_deleted(i) { 0x2A } else { 0x20 })?;
            let rec = self.attributes.get_record(i).cloned().unwrap_or_default();
            for (j, field) in self.attributes.fields.iter().enumerate() {
                let value = rec.get(j).unwrap_or(&null);
                writer.write_bytes(&format_field_value(field, value))?;
            }
        }

        writer.write_u8(0x1A)?; // file terminator byte
        writer.flush()
    }

    fn calculate_extent(&mut self) {
        let mut bb = BoundingBox::default();
        let (mut z_min, mut z_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut m_min, mut m_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for rec in &self.records {
            for p in &rec.points {
                bb.expand_to_point(p);
            }
            for z in &rec.z_array {
                z_min = z_min.min(*z);
                z_max = z_max.max(*z);
            }
            for m in &rec.m_array {
                m_min = m_min.min(*m);
                m_max = m_max.max(*m);
            }
        }
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0f64 };
        self.header.x_min = finite_or_zero(bb.min_x);
        self.header.y_min = finite_or_zero(bb.min_y);
        self.header.x_max = finite_or_zero(bb.max_x);
        self.header.y_max = finite_or_zero(bb.max_y);
        self.header.z_min = finite_or_zero(z_min);
        self.header.z_max = finite_or_zero(z_max);
        self.header.m_min = finite_or_zero(m_min);
        self.header.m_max = finite_or_zero(m_max);
    }
}

fn read_count<R: Read + Seek>(bor: &mut ByteOrderReader<R>) -> Result<i32, Error> {
    let v = bor.read_i32()?;
    if v < 0 || v > MAX_COUNT {
        return Err(invalid_data(format!("Implausible part or point count: {}", v)));
    }
    Ok(v)
}

fn read_record<R: Read + Seek>(
    bor: &mut ByteOrderReader<R>,
    start: usize,
    content_length: usize,
) -> Result<ShapefileGeometry, Error> {
    let shape_type = ShapeType::from_int(bor.read_i32()?)?;
    let mut sfg = ShapefileGeometry::new(shape_type);
    let base = shape_type.base_shape_type();
    if base == ShapeType::Null {
        return Ok(sfg);
    }

    if base == ShapeType::Point {
        let p = Point2D::new(bor.read_f64()?, bor.read_f64()?);
        sfg.add_point(p);
        match shape_type.dimension() {
            ShapeTypeDimension::Z => {
                let z = bor.read_f64()?;
                sfg.z_min = z;
                sfg.z_max = z;
                sfg.z_array.push(z);
                if bor.pos() - start < content_length {
                    sfg.m_array.push(bor.read_f64()?);
                }
            }
            ShapeTypeDimension::Measure => sfg.m_array.push(bor.read_f64()?),
            ShapeTypeDimension::XY => {}
        }
        return Ok(sfg);
    }

    sfg.x_min = bor.read_f64()?;
    sfg.y_min = bor.read_f64()?;
    sfg.x_max = bor.read_f64()?;
    sfg.y_max = bor.read_f64()?;
    if base != ShapeType::MultiPoint {
        sfg.num_parts = read_count(bor)?;
    }
    sfg.num_points = read_count(bor)?;
    for _ in 0..sfg.num_parts {
        sfg.parts.push(bor.read_i32()?);
    }
    for _ in 0..sfg.num_points {
        sfg.points.push(Point2D::new(bor.read_f64()?, bor.read_f64()?));
    }
    if sfg.parts.iter().any(|p| *p < 0 || *p > sfg.num_points) {
        return Err(invalid_data("Part index outside the point array.".to_string()));
    }

    let dim = shape_type.dimension();
    if dim == ShapeTypeDimension::Z {
        sfg.z_min = bor.read_f64()?;
        sfg.z_max = bor.read_f64()?;
        for _ in 0..sfg.num_points {
            sfg.z_array.push(bor.read_f64()?);
        }
    }
    // measures are optional in z records
    let has_m = dim == ShapeTypeDimension::Measure
        || (dim == ShapeTypeDimension::Z && bor.pos() - start < content_length);
    if has_m {
        sfg.m_min = bor.read_f64()?;
        sfg.m_max = bor.read_f64()?;
        for _ in 0..sfg.num_points {
            sfg.m_array.push(bor.read_f64()?);
        }
    }
    Ok(sfg)
}

fn write_record<W: Write>(
    writer: &mut ByteOrderWriter<W>,
    rec: &ShapefileGeometry,
) -> Result<(), Error> {
    writer.write_i32(rec.shape_type.to_int())?;
    let base = rec.shape_type.base_shape_type();
    if base == ShapeType::Null {
        return Ok(());
    }
    let dim = rec.shape_type.dimension();
    let first_or_zero = |v: &Vec<f64>| v.first().copied().unwrap_or(0f64);
    if base == ShapeType::Point {
        let p = rec.points.first().copied().unwrap_or_default();
        writer.write_f64(p.x)?;
        writer.write_f64(p.y)?;
        match dim {
            ShapeTypeDimension::Z => {
                writer.write_f64(first_or_zero(&rec.z_array))?;
                if rec.has_m_data() {
                    writer.write_f64(first_or_zero(&rec.m_array))?;
                }
            }
            ShapeTypeDimension::Measure => writer.write_f64(first_or_zero(&rec.m_array))?,
            ShapeTypeDimension::XY => {}
        }
        return Ok(());
    }

    // extent
    writer.write_f64(rec.x_min)?;
    writer.write_f64(rec.y_min)?;
    writer.write_f64(rec.x_max)?;
    writer.write_f64(rec.y_max)?;
    if base != ShapeType::MultiPoint {
        writer.write_i32(rec.num_parts)?;
    }
    writer.write_i32(rec.num_points)?;
    if base != ShapeType::MultiPoint {
        for part in &rec.parts {
            writer.write_i32(*part)?;
        }
    }
    for pt in &rec.points {
        writer.write_f64(pt.x)?;
        writer.write_f64(pt.y)?;
    }

    let write_range = |writer: &mut ByteOrderWriter<W>, min: f64, max: f64, values: &[f64]| {
        let (min, max) = if values.is_empty() { (0f64, 0f64) } else { (min, max) };
        writer.write_f64(min)?;
        writer.write_f64(max)?;
        for i in 0..rec.points.len() {
            writer.write_f64(values.get(i).copied().unwrap_or(0f64))?;
        }
        Ok::<(), Error>(())
    };
    if dim == ShapeTypeDimension::Z {
        write_range(&mut *writer, rec.z_min, rec.z_max, &rec.z_array)?;
    }
    if dim == ShapeTypeDimension::Measure || (dim == ShapeTypeDimension::Z && rec.has_m_data()) {
        write_range(&mut *writer, rec.m_min, rec.m_max, &rec.m_array)?;
    }
    Ok(())
}

fn parse_field_value(field: &AttributeField, s: &str) -> FieldData {
    if s.replace('?', "").is_empty() {
        return FieldData::Null;
    }
    match field.field_type {
        'N' | 'F' | 'I' | 'O' => {
            if field.decimal_count == 0 {
                match s.parse::<i32>() {
                    Ok(v) => FieldData::Int(v),
                    Err(_) => s.parse::<f64>().map(FieldData::Real).unwrap_or(FieldData::Null),
                }
            } else {
                s.parse::<f64>().map(FieldData::Real).unwrap_or(FieldData::Null)
            }
        }
        'D' => {
            if s.len() == 8 {
                FieldData::Date(DateData {
                    year: s[0..4].parse::<u16>().unwrap_or(0),
                    month: s[4..6].parse::<u8>().unwrap_or(0),
                    day: s[6..8].parse::<u8>().unwrap_or(0),
                })
            } else {
                FieldData::Null
            }
        }
        'L' => match s.to_uppercase().as_str() {
            "T" | "Y" => FieldData::Bool(true),
            "F" | "N" => FieldData::Bool(false),
            _ => FieldData::Null,
        },
        _ => FieldData::Text(s.to_string()),
    }
}

/// Renders a value into exactly `field_length` bytes. Numbers are right
/// aligned, text left aligned.
fn format_field_value(field: &AttributeField, value: &FieldData) -> Vec<u8> {
    let fl = field.field_length as usize;
    let (s, right_align) = match value {
        FieldData::Null => (String::new(), false),
        FieldData::Int(v) => (v.to_string(), true),
        FieldData::Real(v) => (format!("{:.*}", field.decimal_count as usize, v), true),
        FieldData::Bool(v) => ((if *v { "T" } else { "F" }).to_string(), false),
        FieldData::Date(v) => (v.to_string(), false),
        FieldData::Text(v) => (v.clone(), false),
    };
    let mut bytes = s.into_bytes();
    if bytes.len() > fl {
        if right_align {
            // a number that does not fit is flagged rather than cut
            return vec![b'*'; fl];
        }
        bytes.truncate(fl);
    }
    let padding = vec![b' '; fl - bytes.len()];
    if right_align {
        [padding, bytes].concat()
    } else {
        [bytes, padding].concat()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::ErrorKind;

    fn temp_file(name: &str) -> String {
        std::env::temp_dir()
            .join(name)
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn test_point_shapefile_round_trip() {
        let file_name = temp_file("trapline_vector_points_5d1e.shp");
        let mut output = Shapefile::new(&file_name, ShapeType::Point).unwrap();
        output.projection = "GEOGCS[\"GCS_WGS_1984\"]".to_string();
        output
            .attributes
            .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
        output
            .attributes
            .add_field(&AttributeField::new("LABEL", FieldDataType::Text, 20u8, 0u8));
        output
            .attributes
            .add_field(&AttributeField::new("LAT", FieldDataType::Real, 14u8, 8u8));
        output.add_point_record(174.5, -41.25).unwrap();
        output.attributes.add_record(
            vec![
                FieldData::Int(1),
                FieldData::Text("Site-L1-P1".to_string()),
                FieldData::Real(-41.25),
            ],
            false,
        );
        output.add_point_record(174.75, -41.5).unwrap();
        output.attributes.add_record(
            vec![
                FieldData::Int(2),
                FieldData::Text("Site-L1-P2".to_string()),
                FieldData::Null,
            ],
            false,
        );
        output.write().unwrap();

        let input = Shapefile::read(&file_name).unwrap();
        assert_eq!(input.header.shape_type, ShapeType::Point);
        assert_eq!(input.num_records, 2);
        assert_eq!(input.records[1].points[0], Point2D::new(174.75, -41.5));
        assert_eq!(input.header.x_min, 174.5);
        assert_eq!(input.header.y_min, -41.5);
        assert_eq!(input.projection, "GEOGCS[\"GCS_WGS_1984\"]");
        assert_eq!(input.attributes.get_num_fields(), 3);
        assert_eq!(
            input.attributes.get_value(0, "LABEL"),
            FieldData::Text("Site-L1-P1".to_string())
        );
        assert_eq!(input.attributes.get_value(0, "LAT"), FieldData::Real(-41.25));
        assert_eq!(input.attributes.get_value(1, "LAT"), FieldData::Null);
        assert_eq!(input.attributes.get_value(1, "FID"), FieldData::Int(2));
        assert_eq!(input.get_short_filename(), "trapline_vector_points_5d1e");
    }

    #[test]
    fn test_polygon_with_hole_round_trip() {
        let file_name = temp_file("trapline_vector_polygon_5d1e.shp");
        let mut output = Shapefile::new(&file_name, ShapeType::Polygon).unwrap();
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        sfg.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 100.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        sfg.add_part(&[
            Point2D::new(40.0, 40.0),
            Point2D::new(60.0, 40.0),
            Point2D::new(60.0, 60.0),
            Point2D::new(40.0, 60.0),
            Point2D::new(40.0, 40.0),
        ]);
        output.add_record(sfg).unwrap();
        // no fields given, so an FID column is supplied
        output.write().unwrap();

        let input = Shapefile::read(&file_name).unwrap();
        assert_eq!(input.num_records, 1);
        let rec = input.get_record(0).unwrap();
        assert_eq!(rec.num_parts, 2);
        assert_eq!(rec.get_part(1).len(), 5);
        assert_eq!(rec.get_part(1)[2], Point2D::new(60.0, 60.0));
        assert_eq!(input.attributes.get_value(0, "FID"), FieldData::Int(1));
        assert!(input.projection.is_empty());
    }

    #[test]
    fn test_polyline_z_round_trip() {
        let file_name = temp_file("trapline_vector_linez_5d1e.shp");
        let mut output = Shapefile::new(&file_name, ShapeType::PolyLineZ).unwrap();
        let mut sfg = ShapefileGeometry::new(ShapeType::PolyLineZ);
        sfg.add_partz(
            &[Point2D::new(1.0, 2.0), Point2D::new(3.0, 4.0)],
            &[10.0, 12.5],
        );
        output.add_record(sfg).unwrap();
        output.write().unwrap();

        let input = Shapefile::read(&file_name).unwrap();
        let rec = input.get_record(0).unwrap();
        assert_eq!(rec.shape_type, ShapeType::PolyLineZ);
        assert_eq!(rec.z_array, vec![10.0, 12.5]);
        assert!(rec.m_array.is_empty());
        assert_eq!(input.header.z_max, 12.5);
    }

    #[test]
    fn test_empty_shapefile_is_valid() {
        let file_name = temp_file("trapline_vector_empty_5d1e.shp");
        let mut output = Shapefile::new(&file_name, ShapeType::Point).unwrap();
        output
            .attributes
            .add_field(&AttributeField::new("SITE", FieldDataType::Text, 20u8, 0u8));
        output.write().unwrap();
        let input = Shapefile::read(&file_name).unwrap();
        assert_eq!(input.num_records, 0);
        assert_eq!(input.header.shape_type, ShapeType::Point);
        assert_eq!(input.attributes.get_num_fields(), 1);
    }

    #[test]
    fn test_wrong_record_type_rejected() {
        let mut output = Shapefile::new("unused", ShapeType::Point).unwrap();
        assert_eq!(output.file_name, "unused.shp");
        let sfg = ShapefileGeometry::new(ShapeType::PolyLine);
        let err = output.add_record(sfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_corrupt_files() {
        let short = temp_file("trapline_vector_short_5d1e.shp");
        fs::write(&short, [0u8; 40]).unwrap();
        assert_eq!(
            Shapefile::read(&short).err().map(|e| e.kind()),
            Some(ErrorKind::UnexpectedEof)
        );

        let bad_code = temp_file("trapline_vector_badcode_5d1e.shp");
        fs::write(&bad_code, [1u8; 120]).unwrap();
        assert_eq!(
            Shapefile::read(&bad_code).err().map(|e| e.kind()),
            Some(ErrorKind::InvalidData)
        );

        // a valid file cut off part way through its first record
        let file_name = temp_file("trapline_vector_truncated_5d1e.shp");
        let mut output = Shapefile::new(&file_name, ShapeType::Point).unwrap();
        output.add_point_record(1.0, 2.0).unwrap();
        output.write().unwrap();
        let bytes = fs::read(&file_name).unwrap();
        fs::write(&file_name, &bytes[..bytes.len() - 6]).unwrap();
        assert_eq!(
            Shapefile::read(&file_name).err().map(|e| e.kind()),
            Some(ErrorKind::UnexpectedEof)
        );
    }

    #[test]
    fn test_number_formatting() {
        let real = AttributeField::new("LON", FieldDataType::Real, 14u8, 8u8);
        assert_eq!(
            format_field_value(&real, &FieldData::Real(174.123456789)),
            b"  174.12345679".to_vec()
        );
        let int = AttributeField::new("N", FieldDataType::Int, 3u8, 0u8);
        assert_eq!(format_field_value(&int, &FieldData::Int(12345)), b"***".to_vec());
        assert_eq!(format_field_value(&int, &FieldData::Int(7)), b"  7".to_vec());
    }
}
