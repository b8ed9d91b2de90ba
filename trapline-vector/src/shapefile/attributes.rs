/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT

NOTE: Structures for the attribute table held in a shapefile's .dbf file.
*/
use std::fmt;

#[derive(Debug, Default, Clone)]
pub struct AttributeHeader {
    pub version: u8,
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub num_records: u32,
    pub num_fields: u32, // not actually stored in file but derived
    pub bytes_in_header: u16,
    pub bytes_in_record: u16,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DateData {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for DateData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Int(i32),
    Real(f64),
    Text(String),
    Date(DateData),
    Bool(bool),
    Null,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FieldDataType {
    Int,
    Real,
    Text,
    Date,
    Bool,
}

impl FieldDataType {
    /// The dBase type code for the field.
    pub fn to_char(&self) -> char {
        match self {
            FieldDataType::Int | FieldDataType::Real => 'N',
            FieldDataType::Text => 'C',
            FieldDataType::Date => 'D',
            FieldDataType::Bool => 'L',
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeField {
    pub name: String,
    pub field_type: char,
    pub field_length: u8,
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new(
        name: &str,
        field_type: FieldDataType,
        field_length: u8,
        decimal_count: u8,
    ) -> AttributeField {
        let decimal_count = if field_type == FieldDataType::Real {
            decimal_count
        } else {
            0u8
        };
        AttributeField {
            name: name.to_string(),
            field_type: field_type.to_char(),
            field_length: field_length,
            decimal_count: decimal_count,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ShapefileAttributes {
    pub header: AttributeHeader,
    pub fields: Vec<AttributeField>,
    data: Vec<Vec<FieldData>>,
    is_deleted: Vec<bool>,
}

impl ShapefileAttributes {
    pub fn add_field(&mut self, field: &AttributeField) {
        self.fields.push(field.clone());
        self.header.num_fields = self.fields.len() as u32;
        // existing records get a null value for the new field
        for rec in self.data.iter_mut() {
            rec.push(FieldData::Null);
        }
    }

    pub fn get_num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn get_field(&self, index: usize) -> Option<&AttributeField> {
        self.fields.get(index)
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn add_record(&mut self, rec: Vec<FieldData>, deleted: bool) {
        self.data.push(rec);
        self.is_deleted.push(deleted);
        self.header.num_records = self.data.len() as u32;
    }

    pub fn get_num_records(&self) -> usize {
        self.data.len()
    }

    pub fn get_record(&self, index: usize) -> Option<&Vec<FieldData>> {
        self.data.get(index)
    }

    pub fn get_value(&self, record_index: usize, field_name: &str) -> FieldData {
        match (self.get_field_num(field_name), self.data.get(record_index)) {
            (Some(j), Some(rec)) => rec.get(j).cloned().unwrap_or(FieldData::Null),
            _ => FieldData::Null,
        }
    }

    pub fn is_deleted(&self, index: usize) -> bool {
        self.is_deleted.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use super::{AttributeField, FieldData, FieldDataType, ShapefileAttributes};

    #[test]
    fn test_add_fields_and_records() {
        let mut atts = ShapefileAttributes::default();
        atts.add_field(&AttributeField::new("FID", FieldDataType::Int, 6u8, 0u8));
        atts.add_record(vec![FieldData::Int(1)], false);
        atts.add_field(&AttributeField::new("LAT", FieldDataType::Real, 14u8, 8u8));
        assert_eq!(atts.get_num_fields(), 2);
        assert_eq!(atts.header.num_records, 1);
        // the earlier record was padded for the new field
        assert_eq!(atts.get_value(0, "LAT"), FieldData::Null);
        assert_eq!(atts.get_value(0, "FID"), FieldData::Int(1));
        assert_eq!(atts.get_field(1).unwrap().field_type, 'N');
        assert_eq!(atts.get_field(1).unwrap().decimal_count, 8);
        assert!(!atts.is_deleted(0));
    }

    #[test]
    fn test_text_fields_have_no_decimals() {
        let f = AttributeField::new("LABEL", FieldDataType::Text, 40u8, 4u8);
        assert_eq!(f.field_type, 'C');
        assert_eq!(f.decimal_count, 0);
    }
}
