/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
pub mod shapefile;

pub use crate::shapefile::attributes::{
    AttributeField, DateData, FieldData, FieldDataType, ShapefileAttributes,
};
pub use crate::shapefile::geometry::{ShapeType, ShapeTypeDimension, ShapefileGeometry};
pub use crate::shapefile::Shapefile;
