/*
This code is part of the TraplineTools field-deployment library.
Authors: Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
// private sub-module defined in other files
mod ellipsoid;
mod transverse_mercator;
mod wkt;

// exports identifiers from private sub-modules in the current module namespace
pub use self::ellipsoid::Ellipsoid;
pub use self::transverse_mercator::TransverseMercator;
pub use self::wkt::{esri_wkt_from_epsg, is_geographic_wkt, is_nztm_wkt, is_projected_wkt};
