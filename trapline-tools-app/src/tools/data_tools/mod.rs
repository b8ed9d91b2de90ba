// private sub-module defined in other files
mod reproject_nztm_to_wgs84;

// exports identifiers from private sub-modules in the current module namespace
pub use self::reproject_nztm_to_wgs84::ReprojectNztmToWgs84;
