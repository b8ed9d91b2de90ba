/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
// private sub-module defined in other files
mod fishnet;
mod line_clip;
mod line_ops;
mod poly_ops;
mod rotation;

// exports identifiers from private sub-modules in the current module namespace
pub use self::fishnet::{fishnet_columns, fishnet_lines};
pub use self::line_clip::clip_line_to_polygon;
pub use self::line_ops::{point_line_distance, points_along_line, simplify_rdp};
pub use self::poly_ops::{
    is_hole_ring, point_in_features, point_in_poly, point_in_rings, polygon_area,
    polygon_centroid, union_centroid, winding_number,
};
pub use self::rotation::rotate_points;
