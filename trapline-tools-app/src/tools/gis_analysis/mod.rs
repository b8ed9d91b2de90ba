// private sub-module defined in other files
mod clip_lines_to_polygon;
mod create_fishnet_lines;
mod generate_traplines;
mod points_along_lines;
mod rotate_vector;
mod simplify_lines;
mod traplines;

// exports identifiers from private sub-modules in the current module namespace
pub use self::clip_lines_to_polygon::ClipLinesToPolygon;
pub use self::create_fishnet_lines::CreateFishnetLines;
pub use self::generate_traplines::GenerateTraplines;
pub use self::points_along_lines::PointsAlongLines;
pub use self::rotate_vector::RotateVector;
pub use self::simplify_lines::SimplifyLines;
