// private sub-module defined in other files
mod bounding_box;
mod line_segment;
mod point2d;
mod polygon;
mod ring;

// exports identifiers from private sub-modules in the current module namespace
pub use self::bounding_box::BoundingBox;
pub use self::line_segment::LineSegment;
pub use self::point2d::{Point2D, RoundedKey};
pub use self::polygon::{MultiPolygon, Polygon};
pub use self::ring::Ring;
