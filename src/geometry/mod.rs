//! Value types of the plane: vectors, validated fractions, infinite lines
//! and directed segments.

mod fraction;
mod line;
mod segment;
mod vector;

pub use fraction::Fraction;
pub use line::Line;
pub use segment::LineSegment;
pub use vector::{Vector2D, vector};
