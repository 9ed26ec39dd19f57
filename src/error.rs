//! Fault types for geometry queries and anchor construction.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Precondition violations raised by the geometry core.
///
/// None of these are recoverable inside the core: callers are expected to
/// validate fractions up front and avoid intersecting lines that never meet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Fraction must be between 0 and 1 (got {0})")]
    FractionOutOfRange(f64),

    #[error("Cannot get {axis} coordinate from {kind} line")]
    UndefinedCoordinate {
        axis: &'static str,
        kind: &'static str,
    },

    #[error("Cannot intersect parallel lines")]
    ParallelLines,

    #[error("Cannot create line with single point")]
    DegenerateLine,

    #[error("Cannot pick the nearest anchor from an empty set")]
    EmptyAnchorSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_message_mentions_range() {
        let err = GeometryError::FractionOutOfRange(1.01);
        assert!(err.to_string().contains("Fraction must be between 0 and 1"));
        assert!(err.to_string().contains("1.01"));
    }

    #[test]
    fn undefined_coordinate_names_axis_and_kind() {
        let err = GeometryError::UndefinedCoordinate {
            axis: "x",
            kind: "horizontal",
        };
        assert_eq!(
            err.to_string(),
            "Cannot get x coordinate from horizontal line"
        );
    }
}
