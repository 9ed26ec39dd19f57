use crate::error::{GeometryError, Result};
use crate::geometry::{Fraction, Line, Vector2D};

use super::boxes::{DiagramBox, Edge};

/// Strategy for choosing where a connector touches a box.
///
/// Anchors are plain values: they are not tied to a box and are resolved
/// against whichever box and target point they are given.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Where the line from the box center towards the target crosses the
    /// box outline.
    Nearest,
    /// A fixed point along one edge, independent of the target.
    Fixed { edge: Edge, fraction: Fraction },
    /// Whichever candidate lands closest to the [`Anchor::Nearest`] point.
    /// Ties go to the earliest candidate.
    NearestOf(Vec<Anchor>),
}

impl Anchor {
    pub fn nearest() -> Self {
        Self::Nearest
    }

    pub fn point_at_edge(edge: Edge, fraction: f64) -> Result<Self> {
        Ok(Self::Fixed {
            edge,
            fraction: Fraction::new(fraction)?,
        })
    }

    pub fn nearest_from(anchors: Vec<Anchor>) -> Result<Self> {
        if anchors.is_empty() {
            return Err(GeometryError::EmptyAnchorSet);
        }
        Ok(Self::NearestOf(anchors))
    }

    /// The point other anchors aim at when resolving against this one.
    pub fn reference_point_for(&self, target_box: &DiagramBox) -> Vector2D {
        match self {
            Self::Nearest | Self::NearestOf(_) => target_box.center(),
            Self::Fixed { edge, fraction } => target_box.point_at_edge_fraction(*edge, *fraction),
        }
    }

    pub fn point_from_to(&self, target_box: &DiagramBox, target_point: Vector2D) -> Result<Vector2D> {
        match self {
            Self::Nearest => {
                let towards_target = Line::between(target_box.center(), target_point)?;
                let heading = target_box.edge_heading(target_point)?;
                target_box
                    .edge_line(heading)
                    .intersection_with(&towards_target)
            }
            Self::Fixed { edge, fraction } => {
                Ok(target_box.point_at_edge_fraction(*edge, *fraction))
            }
            Self::NearestOf(anchors) => {
                let reference = Self::Nearest.point_from_to(target_box, target_point)?;
                let mut best: Option<(Vector2D, f64)> = None;
                for anchor in anchors {
                    let candidate = anchor.point_from_to(target_box, target_point)?;
                    let distance = candidate.distance_to(reference);
                    if best.is_none_or(|(_, closest)| distance < closest) {
                        best = Some((candidate, distance));
                    }
                }
                best.map(|(point, _)| point)
                    .ok_or(GeometryError::EmptyAnchorSet)
            }
        }
    }
}
