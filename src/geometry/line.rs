use crate::error::{GeometryError, Result};

use super::vector::{Vector2D, vector};

/// Infinite line in the plane.
///
/// Axis-aligned lines get their own variants so that coordinate queries
/// which have no single answer (`x_for` on a horizontal line, `y_for` on a
/// vertical one) fail instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line {
    /// Line through `p` with direction `(dx, dy)`; both components non-zero.
    Oblique { p: Vector2D, dx: f64, dy: f64 },
    Horizontal { y: f64 },
    Vertical { x: f64 },
}

impl Line {
    pub fn between(p1: Vector2D, p2: Vector2D) -> Result<Line> {
        if p1 == p2 {
            return Err(GeometryError::DegenerateLine);
        }
        if p1.x == p2.x {
            return Ok(Line::vertical(p1.x));
        }
        if p1.y == p2.y {
            return Ok(Line::horizontal(p1.y));
        }
        Ok(Line::Oblique {
            p: p1,
            dx: p2.x - p1.x,
            dy: p2.y - p1.y,
        })
    }

    pub fn horizontal(y: f64) -> Line {
        Line::Horizontal { y }
    }

    pub fn vertical(x: f64) -> Line {
        Line::Vertical { x }
    }

    /// Vertical lines report `+inf` so that two of them compare as parallel.
    pub fn slope(&self) -> f64 {
        match *self {
            Line::Oblique { dx, dy, .. } => dy / dx,
            Line::Horizontal { .. } => 0.0,
            Line::Vertical { .. } => f64::INFINITY,
        }
    }

    pub fn is_parallel_to(&self, other: &Line) -> bool {
        self.slope() == other.slope()
    }

    pub fn y_for(&self, x: f64) -> Result<f64> {
        match *self {
            Line::Oblique { p, dx, dy } => Ok(dy / dx * (x - p.x) + p.y),
            Line::Horizontal { y } => Ok(y),
            Line::Vertical { .. } => Err(GeometryError::UndefinedCoordinate {
                axis: "y",
                kind: "vertical",
            }),
        }
    }

    pub fn x_for(&self, y: f64) -> Result<f64> {
        match *self {
            Line::Oblique { p, dx, dy } => Ok((y - p.y) * dx / dy + p.x),
            Line::Vertical { x } => Ok(x),
            Line::Horizontal { .. } => Err(GeometryError::UndefinedCoordinate {
                axis: "x",
                kind: "horizontal",
            }),
        }
    }

    pub fn intersection_with(&self, other: &Line) -> Result<Vector2D> {
        if self.is_parallel_to(other) {
            return Err(GeometryError::ParallelLines);
        }

        match (self, other) {
            (Line::Horizontal { y }, line) | (line, Line::Horizontal { y }) => {
                Ok(vector(line.x_for(*y)?, *y))
            }
            (Line::Vertical { x }, line) | (line, Line::Vertical { x }) => {
                Ok(vector(*x, line.y_for(*x)?))
            }
            (Line::Oblique { p: p1, .. }, Line::Oblique { p: p2, .. }) => {
                let (s1, s2) = (self.slope(), other.slope());
                // Solve from the lower-slope line so swapping operands
                // yields bit-identical results.
                let ((pa, sa, a), (pb, sb)) = if s1 < s2 {
                    ((*p1, s1, self), (*p2, s2))
                } else {
                    ((*p2, s2, other), (*p1, s1))
                };
                let x = (sa * pa.x - sb * pb.x + pb.y - pa.y) / (sa - sb);
                Ok(vector(x, a.y_for(x)?))
            }
        }
    }
}
