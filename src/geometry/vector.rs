use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Immutable 2-D value used both for positions and for displacements.
///
/// Equality is exact per coordinate; there is no epsilon anywhere in the
/// core, so `(0.1 + 0.2, 0.0) != (0.3, 0.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

pub const fn vector(x: f64, y: f64) -> Vector2D {
    Vector2D { x, y }
}

impl Vector2D {
    pub const ZERO: Vector2D = vector(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement that takes `self` to `other`.
    pub fn delta_to_reach(self, other: Vector2D) -> Vector2D {
        other - self
    }

    pub fn distance_to(self, other: Vector2D) -> f64 {
        (self - other).magnitude()
    }

    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector with the same direction. The zero vector has no direction
    /// and yields NaN components.
    pub fn normalized(self) -> Vector2D {
        let magnitude = self.magnitude();
        self.map(|coordinate| coordinate / magnitude)
    }

    pub fn dot(self, other: Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn component_mul(self, other: Vector2D) -> Vector2D {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn min(self, other: Vector2D) -> Vector2D {
        self.zip_with(other, f64::min)
    }

    pub fn max(self, other: Vector2D) -> Vector2D {
        self.zip_with(other, f64::max)
    }

    pub fn round(self) -> Vector2D {
        self.map(f64::round)
    }

    /// Per-axis sign: -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
    pub fn sign(self) -> Vector2D {
        self.map(|coordinate| {
            if coordinate > 0.0 {
                1.0
            } else if coordinate < 0.0 {
                -1.0
            } else {
                0.0
            }
        })
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn map(self, transform: impl Fn(f64) -> f64) -> Vector2D {
        vector(transform(self.x), transform(self.y))
    }

    fn zip_with(self, other: Vector2D, combine: impl Fn(f64, f64) -> f64) -> Vector2D {
        vector(combine(self.x, other.x), combine(self.y, other.y))
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, rhs: f64) -> Vector2D {
        self.map(|coordinate| coordinate * rhs)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;

    fn neg(self) -> Vector2D {
        self.map(|coordinate| -coordinate)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        vector(x, y)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
