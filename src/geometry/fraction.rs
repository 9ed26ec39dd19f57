use std::fmt;

use crate::error::{GeometryError, Result};

/// A float in the closed interval `[0, 1]`, checked once at construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fraction(f64);

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const HALF: Fraction = Fraction(0.5);
    pub const ONE: Fraction = Fraction(1.0);

    pub fn new(value: f64) -> Result<Self> {
        // NaN fails both comparisons, so reject it explicitly.
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(GeometryError::FractionOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// For constants already known to lie in range.
    pub(crate) const fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Fraction {
    type Error = GeometryError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Fraction> for f64 {
    fn from(fraction: Fraction) -> f64 {
        fraction.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
