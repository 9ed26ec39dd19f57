use super::fraction::Fraction;
use super::vector::Vector2D;

/// Directed finite segment; `from` is fraction 0 and `to` is fraction 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Vector2D,
    pub to: Vector2D,
}

impl LineSegment {
    pub fn new(from: Vector2D, to: Vector2D) -> Self {
        Self { from, to }
    }

    pub fn point_at_fraction(&self, fraction: Fraction) -> Vector2D {
        (self.to - self.from) * fraction.value() + self.from
    }

    pub fn length(&self) -> f64 {
        self.from.distance_to(self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector;

    #[test]
    fn interpolates_from_start_to_end() {
        let segment = LineSegment::new(vector(2.0, 1.0), vector(6.0, 9.0));
        assert_eq!(segment.point_at_fraction(Fraction::ZERO), vector(2.0, 1.0));
        assert_eq!(segment.point_at_fraction(Fraction::ONE), vector(6.0, 9.0));
        assert_eq!(segment.point_at_fraction(Fraction::HALF), vector(4.0, 5.0));
        assert_eq!(
            segment.point_at_fraction(Fraction::new(0.25).unwrap()),
            vector(3.0, 3.0)
        );
    }

    #[test]
    fn direction_decides_meaning_of_fraction() {
        let forward = LineSegment::new(vector(0.0, 0.0), vector(10.0, 0.0));
        let backward = LineSegment::new(vector(10.0, 0.0), vector(0.0, 0.0));
        let fraction = Fraction::new(0.2).unwrap();
        assert_eq!(forward.point_at_fraction(fraction), vector(2.0, 0.0));
        assert_eq!(backward.point_at_fraction(fraction), vector(8.0, 0.0));
        assert_eq!(forward.length(), backward.length());
    }
}
