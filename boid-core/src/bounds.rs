use core::fmt;

use crate::error::BoidError;
use crate::vector::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned box the flock lives in.
///
/// `x` runs from `left` to `right`, `y` from `top` to `bottom` (screen
/// orientation) and `z` from `back` to `front`. Boids are never allowed
/// below the depth floor, which sits halfway between `back` and `front`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    back: f64,
    front: f64,
}

impl Bounds {
    /// Fraction of the depth below which boids are pushed back up.
    pub const DEPTH_FLOOR_RATIO: f64 = 0.5;

    /// Builds bounds from `(left, right)`, `(top, bottom)`, `(back, front)`.
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Result<Self, BoidError> {
        let values = [x.0, x.1, y.0, y.1, z.0, z.1];
        if !values.iter().all(|v| v.is_finite()) {
            return Err(BoidError::NonFiniteBounds);
        }

        for (axis, (low, high)) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
            if low >= high {
                return Err(BoidError::InvertedBounds { axis, low, high });
            }
        }

        Ok(Self {
            left: x.0,
            right: x.1,
            top: y.0,
            bottom: y.1,
            back: z.0,
            front: z.1,
        })
    }

    /// A cube centred on the origin.
    pub fn cube(half_extent: f64) -> Result<Self, BoidError> {
        let range = (-half_extent, half_extent);
        Self::new(range, range, range)
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn back(&self) -> f64 {
        self.back
    }

    pub fn front(&self) -> f64 {
        self.front
    }

    pub fn range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.left, self.right),
            Axis::Y => (self.top, self.bottom),
            Axis::Z => (self.back, self.front),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn depth(&self) -> f64 {
        self.front - self.back
    }

    pub fn depth_floor(&self) -> f64 {
        self.back + self.depth() * Self::DEPTH_FLOOR_RATIO
    }

    /// Clamps a position into the box, with `z` floored at [`Self::depth_floor`].
    pub fn clamp(&self, position: Vector3D) -> Vector3D {
        Vector3D::new(
            position.x.clamp(self.left, self.right),
            position.y.clamp(self.top, self.bottom),
            position.z.clamp(self.depth_floor(), self.front),
        )
    }

    /// Where `z` sits between `back` (0) and `front` (1), clamped to that
    /// range. Renderers use it as opacity.
    pub fn depth_fraction(&self, z: f64) -> f64 {
        ((z - self.back) / self.depth()).clamp(0.0, 1.0)
    }

    /// True if `position` is a fixed point of [`Self::clamp`].
    pub fn contains(&self, position: &Vector3D) -> bool {
        (self.left..=self.right).contains(&position.x)
            && (self.top..=self.bottom).contains(&position.y)
            && (self.depth_floor()..=self.front).contains(&position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_dimensions() {
        let bounds = Bounds::new((0.0, 1000.0), (0.0, 800.0), (0.0, 255.0)).unwrap();
        assert_eq!(bounds.width(), 1000.0);
        assert_eq!(bounds.height(), 800.0);
        assert_eq!(bounds.depth(), 255.0);
        assert_eq!(bounds.depth_floor(), 127.5);
        assert_eq!(bounds.range(Axis::Y), (0.0, 800.0));
    }

    #[test]
    fn test_bounds_reject_inverted_axis() {
        let err = Bounds::new((10.0, 0.0), (0.0, 1.0), (0.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            BoidError::InvertedBounds {
                axis: Axis::X,
                low: 10.0,
                high: 0.0
            }
        );

        // Zero-volume boxes are rejected too.
        let err = Bounds::new((0.0, 1.0), (0.0, 1.0), (5.0, 5.0)).unwrap_err();
        assert!(matches!(err, BoidError::InvertedBounds { axis: Axis::Z, .. }));
    }

    #[test]
    fn test_bounds_reject_non_finite() {
        assert_eq!(
            Bounds::new((0.0, f64::INFINITY), (0.0, 1.0), (0.0, 1.0)),
            Err(BoidError::NonFiniteBounds)
        );
        assert_eq!(
            Bounds::new((0.0, 1.0), (f64::NAN, 1.0), (0.0, 1.0)),
            Err(BoidError::NonFiniteBounds)
        );
    }

    #[test]
    fn test_depth_fraction_is_relative_to_back() {
        let bounds = Bounds::new((0.0, 10.0), (0.0, 10.0), (100.0, 300.0)).unwrap();
        assert_eq!(bounds.depth_fraction(100.0), 0.0);
        assert_eq!(bounds.depth_fraction(200.0), 0.5);
        assert_eq!(bounds.depth_fraction(300.0), 1.0);
        assert_eq!(bounds.depth_fraction(400.0), 1.0);

        let screen = Bounds::new((0.0, 1000.0), (0.0, 800.0), (0.0, 255.0)).unwrap();
        assert_eq!(screen.depth_fraction(127.5), 0.5);
    }

    #[test]
    fn test_clamp_uses_depth_floor() {
        let bounds = Bounds::cube(100.0).unwrap();
        let clamped = bounds.clamp(Vector3D::new(-150.0, 150.0, -50.0));
        assert_eq!(clamped, Vector3D::new(-100.0, 100.0, 0.0));
        assert!(bounds.contains(&clamped));
        assert!(!bounds.contains(&Vector3D::new(0.0, 0.0, -1.0)));
    }
}
