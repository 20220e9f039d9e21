use core::fmt;

use crate::bounds::Axis;

/// Errors raised by the flocking core.
///
/// None of these are recoverable mid-simulation: they signal a contract
/// violation by the caller (bad input data, bad configuration, or a boid
/// that was allowed to reach zero velocity).
#[derive(Debug, Clone, PartialEq)]
pub enum BoidError {
    /// A vector was built from a slice of the wrong length.
    DimensionMismatch { expected: usize, found: usize },
    /// Speed clamping hit a zero (or non-finite) velocity.
    ZeroVelocity,
    /// A bound was NaN or infinite.
    NonFiniteBounds,
    /// An axis range is empty or inverted.
    InvertedBounds { axis: Axis, low: f64, high: f64 },
    /// A steering constant is out of range.
    InvalidConfig(&'static str),
    /// A fixed-capacity flock has no room left.
    FlockFull { capacity: usize },
    /// A boid added to a flock clamps to different bounds than the flock.
    BoundsMismatch { index: usize },
}

impl fmt::Display for BoidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoidError::DimensionMismatch { expected, found } => write!(
                f,
                "incompatible vector dimensions: expected {}, got {}",
                expected, found
            ),
            BoidError::ZeroVelocity => write!(f, "cannot constrain speed of a zero velocity"),
            BoidError::NonFiniteBounds => write!(f, "bounds must be finite"),
            BoidError::InvertedBounds { axis, low, high } => write!(
                f,
                "{} bounds must satisfy low < high (got {} .. {})",
                axis, low, high
            ),
            BoidError::InvalidConfig(reason) => write!(f, "invalid boid configuration: {}", reason),
            BoidError::FlockFull { capacity } => {
                write!(f, "flock is full (capacity {})", capacity)
            }
            BoidError::BoundsMismatch { index } => {
                write!(f, "boid {} does not share the flock bounds", index)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoidError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = BoidError::DimensionMismatch {
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "incompatible vector dimensions: expected 3, got 2"
        );

        let err = BoidError::InvertedBounds {
            axis: Axis::Y,
            low: 5.0,
            high: 1.0,
        };
        assert_eq!(err.to_string(), "y bounds must satisfy low < high (got 5 .. 1)");

        let err = BoidError::BoundsMismatch { index: 2 };
        assert_eq!(err.to_string(), "boid 2 does not share the flock bounds");
    }
}
