use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::BoidError;
use crate::float;

/// A 3D vector of reals used for positions and velocities.
///
/// The type is `Copy` and every operator returns a new value. The `*Assign`
/// operators are the accumulating form used while scanning the flock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean norm, `sqrt(self · self)`.
    pub fn magnitude(&self) -> f64 {
        float::sqrt(self.dot(self))
    }

    pub fn distance(&self, other: &Vector3D) -> f64 {
        (*self - *other).magnitude()
    }

    /// Elementwise product.
    pub fn component_mul(&self, other: &Vector3D) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Elementwise quotient.
    pub fn component_div(&self, other: &Vector3D) -> Self {
        Self {
            x: self.x / other.x,
            y: self.y / other.y,
            z: self.z / other.z,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Spherical coordinates `(r, theta, phi)` in the physics convention:
    /// `theta` is the polar angle from +z in `[0, pi]`, `phi` the azimuth
    /// from +x in `(-pi, pi]`.
    ///
    /// The zero vector maps to `(0, 0, 0)`.
    pub fn to_spherical(&self) -> (f64, f64, f64) {
        let r = self.magnitude();
        if r == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let theta = float::acos((self.z / r).clamp(-1.0, 1.0));
        let phi = float::atan2(self.y, self.x);
        (r, theta, phi)
    }

    /// Cylindrical coordinates `(s, phi, z)`: radial distance from the z
    /// axis, azimuth from +x, and height.
    pub fn to_cylindrical(&self) -> (f64, f64, f64) {
        let s = float::sqrt(self.x * self.x + self.y * self.y);
        let phi = float::atan2(self.y, self.x);
        (s, phi, self.z)
    }

    pub fn from_spherical(r: f64, theta: f64, phi: f64) -> Self {
        let (sin_theta, cos_theta) = float::sin_cos(theta);
        let (sin_phi, cos_phi) = float::sin_cos(phi);
        Self {
            x: r * sin_theta * cos_phi,
            y: r * sin_theta * sin_phi,
            z: r * cos_theta,
        }
    }

    pub fn from_cylindrical(s: f64, phi: f64, z: f64) -> Self {
        let (sin_phi, cos_phi) = float::sin_cos(phi);
        Self {
            x: s * cos_phi,
            y: s * sin_phi,
            z,
        }
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Vector3D {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(v: Vector3D) -> Self {
        v.to_array()
    }
}

impl TryFrom<&[f64]> for Vector3D {
    type Error = BoidError;

    fn try_from(data: &[f64]) -> Result<Self, Self::Error> {
        match *data {
            [x, y, z] => Ok(Self { x, y, z }),
            _ => Err(BoidError::DimensionMismatch {
                expected: 3,
                found: data.len(),
            }),
        }
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Add<f64> for Vector3D {
    type Output = Self;

    fn add(self, scalar: f64) -> Self {
        Self {
            x: self.x + scalar,
            y: self.y + scalar,
            z: self.z + scalar,
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Sub<f64> for Vector3D {
    type Output = Self;

    fn sub(self, scalar: f64) -> Self {
        Self {
            x: self.x - scalar,
            y: self.y - scalar,
            z: self.z - scalar,
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, v: Vector3D) -> Vector3D {
        v * self
    }
}

impl Div<f64> for Vector3D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl SubAssign for Vector3D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl MulAssign<f64> for Vector3D {
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
    }
}

impl DivAssign<f64> for Vector3D {
    fn div_assign(&mut self, scalar: f64) {
        self.x /= scalar;
        self.y /= scalar;
        self.z /= scalar;
    }
}
