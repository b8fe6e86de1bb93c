//! Three-component real vector.
//!
//! `Vec3` is a thin value type over `nalgebra::Vector3<f64>`. All operators
//! return fresh values and never mutate their operands (the compound
//! assignment operators excepted).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Vec3(Vector3<f64>);

impl Vec3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    #[inline]
    pub fn dot(&self, other: &Vec3) -> f64 {
        self.0.dot(&other.0)
    }

    #[inline]
    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Self(self.0.cross(&other.0))
    }

    /// Euclidean length.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// Squared length, no square root.
    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    /// Unit vector in the same direction. The zero vector normalizes to zero.
    pub fn normalized(&self) -> Vec3 {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Vec3::zero();
        }
        *self * (1.0 / mag)
    }

    #[inline]
    pub fn distance_to(&self, other: &Vec3) -> f64 {
        (*self - *other).magnitude()
    }

    /// Division that reports a zero divisor instead of returning `self`.
    #[inline]
    pub fn checked_div(self, scalar: f64) -> Option<Vec3> {
        if scalar == 0.0 {
            None
        } else {
            Some(Self(self.0 / scalar))
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl From<Vector3<f64>> for Vec3 {
    fn from(v: Vector3<f64>) -> Self {
        Self(v)
    }
}

impl From<Vec3> for Vector3<f64> {
    fn from(v: Vec3) -> Self {
        v.0
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x(), v.y(), v.z()]
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Self(-self.0)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, scalar: f64) -> Vec3 {
        Self(self.0 * scalar)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

/// Dividing by exactly zero yields the dividend unchanged.
///
/// Callers must treat that result as a sentinel; use [`Vec3::checked_div`]
/// to detect it.
impl Div<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn div(self, scalar: f64) -> Vec3 {
        self.checked_div(scalar).unwrap_or(self)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.0 -= rhs.0;
    }
}

impl Sum for Vec3 {
    fn sum<I: Iterator<Item = Vec3>>(iter: I) -> Vec3 {
        iter.fold(Vec3::zero(), Add::add)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}
