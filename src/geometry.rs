//! Vector types in the shaft frame.
//!
//! Every shaft lies along the global X axis. Y and Z span the cross-section, so
//! loads along Y bend the shaft in the XY plane (moment about Z) and loads along Z
//! bend it in the XZ plane (moment about Y).

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Cartesian vector representing a three dimensional force in newtons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Force component acting along the shaft axis.
    pub x: f64,
    /// Force component acting along the global Y axis.
    pub y: f64,
    /// Force component acting along the global Z axis.
    pub z: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Magnitude of the component perpendicular to the shaft axis.
    #[must_use]
    pub fn radial(self) -> f64 {
        self.y.hypot(self.z)
    }

    /// Magnitude of the whole vector.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.to_vector().norm()
    }
}

impl From<Vector3<f64>> for Force {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Force> for Vector3<f64> {
    fn from(value: Force) -> Self {
        value.to_vector()
    }
}

/// Cartesian vector representing a moment in newton metres.
///
/// The X component is the torque about the shaft axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    /// Twisting component about the shaft axis.
    pub x: f64,
    /// Bending component about the global Y axis.
    pub y: f64,
    /// Bending component about the global Z axis.
    pub z: f64,
}

impl Moment {
    /// Create a [`Moment`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the moment into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Magnitude of the whole vector.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.to_vector().norm()
    }
}

impl From<Vector3<f64>> for Moment {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Moment> for Vector3<f64> {
    fn from(value: Moment) -> Self {
        value.to_vector()
    }
}

macro_rules! vector_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $ty {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
            }
        }

        impl Neg for $ty {
            type Output = Self;

            fn neg(self) -> Self {
                Self::new(-self.x, -self.y, -self.z)
            }
        }

        impl Mul<f64> for $ty {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
            }
        }
    };
}

vector_ops!(Force);
vector_ops!(Moment);

/// Unit vector in the shaft cross-section at `angle` radians from +Y towards +Z.
#[must_use]
pub fn radial_direction(angle: f64) -> Vector3<f64> {
    Vector3::new(0.0, angle.cos(), angle.sin())
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use gearx::force;
///
/// let load = force(0.0, -1_000.0, 0.0);
/// assert_eq!(load.y, -1_000.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64, z: f64) -> Force {
    Force::new(x, y, z)
}

/// Convenience helper for creating [`Moment`] instances.
///
/// # Examples
/// ```
/// use gearx::moment;
///
/// let torque = moment(150.0, 0.0, 0.0);
/// assert_eq!(torque.x, 150.0);
/// ```
#[must_use]
pub const fn moment(x: f64, y: f64, z: f64) -> Moment {
    Moment::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_to_vector_roundtrip() {
        let load = Force::new(1.0, 2.0, 3.0);
        let vector: Vector3<f64> = load.into();
        assert_eq!(vector, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Force::from(vector), load);
    }

    #[test]
    fn moment_defaults_to_zero() {
        assert_eq!(Moment::default(), Moment::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn radial_component_ignores_axial() {
        assert_eq!(force(100.0, 3.0, 4.0).radial(), 5.0);
    }

    #[test]
    fn radial_direction_is_in_cross_section() {
        let direction = radial_direction(std::f64::consts::FRAC_PI_2);
        assert_eq!(direction.x, 0.0);
        assert!(direction.y.abs() < 1.0e-15);
        assert!((direction.z - 1.0).abs() < 1.0e-15);
    }
}
