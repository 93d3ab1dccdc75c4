//! Scalar trait, matrix aliases and operator thresholds.
//!
//! Points and tangent vectors are plain `nalgebra` matrices; the aliases only
//! say which role a matrix plays in a signature.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Floating-point type a descriptor computes in (`f32` or `f64`).
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon.
    const EPSILON: Self;

    /// Converts an `f64` literal into this type.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable, which cannot happen for
    /// `f32` and `f64`.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("f64 is representable in every Scalar")
    }

    /// Widens to `f64` for logging and hashing.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be cast, which cannot happen for `f32`
    /// and `f64`.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("every Scalar widens to f64")
    }

    /// Converts a count (e.g. a sweep index) into this type.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("usize is representable in every Scalar")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
}

/// Dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Dynamically-sized column vector.
pub type DVector<T> = OVector<T, Dyn>;

/// A point on a matrix manifold.
pub type Point<T> = DMatrix<T>;

/// A tangent vector, always interpreted relative to a base point.
pub type TangentVector<T> = DMatrix<T>;

/// Flat encoding of a tangent vector produced by `vectorize`.
pub type FlatTangent<T> = DVector<T>;

/// Row/column shape of a matrix representation.
pub type Shape = (usize, usize);

/// Formats a shape the way error messages report it (`"3x1"`).
pub fn format_shape(shape: Shape) -> String {
    format!("{}x{}", shape.0, shape.1)
}

/// Thresholds the sphere operators branch on.
pub mod constants {
    use super::Scalar;

    /// Step norm above which the sphere exponential uses its closed form.
    ///
    /// Below it `sin(r)/r` equals 1 in double precision and the map falls
    /// back to normalizing `x + v`.
    pub const EXP_SMALL_STEP_THRESHOLD: f64 = 4.5e-8;

    /// Geodesic distance above which the sphere logarithm rescales the
    /// projected difference to the exact distance.
    pub const LOG_CORRECTION_THRESHOLD: f64 = 1e-6;

    /// Prefix tag of identity hashes produced by the sphere family.
    pub const SPHERE_HASH_TAG: &str = "z";

    /// [`EXP_SMALL_STEP_THRESHOLD`] in the requested precision.
    pub fn exp_small_step_threshold<T: Scalar>() -> T {
        <T as Scalar>::from_f64(EXP_SMALL_STEP_THRESHOLD)
    }

    /// [`LOG_CORRECTION_THRESHOLD`] in the requested precision.
    pub fn log_correction_threshold<T: Scalar>() -> T {
        <T as Scalar>::from_f64(LOG_CORRECTION_THRESHOLD)
    }

    /// π in the requested precision.
    pub fn pi<T: Scalar>() -> T {
        <T as Scalar>::from_f64(std::f64::consts::PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_epsilon_matches_std() {
        assert_eq!(<f32 as Scalar>::EPSILON, f32::EPSILON);
        assert_eq!(<f64 as Scalar>::EPSILON, f64::EPSILON);
    }

    #[test]
    fn test_scalar_conversions() {
        let narrowed = <f32 as Scalar>::from_f64(0.1);
        assert_relative_eq!(Scalar::to_f64(narrowed), 0.1, epsilon = 1e-8);
        assert_eq!(<f64 as Scalar>::from_usize(7), 7.0);
    }

    #[test]
    fn test_flat_tangent_length() {
        let p: Point<f64> = DMatrix::zeros(3, 4);
        let flat: FlatTangent<f64> = DVector::zeros(p.len());
        assert_eq!(flat.len(), 12);
        assert_eq!(format_shape(p.shape()), "3x4");
    }

    #[test]
    fn test_threshold_constants() {
        assert_relative_eq!(constants::exp_small_step_threshold::<f64>(), 4.5e-8);
        assert_relative_eq!(constants::log_correction_threshold::<f32>(), 1e-6);
        assert_relative_eq!(constants::pi::<f32>(), std::f32::consts::PI, epsilon = 1e-6);
    }
}
