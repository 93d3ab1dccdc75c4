//! Sampling and normalization helpers shared by the sphere family.

use nalgebra::DMatrix;
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use rgeom_core::{
    error::{ManifoldError, Result},
    types::Scalar,
};
use tracing::warn;

/// Draws a `rows`×`cols` matrix with i.i.d. standard-normal entries.
pub fn gaussian_matrix<T, R>(rows: usize, cols: usize, rng: &mut R) -> DMatrix<T>
where
    T: Scalar,
    R: Rng + ?Sized,
{
    DMatrix::from_fn(rows, cols, |_, _| {
        let val: f64 = StandardNormal.sample(&mut *rng);
        <T as Scalar>::from_f64(val)
    })
}

/// Scales `matrix` to unit Frobenius norm.
///
/// Fails instead of dividing when the norm is at or below `epsilon`, and
/// when the norm is not finite.
pub fn normalize_frobenius<T: Scalar>(
    matrix: DMatrix<T>,
    epsilon: T,
    operation: &str,
) -> Result<DMatrix<T>> {
    let norm = matrix.norm();
    if !<T as Float>::is_finite(norm) {
        return Err(ManifoldError::numerical_error(format!(
            "{operation}: matrix norm is not finite"
        )));
    }
    if norm <= epsilon {
        warn!(operation, norm = Scalar::to_f64(norm), "refusing to normalize near-zero matrix");
        return Err(ManifoldError::degenerate_normalization(
            operation,
            Scalar::to_f64(norm),
        ));
    }
    Ok(matrix / norm)
}

/// Clamps a cosine into [-1, 1] before it reaches `acos`.
#[inline]
pub fn clamp_cosine<T: Scalar>(value: T) -> T {
    <T as Float>::max(<T as Float>::min(value, T::one()), -T::one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_gaussian_matrix_shape_and_seed() {
        let mut rng = StdRng::seed_from_u64(7);
        let a: DMatrix<f64> = gaussian_matrix(3, 2, &mut rng);
        assert_eq!(a.shape(), (3, 2));

        let mut rng = StdRng::seed_from_u64(7);
        let b: DMatrix<f64> = gaussian_matrix(3, 2, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_frobenius() {
        let m = DMatrix::from_column_slice(2, 2, &[3.0, 0.0, 0.0, 4.0]);
        let n = normalize_frobenius(m, f64::EPSILON, "test").unwrap();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(n[(1, 1)], 0.8, epsilon = 1e-15);
    }

    #[test]
    fn test_normalize_rejects_zero_and_nan() {
        let zero = DMatrix::<f64>::zeros(2, 1);
        let err = normalize_frobenius(zero, f64::EPSILON, "pair_mean").unwrap_err();
        assert!(err.is_degenerate());

        let nan = DMatrix::from_element(2, 1, f64::NAN);
        let err = normalize_frobenius(nan, f64::EPSILON, "exp").unwrap_err();
        assert!(matches!(err, ManifoldError::NumericalError { .. }));
    }

    #[test]
    fn test_clamp_cosine() {
        assert_eq!(clamp_cosine(1.0 + 1e-15), 1.0);
        assert_eq!(clamp_cosine(-1.0 - 1e-15), -1.0);
        assert_eq!(clamp_cosine(0.25), 0.25);
    }
}
