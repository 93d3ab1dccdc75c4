//! Numerical validation utilities for manifold descriptors.
//!
//! These checks exercise a descriptor against the geometric identities it has
//! to satisfy: retraction/exponential agreement, exp/log inversion,
//! isometric vectorization and the stability of membership under repeated
//! operations. They are meant for test suites and for solvers that want to
//! sanity-check a user-provided descriptor once before iterating.

use crate::{
    error::{ManifoldError, Result},
    manifold::ManifoldDescriptor,
    types::{Point, Scalar, TangentVector},
};
use num_traits::Float;
use tracing::debug;

/// Configuration for numerical validation tests.
#[derive(Debug, Clone)]
pub struct ValidationConfig<T> {
    /// Smallest step size of the convergence sweep
    pub min_step_size: T,
    /// Largest step size of the convergence sweep
    pub max_step_size: T,
    /// Number of logarithmically spaced step sizes
    pub num_steps: usize,
    /// Tolerance for identity checks
    pub tolerance: T,
}

impl<T: Scalar> Default for ValidationConfig<T> {
    fn default() -> Self {
        Self {
            min_step_size: <T as Scalar>::from_f64(1e-4),
            max_step_size: <T as Scalar>::from_f64(1e-1),
            num_steps: 8,
            tolerance: <T as Scalar>::from_f64(1e-8),
        }
    }
}

/// Results from convergence analysis.
#[derive(Debug)]
pub struct ConvergenceResult<T> {
    /// Estimated order of agreement: the residual behaves like t^(order + 1)
    pub order: T,
    /// R-squared value for the log-log linear fit
    pub r_squared: T,
    /// Step sizes used
    pub step_sizes: Vec<T>,
    /// Residuals at each step size
    pub errors: Vec<T>,
}

/// Numerical validation tools for manifold descriptors.
pub struct NumericalValidator;

impl NumericalValidator {
    /// Measure how fast the retraction approaches the exponential map.
    ///
    /// Computes ‖R_x(t v) − exp_x(t v)‖ over a logarithmic sweep of t and
    /// fits log(error) = log(C) + (p+1) log(t). A retraction of order p
    /// satisfies the fit with slope p + 1; every retraction has p ≥ 1.
    pub fn check_retraction_order<T, M>(
        manifold: &M,
        point: &Point<T>,
        tangent: &TangentVector<T>,
        config: &ValidationConfig<T>,
    ) -> Result<ConvergenceResult<T>>
    where
        T: Scalar,
        M: ManifoldDescriptor<T> + ?Sized,
    {
        if config.num_steps < 2 {
            return Err(ManifoldError::invalid_parameter(
                "convergence sweep needs at least 2 step sizes",
            ));
        }

        let mut step_sizes = Vec::with_capacity(config.num_steps);
        let mut errors = Vec::with_capacity(config.num_steps);

        let log_min = <T as Float>::ln(config.min_step_size);
        let log_max = <T as Float>::ln(config.max_step_size);

        for i in 0..config.num_steps {
            let alpha =
                <T as Scalar>::from_usize(i) / <T as Scalar>::from_usize(config.num_steps - 1);
            let h = <T as Float>::exp(log_min * (T::one() - alpha) + log_max * alpha);

            let retracted = manifold.retract_step(point, tangent, h)?;
            let geodesic = manifold.exp_step(point, tangent, h)?;
            let error = (&retracted - &geodesic).norm();

            if error > <T as Scalar>::EPSILON {
                step_sizes.push(h);
                errors.push(error);
            }
        }

        let (order, r_squared) = Self::fit_convergence_order(&step_sizes, &errors)?;
        debug!(
            manifold = manifold.name(),
            order = Scalar::to_f64(order),
            r_squared = Scalar::to_f64(r_squared),
            "estimated retraction order"
        );

        Ok(ConvergenceResult {
            order,
            r_squared,
            step_sizes,
            errors,
        })
    }

    /// Residual ‖log_x(exp_x(v)) − v‖ of the exp/log inversion.
    pub fn exp_log_residual<T, M>(
        manifold: &M,
        point: &Point<T>,
        tangent: &TangentVector<T>,
    ) -> Result<T>
    where
        T: Scalar,
        M: ManifoldDescriptor<T> + ?Sized,
    {
        let moved = manifold.exp(point, tangent)?;
        let back = manifold.log(point, &moved)?;
        manifold.norm(point, &(back - tangent))
    }

    /// Residual |⟨u, v⟩_x − vec(u)ᵀ vec(v)| of the vectorization isometry.
    pub fn isometry_residual<T, M>(
        manifold: &M,
        point: &Point<T>,
        u: &TangentVector<T>,
        v: &TangentVector<T>,
    ) -> Result<T>
    where
        T: Scalar,
        M: ManifoldDescriptor<T> + ?Sized,
    {
        let metric = manifold.inner_product(point, u, v)?;
        let flat = manifold.vectorize(point, u)?.dot(&manifold.vectorize(point, v)?);
        Ok(<T as Float>::abs(metric - flat))
    }

    /// Check numerical stability of the descriptor's operations.
    ///
    /// Returns a human-readable list of detected issues; an empty list means
    /// every check passed.
    pub fn check_stability<T, M>(manifold: &M, config: &ValidationConfig<T>) -> Result<Vec<String>>
    where
        T: Scalar,
        M: ManifoldDescriptor<T> + ?Sized,
    {
        let mut issues = Vec::new();
        let tol = config.tolerance;

        // Sampling
        let point = manifold.random_point()?;
        if !manifold.is_point_on_manifold(&point, tol) {
            issues.push("Random point is not on the manifold".to_string());
        }
        let tangent = manifold.random_tangent(&point)?;
        if !manifold.is_vector_in_tangent_space(&point, &tangent, tol) {
            issues.push("Random tangent is not in the tangent space".to_string());
        }

        // Projection idempotency
        let once = manifold.project_tangent(&point, &tangent)?;
        let twice = manifold.project_tangent(&point, &once)?;
        let drift = (&twice - &once).norm();
        if drift > tol {
            issues.push(format!(
                "Tangent projection is not idempotent: drift = {:e}",
                Scalar::to_f64(drift)
            ));
        }

        // Retraction near zero, then inverse retraction
        for scale in [1e-8, 1e-4, 1e-1] {
            let scale = <T as Scalar>::from_f64(scale);
            let tiny = &tangent * scale;
            match manifold.retract(&point, &tiny) {
                Ok(retracted) => {
                    if !manifold.is_point_on_manifold(&retracted, tol) {
                        issues.push(format!(
                            "Retraction left the manifold at scale {:e}",
                            Scalar::to_f64(scale)
                        ));
                    }
                    let back = manifold.inverse_retract(&point, &retracted)?;
                    let rel_error =
                        manifold.norm(&point, &(back - &tiny))? / manifold.norm(&point, &tiny)?;
                    if rel_error > <T as Scalar>::from_f64(1e-3) {
                        issues.push(format!(
                            "Retraction/inverse unstable at scale {:e}: error = {:e}",
                            Scalar::to_f64(scale),
                            Scalar::to_f64(rel_error)
                        ));
                    }
                }
                Err(err) => {
                    issues.push(format!(
                        "Retraction failed at scale {:e}: {err}",
                        Scalar::to_f64(scale)
                    ));
                }
            }
        }

        // Repeated unit-step exponentials must stay on the manifold
        let mut walker = point.clone();
        for _ in 0..100 {
            let direction = manifold.random_tangent(&walker)?;
            walker = manifold.exp(&walker, &direction)?;
        }
        if !manifold.is_point_on_manifold(&walker, tol) {
            issues.push("Repeated exponential steps drifted off the manifold".to_string());
        }

        if !issues.is_empty() {
            debug!(manifold = manifold.name(), count = issues.len(), "stability issues found");
        }
        Ok(issues)
    }

    /// Fit convergence order from error data.
    fn fit_convergence_order<T: Scalar>(step_sizes: &[T], errors: &[T]) -> Result<(T, T)> {
        if step_sizes.len() < 2 {
            return Err(ManifoldError::numerical_error(format!(
                "need at least 2 non-negligible residuals to fit an order, got {}",
                step_sizes.len()
            )));
        }

        let n = <T as Scalar>::from_usize(step_sizes.len());

        let log_h: Vec<T> = step_sizes.iter().map(|h| <T as Float>::ln(*h)).collect();
        let log_e: Vec<T> = errors.iter().map(|e| <T as Float>::ln(*e)).collect();

        let mean_log_h = log_h.iter().fold(T::zero(), |acc, &x| acc + x) / n;
        let mean_log_e = log_e.iter().fold(T::zero(), |acc, &x| acc + x) / n;

        let mut num = T::zero();
        let mut den = T::zero();
        for (&lh, &le) in log_h.iter().zip(&log_e) {
            let dh = lh - mean_log_h;
            num += dh * (le - mean_log_e);
            den += dh * dh;
        }

        let slope = if den > <T as Scalar>::EPSILON {
            num / den
        } else {
            T::zero()
        };
        let order = slope - T::one();

        let mut ss_tot = T::zero();
        let mut ss_res = T::zero();
        for (&lh, &le) in log_h.iter().zip(&log_e) {
            let predicted = mean_log_e + slope * (lh - mean_log_h);
            ss_res += (le - predicted) * (le - predicted);
            ss_tot += (le - mean_log_e) * (le - mean_log_e);
        }

        let r_squared = if ss_tot > <T as Scalar>::EPSILON {
            T::one() - ss_res / ss_tot
        } else {
            T::zero()
        };

        Ok((order, r_squared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_manifolds::TestEuclidean;
    use crate::types::DMatrix;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_recovers_known_slope() {
        let steps: Vec<f64> = [1e-3, 1e-2, 1e-1].to_vec();
        let errors: Vec<f64> = steps.iter().map(|h| 0.5 * h * h * h).collect();
        let (order, r2) = NumericalValidator::fit_convergence_order(&steps, &errors).unwrap();
        assert_relative_eq!(order, 2.0, epsilon = 1e-10);
        assert_relative_eq!(r2, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fit_needs_two_points() {
        assert!(NumericalValidator::fit_convergence_order(&[1e-2], &[1e-6]).is_err());
    }

    #[test]
    fn test_identical_retraction_has_no_residual() {
        // exp and retraction coincide on flat space, so every residual is
        // below epsilon and no order can be fitted.
        let manifold = TestEuclidean::new(3, 1);
        let x = DMatrix::<f64>::zeros(3, 1);
        let v = DMatrix::from_column_slice(3, 1, &[1.0, 0.0, 0.0]);
        let result = NumericalValidator::check_retraction_order(
            &manifold,
            &x,
            &v,
            &ValidationConfig::default(),
        );
        assert!(matches!(result, Err(ManifoldError::NumericalError { .. })));
    }

    #[test]
    fn test_single_step_sweep_is_rejected() {
        let manifold = TestEuclidean::new(2, 1);
        let x = DMatrix::<f64>::zeros(2, 1);
        let config = ValidationConfig {
            num_steps: 1,
            ..ValidationConfig::default()
        };
        let err = NumericalValidator::check_retraction_order(&manifold, &x, &x, &config)
            .unwrap_err();
        assert!(matches!(err, ManifoldError::InvalidParameter { .. }));
    }

    #[test]
    fn test_flat_space_residuals() {
        let manifold = TestEuclidean::new(2, 2);
        let x = DMatrix::<f64>::from_element(2, 2, 0.3);
        let u = DMatrix::from_column_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let v = DMatrix::from_column_slice(2, 2, &[-1.0, 0.5, 0.0, 2.0]);

        assert_relative_eq!(
            NumericalValidator::exp_log_residual(&manifold, &x, &u).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            NumericalValidator::isometry_residual(&manifold, &x, &u, &v).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_flat_space_is_stable() {
        let manifold = TestEuclidean::new(3, 2);
        let issues =
            NumericalValidator::check_stability::<f64, _>(&manifold, &ValidationConfig::default())
                .unwrap();
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }
}
