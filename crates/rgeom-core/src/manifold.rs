//! Core manifold descriptor trait.
//!
//! This module defines [`ManifoldDescriptor`], the capability set a generic
//! Riemannian solver consumes. The solver holds a point and, every
//! iteration, calls a sequence of descriptor operations; the descriptor
//! itself keeps no state between calls.
//!
//! # Mathematical Background
//!
//! A Riemannian manifold (M, g) consists of:
//! - A smooth manifold M, here embedded in the space of n×m real matrices
//! - A Riemannian metric g that assigns an inner product to each tangent space
//!
//! Key concepts:
//! - **Tangent space**: T_x M is the linear approximation of M at point x
//! - **Exponential map**: exp_x: T_x M → M follows geodesics exactly
//! - **Retraction**: R_x: T_x M → M, a cheaper first-order approximation of exp_x
//! - **Riemannian gradient**: The unique vector in T_x M representing the derivative
//! - **Vector transport**: Moving tangent vectors between tangent spaces

use crate::{
    error::{ManifoldError, Result},
    types::{format_shape, DMatrix, FlatTangent, Point, Scalar, Shape, TangentVector},
};
use num_traits::Float;
use std::fmt::Debug;

/// Trait for manifolds whose points are n×m real matrices.
///
/// Every method is a pure function of `&self` and its arguments: results are
/// freshly allocated and inputs are never modified, so one descriptor can be
/// shared by any number of solver threads.
///
/// Operations that take a step size come in two flavours, e.g.
/// [`exp_step`](Self::exp_step) with an explicit `t` and
/// [`exp`](Self::exp) with `t = 1`.
///
/// # Mathematical Properties
///
/// Implementations must guarantee, within floating-point tolerance:
///
/// 1. **Membership**: every returned point lies on the manifold
/// 2. **Tangency**: every returned tangent vector lies in the tangent space
///    of its base point
/// 3. **Retraction constraints**: R_x(0) = x and dR_x(0) = id
/// 4. **Metric properties**: ⟨·,·⟩_x is symmetric, bilinear and positive definite
///
/// # Example
///
/// ```rust,ignore
/// use rgeom_core::prelude::*;
///
/// fn steepest_step<M: ManifoldDescriptor<f64>>(
///     manifold: &M,
///     x: &Point<f64>,
///     egrad: &DMatrix<f64>,
///     step: f64,
/// ) -> Result<Point<f64>> {
///     let rgrad = manifold.euclidean_to_riemannian_gradient(x, egrad)?;
///     manifold.retract_step(x, &rgrad, -step)
/// }
/// ```
pub trait ManifoldDescriptor<T: Scalar>: Debug + Send + Sync {
    /// Returns a human-readable name for the manifold.
    fn name(&self) -> &str;

    /// Returns the `(rows, cols)` shape of points and tangent vectors.
    fn shape(&self) -> Shape;

    /// Returns the intrinsic dimension (degrees of freedom) of the manifold.
    fn dimension(&self) -> usize;

    /// Returns the dimension of the ambient matrix space.
    fn ambient_dimension(&self) -> usize {
        let (rows, cols) = self.shape();
        rows * cols
    }

    /// Returns an order-of-magnitude step scale for solver heuristics.
    fn typical_distance(&self) -> T;

    /// Fails with [`ManifoldError::DimensionMismatch`] unless `matrix` has the
    /// configured shape.
    fn check_shape(&self, matrix: &DMatrix<T>) -> Result<()> {
        let expected = self.shape();
        if matrix.shape() == expected {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(
                format_shape(expected),
                format_shape(matrix.shape()),
            ))
        }
    }

    /// Checks if a point lies on the manifold within a given tolerance.
    fn is_point_on_manifold(&self, point: &Point<T>, tol: T) -> bool;

    /// Checks if a vector is in the tangent space at a given point.
    fn is_vector_in_tangent_space(
        &self,
        point: &Point<T>,
        vector: &TangentVector<T>,
        tol: T,
    ) -> bool;

    /// Projects an ambient matrix onto the manifold.
    fn project_point(&self, matrix: &DMatrix<T>) -> Result<Point<T>>;

    /// Orthogonally projects an ambient matrix onto the tangent space at `point`.
    ///
    /// # Mathematical Properties
    ///
    /// 1. **Idempotency**: P_x(P_x(v)) = P_x(v)
    /// 2. **Linearity**: P_x(αu + βv) = αP_x(u) + βP_x(v)
    fn project_tangent(&self, point: &Point<T>, vector: &DMatrix<T>) -> Result<TangentVector<T>>;

    /// Returns the ambient representation of a tangent vector.
    ///
    /// For embedded submanifolds tangent vectors already are ambient
    /// matrices, so the default is a copy.
    fn tangent_to_ambient(
        &self,
        point: &Point<T>,
        tangent: &TangentVector<T>,
    ) -> Result<DMatrix<T>> {
        self.check_shape(point)?;
        self.check_shape(tangent)?;
        Ok(tangent.clone())
    }

    /// Computes the Riemannian inner product ⟨u, v⟩_x.
    fn inner_product(
        &self,
        point: &Point<T>,
        u: &TangentVector<T>,
        v: &TangentVector<T>,
    ) -> Result<T>;

    /// Computes the norm of a tangent vector, sqrt(⟨v, v⟩_x).
    fn norm(&self, point: &Point<T>, vector: &TangentVector<T>) -> Result<T> {
        self.inner_product(point, vector, vector)
            .map(|ip| <T as Float>::sqrt(ip))
    }

    /// Computes the geodesic distance between two points.
    fn distance(&self, x: &Point<T>, y: &Point<T>) -> Result<T>;

    /// Converts an ambient gradient into the Riemannian gradient.
    ///
    /// The default projects onto the tangent space, which is exact for
    /// submanifolds of Euclidean space with the induced metric.
    fn euclidean_to_riemannian_gradient(
        &self,
        point: &Point<T>,
        euclidean_grad: &DMatrix<T>,
    ) -> Result<TangentVector<T>> {
        self.project_tangent(point, euclidean_grad)
    }

    /// Converts an ambient Hessian-vector product into the Riemannian one.
    ///
    /// # Arguments
    ///
    /// * `point` - Base point x
    /// * `euclidean_grad` - Ambient gradient at x
    /// * `euclidean_hvp` - Ambient Hessian applied to `direction`
    /// * `direction` - Tangent vector u at x
    fn euclidean_to_riemannian_hessian(
        &self,
        point: &Point<T>,
        euclidean_grad: &DMatrix<T>,
        euclidean_hvp: &DMatrix<T>,
        direction: &TangentVector<T>,
    ) -> Result<TangentVector<T>>;

    /// Follows the geodesic from `point` with initial velocity `t * tangent`.
    fn exp_step(&self, point: &Point<T>, tangent: &TangentVector<T>, t: T) -> Result<Point<T>>;

    /// Exponential map with unit step.
    fn exp(&self, point: &Point<T>, tangent: &TangentVector<T>) -> Result<Point<T>> {
        self.exp_step(point, tangent, T::one())
    }

    /// Retracts `t * tangent` from `point` back onto the manifold.
    ///
    /// A retraction must satisfy R_x(0) = x and dR_x(0) = id, i.e. agree with
    /// the exponential map to first order.
    fn retract_step(&self, point: &Point<T>, tangent: &TangentVector<T>, t: T)
        -> Result<Point<T>>;

    /// Retraction with unit step.
    fn retract(&self, point: &Point<T>, tangent: &TangentVector<T>) -> Result<Point<T>> {
        self.retract_step(point, tangent, T::one())
    }

    /// Logarithmic map: the tangent vector at `point` whose exponential
    /// reaches `other`.
    fn log(&self, point: &Point<T>, other: &Point<T>) -> Result<TangentVector<T>>;

    /// Inverse of [`retract`](Self::retract).
    fn inverse_retract(&self, point: &Point<T>, other: &Point<T>) -> Result<TangentVector<T>>;

    /// Samples a point on the manifold.
    fn random_point(&self) -> Result<Point<T>>;

    /// Samples a unit-norm tangent vector at `point`.
    fn random_tangent(&self, point: &Point<T>) -> Result<TangentVector<T>>;

    /// Returns the zero element of the tangent space at `point`.
    fn zero_tangent(&self, point: &Point<T>) -> Result<TangentVector<T>> {
        self.check_shape(point)?;
        let (rows, cols) = self.shape();
        Ok(DMatrix::zeros(rows, cols))
    }

    /// Computes Σ aᵢ dᵢ for tangent vectors dᵢ at `point`.
    ///
    /// An empty list yields the zero tangent vector.
    fn linear_combination(
        &self,
        point: &Point<T>,
        terms: &[(T, &TangentVector<T>)],
    ) -> Result<TangentVector<T>> {
        let mut combination = self.zero_tangent(point)?;
        for &(coefficient, tangent) in terms {
            self.check_shape(tangent)?;
            combination += tangent * coefficient;
        }
        Ok(combination)
    }

    /// Moves a tangent vector at `from` into the tangent space at `to`.
    ///
    /// The default is vector transport by projection, the usual choice for
    /// retraction-based solvers on embedded submanifolds.
    fn transport(
        &self,
        from: &Point<T>,
        to: &Point<T>,
        vector: &TangentVector<T>,
    ) -> Result<TangentVector<T>> {
        self.check_shape(from)?;
        self.project_tangent(to, vector)
    }

    /// Returns a midpoint-like point between `x` and `y`.
    fn pair_mean(&self, x: &Point<T>, y: &Point<T>) -> Result<Point<T>>;

    /// Encodes a tangent vector as a flat vector (column-major order).
    fn vectorize(
        &self,
        point: &Point<T>,
        tangent: &TangentVector<T>,
    ) -> Result<FlatTangent<T>> {
        self.check_shape(point)?;
        self.check_shape(tangent)?;
        Ok(FlatTangent::from_column_slice(tangent.as_slice()))
    }

    /// Inverse of [`vectorize`](Self::vectorize).
    fn matricize(&self, point: &Point<T>, flat: &FlatTangent<T>) -> Result<TangentVector<T>> {
        self.check_shape(point)?;
        let (rows, cols) = self.shape();
        if flat.len() != rows * cols {
            return Err(ManifoldError::dimension_mismatch(
                rows * cols,
                flat.len(),
            ));
        }
        Ok(DMatrix::from_column_slice(rows, cols, flat.as_slice()))
    }

    /// Whether `vectorize`/`matricize` preserve inner products, i.e.
    /// ⟨u, v⟩_x = vectorize(x, u)ᵀ vectorize(x, v).
    fn vec_mat_are_isometries(&self) -> bool {
        false
    }

    /// Stable content-based identifier of a point, for solver-side caches.
    fn identity_hash(&self, point: &Point<T>) -> Result<String>;

    /// Checks if the manifold has closed-form exponential and logarithmic maps.
    fn has_exact_exp_log(&self) -> bool {
        false
    }
}
