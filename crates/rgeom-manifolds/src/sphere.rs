//! Sphere of n×m matrices with unit Frobenius norm.
//!
//! S = {X ∈ R^{n×m} : ‖X‖_F = 1} is the unit sphere of R^{nm} written in
//! matrix form. With m = 1 it is the ordinary sphere S^{n-1}. It naturally
//! appears in:
//! - Principal Component Analysis (PCA) and eigenvalue problems
//! - Scale-invariant matrix factorizations
//! - Sparse coding with unit norm constraints
//! - Neural network weight normalization

use nalgebra::DMatrix;
use num_traits::Float;
use rand::Rng;
use rgeom_core::{
    config::DescriptorConfig,
    error::{ManifoldError, Result},
    hash::tagged_digest,
    manifold::ManifoldDescriptor,
    types::{constants, Point, Scalar, Shape, TangentVector},
};
use tracing::{debug, trace, warn};

use crate::utils::{clamp_cosine, gaussian_matrix, normalize_frobenius};

/// The sphere of `rows`×`cols` matrices with unit Frobenius norm.
///
/// Points satisfy ‖X‖_F = 1 and the tangent space at X consists of all
/// matrices orthogonal to X for the trace inner product ⟨A, B⟩ = tr(AᵀB).
///
/// # Mathematical Properties
///
/// - **Dimension**: nm − 1
/// - **Tangent space**: T_X S = {V : ⟨X, V⟩ = 0}
/// - **Riemannian metric**: Inherited from the ambient space (canonical metric)
/// - **Exponential map**: exp_X(V) = cos(‖V‖) X + sin(‖V‖) V/‖V‖
/// - **Retraction**: R_X(V) = (X + V)/‖X + V‖
/// - **Distance**: d(X, Y) = arccos⟨X, Y⟩
///
/// The descriptor is immutable after construction. Sampling through the
/// trait uses the thread-local generator; [`random_point_with`] and
/// [`random_tangent_with`] take a caller-owned generator for reproducible
/// draws.
///
/// With the `serde` feature the descriptor serializes as its shape and
/// configuration; deserialization goes through
/// [`with_config`](SphereManifold::with_config), so it rejects the same
/// inputs construction does.
///
/// [`random_point_with`]: SphereManifold::random_point_with
/// [`random_tangent_with`]: SphereManifold::random_tangent_with
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "SphereManifoldRepr<T>",
        into = "SphereManifoldRepr<T>",
        bound(
            serialize = "T: Scalar + serde::Serialize",
            deserialize = "T: Scalar + serde::Deserialize<'de>"
        )
    )
)]
pub struct SphereManifold<T = f64> {
    rows: usize,
    cols: usize,
    name: String,
    config: DescriptorConfig<T>,
}

/// Serialized form of [`SphereManifold`]; the name is derived from the shape.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SphereManifoldRepr<T> {
    rows: usize,
    cols: usize,
    config: DescriptorConfig<T>,
}

#[cfg(feature = "serde")]
impl<T: Scalar> TryFrom<SphereManifoldRepr<T>> for SphereManifold<T> {
    type Error = ManifoldError;

    fn try_from(repr: SphereManifoldRepr<T>) -> Result<Self> {
        Self::with_config(repr.rows, repr.cols, repr.config)
    }
}

#[cfg(feature = "serde")]
impl<T> From<SphereManifold<T>> for SphereManifoldRepr<T> {
    fn from(sphere: SphereManifold<T>) -> Self {
        Self {
            rows: sphere.rows,
            cols: sphere.cols,
            config: sphere.config,
        }
    }
}

impl<T: Scalar> SphereManifold<T> {
    /// Creates the sphere of `rows`×`cols` matrices.
    ///
    /// # Errors
    /// Returns an error if `rows` or `cols` is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_config(rows, cols, DescriptorConfig::default())
    }

    /// Creates the ordinary sphere S^{n-1} of unit column vectors in R^n.
    pub fn vector(n: usize) -> Result<Self> {
        Self::new(n, 1)
    }

    /// Creates the sphere with a custom configuration.
    pub fn with_config(rows: usize, cols: usize, config: DescriptorConfig<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ManifoldError::invalid_parameter(format!(
                "Sphere requires rows > 0 and cols > 0, got {rows}x{cols}"
            )));
        }
        config.validate()?;
        debug!(rows, cols, strict = config.strict_validation, "created sphere manifold");
        Ok(Self {
            rows,
            cols,
            name: format!("Sphere manifold {rows}x{cols}"),
            config,
        })
    }

    /// Number of rows of the matrix representation.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns of the matrix representation.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The configuration this descriptor was built with.
    pub fn config(&self) -> &DescriptorConfig<T> {
        &self.config
    }

    /// Samples a uniformly distributed point using `rng`.
    pub fn random_point_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Point<T>> {
        let draw = gaussian_matrix(self.rows, self.cols, rng);
        self.normalize(draw, "random_point")
    }

    /// Samples a unit-norm tangent vector at `point` using `rng`.
    ///
    /// The 1×1 sphere has a zero-dimensional tangent space, so there is no
    /// unit tangent to return and this fails with a degenerate
    /// normalization.
    pub fn random_tangent_with<R: Rng + ?Sized>(
        &self,
        point: &Point<T>,
        rng: &mut R,
    ) -> Result<TangentVector<T>> {
        self.check_point(point)?;
        if self.rows * self.cols == 1 {
            return Err(ManifoldError::degenerate_normalization("random_tangent", 0.0));
        }
        let draw = gaussian_matrix(self.rows, self.cols, rng);
        let projected = Self::remove_normal_component(point, &draw);
        self.normalize(projected, "random_tangent")
    }

    fn normalize(&self, matrix: DMatrix<T>, operation: &str) -> Result<DMatrix<T>> {
        normalize_frobenius(matrix, self.config.normalization_epsilon, operation)
    }

    /// d − x⟨x, d⟩
    fn remove_normal_component(point: &Point<T>, vector: &DMatrix<T>) -> TangentVector<T> {
        vector - point * point.dot(vector)
    }

    /// Shape check, plus a membership check in strict mode.
    fn check_point(&self, point: &Point<T>) -> Result<()> {
        self.check_shape(point)?;
        if self.config.strict_validation
            && !self.is_point_on_manifold(point, self.config.membership_tolerance)
        {
            let norm = Scalar::to_f64(point.norm());
            warn!(manifold = %self.name, norm, "rejected point off the sphere");
            return Err(ManifoldError::invalid_point(format!(
                "Frobenius norm is {norm}, expected 1"
            )));
        }
        Ok(())
    }

    /// Shape check, plus a tangency check in strict mode.
    fn check_tangent(&self, point: &Point<T>, tangent: &TangentVector<T>) -> Result<()> {
        self.check_shape(point)?;
        self.check_shape(tangent)?;
        if self.config.strict_validation
            && !self.is_vector_in_tangent_space(point, tangent, self.config.membership_tolerance)
        {
            let inner = Scalar::to_f64(point.dot(tangent));
            warn!(manifold = %self.name, inner, "rejected non-tangent vector");
            return Err(ManifoldError::invalid_tangent(format!(
                "inner product with base point is {inner}, expected 0"
            )));
        }
        Ok(())
    }
}

impl<T: Scalar> ManifoldDescriptor<T> for SphereManifold<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    fn dimension(&self) -> usize {
        self.rows * self.cols - 1
    }

    fn typical_distance(&self) -> T {
        constants::pi()
    }

    fn is_point_on_manifold(&self, point: &Point<T>, tolerance: T) -> bool {
        if point.shape() != (self.rows, self.cols) {
            return false;
        }
        <T as Float>::abs(point.norm() - T::one()) < tolerance
    }

    fn is_vector_in_tangent_space(
        &self,
        point: &Point<T>,
        vector: &TangentVector<T>,
        tolerance: T,
    ) -> bool {
        let shape = (self.rows, self.cols);
        if point.shape() != shape || vector.shape() != shape {
            return false;
        }
        <T as Float>::abs(point.dot(vector)) < tolerance
    }

    fn project_point(&self, matrix: &DMatrix<T>) -> Result<Point<T>> {
        self.check_shape(matrix)?;
        self.normalize(matrix.clone(), "project_point")
    }

    fn project_tangent(&self, point: &Point<T>, vector: &DMatrix<T>) -> Result<TangentVector<T>> {
        self.check_point(point)?;
        self.check_shape(vector)?;
        Ok(Self::remove_normal_component(point, vector))
    }

    fn inner_product(
        &self,
        point: &Point<T>,
        u: &TangentVector<T>,
        v: &TangentVector<T>,
    ) -> Result<T> {
        self.check_point(point)?;
        self.check_tangent(point, u)?;
        self.check_tangent(point, v)?;
        Ok(u.dot(v))
    }

    fn norm(&self, point: &Point<T>, vector: &TangentVector<T>) -> Result<T> {
        self.check_point(point)?;
        self.check_tangent(point, vector)?;
        Ok(vector.norm())
    }

    fn distance(&self, x: &Point<T>, y: &Point<T>) -> Result<T> {
        self.check_point(x)?;
        self.check_point(y)?;
        Ok(<T as Float>::acos(clamp_cosine(x.dot(y))))
    }

    fn euclidean_to_riemannian_hessian(
        &self,
        point: &Point<T>,
        euclidean_grad: &DMatrix<T>,
        euclidean_hvp: &DMatrix<T>,
        direction: &TangentVector<T>,
    ) -> Result<TangentVector<T>> {
        self.check_point(point)?;
        self.check_shape(euclidean_grad)?;
        self.check_tangent(point, direction)?;
        let mut hessian = self.project_tangent(point, euclidean_hvp)?;
        hessian -= direction * point.dot(euclidean_grad);
        Ok(hessian)
    }

    fn exp_step(&self, point: &Point<T>, tangent: &TangentVector<T>, t: T) -> Result<Point<T>> {
        self.check_point(point)?;
        self.check_tangent(point, tangent)?;

        let velocity = tangent * t;
        let angle = velocity.norm();

        if angle > constants::exp_small_step_threshold() {
            Ok(point * <T as Float>::cos(angle)
                + velocity * (<T as Float>::sin(angle) / angle))
        } else {
            trace!(angle = Scalar::to_f64(angle), "exp: small step, normalizing x + v");
            self.normalize(point + velocity, "exp")
        }
    }

    fn retract_step(
        &self,
        point: &Point<T>,
        tangent: &TangentVector<T>,
        t: T,
    ) -> Result<Point<T>> {
        self.check_point(point)?;
        self.check_tangent(point, tangent)?;
        self.normalize(point + tangent * t, "retract")
    }

    fn log(&self, point: &Point<T>, other: &Point<T>) -> Result<TangentVector<T>> {
        let distance = self.distance(point, other)?;
        let mut log = Self::remove_normal_component(point, &(other - point));

        if distance > constants::log_correction_threshold() {
            let projected_norm = log.norm();
            if projected_norm <= self.config.normalization_epsilon {
                warn!(
                    distance = Scalar::to_f64(distance),
                    "log: points are antipodal, direction is undefined"
                );
                return Err(ManifoldError::degenerate_normalization(
                    "log",
                    Scalar::to_f64(projected_norm),
                ));
            }
            trace!(distance = Scalar::to_f64(distance), "log: rescaling to geodesic length");
            log *= distance / projected_norm;
        }
        Ok(log)
    }

    fn inverse_retract(&self, point: &Point<T>, other: &Point<T>) -> Result<TangentVector<T>> {
        self.check_point(point)?;
        self.check_point(other)?;
        let cosine = point.dot(other);
        if cosine <= self.config.normalization_epsilon {
            return Err(ManifoldError::numerical_error(format!(
                "inverse retraction undefined: <x, y> = {} is not positive",
                Scalar::to_f64(cosine)
            )));
        }
        Ok(other / cosine - point)
    }

    fn random_point(&self) -> Result<Point<T>> {
        self.random_point_with(&mut rand::thread_rng())
    }

    fn random_tangent(&self, point: &Point<T>) -> Result<TangentVector<T>> {
        self.random_tangent_with(point, &mut rand::thread_rng())
    }

    fn zero_tangent(&self, point: &Point<T>) -> Result<TangentVector<T>> {
        self.check_point(point)?;
        Ok(DMatrix::zeros(self.rows, self.cols))
    }

    fn transport(
        &self,
        from: &Point<T>,
        to: &Point<T>,
        vector: &TangentVector<T>,
    ) -> Result<TangentVector<T>> {
        self.check_point(from)?;
        self.check_tangent(from, vector)?;
        self.project_tangent(to, vector)
    }

    fn pair_mean(&self, x: &Point<T>, y: &Point<T>) -> Result<Point<T>> {
        self.check_point(x)?;
        self.check_point(y)?;
        self.normalize(x + y, "pair_mean")
    }

    fn vec_mat_are_isometries(&self) -> bool {
        true
    }

    fn identity_hash(&self, point: &Point<T>) -> Result<String> {
        self.check_point(point)?;
        Ok(tagged_digest(constants::SPHERE_HASH_TAG, point))
    }

    fn has_exact_exp_log(&self) -> bool {
        true
    }
}
