//! Simple manifolds for exercising the descriptor trait in tests.

use crate::{
    error::Result,
    hash::tagged_digest,
    manifold::ManifoldDescriptor,
    types::{DMatrix, Point, Scalar, Shape, TangentVector},
};
use num_traits::Float;

/// The flat space of n×m matrices with the Frobenius metric.
///
/// Every operator is the Euclidean one, which makes it a convenient
/// reference for the trait's default methods.
#[derive(Debug, Clone)]
pub struct TestEuclidean {
    rows: usize,
    cols: usize,
}

impl TestEuclidean {
    /// Creates the flat space of `rows`×`cols` matrices.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl<T: Scalar> ManifoldDescriptor<T> for TestEuclidean {
    fn name(&self) -> &str {
        "TestEuclidean"
    }

    fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    fn dimension(&self) -> usize {
        self.rows * self.cols
    }

    fn typical_distance(&self) -> T {
        <T as Float>::sqrt(<T as Scalar>::from_usize(self.rows * self.cols))
    }

    fn is_point_on_manifold(&self, point: &Point<T>, _tol: T) -> bool {
        point.shape() == (self.rows, self.cols)
    }

    fn is_vector_in_tangent_space(
        &self,
        point: &Point<T>,
        vector: &TangentVector<T>,
        _tol: T,
    ) -> bool {
        point.shape() == vector.shape()
    }

    fn project_point(&self, matrix: &DMatrix<T>) -> Result<Point<T>> {
        self.check_shape(matrix)?;
        Ok(matrix.clone())
    }

    fn project_tangent(&self, point: &Point<T>, vector: &DMatrix<T>) -> Result<TangentVector<T>> {
        self.check_shape(point)?;
        self.check_shape(vector)?;
        Ok(vector.clone())
    }

    fn inner_product(
        &self,
        _point: &Point<T>,
        u: &TangentVector<T>,
        v: &TangentVector<T>,
    ) -> Result<T> {
        self.check_shape(u)?;
        self.check_shape(v)?;
        Ok(u.dot(v))
    }

    fn distance(&self, x: &Point<T>, y: &Point<T>) -> Result<T> {
        self.check_shape(x)?;
        self.check_shape(y)?;
        Ok((y - x).norm())
    }

    fn euclidean_to_riemannian_hessian(
        &self,
        point: &Point<T>,
        _euclidean_grad: &DMatrix<T>,
        euclidean_hvp: &DMatrix<T>,
        _direction: &TangentVector<T>,
    ) -> Result<TangentVector<T>> {
        self.project_tangent(point, euclidean_hvp)
    }

    fn exp_step(&self, point: &Point<T>, tangent: &TangentVector<T>, t: T) -> Result<Point<T>> {
        self.check_shape(point)?;
        self.check_shape(tangent)?;
        Ok(point + tangent * t)
    }

    fn retract_step(
        &self,
        point: &Point<T>,
        tangent: &TangentVector<T>,
        t: T,
    ) -> Result<Point<T>> {
        self.exp_step(point, tangent, t)
    }

    fn log(&self, point: &Point<T>, other: &Point<T>) -> Result<TangentVector<T>> {
        self.check_shape(point)?;
        self.check_shape(other)?;
        Ok(other - point)
    }

    fn inverse_retract(&self, point: &Point<T>, other: &Point<T>) -> Result<TangentVector<T>> {
        self.log(point, other)
    }

    fn random_point(&self) -> Result<Point<T>> {
        let rows = self.rows;
        Ok(DMatrix::from_fn(self.rows, self.cols, |i, j| {
            <T as Float>::sin(<T as Scalar>::from_usize(1 + i + rows * j))
        }))
    }

    fn random_tangent(&self, point: &Point<T>) -> Result<TangentVector<T>> {
        self.check_shape(point)?;
        let mut tangent = DMatrix::zeros(self.rows, self.cols);
        tangent[(0, 0)] = T::one();
        Ok(tangent)
    }

    fn pair_mean(&self, x: &Point<T>, y: &Point<T>) -> Result<Point<T>> {
        self.check_shape(x)?;
        self.check_shape(y)?;
        Ok((x + y) * <T as Scalar>::from_f64(0.5))
    }

    fn identity_hash(&self, point: &Point<T>) -> Result<String> {
        self.check_shape(point)?;
        Ok(tagged_digest("e", point))
    }
}
