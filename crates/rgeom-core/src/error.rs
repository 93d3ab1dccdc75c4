//! Error types for manifold descriptor operations.
//!
//! Every operator reports failures synchronously through [`ManifoldError`].
//! The descriptor holds no state, so there is nothing to roll back: the caller
//! (usually a solver) decides whether an error aborts the run or triggers a
//! corrective step such as re-sampling.

use thiserror::Error;

/// Errors that can occur during manifold operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManifoldError {
    /// Point is not on the manifold.
    ///
    /// Only raised when strict validation is enabled in the descriptor
    /// configuration.
    #[error("Point is not on the manifold: {reason}")]
    InvalidPoint {
        /// Description of why the point is invalid
        reason: String,
    },

    /// Vector is not in the tangent space.
    ///
    /// Only raised when strict validation is enabled in the descriptor
    /// configuration.
    #[error("Vector is not in the tangent space: {reason}")]
    InvalidTangent {
        /// Description of why the tangent vector is invalid
        reason: String,
    },

    /// An input does not have the shape the manifold was configured with.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A matrix with (near) zero norm was about to be normalized.
    ///
    /// Typical sources are the pair mean of antipodal points, a retraction
    /// along `-x` with unit step, or a pathological zero random draw.
    #[error("Degenerate normalization in {operation}: norm {norm:e} is too small")]
    DegenerateNormalization {
        /// Operation that attempted the normalization
        operation: String,
        /// Frobenius norm of the offending matrix
        norm: f64,
    },

    /// Numerical instability detected.
    ///
    /// Raised for non-finite intermediate values or inputs outside the
    /// domain of an operator.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Invalid construction or configuration parameter.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the invalid parameter
        reason: String,
    },
}

impl ManifoldError {
    /// Create an InvalidPoint error with a custom reason.
    pub fn invalid_point<S: Into<String>>(reason: S) -> Self {
        Self::InvalidPoint {
            reason: reason.into(),
        }
    }

    /// Create an InvalidTangent error with a custom reason.
    pub fn invalid_tangent<S: Into<String>>(reason: S) -> Self {
        Self::InvalidTangent {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a DegenerateNormalization error.
    pub fn degenerate_normalization<S: Into<String>>(operation: S, norm: f64) -> Self {
        Self::DegenerateNormalization {
            operation: operation.into(),
            norm,
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the shape of an input.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Returns `true` when the failure came from normalizing a near-zero matrix.
    ///
    /// Solvers can use this to decide whether re-sampling is worth a try.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateNormalization { .. })
    }
}

/// Result type alias for operations that can produce ManifoldError.
pub type Result<T> = std::result::Result<T, ManifoldError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_creation() {
        let err = ManifoldError::invalid_point("norm is 2");
        assert!(matches!(err, ManifoldError::InvalidPoint { .. }));
        assert_eq!(err.to_string(), "Point is not on the manifold: norm is 2");

        let err = ManifoldError::dimension_mismatch("3x1", "2x2");
        assert!(err.is_shape_error());
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3x1, got 2x2");
    }

    #[test]
    fn test_degenerate_normalization_display() {
        let err = ManifoldError::degenerate_normalization("pair_mean", 0.0);
        assert!(err.is_degenerate());
        assert!(!err.is_shape_error());
        assert_eq!(
            err.to_string(),
            "Degenerate normalization in pair_mean: norm 0e0 is too small"
        );
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            ManifoldError::invalid_point("not unit norm"),
            ManifoldError::invalid_tangent("not orthogonal to point"),
            ManifoldError::dimension_mismatch("2x2", "4x1"),
            ManifoldError::degenerate_normalization("retract", 1e-300),
            ManifoldError::numerical_error("non-finite result"),
            ManifoldError::invalid_parameter("rows must be positive"),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_errors_compare_by_value() {
        assert_eq!(
            ManifoldError::numerical_error("x"),
            ManifoldError::numerical_error("x")
        );
        assert_ne!(
            ManifoldError::invalid_point("x"),
            ManifoldError::invalid_tangent("x")
        );
    }
}
