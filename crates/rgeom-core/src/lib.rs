//! Core traits and types for manifold descriptors.
//!
//! This crate defines the contract a generic Riemannian solver relies on to
//! treat a constrained set of matrices as a smooth manifold. The solver
//! itself, cost functions and line searches live elsewhere; they only call
//! the operations defined here.
//!
//! # Key Concepts
//!
//! - **Manifolds**: Smooth constrained sets that locally resemble Euclidean space
//! - **Tangent Spaces**: Linear approximations of manifolds at each point
//! - **Riemannian Metrics**: Inner products on tangent spaces
//! - **Retractions**: Cheap maps from tangent spaces back to the manifold
//!
//! # Modules
//!
//! - [`config`]: Descriptor configuration and its builder
//! - [`error`]: Error types for manifold operations
//! - [`hash`]: Content digests for point caching
//! - [`manifold`]: The [`ManifoldDescriptor`](manifold::ManifoldDescriptor) trait
//! - [`types`]: Type aliases and numerical constants
//! - [`validation`]: Numerical self-checks of descriptors

pub mod config;
pub mod error;
pub mod hash;
pub mod manifold;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_manifolds;

// Re-export commonly used items at the crate root
pub use error::{ManifoldError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use rgeom_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{DescriptorConfig, DescriptorConfigBuilder};
    pub use crate::error::{ManifoldError, Result};
    pub use crate::manifold::ManifoldDescriptor;
    pub use crate::types::{
        constants, DMatrix, DVector, FlatTangent, Point, Scalar, Shape, TangentVector,
    };
    pub use crate::validation::{ConvergenceResult, NumericalValidator, ValidationConfig};
}
