//! rgeom Manifolds - Concrete manifold descriptors.
//!
//! This crate provides implementations of the
//! [`ManifoldDescriptor`](rgeom_core::manifold::ManifoldDescriptor) contract
//! for use by external Riemannian solvers.

pub mod sphere;
pub mod utils;

pub use sphere::SphereManifold;
