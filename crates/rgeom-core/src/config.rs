//! Runtime configuration shared by manifold descriptors.
//!
//! A descriptor is configured once at construction. The configuration never
//! changes afterwards, so a single instance can be shared across solver
//! worker threads without synchronization.

use crate::{
    error::{ManifoldError, Result},
    types::Scalar,
};
use num_traits::Float;

/// Numerical behaviour of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptorConfig<T> {
    /// Check that input points lie on the manifold and that tangent inputs
    /// are tangent before operating on them.
    pub strict_validation: bool,
    /// Tolerance used by strict validation.
    pub membership_tolerance: T,
    /// Matrices whose Frobenius norm is at or below this value are never
    /// normalized; the operation fails instead.
    pub normalization_epsilon: T,
}

impl<T: Scalar> Default for DescriptorConfig<T> {
    fn default() -> Self {
        Self {
            strict_validation: false,
            membership_tolerance: <T as Float>::sqrt(<T as Scalar>::EPSILON),
            normalization_epsilon: <T as Scalar>::EPSILON,
        }
    }
}

impl<T: Scalar> DescriptorConfig<T> {
    /// Check that the tolerances are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.membership_tolerance > T::zero()) {
            return Err(ManifoldError::invalid_parameter(format!(
                "membership tolerance must be positive, got {}",
                self.membership_tolerance
            )));
        }
        if !(self.normalization_epsilon >= T::zero()) {
            return Err(ManifoldError::invalid_parameter(format!(
                "normalization epsilon must be non-negative, got {}",
                self.normalization_epsilon
            )));
        }
        Ok(())
    }
}

/// Builder for creating a custom descriptor configuration.
pub struct DescriptorConfigBuilder<T> {
    config: DescriptorConfig<T>,
}

impl<T: Scalar> DescriptorConfigBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: DescriptorConfig::default(),
        }
    }

    /// Enable or disable strict input validation.
    pub fn strict_validation(mut self, enabled: bool) -> Self {
        self.config.strict_validation = enabled;
        self
    }

    /// Set the tolerance used by strict validation.
    pub fn membership_tolerance(mut self, tolerance: T) -> Self {
        self.config.membership_tolerance = tolerance;
        self
    }

    /// Set the smallest norm that may still be normalized.
    pub fn normalization_epsilon(mut self, epsilon: T) -> Self {
        self.config.normalization_epsilon = epsilon;
        self
    }

    /// Build the configuration, rejecting unusable tolerances.
    pub fn build(self) -> Result<DescriptorConfig<T>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl<T: Scalar> Default for DescriptorConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
