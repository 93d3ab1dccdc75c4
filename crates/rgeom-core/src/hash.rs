//! Content-based identifiers for manifold points.
//!
//! Solvers memoize cost and gradient evaluations keyed by point. The digest
//! depends only on the shape and the entries of the matrix, so two equal
//! matrices always hash identically across runs and threads.

use crate::types::{DMatrix, Scalar};
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a matrix, as lowercase hex.
///
/// The shape is hashed first, then every entry in column-major order as
/// little-endian `f64` bytes, so `f32` and `f64` copies of the same values
/// share a digest. `-0.0` is hashed as `0.0`, so matrices that compare equal
/// share a digest.
pub fn matrix_digest<T: Scalar>(matrix: &DMatrix<T>) -> String {
    let mut hasher = Sha256::new();
    hasher.update((matrix.nrows() as u64).to_le_bytes());
    hasher.update((matrix.ncols() as u64).to_le_bytes());
    for value in matrix.iter() {
        let value = Scalar::to_f64(*value);
        // +0.0 == -0.0 but their bits differ
        let value = if value == 0.0 { 0.0 } else { value };
        hasher.update(value.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Digest of a matrix prefixed with a manifold-family tag.
pub fn tagged_digest<T: Scalar>(tag: &str, matrix: &DMatrix<T>) -> String {
    let digest = matrix_digest(matrix);
    let mut out = String::with_capacity(tag.len() + digest.len());
    out.push_str(tag);
    out.push_str(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        let b = a.clone();
        assert_eq!(matrix_digest(&a), matrix_digest(&b));
        assert_eq!(matrix_digest(&a).len(), 64);
        assert!(matrix_digest(&a).chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_depends_on_values_and_shape() {
        let a = DMatrix::from_column_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        let b = DMatrix::from_column_slice(2, 2, &[0.0, 1.0, 0.0, 0.0]);
        let c = DMatrix::from_column_slice(4, 1, &[1.0, 0.0, 0.0, 0.0]);
        assert_ne!(matrix_digest(&a), matrix_digest(&b));
        assert_ne!(matrix_digest(&a), matrix_digest(&c));
    }

    #[test]
    fn test_digest_matches_across_precisions() {
        let a = DMatrix::from_column_slice(3, 1, &[0.5f64, -0.25, 1.0]);
        let b = DMatrix::from_column_slice(3, 1, &[0.5f32, -0.25, 1.0]);
        assert_eq!(matrix_digest(&a), matrix_digest(&b));
    }

    #[test]
    fn test_signed_zero_shares_digest() {
        let a = DMatrix::from_column_slice(2, 1, &[1.0, 0.0]);
        let b = DMatrix::from_column_slice(2, 1, &[1.0, -0.0]);
        assert_eq!(a, b);
        assert_eq!(matrix_digest(&a), matrix_digest(&b));
        assert_eq!(tagged_digest("z", &a), tagged_digest("z", &b));
    }

    #[test]
    fn test_tagged_digest_prefix() {
        let a = DMatrix::from_column_slice(3, 1, &[1.0, 0.0, 0.0]);
        let h = tagged_digest("z", &a);
        assert!(h.starts_with('z'));
        assert_eq!(&h[1..], matrix_digest(&a));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn perturbing_any_entry_changes_digest(
                values in prop::collection::vec(-1.0e3f64..1.0e3, 1..16),
                index in any::<prop::sample::Index>(),
            ) {
                let n = values.len();
                let a = DMatrix::from_column_slice(n, 1, &values);
                let mut b = a.clone();
                let i = index.index(n);
                b[(i, 0)] += 1.0;
                prop_assert_ne!(matrix_digest(&a), matrix_digest(&b));
                prop_assert_eq!(matrix_digest(&a), matrix_digest(&a.clone()));
            }
        }
    }
}
