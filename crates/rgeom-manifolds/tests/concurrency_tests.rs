//! A single descriptor shared by many threads.

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use rgeom_core::manifold::ManifoldDescriptor;
use rgeom_manifolds::SphereManifold;
use std::sync::Arc;

#[test]
fn test_parallel_operations_on_shared_descriptor() {
    let sphere = Arc::new(SphereManifold::<f64>::new(5, 3).unwrap());

    let residuals: Vec<f64> = (0..256u64)
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let x = sphere.random_point_with(&mut rng).unwrap();
            let d = sphere.random_tangent_with(&x, &mut rng).unwrap();
            let y = sphere.exp(&x, &d).unwrap();
            let back = sphere.log(&x, &y).unwrap();
            (&back - &d).norm()
        })
        .collect();

    assert_eq!(residuals.len(), 256);
    assert!(residuals.iter().all(|&r| r < 1e-9));
}

#[test]
fn test_parallel_results_match_sequential() {
    let sphere = SphereManifold::<f64>::new(3, 3).unwrap();

    let sequential: Vec<String> = (0..64u64)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let x = sphere.random_point_with(&mut rng).unwrap();
            sphere.identity_hash(&x).unwrap()
        })
        .collect();

    let parallel: Vec<String> = (0..64u64)
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let x = sphere.random_point_with(&mut rng).unwrap();
            sphere.identity_hash(&x).unwrap()
        })
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_thread_local_sampling_from_many_threads() {
    let sphere = SphereManifold::<f64>::vector(4).unwrap();
    let on_sphere = (0..128)
        .into_par_iter()
        .filter(|_| {
            let x = sphere.random_point().unwrap();
            sphere.is_point_on_manifold(&x, 1e-12)
        })
        .count();
    assert_eq!(on_sphere, 128);
}
