//! Random-hyperplane hashing for cosine similarity.
//!
//! Charikar's sign-of-projection construction: draw `k` random
//! hyperplanes from the standard normal distribution and record which
//! side of each plane a vector falls on. Two vectors at angle θ agree
//! on each sign bit with probability `1 - θ/π`, so small angles mean
//! frequent collisions.
//!
//! ## References
//!
//! - Charikar (2002). "Similarity estimation techniques from rounding
//!   algorithms."

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::dataset::Relation;
use crate::error::{LshError, Result};
use crate::lsh::family::{HashFamily, HashFunction, InputKind};

/// Family of sign-of-projection hash functions over dense vectors.
///
/// Generation is deterministic for a given seed, so a configuration can
/// be rebuilt reproducibly.
#[derive(Debug, Clone)]
pub struct RandomHyperplaneFamily {
    dim: usize,
    projections: usize,
    seed: u64,
}

impl RandomHyperplaneFamily {
    /// Family for `dim`-dimensional vectors with `projections` sign
    /// bits per hash function.
    ///
    /// More projections spread objects over more buckets (fewer false
    /// collisions, lower recall per table).
    pub fn new(dim: usize, projections: usize, seed: u64) -> Result<Self> {
        if dim == 0 {
            return Err(LshError::InvalidDimension);
        }
        if projections == 0 || projections > 63 {
            return Err(LshError::InvalidProjectionCount(projections));
        }
        Ok(Self {
            dim,
            projections,
            seed,
        })
    }
}

impl HashFamily for RandomHyperplaneFamily {
    type Object = [f32];
    type Function = HyperplaneHash;

    fn generate<R>(&self, _relation: &R, l: usize) -> Vec<HyperplaneHash>
    where
        R: Relation<Object = [f32]>,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..l)
            .map(|_| {
                let planes: Vec<f32> = (0..self.projections * self.dim)
                    .map(|_| rng.sample(StandardNormal))
                    .collect();
                HyperplaneHash {
                    planes,
                    dim: self.dim,
                }
            })
            .collect()
    }

    fn input_kind(&self) -> InputKind {
        InputKind::DenseVector { dim: self.dim }
    }
}

/// One sign-of-projection hash function: `k` hyperplanes, `k` sign bits.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperplaneHash {
    /// Hyperplane normals, row-major `projections x dim`.
    planes: Vec<f32>,
    dim: usize,
}

impl HashFunction<[f32]> for HyperplaneHash {
    fn hash_object(&self, object: &[f32]) -> i64 {
        let mut code = 0i64;
        for (bit, plane) in self.planes.chunks_exact(self.dim).enumerate() {
            let dot: f32 = plane.iter().zip(object).map(|(p, x)| p * x).sum();
            if dot >= 0.0 {
                code |= 1 << bit;
            }
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::VectorSet;

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            RandomHyperplaneFamily::new(0, 8, 1).unwrap_err(),
            LshError::InvalidDimension
        );
        assert_eq!(
            RandomHyperplaneFamily::new(4, 0, 1).unwrap_err(),
            LshError::InvalidProjectionCount(0)
        );
        assert_eq!(
            RandomHyperplaneFamily::new(4, 64, 1).unwrap_err(),
            LshError::InvalidProjectionCount(64)
        );
    }

    #[test]
    fn test_generation_is_reproducible_for_a_seed() {
        let data = VectorSet::new(4);
        let family = RandomHyperplaneFamily::new(4, 8, 42).unwrap();

        let first = family.generate(&data, 3);
        let second = family.generate(&data, 3);

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        // Independent functions draw independent planes.
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn test_code_uses_only_declared_bits() {
        let data = VectorSet::new(4);
        let family = RandomHyperplaneFamily::new(4, 8, 7).unwrap();
        let hashers = family.generate(&data, 2);

        for h in &hashers {
            let code = h.hash_object(&[0.3, -1.2, 0.5, 2.0]);
            assert!(code >= 0);
            assert!(code < 1 << 8);
        }
    }

    #[test]
    fn test_sign_pattern_is_scale_invariant() {
        let data = VectorSet::new(3);
        let family = RandomHyperplaneFamily::new(3, 16, 9).unwrap();
        let hashers = family.generate(&data, 4);

        let v = [0.7, -0.2, 1.1];
        let scaled: Vec<f32> = v.iter().map(|x| x * 8.0).collect();
        for h in &hashers {
            assert_eq!(h.hash_object(&v), h.hash_object(&scaled));
        }
    }

    #[test]
    fn test_declares_vector_input() {
        let family = RandomHyperplaneFamily::new(12, 8, 0).unwrap();
        assert_eq!(family.input_kind(), InputKind::DenseVector { dim: 12 });
    }
}
