//! p-stable projection hashing for Euclidean distance.
//!
//! The Datar et al. construction with the 2-stable (Gaussian)
//! distribution: project onto a random direction, shift by a random
//! offset, and cut the projected line into segments of width `w`. The
//! projection of the difference of two vectors is Gaussian with scale
//! proportional to their Euclidean distance, so nearby vectors fall
//! into the same segment with high probability.
//!
//! ## References
//!
//! - Datar, Immorlica, Indyk, Mirrokni (2004). "Locality-sensitive
//!   hashing scheme based on p-stable distributions."

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::dataset::Relation;
use crate::error::{LshError, Result};
use crate::lsh::family::{HashFamily, HashFunction, InputKind};

/// Family of 2-stable projection hash functions over dense vectors.
#[derive(Debug, Clone)]
pub struct PStableFamily {
    dim: usize,
    projections: usize,
    width: f32,
    seed: u64,
}

impl PStableFamily {
    /// Family for `dim`-dimensional vectors: `projections` segment
    /// terms per hash function, segments of `width` on each projected
    /// line.
    ///
    /// `width` trades collision rate against selectivity; it should be
    /// on the order of the distances that count as "near".
    pub fn new(dim: usize, projections: usize, width: f32, seed: u64) -> Result<Self> {
        if dim == 0 {
            return Err(LshError::InvalidDimension);
        }
        if projections == 0 || projections > 63 {
            return Err(LshError::InvalidProjectionCount(projections));
        }
        if !(width > 0.0 && width.is_finite()) {
            return Err(LshError::InvalidBucketWidth(width));
        }
        Ok(Self {
            dim,
            projections,
            width,
            seed,
        })
    }
}

impl HashFamily for PStableFamily {
    type Object = [f32];
    type Function = PStableHash;

    fn generate<R>(&self, _relation: &R, l: usize) -> Vec<PStableHash>
    where
        R: Relation<Object = [f32]>,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..l)
            .map(|_| {
                let directions: Vec<f32> = (0..self.projections * self.dim)
                    .map(|_| rng.sample(StandardNormal))
                    .collect();
                let offsets: Vec<f32> = (0..self.projections)
                    .map(|_| rng.random_range(0.0..self.width))
                    .collect();
                PStableHash {
                    directions,
                    offsets,
                    width: self.width,
                    dim: self.dim,
                }
            })
            .collect()
    }

    fn input_kind(&self) -> InputKind {
        InputKind::DenseVector { dim: self.dim }
    }
}

/// One 2-stable hash function: `k` shifted projections, segment-counted
/// and mixed into a single signed code.
#[derive(Debug, Clone, PartialEq)]
pub struct PStableHash {
    /// Projection directions, row-major `projections x dim`.
    directions: Vec<f32>,
    /// Per-projection offsets, uniform in `[0, width)`.
    offsets: Vec<f32>,
    width: f32,
    dim: usize,
}

impl HashFunction<[f32]> for PStableHash {
    fn hash_object(&self, object: &[f32]) -> i64 {
        let mut code = 0i64;
        for (direction, &offset) in self.directions.chunks_exact(self.dim).zip(&self.offsets) {
            let dot: f32 = direction.iter().zip(object).map(|(a, x)| a * x).sum();
            let segment = ((dot + offset) / self.width).floor() as i64;
            code = code.wrapping_mul(31).wrapping_add(segment);
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
            PStableFamily::new(0, 4, 1.0, 1).unwrap_err(),
            LshError::InvalidDimension
        );
        assert_eq!(
            PStableFamily::new(8, 0, 1.0, 1).unwrap_err(),
            LshError::InvalidProjectionCount(0)
        );
        assert_eq!(
            PStableFamily::new(8, 4, 0.0, 1).unwrap_err(),
            LshError::InvalidBucketWidth(0.0)
        );
        assert_eq!(
            PStableFamily::new(8, 4, -2.0, 1).unwrap_err(),
            LshError::InvalidBucketWidth(-2.0)
        );
        assert!(matches!(
            PStableFamily::new(8, 4, f32::NAN, 1),
            Err(LshError::InvalidBucketWidth(w)) if w.is_nan()
        ));
    }

    #[test]
    fn test_generation_is_reproducible_for_a_seed() {
        let data = VectorSet::new(6);
        let family = PStableFamily::new(6, 4, 2.0, 17).unwrap();

        let first = family.generate(&data, 5);
        let second = family.generate(&data, 5);

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn test_hashing_is_a_pure_function() {
        let data = VectorSet::new(4);
        let family = PStableFamily::new(4, 8, 1.5, 3).unwrap();
        let hashers = family.generate(&data, 2);

        let v = [0.25, -3.0, 1.0, 0.5];
        for h in &hashers {
            assert_eq!(h.hash_object(&v), h.hash_object(&v));
        }
    }

    #[test]
    fn test_declares_vector_input() {
        let family = PStableFamily::new(32, 4, 4.0, 0).unwrap();
        assert_eq!(family.input_kind(), InputKind::DenseVector { dim: 32 });
    }
}
