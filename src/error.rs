//! Error types for collide.
//!
//! All errors here are configuration rejections, surfaced before any
//! build starts. The build pass itself has no recoverable error states:
//! it performs no I/O, and a hash function that panics on its own input
//! is a contract violation by the supplied family, not a condition this
//! crate catches.

use thiserror::Error;

/// Rejected-configuration errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LshError {
    /// At least one hash table is required.
    #[error("number of hash tables must be positive, got {0}")]
    InvalidTableCount(usize),
    /// Bucket counts of 0 or 1 cannot spread objects at all.
    #[error("number of buckets must be at least 2, got {0}")]
    InvalidBucketCount(usize),
    /// Hash families over dense vectors need a positive dimensionality.
    #[error("vector dimension must be positive")]
    InvalidDimension,
    /// Projection counts are limited by the 64-bit hash code.
    #[error("projections per hash function must be between 1 and 63, got {0}")]
    InvalidProjectionCount(usize),
    /// p-stable hashing cuts the projected line into segments of this width.
    #[error("bucket width must be positive and finite, got {0}")]
    InvalidBucketWidth(f32),
}

pub type Result<T> = std::result::Result<T, LshError>;
