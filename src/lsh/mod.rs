//! In-memory LSH index: hash families, bucket tables, and the builder.
//!
//! The moving parts:
//!
//! - [`family`]: the pluggable hash-function capability — a family
//!   generates `l` independent functions per dataset, each mapping an
//!   object to an unbounded signed code.
//! - [`Bucket`]/[`BucketTable`]: per-table storage, a sparse map from
//!   reduced code to the OIDs that landed there.
//! - [`LshIndexBuilder`]/[`LshIndex`]: one sequential pass over the
//!   dataset fills `l` tables; the result is immutable and answers
//!   bucket lookups and candidate queries.
//!
//! Two concrete families ship with the crate: random hyperplanes for
//! cosine similarity ([`hyperplane`]) and 2-stable projections for
//! Euclidean distance ([`pstable`]).

mod bucket;
pub mod family;
pub mod hyperplane;
mod index;
pub mod pstable;

pub use bucket::{reduce, Bucket, BucketTable};
pub use family::{HashFamily, HashFunction, InputKind};
pub use hyperplane::{HyperplaneHash, RandomHyperplaneFamily};
pub use index::{
    LshConfig, LshIndex, LshIndexBuilder, DEFAULT_BUCKETS, HASHFUNCTIONS_KEY, MEAN_FILL_KEY,
};
pub use pstable::{PStableFamily, PStableHash};
