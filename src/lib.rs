//! collide: in-memory Locality Sensitive Hashing index primitives.
//!
//! LSH flips the usual goal of hashing: similar objects *should*
//! collide. A locality-sensitive family is built so that
//!
//! - P\[h(a) = h(b)\] is high when a and b are similar
//! - P\[h(a) = h(b)\] is low when they are not
//!
//! One hash table of such buckets already beats exhaustive comparison:
//! a query only needs to look at the objects in its own bucket. One
//! table alone misses too much, though, so the index keeps `l`
//! independent tables (amplification) — an object becomes a candidate
//! if it collides with the query in *any* of them.
//!
//! ## How the index is built
//!
//! A [`HashFamily`](lsh::HashFamily) generates `l` independent
//! functions for the dataset. One sequential pass hashes every object
//! with all `l` functions, reduces each unbounded code to
//! `[0, num_buckets)` with sign-correct modular arithmetic, and files
//! the object's [`Oid`] into the matching bucket of each table. The
//! result is read-only: queries can share it freely across threads.
//!
//! Buckets hold identifiers, never values — exact re-ranking of the
//! candidate set against the original data is the caller's last step.
//!
//! ## Choosing parameters
//!
//! | Knob | Effect |
//! |------|--------|
//! | `l` (tables) | More tables, higher recall, more memory |
//! | `num_buckets` | Pick a prime near the dataset size; default 7919 |
//! | family parameters | Control per-table selectivity |
//!
//! ## Example
//!
//! ```
//! use collide::lsh::{LshConfig, LshIndexBuilder, RandomHyperplaneFamily};
//! use collide::VectorSet;
//!
//! let mut data = VectorSet::new(4);
//! data.push(&[1.0, 0.0, 0.0, 0.0]);
//! data.push(&[0.9, 0.1, 0.0, 0.0]);
//! data.push(&[0.0, 0.0, 1.0, 0.0]);
//!
//! let family = RandomHyperplaneFamily::new(4, 12, 42)?;
//! let config = LshConfig::new(8, 31)?;
//! let index = LshIndexBuilder::new(family, config).instantiate(&data);
//!
//! // The query vector collides with itself in every table, so its own
//! // OID is always among the candidates.
//! let candidates = index.candidates(&[1.0, 0.0, 0.0, 0.0][..]);
//! assert!(!candidates.is_empty());
//! # Ok::<(), collide::LshError>(())
//! ```
//!
//! ## References
//!
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards
//!   removing the curse of dimensionality."
//! - Charikar (2002). "Similarity estimation techniques from rounding
//!   algorithms."
//! - Datar et al. (2004). "Locality-sensitive hashing scheme based on
//!   p-stable distributions."

pub mod dataset;
pub mod error;
pub mod lsh;
pub mod stats;

pub use dataset::{Oid, Relation, VecRelation, VectorSet};
pub use error::{LshError, Result};
pub use lsh::{HashFamily, HashFunction, LshConfig, LshIndex, LshIndexBuilder};
pub use stats::{MemorySink, MetricsSink};
