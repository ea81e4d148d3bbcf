//! Index construction and candidate retrieval.

use std::collections::HashSet;

use crate::dataset::{Oid, Relation};
use crate::error::{LshError, Result};
use crate::lsh::bucket::{reduce, BucketTable};
use crate::lsh::family::{HashFamily, HashFunction, InputKind};
use crate::stats::MetricsSink;

/// Recommended default bucket count: a prime, so hash codes sharing a
/// common factor do not cluster systematically.
pub const DEFAULT_BUCKETS: usize = 7919;

/// Statistic key: mean occupants per populated bucket of a build,
/// aggregated over all tables.
pub const MEAN_FILL_KEY: &str = "lsh-index.mean-fill";

/// Statistic key: number of hash functions of a build.
pub const HASHFUNCTIONS_KEY: &str = "lsh-index.hashfunctions";

/// Validated build configuration.
///
/// Immutable once constructed; one configuration can build any number
/// of indexes over different datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LshConfig {
    l: usize,
    num_buckets: usize,
}

impl LshConfig {
    /// `l` hash tables, `num_buckets` buckets per table.
    ///
    /// Invalid values fail here, never mid-build.
    pub fn new(l: usize, num_buckets: usize) -> Result<Self> {
        if l == 0 {
            return Err(LshError::InvalidTableCount(l));
        }
        if num_buckets <= 1 {
            return Err(LshError::InvalidBucketCount(num_buckets));
        }
        Ok(Self { l, num_buckets })
    }

    /// `l` tables with the recommended prime bucket count.
    pub fn with_default_buckets(l: usize) -> Result<Self> {
        Self::new(l, DEFAULT_BUCKETS)
    }

    pub fn l(&self) -> usize {
        self.l
    }

    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }
}

/// Builds LSH indexes from a hash family and a validated configuration.
///
/// Holds no mutable state; instantiating an index never changes the
/// builder, so one builder serves any number of datasets.
#[derive(Debug, Clone)]
pub struct LshIndexBuilder<F> {
    family: F,
    config: LshConfig,
}

impl<F: HashFamily> LshIndexBuilder<F> {
    pub fn new(family: F, config: LshConfig) -> Self {
        Self { family, config }
    }

    /// Input type accepted by the underlying hash family.
    ///
    /// Callers check dataset compatibility against this before
    /// building; it is a precondition of [`instantiate`], not a check
    /// repeated inside the build.
    ///
    /// [`instantiate`]: LshIndexBuilder::instantiate
    pub fn input_kind(&self) -> InputKind {
        self.family.input_kind()
    }

    pub fn config(&self) -> LshConfig {
        self.config
    }

    /// Build an index over `relation` in a single sequential pass.
    ///
    /// An empty relation is fine: the result has `l` tables with zero
    /// populated buckets.
    pub fn instantiate<R>(&self, relation: &R) -> LshIndex<F::Function>
    where
        R: Relation<Object = F::Object>,
    {
        self.build(relation, None)
    }

    /// Build an index and report build statistics to `sink`.
    ///
    /// Emits [`MEAN_FILL_KEY`] (omitted when no bucket is populated)
    /// and [`HASHFUNCTIONS_KEY`].
    pub fn instantiate_with_stats<R>(
        &self,
        relation: &R,
        sink: &mut dyn MetricsSink,
    ) -> LshIndex<F::Function>
    where
        R: Relation<Object = F::Object>,
    {
        self.build(relation, Some(sink))
    }

    fn build<R>(&self, relation: &R, sink: Option<&mut dyn MetricsSink>) -> LshIndex<F::Function>
    where
        R: Relation<Object = F::Object>,
    {
        let hashers = self.family.generate(relation, self.config.l);
        debug_assert_eq!(hashers.len(), self.config.l, "family broke the l contract");

        let num_buckets = self.config.num_buckets;
        let mut tables: Vec<BucketTable> = hashers
            .iter()
            .map(|_| BucketTable::with_capacity(num_buckets))
            .collect();

        for (oid, object) in relation.scan() {
            for (hasher, table) in hashers.iter().zip(tables.iter_mut()) {
                let code = hasher.hash_object(object);
                table.insert(reduce(code, num_buckets), oid);
            }
        }

        let index = LshIndex {
            hashers,
            tables,
            num_buckets,
        };
        if let Some(sink) = sink {
            if let Some(fill) = index.mean_fill() {
                sink.put_double(MEAN_FILL_KEY, fill);
            }
            sink.put_count(HASHFUNCTIONS_KEY, index.hash_count() as u64);
        }
        index
    }
}

/// A built LSH index: `l` hash functions and their `l` bucket tables.
///
/// Construction is the only mutation; afterwards the index is read-only
/// and safe to share across threads without locking.
#[derive(Debug, Clone)]
pub struct LshIndex<H> {
    hashers: Vec<H>,
    tables: Vec<BucketTable>,
    num_buckets: usize,
}

impl<H> LshIndex<H> {
    /// Number of hash functions, always equal to the table count.
    pub fn hash_count(&self) -> usize {
        self.hashers.len()
    }

    /// Bucket count each table reduces codes into.
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// The bucket tables, one per hash function.
    pub fn tables(&self) -> &[BucketTable] {
        &self.tables
    }

    /// Occupants of the bucket `hash_code` reduces to in table `table`.
    ///
    /// The lookup a query component drives: hash the query with each of
    /// the `l` functions, fetch the matching bucket of each table, and
    /// union the results into a candidate set for exact re-ranking.
    pub fn bucket_of(&self, table: usize, hash_code: i64) -> &[Oid] {
        self.tables[table].get(reduce(hash_code, self.num_buckets))
    }

    /// Populated buckets across all tables combined.
    pub fn populated_buckets(&self) -> usize {
        self.tables.iter().map(BucketTable::populated).sum()
    }

    /// Mean occupants per populated bucket, over all tables combined.
    ///
    /// `None` when no bucket is populated, as after building over an
    /// empty relation.
    pub fn mean_fill(&self) -> Option<f64> {
        let populated = self.populated_buckets();
        if populated == 0 {
            return None;
        }
        let occupants: usize = self.tables.iter().map(BucketTable::occupancy).sum();
        Some(occupants as f64 / populated as f64)
    }

    /// Candidate OIDs for `query`: every object sharing a bucket with
    /// it in at least one table, deduplicated and sorted by OID.
    pub fn candidates<V>(&self, query: &V) -> Vec<Oid>
    where
        V: ?Sized,
        H: HashFunction<V>,
    {
        let mut seen: HashSet<Oid> = HashSet::new();
        for (hasher, table) in self.hashers.iter().zip(&self.tables) {
            let bucket = reduce(hasher.hash_object(query), self.num_buckets);
            seen.extend(table.get(bucket).iter().copied());
        }
        let mut out: Vec<Oid> = seen.into_iter().collect();
        out.sort_unstable();
        out
    }

    /// Candidates re-ranked by an exact distance, ascending, truncated
    /// to `k`.
    ///
    /// Hashing only narrows the field; the caller supplies the exact
    /// distance (typically a lookup into the original relation) to
    /// finish the job.
    pub fn rank_candidates<V, D>(&self, query: &V, k: usize, mut distance: D) -> Vec<(Oid, f32)>
    where
        V: ?Sized,
        H: HashFunction<V>,
        D: FnMut(Oid) -> f32,
    {
        let mut ranked: Vec<(Oid, f32)> = self
            .candidates(query)
            .into_iter()
            .map(|oid| (oid, distance(oid)))
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        ranked
    }
}
