//! Bucket storage: one sparse hash table of OID sets.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::dataset::Oid;

/// Reduce an unbounded hash code to a bucket index in `[0, num_buckets)`.
///
/// Euclidean remainder, so negative codes still land in range.
pub fn reduce(code: i64, num_buckets: usize) -> usize {
    debug_assert!(num_buckets > 0);
    code.rem_euclid(num_buckets as i64) as usize
}

/// Occupants of one bucket.
///
/// When the bucket count is chosen large relative to the dataset (a
/// prime near the dataset size is the usual pick), most populated
/// buckets hold exactly one object, so that state stores the OID inline
/// with no collection overhead. The second insertion into the same
/// bucket promotes to `Many`, keeping the original occupant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Bucket {
    /// No occupants.
    #[default]
    Empty,
    /// Exactly one occupant.
    One(Oid),
    /// Two or more occupants, in insertion order.
    Many(SmallVec<[Oid; 4]>),
}

impl Bucket {
    /// Add an occupant, promoting the representation as needed.
    ///
    /// Empty → One on the first insertion, One → Many on the second
    /// (copying only the single prior occupant), append afterwards.
    pub fn push(&mut self, oid: Oid) {
        match self {
            Bucket::Empty => *self = Bucket::One(oid),
            Bucket::One(first) => {
                let mut occupants = SmallVec::new();
                occupants.push(*first);
                occupants.push(oid);
                *self = Bucket::Many(occupants);
            }
            Bucket::Many(occupants) => occupants.push(oid),
        }
    }

    /// Occupants as a slice; empty for [`Bucket::Empty`].
    pub fn as_slice(&self) -> &[Oid] {
        match self {
            Bucket::Empty => &[],
            Bucket::One(oid) => std::slice::from_ref(oid),
            Bucket::Many(occupants) => occupants,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Bucket::Empty)
    }
}

/// One hash table: a sparse map from bucket index to occupants.
///
/// A bucket absent from the map and an empty bucket are the same
/// observable state; [`get`](BucketTable::get) returns an empty slice
/// for both. Every bucket actually stored is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketTable {
    buckets: HashMap<usize, Bucket>,
}

impl BucketTable {
    /// Table capacity-hinted for `num_buckets` potential buckets.
    ///
    /// The populated count after a build is usually far smaller.
    pub fn with_capacity(num_buckets: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(num_buckets),
        }
    }

    /// Occupants of `bucket`; empty slice if unpopulated.
    pub fn get(&self, bucket: usize) -> &[Oid] {
        match self.buckets.get(&bucket) {
            Some(b) => b.as_slice(),
            None => &[],
        }
    }

    /// Insert `oid` into `bucket`. The only mutator.
    pub fn insert(&mut self, bucket: usize, oid: Oid) {
        self.buckets.entry(bucket).or_default().push(oid);
    }

    /// Number of populated buckets.
    pub fn populated(&self) -> usize {
        self.buckets.len()
    }

    /// Total occupants across all populated buckets.
    pub fn occupancy(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    /// Iterate over populated buckets as `(bucket index, occupants)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Oid])> {
        self.buckets.iter().map(|(&b, set)| (b, set.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(raw: u32) -> Oid {
        Oid::new(raw)
    }

    #[test]
    fn test_reduce_handles_negative_codes() {
        assert_eq!(reduce(7, 3), 1);
        assert_eq!(reduce(-7, 3), 2);
        assert_eq!(reduce(-1, 7919), 7918);
        assert_eq!(reduce(i64::MIN, 3), (i64::MIN).rem_euclid(3) as usize);
    }

    #[test]
    fn test_reduce_single_bucket_collapses_everything() {
        for code in [i64::MIN, -5, -1, 0, 1, 42, i64::MAX] {
            assert_eq!(reduce(code, 1), 0);
        }
    }

    #[test]
    fn test_bucket_promotion_preserves_first_occupant() {
        let mut bucket = Bucket::Empty;
        assert!(bucket.is_empty());

        bucket.push(oid(5));
        assert_eq!(bucket, Bucket::One(oid(5)));
        assert_eq!(bucket.as_slice(), &[oid(5)]);

        bucket.push(oid(9));
        assert_eq!(bucket.as_slice(), &[oid(5), oid(9)]);

        bucket.push(oid(1));
        assert_eq!(bucket.as_slice(), &[oid(5), oid(9), oid(1)]);
        assert_eq!(bucket.len(), 3);
    }

    #[test]
    fn test_table_absent_bucket_reads_empty() {
        let table = BucketTable::with_capacity(16);
        assert!(table.get(3).is_empty());
        assert_eq!(table.populated(), 0);
        assert_eq!(table.occupancy(), 0);
    }

    #[test]
    fn test_table_insert_and_get() {
        let mut table = BucketTable::with_capacity(16);
        table.insert(3, oid(0));
        table.insert(3, oid(1));
        table.insert(8, oid(2));

        assert_eq!(table.get(3), &[oid(0), oid(1)]);
        assert_eq!(table.get(8), &[oid(2)]);
        assert_eq!(table.populated(), 2);
        assert_eq!(table.occupancy(), 3);
    }

    #[test]
    fn test_table_iter_covers_all_occupants() {
        let mut table = BucketTable::default();
        table.insert(0, oid(0));
        table.insert(1, oid(1));
        table.insert(0, oid(2));

        let mut seen: Vec<Oid> = table.iter().flat_map(|(_, s)| s.iter().copied()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![oid(0), oid(1), oid(2)]);
    }
}
