//! The pluggable hash-function capability.
//!
//! A locality-sensitive family is chosen at configuration time and
//! handed to the index builder; the builder asks it for `l` independent
//! functions per dataset. Concrete families live in
//! [`hyperplane`](crate::lsh::hyperplane) and
//! [`pstable`](crate::lsh::pstable); anything implementing these two
//! traits plugs in the same way.

use crate::dataset::Relation;

/// A single locality-sensitive hash function.
///
/// A pure function of the object value: parameters such as projection
/// vectors are fixed at construction and never mutated. Codes are
/// unbounded signed integers; reducing them to a bucket index is the
/// index's concern, not the hash function's.
pub trait HashFunction<V: ?Sized> {
    /// Hash one object value to its unbounded code.
    fn hash_object(&self, object: &V) -> i64;
}

/// A family of independent locality-sensitive hash functions.
///
/// [`generate`](HashFamily::generate) must return exactly `l`
/// functions. Families declare the input they accept via
/// [`input_kind`](HashFamily::input_kind) so callers can validate a
/// dataset before attempting a build; compatibility is a precondition
/// of `generate`, not re-checked inside it.
pub trait HashFamily {
    /// Object value type the family hashes.
    type Object: ?Sized;

    /// Concrete hash function type the family produces.
    type Function: HashFunction<Self::Object>;

    /// Generate `l` independent hash functions for `relation`.
    fn generate<R>(&self, relation: &R, l: usize) -> Vec<Self::Function>
    where
        R: Relation<Object = Self::Object>;

    /// The input type this family accepts.
    fn input_kind(&self) -> InputKind;
}

/// Describes the input a hash family accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Dense vectors of a fixed dimensionality.
    DenseVector { dim: usize },
    /// Any object type.
    Any,
}

impl InputKind {
    /// Whether data of kind `other` satisfies this restriction.
    pub fn accepts(self, other: InputKind) -> bool {
        match self {
            InputKind::Any => true,
            restriction => restriction == other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_compatibility() {
        let vec8 = InputKind::DenseVector { dim: 8 };
        let vec16 = InputKind::DenseVector { dim: 16 };

        assert!(InputKind::Any.accepts(vec8));
        assert!(InputKind::Any.accepts(InputKind::Any));
        assert!(vec8.accepts(vec8));
        assert!(!vec8.accepts(vec16));
        assert!(!vec8.accepts(InputKind::Any));
    }
}
