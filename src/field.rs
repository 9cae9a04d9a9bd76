//! Field identifiers
//!
//! A [`FieldId`] is the dense, 1-based ordinal a flattened schema assigns to
//! every leaf and every nested composite. Ordinal `0` is reserved for "no
//! field" and is what top-level fields report as their parent.
//!
//! The type parameter names the schema the identifier belongs to, so an
//! identifier from a source schema can't be passed where a destination field
//! is expected.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordinal of a field within the schema `S`
pub struct FieldId<S> {
    ordinal: u32,
    _schema: PhantomData<fn() -> S>,
}

impl<S> FieldId<S> {
    /// The "no field" identifier (ordinal 0)
    pub const NONE: Self = Self::from_ordinal(0);

    /// Wrap a raw ordinal
    pub const fn from_ordinal(ordinal: u32) -> Self {
        Self {
            ordinal,
            _schema: PhantomData,
        }
    }

    /// The raw ordinal value
    pub const fn ordinal(self) -> u32 {
        self.ordinal
    }

    /// Whether this is the "no field" identifier
    pub const fn is_none(self) -> bool {
        self.ordinal == 0
    }

    /// Index into the parallel schema tables (`ordinal - 1`)
    pub(crate) fn index(self) -> Option<usize> {
        self.ordinal.checked_sub(1).map(|i| i as usize)
    }

    /// `None` for ordinal 0, `Some(self)` otherwise
    pub(crate) fn non_zero(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }
}

// Manual impls: derives would put bounds on the schema marker `S`.

impl<S> Clone for FieldId<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for FieldId<S> {}

impl<S> PartialEq for FieldId<S> {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl<S> Eq for FieldId<S> {}

impl<S> PartialOrd for FieldId<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for FieldId<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal)
    }
}

impl<S> Hash for FieldId<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
    }
}

impl<S> Default for FieldId<S> {
    fn default() -> Self {
        Self::NONE
    }
}

impl<S> fmt::Debug for FieldId<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.ordinal)
    }
}

impl<S> fmt::Display for FieldId<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal)
    }
}

impl<S> From<FieldId<S>> for u32 {
    fn from(field: FieldId<S>) -> Self {
        field.ordinal
    }
}

impl<S> Serialize for FieldId<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_u32(self.ordinal)
    }
}

impl<'de, S> Deserialize<'de> for FieldId<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Product;

    #[test]
    fn test_none_is_zero() {
        let none = FieldId::<Product>::NONE;
        assert!(none.is_none());
        assert_eq!(none.ordinal(), 0);
        assert_eq!(none.index(), None);
        assert_eq!(FieldId::<Product>::default(), none);
    }

    #[test]
    fn test_index_is_ordinal_minus_one() {
        let field = FieldId::<Product>::from_ordinal(3);
        assert!(!field.is_none());
        assert_eq!(field.index(), Some(2));
        assert_eq!(u32::from(field), 3);
    }

    #[test]
    fn test_copy_eq_hash_without_marker_bounds() {
        // `Product` implements none of these traits
        let a = FieldId::<Product>::from_ordinal(1);
        let b = a;
        assert_eq!(a, b);
        assert!(a < FieldId::from_ordinal(2));

        let set: HashSet<_> = [a, b, FieldId::from_ordinal(2)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(format!("{:?}", a), "FieldId(1)");
    }

    #[test]
    fn test_serializes_as_plain_ordinal() {
        let field = FieldId::<Product>::from_ordinal(7);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, "7");

        let back: FieldId<Product> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
