//! Mapping rules

use std::fmt;

use crate::field::FieldId;

/// "When `source` changes, every field in `destinations` must be recomputed"
///
/// The destinations form an AND-group: they are always reported together.
pub struct MappingRule<S, D> {
    source: FieldId<S>,
    destinations: Vec<FieldId<D>>,
}

impl<S, D> MappingRule<S, D> {
    /// Create a rule from a source field to an ordered group of destinations
    pub fn new(source: FieldId<S>, destinations: impl IntoIterator<Item = FieldId<D>>) -> Self {
        Self {
            source,
            destinations: destinations.into_iter().collect(),
        }
    }

    pub fn source(&self) -> FieldId<S> {
        self.source
    }

    pub fn destinations(&self) -> &[FieldId<D>] {
        &self.destinations
    }

    pub(crate) fn into_destinations(self) -> Vec<FieldId<D>> {
        self.destinations
    }
}

impl<S, D> Clone for MappingRule<S, D> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            destinations: self.destinations.clone(),
        }
    }
}

impl<S, D> PartialEq for MappingRule<S, D> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.destinations == other.destinations
    }
}

impl<S, D> Eq for MappingRule<S, D> {}

impl<S, D> fmt::Debug for MappingRule<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("source", &self.source)
            .field("destinations", &self.destinations)
            .finish()
    }
}
