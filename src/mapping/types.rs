//! Types describing a compiled mapping

use serde::{Deserialize, Serialize};

/// Summary of a compiled mapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingStats {
    /// Number of rules registered
    pub rules: usize,
    /// Source fields with at least one rule of their own
    pub source_fields: usize,
    /// Distinct destination fields referenced by any rule
    pub destination_fields: usize,
    /// Alternatives that can never fire because an earlier rule for the same field wins
    pub shadowed_groups: usize,
    /// Source fields with no rule on themselves or any ancestor
    pub unmapped_source_fields: usize,
}

impl MappingStats {
    /// Whether every source field resolves to at least one destination
    pub fn is_complete(&self) -> bool {
        self.unmapped_source_fields == 0
    }
}
