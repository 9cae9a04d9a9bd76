//! Rule tables
//!
//! A rule table states mapping rules by dotted field path so they can live in
//! a YAML or JSON file next to the record declarations:
//!
//! ```yaml
//! rules:
//!   - source: Seller
//!     destinations: [Detail]
//!   - source: Sku
//!     destinations: [Info, SearchText]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{MappingError, MappingResult};
use super::rule::MappingRule;
use crate::field::FieldId;
use crate::schema::FlattenedSchema;

/// One rule stated by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Dotted path in the source schema
    pub source: String,
    /// Dotted paths in the destination schema, reported together
    #[serde(default)]
    pub destinations: Vec<String>,
}

impl RuleEntry {
    pub fn new(
        source: impl Into<String>,
        destinations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            source: source.into(),
            destinations: destinations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered list of path-based rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; order matters for first-registration-wins
    pub fn with_rule(mut self, rule: RuleEntry) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn from_yaml_str(yaml: &str) -> MappingResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> MappingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> MappingResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| MappingError::RuleReadError {
                path: path.to_path_buf(),
                source,
            })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Resolve every path against the two schemas
    pub fn to_rules<S, D>(
        &self,
        source: &FlattenedSchema<S>,
        destination: &FlattenedSchema<D>,
    ) -> MappingResult<Vec<MappingRule<S, D>>> {
        self.rules
            .iter()
            .map(|entry| {
                let from = resolve_path(source, &entry.source)?;
                let to = entry
                    .destinations
                    .iter()
                    .map(|path| resolve_path(destination, path))
                    .collect::<MappingResult<Vec<_>>>()?;
                Ok(MappingRule::new(from, to))
            })
            .collect()
    }
}

fn resolve_path<T>(schema: &FlattenedSchema<T>, path: &str) -> MappingResult<FieldId<T>> {
    schema
        .lookup(path)
        .ok_or_else(|| MappingError::UnknownFieldPath {
            path: path.to_string(),
        })
}
