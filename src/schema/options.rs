//! Configuration for schema flattening

use serde::{Deserialize, Serialize};

/// Options applied while flattening a schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOptions {
    /// Annotation keys every field must carry; one lookup table is built per key
    #[serde(default)]
    pub required_tags: Vec<String>,
}

impl SchemaOptions {
    /// Create options with no required annotations
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of required annotation keys
    pub fn with_required_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.required_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Add one required annotation key
    pub fn with_required_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.required_tags.contains(&tag) {
            self.required_tags.push(tag);
        }
        self
    }
}
