//! Declaration tree for a schema
//!
//! A schema is declared as an ordered list of [`FieldNode`]s. A node is either
//! a leaf field or a composite that nests further fields; the composite node
//! itself stands for the whole nested record and receives the first ordinal
//! of its subtree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared field
///
/// In YAML/JSON a node is `{ name, tags?, fields? }`; the presence of
/// `fields` makes it a composite.
///
/// # Example
///
/// ```rust
/// use fieldmap_sdk::FieldNode;
///
/// let seller = FieldNode::composite(
///     "Seller",
///     vec![FieldNode::leaf("ID").with_tag("json", "id"), FieldNode::leaf("Name")],
/// )
/// .with_tag("json", "seller");
///
/// assert!(seller.is_composite());
/// assert_eq!(seller.tag("json"), Some("seller"));
/// assert_eq!(seller.ordinal_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum FieldNode {
    /// A single identifier field
    Leaf {
        name: String,
        tags: BTreeMap<String, String>,
    },
    /// A nested record, represented as a whole by its own ordinal
    Composite {
        name: String,
        tags: BTreeMap<String, String>,
        fields: Vec<FieldNode>,
    },
}

impl FieldNode {
    /// Create a leaf field
    pub fn leaf(name: impl Into<String>) -> Self {
        FieldNode::Leaf {
            name: name.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Create a composite field with the given member fields
    pub fn composite(name: impl Into<String>, fields: Vec<FieldNode>) -> Self {
        FieldNode::Composite {
            name: name.into(),
            tags: BTreeMap::new(),
            fields,
        }
    }

    /// Attach an annotation value
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags_mut().insert(key.into(), value.into());
        self
    }

    /// Declared name of the field
    pub fn name(&self) -> &str {
        match self {
            FieldNode::Leaf { name, .. } | FieldNode::Composite { name, .. } => name,
        }
    }

    /// All annotations of the field
    pub fn tags(&self) -> &BTreeMap<String, String> {
        match self {
            FieldNode::Leaf { tags, .. } | FieldNode::Composite { tags, .. } => tags,
        }
    }

    fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        match self {
            FieldNode::Leaf { tags, .. } | FieldNode::Composite { tags, .. } => tags,
        }
    }

    /// A single annotation value
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags().get(key).map(String::as_str)
    }

    /// Member fields (empty for leaves)
    pub fn fields(&self) -> &[FieldNode] {
        match self {
            FieldNode::Leaf { .. } => &[],
            FieldNode::Composite { fields, .. } => fields,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, FieldNode::Composite { .. })
    }

    /// Number of leaf fields in this subtree (1 for a leaf)
    pub fn leaf_count(&self) -> usize {
        match self {
            FieldNode::Leaf { .. } => 1,
            FieldNode::Composite { fields, .. } => fields.iter().map(FieldNode::leaf_count).sum(),
        }
    }

    /// Number of ordinals this subtree occupies, including the node itself
    pub fn ordinal_count(&self) -> usize {
        1 + self
            .fields()
            .iter()
            .map(FieldNode::ordinal_count)
            .sum::<usize>()
    }
}

#[derive(Serialize, Deserialize)]
struct RawNode {
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldNode>>,
}

impl From<RawNode> for FieldNode {
    fn from(raw: RawNode) -> Self {
        match raw.fields {
            None => FieldNode::Leaf {
                name: raw.name,
                tags: raw.tags,
            },
            Some(fields) => FieldNode::Composite {
                name: raw.name,
                tags: raw.tags,
                fields,
            },
        }
    }
}

impl From<FieldNode> for RawNode {
    fn from(node: FieldNode) -> Self {
        match node {
            FieldNode::Leaf { name, tags } => RawNode {
                name,
                tags,
                fields: None,
            },
            FieldNode::Composite { name, tags, fields } => RawNode {
                name,
                tags,
                fields: Some(fields),
            },
        }
    }
}
