//! Record declarations
//!
//! Schemas can be declared as a set of named records, each an ordered list of
//! fields whose `type` is either `field` (an identifier field) or the name of
//! another record. A record used as a nested field must declare a `Root`
//! identifier field first; that sentinel stands for the nested record as a
//! whole and takes the tags of the field that references the record.
//!
//! ```yaml
//! root: Product
//! options:
//!   requiredTags: [json]
//! records:
//!   Product:
//!     - { name: Sku, type: field, tags: { json: sku } }
//!     - { name: Seller, type: Seller, tags: { json: seller } }
//!   Seller:
//!     - { name: Root, type: field }
//!     - { name: ID, type: field, tags: { json: id } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use super::error::{SchemaError, SchemaResult};
use super::node::FieldNode;
use super::options::SchemaOptions;

/// Type name of an identifier field
pub const IDENTIFIER_TYPE: &str = "field";

/// Name of the sentinel field every nested record declares first
pub const SENTINEL_FIELD: &str = "Root";

/// A field inside a record declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    /// `field` or the name of a declared record
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl FieldDeclaration {
    /// An identifier field
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: IDENTIFIER_TYPE.to_string(),
            tags: BTreeMap::new(),
        }
    }

    /// A field whose type is another declared record
    pub fn record(name: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: record.into(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A named set of record declarations with a designated root record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDeclarations {
    /// Record flattened at the top level (no sentinel required)
    pub root: String,
    /// Records by name; field order is declaration order
    pub records: BTreeMap<String, Vec<FieldDeclaration>>,
    /// Flattening options carried with the document
    #[serde(default)]
    pub options: SchemaOptions,
}

impl RecordDeclarations {
    /// Create an empty declaration set rooted at `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            records: BTreeMap::new(),
            options: SchemaOptions::default(),
        }
    }

    /// Add or replace a record
    pub fn with_record(mut self, name: impl Into<String>, fields: Vec<FieldDeclaration>) -> Self {
        self.records.insert(name.into(), fields);
        self
    }

    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse declarations from YAML
    pub fn from_yaml_str(yaml: &str) -> SchemaResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse declarations from JSON
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load declarations from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            SchemaError::SchemaReadError {
                path: path.to_path_buf(),
                source,
            }
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

    /// Compile the declarations into a declaration tree
    ///
    /// Fails on a missing root record, recursive record references, a nested
    /// record without its `Root` sentinel, or a field type that is neither
    /// `field` nor a declared record. Records the root never reaches are not
    /// validated.
    pub fn to_nodes(&self) -> SchemaResult<Vec<FieldNode>> {
        let root = self
            .records
            .get(&self.root)
            .ok_or_else(|| SchemaError::UnknownRecord {
                record: self.root.clone(),
            })?;

        self.check_recursion()?;
        self.build_record(root, None)
    }

    /// Only records reachable from the root are checked; unused records are ignored
    fn check_recursion(&self) -> SchemaResult<()> {
        let mut graph = DiGraph::<&str, ()>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
        let mut pending = vec![self.root.as_str()];

        node_map.insert(self.root.as_str(), graph.add_node(self.root.as_str()));
        while let Some(name) = pending.pop() {
            let (Some(fields), Some(&from)) = (self.records.get(name), node_map.get(name)) else {
                continue;
            };
            for field in fields {
                let target = field.field_type.as_str();
                if !self.records.contains_key(target) {
                    continue;
                }
                let to = match node_map.get(target) {
                    Some(&to) => to,
                    None => {
                        let to = graph.add_node(target);
                        node_map.insert(target, to);
                        pending.push(target);
                        to
                    }
                };
                graph.add_edge(from, to, ());
            }
        }

        toposort(&graph, None)
            .map(|_| ())
            .map_err(|cycle| SchemaError::RecursiveRecord {
                record: graph[cycle.node_id()].to_string(),
            })
    }

    /// `prefix` is the path of the referencing field when the record is nested
    fn build_record(
        &self,
        fields: &[FieldDeclaration],
        prefix: Option<&str>,
    ) -> SchemaResult<Vec<FieldNode>> {
        let members = match prefix {
            None => fields,
            Some(path) => match fields.split_first() {
                Some((first, rest))
                    if first.name == SENTINEL_FIELD && first.field_type == IDENTIFIER_TYPE =>
                {
                    rest
                }
                _ => {
                    return Err(SchemaError::MissingSentinel {
                        path: path.to_string(),
                    });
                }
            },
        };

        let mut nodes = Vec::with_capacity(members.len());
        for field in members {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, field.name),
                None => field.name.clone(),
            };

            let node = if field.field_type == IDENTIFIER_TYPE {
                FieldNode::Leaf {
                    name: field.name.clone(),
                    tags: field.tags.clone(),
                }
            } else if let Some(record) = self.records.get(&field.field_type) {
                FieldNode::Composite {
                    name: field.name.clone(),
                    tags: field.tags.clone(),
                    fields: self.build_record(record, Some(path.as_str()))?,
                }
            } else {
                return Err(SchemaError::InvalidFieldType {
                    path,
                    found: field.field_type.clone(),
                });
            };
            nodes.push(node);
        }

        Ok(nodes)
    }
}
