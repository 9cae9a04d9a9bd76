//! Pre-order flattening of a declaration tree into parallel tables

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::error::{SchemaError, SchemaResult};
use super::node::FieldNode;
use super::options::SchemaOptions;
use crate::validation::{validate_field_name, validate_tag_key};

/// Parallel tables indexed by `ordinal - 1`
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldTables {
    /// Number of ordinals nested beneath a composite; 0 for leaves
    pub children: Vec<u32>,
    /// Ordinal of the enclosing composite; 0 at top level
    pub parent: Vec<u32>,
    /// Name as declared in the enclosing record
    pub name: Vec<String>,
    /// One column per required annotation key
    pub tags: BTreeMap<String, Vec<String>>,
    /// 1.0 for leaves, transitive leaf count for composites
    pub weight: Vec<f64>,
    /// Full dotted path to ordinal
    pub paths: HashMap<String, u32>,
}

impl FieldTables {
    pub fn len(&self) -> usize {
        self.name.len()
    }
}

/// Flatten `nodes` in one depth-first walk, assigning ordinals in declaration order
pub(crate) fn flatten(nodes: &[FieldNode], options: &SchemaOptions) -> SchemaResult<FieldTables> {
    let mut required_tags: Vec<&str> = Vec::new();
    for tag in &options.required_tags {
        validate_tag_key(tag).map_err(|source| SchemaError::InvalidName {
            path: tag.clone(),
            source,
        })?;
        if !required_tags.contains(&tag.as_str()) {
            required_tags.push(tag);
        }
    }

    let mut flattener = Flattener {
        required_tags,
        tables: FieldTables::default(),
    };
    for tag in &flattener.required_tags {
        flattener.tables.tags.insert(tag.to_string(), Vec::new());
    }

    flattener.walk(nodes, 0, None)?;
    Ok(flattener.tables)
}

struct Flattener<'a> {
    required_tags: Vec<&'a str>,
    tables: FieldTables,
}

impl Flattener<'_> {
    /// Walk one record level; returns the summed weight of its fields
    fn walk(&mut self, nodes: &[FieldNode], parent: u32, prefix: Option<&str>) -> SchemaResult<f64> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut weight = 0.0;

        for node in nodes {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, node.name()),
                None => node.name().to_string(),
            };

            validate_field_name(node.name()).map_err(|source| SchemaError::InvalidName {
                path: path.clone(),
                source,
            })?;
            if !seen.insert(node.name()) {
                return Err(SchemaError::DuplicateField { path });
            }

            let ordinal = self.push(node, parent, &path)?;

            match node {
                FieldNode::Leaf { .. } => weight += 1.0,
                FieldNode::Composite { fields, .. } => {
                    if fields.is_empty() {
                        return Err(SchemaError::EmptyComposite { path });
                    }

                    let nested = self.walk(fields, ordinal, Some(path.as_str()))?;
                    let index = (ordinal - 1) as usize;
                    let descendants = self.tables.len() as u32 - ordinal;
                    self.tables.children[index] = descendants;
                    self.tables.weight[index] = nested;
                    weight += nested;

                    debug!(
                        "Flattened composite '{}' at ordinal {} ({} descendants, weight {})",
                        path, ordinal, descendants, nested
                    );
                }
            }
        }

        Ok(weight)
    }

    /// Append one row to every table and return the new ordinal
    fn push(&mut self, node: &FieldNode, parent: u32, path: &str) -> SchemaResult<u32> {
        let mut tag_values = Vec::with_capacity(self.required_tags.len());
        for tag in &self.required_tags {
            let value = node
                .tag(tag)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| SchemaError::MissingAnnotation {
                    tag: tag.to_string(),
                    path: path.to_string(),
                })?;
            tag_values.push((*tag, value.to_string()));
        }

        let ordinal = self.tables.len() as u32 + 1;
        self.tables.children.push(0);
        self.tables.parent.push(parent);
        self.tables.name.push(node.name().to_string());
        self.tables.weight.push(1.0);
        self.tables.paths.insert(path.to_string(), ordinal);
        for (tag, value) in tag_values {
            if let Some(column) = self.tables.tags.get_mut(tag) {
                column.push(value);
            }
        }

        Ok(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Vec<FieldNode> {
        vec![
            FieldNode::leaf("Sku"),
            FieldNode::leaf("Name"),
            FieldNode::composite(
                "Seller",
                vec![
                    FieldNode::leaf("ID"),
                    FieldNode::leaf("Name"),
                    FieldNode::leaf("Logo"),
                    FieldNode::composite("Attr", vec![FieldNode::leaf("Code"), FieldNode::leaf("Name")]),
                ],
            ),
            FieldNode::leaf("ImageURL"),
        ]
    }

    #[test]
    fn test_preorder_tables() {
        let tables = flatten(&product(), &SchemaOptions::new()).unwrap();

        assert_eq!(tables.len(), 10);
        assert_eq!(
            tables.name,
            vec!["Sku", "Name", "Seller", "ID", "Name", "Logo", "Attr", "Code", "Name", "ImageURL"]
        );
        assert_eq!(tables.parent, vec![0, 0, 0, 3, 3, 3, 3, 7, 7, 0]);
        assert_eq!(tables.children, vec![0, 0, 6, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(
            tables.weight,
            vec![1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(tables.paths["Seller.Attr.Code"], 8);
        assert_eq!(tables.paths["Seller"], 3);
    }

    #[test]
    fn test_required_tags_are_collected() {
        let nodes = vec![
            FieldNode::leaf("Sku").with_tag("json", "sku"),
            FieldNode::composite("Seller", vec![FieldNode::leaf("ID").with_tag("json", "id")])
                .with_tag("json", "seller"),
        ];
        let options = SchemaOptions::new().with_required_tags(["json", "json"]);
        let tables = flatten(&nodes, &options).unwrap();

        assert_eq!(tables.tags.len(), 1);
        assert_eq!(tables.tags["json"], vec!["sku", "seller", "id"]);
    }

    #[test]
    fn test_missing_tag_reports_full_path() {
        let nodes = vec![
            FieldNode::composite("Seller", vec![FieldNode::leaf("ID").with_tag("json", "")])
                .with_tag("json", "seller"),
        ];
        let options = SchemaOptions::new().with_required_tag("json");
        let err = flatten(&nodes, &options).unwrap_err();

        match err {
            SchemaError::MissingAnnotation { tag, path } => {
                assert_eq!(tag, "json");
                assert_eq!(path, "Seller.ID");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_structural_errors() {
        let empty = vec![FieldNode::composite("Seller", vec![])];
        assert!(matches!(
            flatten(&empty, &SchemaOptions::new()),
            Err(SchemaError::EmptyComposite { path }) if path == "Seller"
        ));

        let duplicate = vec![FieldNode::leaf("Sku"), FieldNode::leaf("Sku")];
        assert!(matches!(
            flatten(&duplicate, &SchemaOptions::new()),
            Err(SchemaError::DuplicateField { path }) if path == "Sku"
        ));

        let dotted = vec![FieldNode::leaf("Seller.ID")];
        assert!(matches!(
            flatten(&dotted, &SchemaOptions::new()),
            Err(SchemaError::InvalidName { .. })
        ));

        let bad_tag = SchemaOptions::new().with_required_tag("db column");
        assert!(matches!(
            flatten(&product(), &bad_tag),
            Err(SchemaError::InvalidName { path, .. }) if path == "db column"
        ));
    }

    #[test]
    fn test_empty_declaration() {
        let tables = flatten(&[], &SchemaOptions::new()).unwrap();
        assert_eq!(tables.len(), 0);
        assert!(tables.paths.is_empty());
    }
}
