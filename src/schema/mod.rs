//! Schema flattening
//!
//! A declared schema (see [`FieldNode`] and [`RecordDeclarations`]) is walked
//! once, depth-first in declaration order. Every leaf and every nested
//! composite receives a dense ordinal starting at 1; a composite's ordinal is
//! assigned before its members, so its descendants occupy the contiguous
//! range directly after it.
//!
//! The resulting [`FlattenedSchema`] is immutable and answers structural
//! queries (parent, children, ancestors), naming queries (own and full dotted
//! names, annotation values) and the weight of each field.

mod declaration;
mod error;
mod flatten;
mod node;
mod options;
mod projection;

pub use declaration::{FieldDeclaration, IDENTIFIER_TYPE, RecordDeclarations, SENTINEL_FIELD};
pub use error::{SchemaError, SchemaResult};
pub use node::FieldNode;
pub use options::SchemaOptions;
pub use projection::{DynamicSchema, FieldLookup, FieldSet};

use tracing::info;

use crate::field::FieldId;
use flatten::{FieldTables, flatten};

/// An immutable, flattened schema
///
/// Owns the projected record `S` (whose members hold their own field
/// identifiers) and the parallel lookup tables built by the flattening walk.
#[derive(Debug, Clone)]
pub struct FlattenedSchema<S> {
    fields: S,
    tables: FieldTables,
}

impl<S: FieldSet> FlattenedSchema<S> {
    /// Flatten the declaration of `S` and project its field identifiers
    pub fn build(options: &SchemaOptions) -> SchemaResult<Self> {
        Self::assemble(&S::declaration(), options, S::project)
    }
}

impl FlattenedSchema<DynamicSchema> {
    /// Flatten a declaration tree
    pub fn from_nodes(nodes: &[FieldNode], options: &SchemaOptions) -> SchemaResult<Self> {
        Self::assemble(nodes, options, |_| Ok(DynamicSchema))
    }

    /// Compile and flatten record declarations, using the options they carry
    pub fn from_declarations(declarations: &RecordDeclarations) -> SchemaResult<Self> {
        let nodes = declarations.to_nodes()?;
        Self::from_nodes(&nodes, &declarations.options)
    }
}

impl<S> FlattenedSchema<S> {
    fn assemble(
        nodes: &[FieldNode],
        options: &SchemaOptions,
        project: impl FnOnce(&FieldLookup<'_, S>) -> SchemaResult<S>,
    ) -> SchemaResult<Self> {
        let tables = flatten(nodes, options)?;
        let fields = project(&FieldLookup::new(&tables.paths))?;

        let schema = Self { fields, tables };
        info!(
            "Flattened schema with {} fields ({} composites)",
            schema.len(),
            schema.composite_count()
        );
        Ok(schema)
    }

    /// The projected record holding this schema's field identifiers
    pub fn fields(&self) -> &S {
        &self.fields
    }

    /// Number of assigned ordinals (leaves plus composites)
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.len() == 0
    }

    /// Whether `field` is an ordinal of this schema
    pub fn contains(&self, field: FieldId<S>) -> bool {
        field.index().is_some_and(|i| i < self.tables.len())
    }

    /// All field identifiers in ordinal order
    pub fn field_ids(&self) -> impl DoubleEndedIterator<Item = FieldId<S>> + ExactSizeIterator {
        (1..self.tables.len() as u32 + 1).map(FieldId::from_ordinal)
    }

    /// Identifier of the field at a dotted path such as `"Seller.ID"`
    pub fn lookup(&self, path: &str) -> Option<FieldId<S>> {
        FieldLookup::new(&self.tables.paths).get(path)
    }

    /// Annotation keys that were captured for every field
    pub fn required_tags(&self) -> impl Iterator<Item = &str> {
        self.tables.tags.keys().map(String::as_str)
    }

    pub fn composite_count(&self) -> usize {
        self.tables.children.iter().filter(|&&c| c > 0).count()
    }

    /// Whether `field` is a nested composite
    pub fn is_composite(&self, field: FieldId<S>) -> bool {
        self.descendant_count(field) > 0
    }

    /// The contiguous range of ordinals nested beneath `field`, excluding `field`
    ///
    /// Empty for leaves and for identifiers outside the schema.
    pub fn children_of(
        &self,
        field: FieldId<S>,
    ) -> impl DoubleEndedIterator<Item = FieldId<S>> + ExactSizeIterator {
        let start = field.ordinal().saturating_add(1);
        let end = start.saturating_add(self.descendant_count(field));
        (start..end).map(FieldId::from_ordinal)
    }

    /// Immediate enclosing composite, or `None` at top level
    pub fn parent_of(&self, field: FieldId<S>) -> Option<FieldId<S>> {
        let index = field.index()?;
        self.tables
            .parent
            .get(index)
            .copied()
            .map(FieldId::from_ordinal)
            .and_then(FieldId::non_zero)
    }

    /// `field` followed by each enclosing composite up to the outermost one
    pub fn ancestors_of(&self, field: FieldId<S>) -> Vec<FieldId<S>> {
        let mut ancestors = Vec::new();
        if !self.contains(field) {
            return ancestors;
        }

        let mut current = Some(field);
        while let Some(f) = current {
            ancestors.push(f);
            current = self.parent_of(f);
        }
        ancestors
    }

    /// Declared name of `field` within its enclosing record
    pub fn name_of(&self, field: FieldId<S>) -> Option<&str> {
        self.tables
            .name
            .get(field.index()?)
            .map(String::as_str)
    }

    /// Dotted path from the outermost ancestor down to `field`
    pub fn full_name_of(&self, field: FieldId<S>) -> Option<String> {
        self.join_ancestors(field, |f| self.name_of(f))
    }

    /// Annotation value of `field` for a required tag
    pub fn tag_of(&self, tag: &str, field: FieldId<S>) -> Option<&str> {
        self.tables
            .tags
            .get(tag)?
            .get(field.index()?)
            .map(String::as_str)
    }

    /// Annotation values joined with `.` from the outermost ancestor down to `field`
    pub fn full_tag_of(&self, tag: &str, field: FieldId<S>) -> Option<String> {
        self.join_ancestors(field, |f| self.tag_of(tag, f))
    }

    /// 1.0 for a leaf; the transitive leaf count for a composite
    pub fn weight_of(&self, field: FieldId<S>) -> Option<f64> {
        self.tables.weight.get(field.index()?).copied()
    }

    pub(crate) fn parent_table(&self) -> &[u32] {
        &self.tables.parent
    }

    fn descendant_count(&self, field: FieldId<S>) -> u32 {
        field
            .index()
            .and_then(|i| self.tables.children.get(i))
            .copied()
            .unwrap_or(0)
    }

    fn join_ancestors<'a>(
        &'a self,
        field: FieldId<S>,
        part: impl Fn(FieldId<S>) -> Option<&'a str>,
    ) -> Option<String> {
        let ancestors = self.ancestors_of(field);
        if ancestors.is_empty() {
            return None;
        }

        let parts = ancestors
            .iter()
            .rev()
            .map(|&f| part(f))
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("."))
    }
}
