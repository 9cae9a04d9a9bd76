//! Typed record projections
//!
//! A [`FieldSet`] is a caller-defined record whose members are the field
//! identifiers of its own schema. After flattening, the schema hands the
//! record a [`FieldLookup`] so each member can capture its ordinal once,
//! e.g. `product.fields().seller.id`.

use std::collections::HashMap;
use std::marker::PhantomData;

use super::error::{SchemaError, SchemaResult};
use super::node::FieldNode;
use crate::field::FieldId;

/// A record type that declares a schema and holds its own field identifiers
///
/// # Example
///
/// ```rust
/// use fieldmap_sdk::{FieldId, FieldLookup, FieldNode, FieldSet, FlattenedSchema, SchemaOptions, SchemaResult};
///
/// struct Product {
///     sku: FieldId<Product>,
///     seller: FieldId<Product>,
///     seller_id: FieldId<Product>,
/// }
///
/// impl FieldSet for Product {
///     fn declaration() -> Vec<FieldNode> {
///         vec![
///             FieldNode::leaf("Sku"),
///             FieldNode::composite("Seller", vec![FieldNode::leaf("ID")]),
///         ]
///     }
///
///     fn project(lookup: &FieldLookup<'_, Self>) -> SchemaResult<Self> {
///         Ok(Self {
///             sku: lookup.field("Sku")?,
///             seller: lookup.field("Seller")?,
///             seller_id: lookup.field("Seller.ID")?,
///         })
///     }
/// }
///
/// let schema = FlattenedSchema::<Product>::build(&SchemaOptions::new()).unwrap();
/// let p = schema.fields();
/// assert_eq!(p.sku.ordinal(), 1);
/// assert_eq!(schema.parent_of(p.seller_id), Some(p.seller));
/// ```
pub trait FieldSet: Sized {
    /// The declaration tree of this record
    fn declaration() -> Vec<FieldNode>;

    /// Build the record from the flattened ordinals
    fn project(lookup: &FieldLookup<'_, Self>) -> SchemaResult<Self>;
}

/// Path-to-identifier lookup handed to [`FieldSet::project`]
pub struct FieldLookup<'a, S> {
    paths: &'a HashMap<String, u32>,
    _schema: PhantomData<fn() -> S>,
}

impl<'a, S> FieldLookup<'a, S> {
    pub(crate) fn new(paths: &'a HashMap<String, u32>) -> Self {
        Self {
            paths,
            _schema: PhantomData,
        }
    }

    /// Identifier of the field at the dotted `path`
    ///
    /// A composite's path names its sentinel, e.g. `"Seller"`.
    pub fn field(&self, path: &str) -> SchemaResult<FieldId<S>> {
        self.get(path).ok_or_else(|| SchemaError::UnknownField {
            path: path.to_string(),
        })
    }

    /// Identifier of the field at `path`, if declared
    pub fn get(&self, path: &str) -> Option<FieldId<S>> {
        self.paths.get(path).copied().map(FieldId::from_ordinal)
    }
}

/// Marker for schemas built from a declaration tree without a typed record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DynamicSchema;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut paths = HashMap::new();
        paths.insert("Sku".to_string(), 1);
        paths.insert("Seller".to_string(), 2);
        paths.insert("Seller.ID".to_string(), 3);

        let lookup = FieldLookup::<DynamicSchema>::new(&paths);
        assert_eq!(lookup.field("Seller.ID").unwrap().ordinal(), 3);
        assert_eq!(lookup.get("Seller").map(FieldId::ordinal), Some(2));
        assert!(lookup.get("Seller.Name").is_none());

        match lookup.field("Seller.Name") {
            Err(SchemaError::UnknownField { path }) => assert_eq!(path, "Seller.Name"),
            other => panic!("unexpected result: {:?}", other.map(FieldId::ordinal)),
        }
    }
}
