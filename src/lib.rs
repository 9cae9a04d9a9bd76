//! Field Map SDK - schema flattening and cross-schema field mapping
//!
//! Provides:
//! - Flattening of nested field declarations into dense field ordinals
//! - Parent/child, full-path, annotation (tag) and weight indices over a schema
//! - Record declarations loadable from YAML/JSON
//! - Change-propagation rules between two flattened schemas, with AND-groups,
//!   first-registration-wins alternatives and nearest-ancestor fallback
//!
//! # Example
//!
//! ```rust
//! use fieldmap_sdk::{DynamicSchema, FieldNode, FlattenedSchema, Mapper, MappingRule, SchemaOptions};
//!
//! let options = SchemaOptions::new();
//! let product = FlattenedSchema::<DynamicSchema>::from_nodes(
//!     &[
//!         FieldNode::leaf("Sku"),
//!         FieldNode::composite("Seller", vec![FieldNode::leaf("ID"), FieldNode::leaf("Name")]),
//!     ],
//!     &options,
//! )
//! .unwrap();
//! let search = FlattenedSchema::<DynamicSchema>::from_nodes(
//!     &[FieldNode::leaf("Text"), FieldNode::leaf("Facets")],
//!     &options,
//! )
//! .unwrap();
//!
//! let seller = product.lookup("Seller").unwrap();
//! let seller_id = product.lookup("Seller.ID").unwrap();
//! let facets = search.lookup("Facets").unwrap();
//!
//! let mapper = Mapper::compile(&product, &search, vec![MappingRule::new(seller, [facets])]).unwrap();
//! assert_eq!(mapper.resolve([seller_id]), vec![facets]);
//! ```

pub mod field;
pub mod mapping;
pub mod schema;
pub mod validation;

// Re-export commonly used types
pub use field::FieldId;
pub use mapping::{
    Mapper, MappingError, MappingResult, MappingRule, MappingStats, RuleEntry, RuleTable,
};
pub use schema::{
    DynamicSchema, FieldDeclaration, FieldLookup, FieldNode, FieldSet, FlattenedSchema,
    RecordDeclarations, SchemaError, SchemaOptions, SchemaResult,
};
pub use validation::{ValidationError, ValidationResult};
