//! Validation functionality
//!
//! Provides validation logic for:
//! - Field names declared in a schema
//! - Annotation (tag) keys requested through schema options

pub mod input;

pub use input::{ValidationError, ValidationResult, validate_field_name, validate_tag_key};
