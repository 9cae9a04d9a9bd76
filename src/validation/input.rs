//! Input validation for schema declarations.
//!
//! Field names are joined with `.` to form full paths, so a name must never
//! contain a dot. Tag keys follow the same identifier rules.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length for field names
pub const MAX_FIELD_NAME_LENGTH: usize = 255;

/// Maximum length for tag keys
pub const MAX_TAG_KEY_LENGTH: usize = 64;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a declared field name.
///
/// # Rules
///
/// - Must not be empty
/// - Must not exceed 255 characters
/// - Must start with a letter or underscore
/// - May contain ASCII letters, digits and underscores (no dots)
///
/// # Examples
///
/// ```
/// use fieldmap_sdk::validation::input::validate_field_name;
///
/// assert!(validate_field_name("Sku").is_ok());
/// assert!(validate_field_name("image_url").is_ok());
/// assert!(validate_field_name("Seller.ID").is_err());
/// assert!(validate_field_name("").is_err());
/// ```
pub fn validate_field_name(name: &str) -> ValidationResult<()> {
    validate_identifier("field name", name, MAX_FIELD_NAME_LENGTH)
}

/// Validate an annotation (tag) key.
///
/// Same rules as [`validate_field_name`], capped at 64 characters.
///
/// ```
/// use fieldmap_sdk::validation::input::validate_tag_key;
///
/// assert!(validate_tag_key("json").is_ok());
/// assert!(validate_tag_key("db column").is_err());
/// ```
pub fn validate_tag_key(key: &str) -> ValidationResult<()> {
    validate_identifier("tag key", key, MAX_TAG_KEY_LENGTH)
}

fn validate_identifier(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: value.len(),
        });
    }

    if IDENTIFIER_REGEX.is_match(value) {
        return Ok(());
    }

    let first_char = match value.chars().next() {
        Some(c) => c,
        None => return Err(ValidationError::Empty(field)),
    };
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidFormat(
            field,
            "must start with a letter or underscore".to_string(),
        ));
    }

    let bad = value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
        .unwrap_or(first_char);
    Err(ValidationError::InvalidCharacters {
        field,
        reason: format!("invalid character: '{}'", bad),
    })
}
