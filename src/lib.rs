//! # Smelt - JSON:API denormalizer
//!
//! Converts JSON:API response documents (top-level `data` plus an optional
//! `included` pool) into plain, denormalized records: each resource object is
//! flattened to `{id, ...attributes}` and its relationships are resolved into
//! nested records, with a per-call expansion cache guaranteeing termination
//! on cyclic relationship graphs.
//!
//! ## Modules
//!
//! - **reader**: the [`JsonApiReader`] orchestrating validation, flattening,
//!   transformer dispatch, and relationship resolution
//! - **record**: the [`Record`] output container (fields + ordered relations)
//! - **transform**: per-resource-type reshaping hooks
//! - **error**: the [`ReadError`] taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use smelt::JsonApiReader;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = json!({
//!     "data": {
//!         "id": "1",
//!         "type": "book",
//!         "attributes": {"title": "X"},
//!         "relationships": {"author": {"data": {"id": "9", "type": "author"}}}
//!     },
//!     "included": [
//!         {"id": "9", "type": "author", "attributes": {"name": "Y"}}
//!     ]
//! });
//!
//! let reader = JsonApiReader::new();
//! let parsed = reader.parse(&document)?;
//!
//! assert_eq!(
//!     parsed.into_value(),
//!     json!({"id": "1", "title": "X", "author": {"id": "9", "name": "Y"}})
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Transformers
//!
//! ```rust
//! use serde_json::{json, Map, Value};
//! use smelt::JsonApiReader;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut reader = JsonApiReader::new();
//! reader.set_transformer("book", |mut fields: Map<String, Value>| {
//!     fields.insert("kind".to_string(), json!("novel"));
//!     fields
//! });
//!
//! let document = json!({
//!     "data": {"id": "1", "type": "book", "attributes": {"title": "X"}}
//! });
//! let parsed = reader.parse(&document)?;
//! assert_eq!(parsed.into_value(), json!({"id": "1", "title": "X", "kind": "novel"}));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::Value;

pub mod error;
pub mod reader;
pub mod record;
pub mod transform;

// Re-export commonly used types for convenience
pub use error::ReadError;
pub use reader::{JsonApiReader, Parsed};
pub use record::{Record, Related};
pub use transform::{Transform, TransformRegistry};

/// Parse an already-decoded JSON:API document with a default reader.
pub fn parse_value(document: &Value) -> Result<Parsed, ReadError> {
    JsonApiReader::new().parse(document)
}

/// Decode `text` as JSON, then parse it as a JSON:API document.
pub fn parse_str(text: &str) -> Result<Parsed> {
    let document: Value = serde_json::from_str(text).context("Failed to parse JSON")?;
    let parsed = parse_value(&document)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_str() {
        let parsed = parse_str(
            r#"{"data": [{"id": "1", "type": "book", "attributes": {"title": "X"}}]}"#,
        )
        .unwrap();

        assert_eq!(parsed.into_value(), json!([{"id": "1", "title": "X"}]));
    }

    #[test]
    fn test_parse_str_rejects_invalid_json() {
        assert!(parse_str("{not json").is_err());
    }

    #[test]
    fn test_parse_value_rejects_missing_data() {
        assert!(matches!(
            parse_value(&json!({})),
            Err(ReadError::MalformedDocument(_))
        ));
    }
}
