//! Typed error hierarchy for fieldview.
//!
//! Three top-level enums cover the three subsystems:
//! - `SchemaError`: collection and property configuration errors
//! - `ArrayFieldError`: precondition violations on ordered array fields
//! - `ResolveError`: reference resolution failures

use thiserror::Error;

/// Errors in a collection schema.
///
/// These are authoring mistakes: they surface when a schema is loaded or
/// when a malformed descriptor reaches the preview dispatcher, and are never
/// recovered from at render time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error(
        "You need to specify an 'of' or 'one_of' prop (or specify a custom preview) in your array property {property}"
    )]
    ArrayMissingOf { property: String },

    #[error("Array property {property} declares both 'of' and 'one_of'; pick one")]
    ArrayBothOfAndOneOf { property: String },

    #[error("Property order of {owner} references unknown property '{property}'")]
    UnknownPropertyInOrder { owner: String, property: String },

    #[error("Property {property} names unknown custom preview '{preview}'")]
    UnknownPreview { property: String, preview: String },

    #[error("Failed to parse schema: {0}")]
    Parse(String),
}

/// Precondition violations reported by an ordered array field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArrayFieldError {
    #[error("Index {index} out of bounds for array field '{field}' of length {len}")]
    IndexOutOfBounds {
        field: String,
        index: usize,
        len: usize,
    },

    #[error("Array field '{field}' tracks {ids} ids but the backing array holds {values} values")]
    OutOfSync {
        field: String,
        ids: usize,
        values: usize,
    },

    #[error("Array field '{field}' is disabled")]
    Disabled { field: String },

    #[error("Id generator for array field '{field}' produced no unused id in {attempts} attempts")]
    IdExhausted { field: String, attempts: usize },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors from reference resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Entity {path}/{id} not found")]
    NotFound { path: String, id: String },

    #[error("Reference backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_missing_of_message_names_property() {
        let err = SchemaError::ArrayMissingOf {
            property: "tags".to_string(),
        };
        assert!(err.to_string().contains("array property tags"));
    }

    #[test]
    fn test_index_out_of_bounds_display() {
        let err = ArrayFieldError::IndexOutOfBounds {
            field: "authors".to_string(),
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Index 4 out of bounds for array field 'authors' of length 2"
        );
    }

    #[test]
    fn test_resolve_backend_wraps_anyhow() {
        let err = ResolveError::Backend(anyhow::anyhow!("connection reset"));
        assert_eq!(err.to_string(), "Reference backend error: connection reset");
    }
}
