//! Collection definitions loaded from TOML.
//!
//! ```toml
//! name = "Books"
//! singular_name = "Book"
//! path = "books"
//! properties_order = ["title", "authors", "published"]
//!
//! [properties.title]
//! name = "Title"
//! data_type = "string"
//!
//! [properties.authors]
//! data_type = "array"
//! of = { data_type = "reference", path = "authors" }
//!
//! [properties.published]
//! data_type = "timestamp"
//! mode = "date"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::property::{Property, check_order, ordered};
use crate::errors::SchemaError;
use crate::preview::PreviewRegistry;

/// A collection of entities sharing one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular_name: Option<String>,
    /// Document-store path of the collection
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties_order: Vec<String>,
}

impl Collection {
    /// Load and validate a collection from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read collection file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid collection schema: {}", path.display()))
    }

    /// Parse and validate a collection from a TOML string.
    pub fn parse(content: &str) -> Result<Self, SchemaError> {
        let collection: Collection =
            toml::from_str(content).map_err(|e| SchemaError::Parse(e.to_string()))?;
        collection.validate()?;
        Ok(collection)
    }

    /// Check every property, nested ones included.
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_order(&self.name, &self.properties, &self.properties_order)?;
        for (key, property) in &self.properties {
            property.validate(key)?;
        }
        Ok(())
    }

    /// Properties in display order.
    pub fn ordered_properties(&self) -> Vec<(&str, &Property)> {
        ordered(&self.properties, &self.properties_order)
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Attach the custom previews named by `preview = "..."` attributes.
    ///
    /// Returns the number of properties bound.
    pub fn bind_previews(&mut self, registry: &PreviewRegistry) -> Result<usize, SchemaError> {
        let mut bound = 0;
        for (key, property) in self.properties.iter_mut() {
            property.visit_mut(key, &mut |path, property| {
                let Some(name) = &property.preview_name else {
                    return Ok(());
                };
                let preview = registry
                    .get(name)
                    .ok_or_else(|| SchemaError::UnknownPreview {
                        property: path.to_string(),
                        preview: name.clone(),
                    })?;
                property.custom_preview = Some(preview);
                bound += 1;
                Ok(())
            })?;
        }
        Ok(bound)
    }

    /// Number of properties, nested ones included.
    pub fn property_count(&self) -> usize {
        self.properties.values().map(Property::nested_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{CustomPreview, RenderedOutput};
    use crate::schema::DataType;
    use std::fs;
    use tempfile::tempdir;

    const BOOKS: &str = r#"
        name = "Books"
        singular_name = "Book"
        path = "books"
        properties_order = ["title", "tags"]

        [properties.title]
        name = "Title"
        data_type = "string"

        [properties.tags]
        data_type = "array"
        of = { data_type = "string", enum_values = { fiction = "Fiction" } }

        [properties.published_year]
        name = "Published Year"
        data_type = "number"
    "#;

    #[test]
    fn test_parse_books_collection() {
        let collection = Collection::parse(BOOKS).unwrap();
        assert_eq!(collection.name, "Books");
        assert_eq!(collection.path, "books");
        let keys: Vec<&str> = collection
            .ordered_properties()
            .iter()
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(keys, vec!["title", "tags", "published_year"]);
        assert_eq!(
            collection.property("published_year").unwrap().data_type(),
            DataType::Number
        );
        assert_eq!(collection.property_count(), 4);
    }

    #[test]
    fn test_parse_rejects_array_without_of() {
        let result = Collection::parse(
            r#"
            name = "Broken"
            path = "broken"
            [properties.tags]
            data_type = "array"
            "#,
        );
        assert_eq!(
            result,
            Err(SchemaError::ArrayMissingOf {
                property: "tags".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_order_key() {
        let result = Collection::parse(
            r#"
            name = "Books"
            path = "books"
            properties_order = ["missing"]
            "#,
        );
        assert!(matches!(
            result,
            Err(SchemaError::UnknownPropertyInOrder { .. })
        ));
    }

    #[test]
    fn test_load_from_file_with_context() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.toml");
        fs::write(&path, BOOKS).unwrap();
        let collection = Collection::load(&path).unwrap();
        assert_eq!(collection.properties.len(), 3);

        let missing = Collection::load(&dir.path().join("nope.toml"));
        assert!(
            missing
                .unwrap_err()
                .to_string()
                .contains("Failed to read collection file")
        );
    }

    #[test]
    fn test_bind_previews_attaches_named_renderer() {
        let mut collection = Collection::parse(
            r#"
            name = "Books"
            path = "books"
            [properties.rating]
            data_type = "number"
            preview = "stars"
            "#,
        )
        .unwrap();
        let mut registry = PreviewRegistry::new();
        registry.register("stars", CustomPreview::from_fn(|_| RenderedOutput::Empty));
        assert_eq!(collection.bind_previews(&registry).unwrap(), 1);
        assert!(collection.property("rating").unwrap().custom_preview.is_some());
    }

    #[test]
    fn test_bind_previews_unknown_name_fails() {
        let mut collection = Collection::parse(
            r#"
            name = "Books"
            path = "books"
            [properties.rating]
            data_type = "number"
            preview = "stars"
            "#,
        )
        .unwrap();
        let result = collection.bind_previews(&PreviewRegistry::new());
        assert_eq!(
            result,
            Err(SchemaError::UnknownPreview {
                property: "rating".to_string(),
                preview: "stars".to_string()
            })
        );
    }

    #[test]
    fn test_named_preview_allows_array_without_of() {
        let collection = Collection::parse(
            r#"
            name = "Books"
            path = "books"
            [properties.gallery]
            data_type = "array"
            preview = "carousel"
            "#,
        );
        assert!(collection.is_ok());
    }
}
