//! Resolution of entity references into previewable summaries.
//!
//! The dispatcher only emits [`RenderedOutput::Reference`](crate::preview::RenderedOutput)
//! markers; a host resolves them through a [`ReferenceResolver`] when it wants
//! to show the target's fields.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::errors::ResolveError;
use crate::value::{EntityReference, Value};

/// Keys shown when a reference declares no preview properties.
pub const DEFAULT_SUMMARY_FIELDS: usize = 3;

/// A referenced entity's values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedReference {
    pub reference: EntityReference,
    pub values: BTreeMap<String, Value>,
}

impl ResolvedReference {
    /// The values to show for this entity.
    ///
    /// Uses `preview_properties` in order, skipping ones the entity lacks;
    /// without any, falls back to the first few keys.
    pub fn summary(&self, preview_properties: &[String]) -> Vec<(&str, &Value)> {
        if preview_properties.is_empty() {
            return self
                .values
                .iter()
                .take(DEFAULT_SUMMARY_FIELDS)
                .map(|(k, v)| (k.as_str(), v))
                .collect();
        }
        preview_properties
            .iter()
            .filter_map(|key| self.values.get_key_value(key))
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }
}

#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    async fn resolve(&self, reference: &EntityReference) -> Result<ResolvedReference, ResolveError>;
}

/// Resolve each reference in order, keeping failures alongside successes.
pub async fn resolve_all<R>(
    resolver: &R,
    references: &[EntityReference],
) -> Vec<(EntityReference, Result<ResolvedReference, ResolveError>)>
where
    R: ReferenceResolver + ?Sized,
{
    let mut resolved = Vec::with_capacity(references.len());
    for reference in references {
        let result = resolver.resolve(reference).await;
        if let Err(e) = &result {
            tracing::warn!(reference = %reference, error = %e, "Failed to resolve reference");
        }
        resolved.push((reference.clone(), result));
    }
    resolved
}

/// Resolver over a fixed set of entities keyed by `path/id`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResolver {
    entities: HashMap<String, BTreeMap<String, Value>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of `{"path/id": {field: value, ...}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, BTreeMap<String, serde_json::Value>> =
            serde_json::from_str(json).context("Invalid reference fixture JSON")?;
        let entities = raw
            .into_iter()
            .map(|(key, fields)| {
                let values = fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from_json(value)))
                    .collect();
                (key, values)
            })
            .collect();
        Ok(Self { entities })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference fixture: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to load reference fixture: {}", path.display()))
    }

    pub fn insert(&mut self, reference: &EntityReference, values: BTreeMap<String, Value>) {
        self.entities.insert(reference.path_with_id(), values);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl ReferenceResolver for InMemoryResolver {
    async fn resolve(&self, reference: &EntityReference) -> Result<ResolvedReference, ResolveError> {
        self.entities
            .get(&reference.path_with_id())
            .map(|values| ResolvedReference {
                reference: reference.clone(),
                values: values.clone(),
            })
            .ok_or_else(|| ResolveError::NotFound {
                path: reference.path.clone(),
                id: reference.id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"{
        "authors/a1": { "name": "Ada", "born": 1815, "country": "UK", "active": false },
        "authors/a2": { "name": "Grace" }
    }"#;

    #[tokio::test]
    async fn test_resolve_known_entity() {
        let resolver = InMemoryResolver::from_json(FIXTURE).unwrap();
        let resolved = resolver
            .resolve(&EntityReference::new("authors", "a1"))
            .await
            .unwrap();
        assert_eq!(resolved.values.get("name"), Some(&Value::from("Ada")));
    }

    #[tokio::test]
    async fn test_resolve_missing_entity() {
        let resolver = InMemoryResolver::from_json(FIXTURE).unwrap();
        let err = resolver
            .resolve(&EntityReference::new("authors", "zz"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { ref id, .. } if id == "zz"));
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order_and_failures() {
        let resolver = InMemoryResolver::from_json(FIXTURE).unwrap();
        let refs = vec![
            EntityReference::new("authors", "a2"),
            EntityReference::new("authors", "missing"),
            EntityReference::new("authors", "a1"),
        ];
        let results = resolve_all(&resolver, &refs).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(results[2].0.id, "a1");
    }

    #[test]
    fn test_summary_uses_preview_properties() {
        let resolver = InMemoryResolver::from_json(FIXTURE).unwrap();
        let values = resolver.entities.get("authors/a1").unwrap().clone();
        let resolved = ResolvedReference {
            reference: EntityReference::new("authors", "a1"),
            values,
        };
        let keys: Vec<&str> = resolved
            .summary(&["country".to_string(), "nope".to_string(), "name".to_string()])
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["country", "name"]);

        let fallback: Vec<&str> = resolved.summary(&[]).into_iter().map(|(k, _)| k).collect();
        assert_eq!(fallback, vec!["active", "born", "country"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        let resolver = InMemoryResolver::load(file.path()).unwrap();
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_invalid_fixture_is_error() {
        assert!(InMemoryResolver::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_insert() {
        let mut resolver = InMemoryResolver::new();
        let reference = EntityReference::new("tags", "t1");
        resolver.insert(&reference, BTreeMap::from([("label".to_string(), Value::from("rust"))]));
        assert!(!resolver.is_empty());
    }
}
