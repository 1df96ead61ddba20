//! Property preview dispatch.
//!
//! [`render`] picks one presentation variant for a descriptor and a value:
//!
//! 1. a custom preview on the descriptor, if any, renders everything
//! 2. a malformed array descriptor is a [`SchemaError`](crate::errors::SchemaError)
//! 3. an absent or null value renders [`RenderedOutput::Empty`]
//! 4. otherwise the descriptor's data type decides, and a value of the
//!    wrong runtime type renders [`RenderedOutput::Error`] and is logged
//!
//! Dispatch is synchronous and keeps no state, so the same inputs always
//! produce the same output.

mod context;
mod dispatcher;
mod output;

pub use context::{
    DEFAULT_DATE_FORMAT, DEFAULT_DATE_TIME_FORMAT, DEFAULT_MAP_PREVIEW_LIMIT, PreviewContext,
    PreviewSettings, PreviewSize, format_timestamp, is_valid_time_format,
};
pub use dispatcher::render;
pub use output::{EnumChip, MapEntry, OneOfItem, RenderedOutput, TypeMismatch};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::schema::Property;
use crate::value::Value;

/// Inputs handed to a custom preview renderer.
#[derive(Debug, Clone, Copy)]
pub struct PreviewRequest<'a> {
    pub property_key: &'a str,
    pub value: Option<&'a Value>,
    pub property: &'a Property,
    pub context: &'a PreviewContext,
}

/// A renderer that replaces dispatch for one property.
pub trait PreviewRenderer: Send + Sync {
    fn render(&self, request: &PreviewRequest<'_>) -> RenderedOutput;
}

impl<F> PreviewRenderer for F
where
    F: Fn(&PreviewRequest<'_>) -> RenderedOutput + Send + Sync,
{
    fn render(&self, request: &PreviewRequest<'_>) -> RenderedOutput {
        self(request)
    }
}

/// Shared handle to a custom preview renderer.
#[derive(Clone)]
pub struct CustomPreview(Arc<dyn PreviewRenderer>);

impl CustomPreview {
    pub fn new<R>(renderer: R) -> Self
    where
        R: PreviewRenderer + 'static,
    {
        Self(Arc::new(renderer))
    }

    /// Wrap a closure. Prefer this over [`CustomPreview::new`] for closures so
    /// the argument type is inferred.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&PreviewRequest<'_>) -> RenderedOutput + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn render(&self, request: &PreviewRequest<'_>) -> RenderedOutput {
        self.0.render(request)
    }
}

impl fmt::Debug for CustomPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPreview(..)")
    }
}

/// Two handles are equal when they share the same renderer.
impl PartialEq for CustomPreview {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Named custom previews that schemas refer to with `preview = "<name>"`.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    previews: HashMap<String, CustomPreview>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview, replacing any previous one of the same name.
    pub fn register(&mut self, name: &str, preview: CustomPreview) {
        self.previews.insert(name.to_string(), preview);
    }

    pub fn get(&self, name: &str) -> Option<CustomPreview> {
        self.previews.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.previews.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_returns_shared_handle() {
        let preview = CustomPreview::from_fn(|_| RenderedOutput::Empty);
        let mut registry = PreviewRegistry::new();
        registry.register("blank", preview.clone());
        assert_eq!(registry.get("blank"), Some(preview));
        assert!(registry.get("other").is_none());
        assert_eq!(registry.names(), vec!["blank"]);
    }

    #[test]
    fn test_distinct_renderers_are_not_equal() {
        let a = CustomPreview::from_fn(|_| RenderedOutput::Empty);
        let b = CustomPreview::from_fn(|_| RenderedOutput::Empty);
        assert_ne!(a, b);
    }
}
