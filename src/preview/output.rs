//! Semantic preview variants.
//!
//! A [`RenderedOutput`] says *what* to show, never how. Terminal rendering
//! lives in `crate::ui`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::{DataType, MediaType};
use crate::value::{EntityReference, Value, ValueKind};

/// A value whose runtime type disagrees with its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMismatch {
    pub property: String,
    pub expected: DataType,
    pub found: ValueKind,
    pub value: Value,
    pub message: String,
}

/// One enum option as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumChip {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// False when the value matches no configured option
    pub known: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub key: String,
    pub label: String,
    pub output: RenderedOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneOfItem {
    /// The alternative chosen by the element's type tag
    pub type_tag: String,
    pub output: RenderedOutput,
}

/// The result of dispatching a property preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum RenderedOutput {
    /// Absent or null value
    Empty,
    Error(TypeMismatch),
    Text {
        value: String,
        multiline: bool,
    },
    Url {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        media: Option<MediaType>,
    },
    StorageThumbnail {
        path: String,
        store_url: bool,
    },
    Markdown {
        source: String,
    },
    EnumChip(EnumChip),
    Number {
        value: f64,
    },
    Boolean {
        value: bool,
    },
    Timestamp {
        value: DateTime<Utc>,
        formatted: String,
    },
    Map {
        entries: Vec<MapEntry>,
        /// Entries left out because of the preview size
        hidden: usize,
    },
    Reference {
        reference: EntityReference,
        target_path: String,
        preview_properties: Vec<String>,
    },
    ArrayOfMaps {
        items: Vec<RenderedOutput>,
    },
    ArrayOfReferences {
        items: Vec<RenderedOutput>,
    },
    EnumChips {
        items: Vec<RenderedOutput>,
    },
    StorageGallery {
        items: Vec<RenderedOutput>,
    },
    List {
        items: Vec<RenderedOutput>,
    },
    Array {
        items: Vec<RenderedOutput>,
    },
    OneOf {
        items: Vec<OneOfItem>,
    },
    /// Raw JSON fallback
    Json {
        raw: String,
    },
    /// Produced by custom preview renderers
    Custom {
        kind: String,
        body: serde_json::Value,
    },
}

impl RenderedOutput {
    /// Snake-case variant name, as serialized.
    pub fn variant_name(&self) -> &'static str {
        match self {
            RenderedOutput::Empty => "empty",
            RenderedOutput::Error(_) => "error",
            RenderedOutput::Text { .. } => "text",
            RenderedOutput::Url { .. } => "url",
            RenderedOutput::StorageThumbnail { .. } => "storage_thumbnail",
            RenderedOutput::Markdown { .. } => "markdown",
            RenderedOutput::EnumChip(_) => "enum_chip",
            RenderedOutput::Number { .. } => "number",
            RenderedOutput::Boolean { .. } => "boolean",
            RenderedOutput::Timestamp { .. } => "timestamp",
            RenderedOutput::Map { .. } => "map",
            RenderedOutput::Reference { .. } => "reference",
            RenderedOutput::ArrayOfMaps { .. } => "array_of_maps",
            RenderedOutput::ArrayOfReferences { .. } => "array_of_references",
            RenderedOutput::EnumChips { .. } => "enum_chips",
            RenderedOutput::StorageGallery { .. } => "storage_gallery",
            RenderedOutput::List { .. } => "list",
            RenderedOutput::Array { .. } => "array",
            RenderedOutput::OneOf { .. } => "one_of",
            RenderedOutput::Json { .. } => "json",
            RenderedOutput::Custom { .. } => "custom",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RenderedOutput::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RenderedOutput::Error(_))
    }

    /// Child outputs, for array and map variants.
    pub fn children(&self) -> Vec<&RenderedOutput> {
        match self {
            RenderedOutput::ArrayOfMaps { items }
            | RenderedOutput::ArrayOfReferences { items }
            | RenderedOutput::EnumChips { items }
            | RenderedOutput::StorageGallery { items }
            | RenderedOutput::List { items }
            | RenderedOutput::Array { items } => items.iter().collect(),
            RenderedOutput::OneOf { items } => items.iter().map(|item| &item.output).collect(),
            RenderedOutput::Map { entries, .. } => {
                entries.iter().map(|entry| &entry.output).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Every mismatch in this output tree, depth first.
    pub fn errors(&self) -> Vec<&TypeMismatch> {
        let mut found = Vec::new();
        self.walk(&mut |output| {
            if let RenderedOutput::Error(mismatch) = output {
                found.push(mismatch);
            }
        });
        found
    }

    /// Every entity reference in this output tree, depth first.
    pub fn references(&self) -> Vec<&EntityReference> {
        let mut found = Vec::new();
        self.walk(&mut |output| {
            if let RenderedOutput::Reference { reference, .. } = output {
                found.push(reference);
            }
        });
        found
    }

    fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a RenderedOutput),
    {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}
