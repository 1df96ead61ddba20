//! Property descriptors.
//!
//! A [`Property`] describes one field of a collection: its data type, the
//! type-specific rendering hints, and an optional custom preview. The data
//! type set is closed; an unknown `data_type` is rejected when the schema is
//! parsed.
//!
//! ```toml
//! [properties.cover]
//! name = "Cover"
//! data_type = "string"
//! storage = { storage_path = "covers", store_url = true }
//!
//! [properties.tags]
//! data_type = "array"
//! of = { data_type = "string", enum_values = { fiction = "Fiction" } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::enums::EnumValues;
use crate::errors::SchemaError;
use crate::preview::CustomPreview;

/// The data type tag of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Timestamp,
    Map,
    Array,
    Reference,
    #[serde(rename = "geopoint")]
    GeoPoint,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Map => "map",
            DataType::Array => "array",
            DataType::Reference => "reference",
            DataType::GeoPoint => "geopoint",
        };
        f.write_str(name)
    }
}

/// Media hint for URL and storage strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    File,
}

/// The `url` attribute: either a plain flag or the kind of media linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlSetting {
    Flag(bool),
    Media(MediaType),
}

/// Storage hints for strings that hold a storage path or download URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Folder the uploads go to
    #[serde(default)]
    pub storage_path: String,
    /// Whether the stored value is the download URL rather than the path
    #[serde(default)]
    pub store_url: bool,
    /// Accepted MIME patterns (e.g. `image/*`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<UrlSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
    #[serde(default)]
    pub markdown: bool,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<EnumValues>,
}

impl StringProperty {
    /// Whether the string is a URL. `url = false` counts as unset.
    pub fn is_url(&self) -> bool {
        matches!(self.url, Some(UrlSetting::Flag(true)) | Some(UrlSetting::Media(_)))
    }

    pub fn url_media(&self) -> Option<MediaType> {
        match self.url {
            Some(UrlSetting::Media(media)) => Some(media),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<EnumValues>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampMode {
    Date,
    #[default]
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoValue {
    OnCreate,
    OnUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimestampProperty {
    #[serde(default)]
    pub mode: TimestampMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_value: Option<AutoValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapProperty {
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
    /// Display order; keys not listed follow in key order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties_order: Vec<String>,
}

impl MapProperty {
    /// Properties in display order.
    pub fn ordered_properties(&self) -> Vec<(&str, &Property)> {
        ordered(&self.properties, &self.properties_order)
    }
}

fn default_type_field() -> String {
    "type".to_string()
}

fn default_value_field() -> String {
    "value".to_string()
}

/// Alternatives of a tagged-union array. Each element is stored as
/// `{ <type_field> = "<alternative>", <value_field> = <value> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneOf {
    pub properties: BTreeMap<String, Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties_order: Vec<String>,
    #[serde(default = "default_type_field")]
    pub type_field: String,
    #[serde(default = "default_value_field")]
    pub value_field: String,
}

impl OneOf {
    pub fn new(properties: BTreeMap<String, Property>) -> Self {
        Self {
            properties,
            properties_order: Vec::new(),
            type_field: default_type_field(),
            value_field: default_value_field(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of: Option<Box<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<OneOf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProperty {
    /// Target collection path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Properties of the target entity shown in the preview
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_properties: Vec<String>,
}

/// Type-specific part of a property, tagged by `data_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_type", rename_all = "snake_case")]
pub enum PropertyKind {
    String(StringProperty),
    Number(NumberProperty),
    Boolean,
    Timestamp(TimestampProperty),
    Map(MapProperty),
    Array(ArrayProperty),
    Reference(ReferenceProperty),
    #[serde(rename = "geopoint")]
    GeoPoint,
}

impl PropertyKind {
    pub fn data_type(&self) -> DataType {
        match self {
            PropertyKind::String(_) => DataType::String,
            PropertyKind::Number(_) => DataType::Number,
            PropertyKind::Boolean => DataType::Boolean,
            PropertyKind::Timestamp(_) => DataType::Timestamp,
            PropertyKind::Map(_) => DataType::Map,
            PropertyKind::Array(_) => DataType::Array,
            PropertyKind::Reference(_) => DataType::Reference,
            PropertyKind::GeoPoint => DataType::GeoPoint,
        }
    }
}

/// A field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: PropertyKind,
    /// Name of a registered custom preview, bound by `Collection::bind_previews`
    #[serde(default, rename = "preview", skip_serializing_if = "Option::is_none")]
    pub preview_name: Option<String>,
    #[serde(skip)]
    pub custom_preview: Option<CustomPreview>,
}

impl Property {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            name: None,
            description: None,
            kind,
            preview_name: None,
            custom_preview: None,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyKind::String(StringProperty::default()))
    }

    pub fn number() -> Self {
        Self::new(PropertyKind::Number(NumberProperty::default()))
    }

    pub fn boolean() -> Self {
        Self::new(PropertyKind::Boolean)
    }

    pub fn timestamp() -> Self {
        Self::new(PropertyKind::Timestamp(TimestampProperty::default()))
    }

    pub fn map(properties: BTreeMap<String, Property>) -> Self {
        Self::new(PropertyKind::Map(MapProperty {
            properties,
            properties_order: Vec::new(),
        }))
    }

    pub fn array_of(of: Property) -> Self {
        Self::new(PropertyKind::Array(ArrayProperty {
            of: Some(Box::new(of)),
            one_of: None,
        }))
    }

    pub fn array_one_of(one_of: OneOf) -> Self {
        Self::new(PropertyKind::Array(ArrayProperty {
            of: None,
            one_of: Some(one_of),
        }))
    }

    pub fn reference(path: Option<&str>) -> Self {
        Self::new(PropertyKind::Reference(ReferenceProperty {
            path: path.map(str::to_string),
            preview_properties: Vec::new(),
        }))
    }

    pub fn geopoint() -> Self {
        Self::new(PropertyKind::GeoPoint)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_custom_preview(mut self, preview: CustomPreview) -> Self {
        self.custom_preview = Some(preview);
        self
    }

    /// Attach enum options. Ignored for types other than string and number.
    pub fn with_enum_values(mut self, values: EnumValues) -> Self {
        match &mut self.kind {
            PropertyKind::String(s) => s.enum_values = Some(values),
            PropertyKind::Number(n) => n.enum_values = Some(values),
            _ => {}
        }
        self
    }

    pub fn data_type(&self) -> DataType {
        self.kind.data_type()
    }

    /// Display label, falling back to the property key.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }

    /// Check this descriptor's own array configuration (non-recursive).
    ///
    /// A property with a custom preview may omit `of`/`one_of`, since the
    /// dispatcher never inspects them.
    pub fn check_array_config(&self, key: &str) -> Result<(), SchemaError> {
        let PropertyKind::Array(array) = &self.kind else {
            return Ok(());
        };
        if self.custom_preview.is_some() || self.preview_name.is_some() {
            return Ok(());
        }
        match (&array.of, &array.one_of) {
            (None, None) => Err(SchemaError::ArrayMissingOf {
                property: key.to_string(),
            }),
            (Some(_), Some(_)) => Err(SchemaError::ArrayBothOfAndOneOf {
                property: key.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Validate this descriptor and every nested one.
    pub fn validate(&self, key: &str) -> Result<(), SchemaError> {
        self.check_array_config(key)?;
        match &self.kind {
            PropertyKind::Map(map) => {
                check_order(key, &map.properties, &map.properties_order)?;
                for (sub_key, property) in &map.properties {
                    property.validate(&format!("{}.{}", key, sub_key))?;
                }
            }
            PropertyKind::Array(array) => {
                if let Some(of) = &array.of {
                    of.validate(&format!("{}[]", key))?;
                }
                if let Some(one_of) = &array.one_of {
                    check_order(key, &one_of.properties, &one_of.properties_order)?;
                    for (alternative, property) in &one_of.properties {
                        property.validate(&format!("{}[{}]", key, alternative))?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Count this property plus every nested one.
    pub fn nested_count(&self) -> usize {
        let nested: usize = match &self.kind {
            PropertyKind::Map(map) => map.properties.values().map(Property::nested_count).sum(),
            PropertyKind::Array(array) => {
                array.of.as_deref().map_or(0, Property::nested_count)
                    + array.one_of.as_ref().map_or(0, |one_of| {
                        one_of.properties.values().map(Property::nested_count).sum()
                    })
            }
            _ => 0,
        };
        1 + nested
    }

    /// Visit this property and every nested property mutably, depth first.
    pub(crate) fn visit_mut<F>(&mut self, key: &str, f: &mut F) -> Result<(), SchemaError>
    where
        F: FnMut(&str, &mut Property) -> Result<(), SchemaError>,
    {
        f(key, self)?;
        match &mut self.kind {
            PropertyKind::Map(map) => {
                for (sub_key, property) in map.properties.iter_mut() {
                    property.visit_mut(&format!("{}.{}", key, sub_key), f)?;
                }
            }
            PropertyKind::Array(array) => {
                if let Some(of) = array.of.as_deref_mut() {
                    of.visit_mut(&format!("{}[]", key), f)?;
                }
                if let Some(one_of) = &mut array.one_of {
                    for (alternative, property) in one_of.properties.iter_mut() {
                        property.visit_mut(&format!("{}[{}]", key, alternative), f)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Order `properties` by `order`, appending unlisted keys in key order.
pub(crate) fn ordered<'a>(
    properties: &'a BTreeMap<String, Property>,
    order: &'a [String],
) -> Vec<(&'a str, &'a Property)> {
    let mut result: Vec<(&str, &Property)> = order
        .iter()
        .filter_map(|key| properties.get_key_value(key))
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    for (key, property) in properties {
        if !order.contains(key) {
            result.push((key.as_str(), property));
        }
    }
    result
}

pub(crate) fn check_order(
    owner: &str,
    properties: &BTreeMap<String, Property>,
    order: &[String],
) -> Result<(), SchemaError> {
    match order.iter().find(|key| !properties.contains_key(*key)) {
        Some(unknown) => Err(SchemaError::UnknownPropertyInOrder {
            owner: owner.to_string(),
            property: unknown.clone(),
        }),
        None => Ok(()),
    }
}
