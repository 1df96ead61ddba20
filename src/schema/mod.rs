//! Declarative collection schemas.
//!
//! A collection names its document-store path and describes each field with
//! a [`Property`]. Schemas are plain TOML and are validated on load, so a
//! malformed array descriptor is reported to the schema author instead of
//! reaching a preview.

mod collection;
mod enums;
mod property;

pub use collection::Collection;
pub use enums::{EnumKey, EnumValueConfig, EnumValues};
pub use property::{
    ArrayProperty, AutoValue, DataType, MapProperty, MediaType, NumberProperty, OneOf, Property,
    PropertyKind, ReferenceProperty, StorageConfig, StringProperty, TimestampMode,
    TimestampProperty, UrlSetting,
};
