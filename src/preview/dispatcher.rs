use tracing::error;

use super::context::{PreviewContext, PreviewSize, format_timestamp};
use super::output::{EnumChip, MapEntry, OneOfItem, RenderedOutput, TypeMismatch};
use super::PreviewRequest;
use crate::errors::SchemaError;
use crate::schema::{
    ArrayProperty, DataType, EnumValues, MapProperty, OneOf, Property, PropertyKind,
    StringProperty, TimestampMode,
};
use crate::value::Value;

/// Render the preview of one property value.
///
/// `property_key` names the field in mismatch reports; nested values use
/// `key.sub` for map entries and `key[i]` for array elements.
///
/// An absent value is always `Empty`, even with a custom preview attached;
/// an explicit null reaches the custom preview first. Only a malformed array
/// descriptor returns `Err`. A value of the wrong runtime type renders an
/// inline error variant instead.
pub fn render(
    property: &Property,
    property_key: &str,
    value: Option<&Value>,
    context: &PreviewContext,
) -> Result<RenderedOutput, SchemaError> {
    let Some(value) = value else {
        return Ok(RenderedOutput::Empty);
    };

    if let Some(custom) = &property.custom_preview {
        return Ok(custom.render(&PreviewRequest {
            property_key,
            value: Some(value),
            property,
            context,
        }));
    }

    property.check_array_config(property_key)?;

    if value.is_null() {
        return Ok(RenderedOutput::Empty);
    }

    let output = match &property.kind {
        PropertyKind::String(string) => match value {
            Value::String(s) => render_string(string, s),
            _ => wrong_value_type(property_key, DataType::String, value),
        },
        PropertyKind::Number(number) => match value {
            Value::Number(n) => match &number.enum_values {
                Some(enum_values) => enum_chip(enum_values, value, &number_label(*n)),
                None => RenderedOutput::Number { value: *n },
            },
            _ => wrong_value_type(property_key, DataType::Number, value),
        },
        PropertyKind::Boolean => match value {
            Value::Boolean(b) => RenderedOutput::Boolean { value: *b },
            _ => wrong_value_type(property_key, DataType::Boolean, value),
        },
        PropertyKind::Timestamp(timestamp) => match value {
            Value::Timestamp(ts) => {
                let format = match timestamp.mode {
                    TimestampMode::Date => &context.settings.date_format,
                    TimestampMode::DateTime => &context.settings.date_time_format,
                };
                RenderedOutput::Timestamp {
                    value: *ts,
                    formatted: format_timestamp(ts, format),
                }
            }
            _ => wrong_value_type(property_key, DataType::Timestamp, value),
        },
        PropertyKind::Map(map) => match value {
            Value::Map(_) => render_map(map, property_key, value, context)?,
            _ => wrong_value_type(property_key, DataType::Map, value),
        },
        PropertyKind::Array(array) => match value {
            Value::Array(items) => render_array(array, property_key, items, context)?,
            _ => wrong_value_type(property_key, DataType::Array, value),
        },
        PropertyKind::Reference(reference) => match (&reference.path, value) {
            (None, _) => RenderedOutput::Empty,
            (Some(path), Value::Reference(handle)) => RenderedOutput::Reference {
                reference: handle.clone(),
                target_path: path.clone(),
                preview_properties: reference.preview_properties.clone(),
            },
            (Some(_), _) => wrong_value_type(property_key, DataType::Reference, value),
        },
        PropertyKind::GeoPoint => RenderedOutput::Json {
            raw: value.to_json().to_string(),
        },
    };

    Ok(output)
}

fn render_string(string: &StringProperty, s: &str) -> RenderedOutput {
    if string.is_url() {
        RenderedOutput::Url {
            url: s.to_string(),
            media: string.url_media(),
        }
    } else if let Some(storage) = &string.storage {
        RenderedOutput::StorageThumbnail {
            path: s.to_string(),
            store_url: storage.store_url,
        }
    } else if string.markdown {
        RenderedOutput::Markdown {
            source: s.to_string(),
        }
    } else if let Some(enum_values) = &string.enum_values {
        enum_chip(enum_values, &Value::String(s.to_string()), s)
    } else {
        RenderedOutput::Text {
            value: s.to_string(),
            multiline: string.multiline,
        }
    }
}

fn enum_chip(enum_values: &EnumValues, value: &Value, raw: &str) -> RenderedOutput {
    let chip = match enum_values.resolve(value) {
        Some(option) => EnumChip {
            id: option.id.to_string(),
            label: option.label,
            color: option.color,
            known: true,
        },
        None => EnumChip {
            id: raw.to_string(),
            label: raw.to_string(),
            color: None,
            known: false,
        },
    };
    RenderedOutput::EnumChip(chip)
}

fn number_label(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn render_map(
    map: &MapProperty,
    property_key: &str,
    value: &Value,
    context: &PreviewContext,
) -> Result<RenderedOutput, SchemaError> {
    let Value::Map(values) = value else {
        return Ok(wrong_value_type(property_key, DataType::Map, value));
    };
    let nested = context.nested();

    let mut entries = if map.properties.is_empty() {
        values
            .iter()
            .map(|(key, v)| MapEntry {
                key: key.clone(),
                label: key.clone(),
                output: RenderedOutput::Json {
                    raw: v.to_json().to_string(),
                },
            })
            .collect::<Vec<_>>()
    } else {
        map.ordered_properties()
            .into_iter()
            .map(|(key, sub)| {
                let output = render(
                    sub,
                    &format!("{}.{}", property_key, key),
                    values.get(key),
                    &nested,
                )?;
                Ok(MapEntry {
                    key: key.to_string(),
                    label: sub.label(key).to_string(),
                    output,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?
    };

    let mut hidden = 0;
    if context.size != PreviewSize::Regular && entries.len() > context.settings.map_preview_limit {
        hidden = entries.len() - context.settings.map_preview_limit;
        entries.truncate(context.settings.map_preview_limit);
    }

    Ok(RenderedOutput::Map { entries, hidden })
}

fn render_array(
    array: &ArrayProperty,
    property_key: &str,
    items: &[Value],
    context: &PreviewContext,
) -> Result<RenderedOutput, SchemaError> {
    if let Some(one_of) = &array.one_of {
        return render_one_of(one_of, property_key, items, context);
    }
    let Some(of) = array.of.as_deref() else {
        return Err(SchemaError::ArrayMissingOf {
            property: property_key.to_string(),
        });
    };

    let nested = context.nested();
    let render_items = || -> Result<Vec<RenderedOutput>, SchemaError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| render(of, &format!("{}[{}]", property_key, i), Some(item), &nested))
            .collect()
    };

    let output = match &of.kind {
        PropertyKind::Map(_) => RenderedOutput::ArrayOfMaps {
            items: render_items()?,
        },
        PropertyKind::Reference(reference) => {
            if reference.path.is_some() {
                RenderedOutput::ArrayOfReferences {
                    items: render_items()?,
                }
            } else {
                RenderedOutput::Empty
            }
        }
        PropertyKind::String(StringProperty {
            enum_values: Some(_),
            ..
        })
        | PropertyKind::Number(crate::schema::NumberProperty {
            enum_values: Some(_),
        }) => RenderedOutput::EnumChips {
            items: render_items()?,
        },
        PropertyKind::String(StringProperty {
            storage: Some(_), ..
        }) => RenderedOutput::StorageGallery {
            items: render_items()?,
        },
        PropertyKind::String(_) | PropertyKind::Number(_) => RenderedOutput::List {
            items: render_items()?,
        },
        _ => RenderedOutput::Array {
            items: render_items()?,
        },
    };
    Ok(output)
}

fn render_one_of(
    one_of: &OneOf,
    property_key: &str,
    items: &[Value],
    context: &PreviewContext,
) -> Result<RenderedOutput, SchemaError> {
    let nested = context.nested();
    let mut rendered = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let item_key = format!("{}[{}]", property_key, i);
        let tagged = item.as_map().and_then(|map| {
            let tag = map.get(&one_of.type_field)?.as_str()?;
            let alternative = one_of.properties.get(tag)?;
            Some((tag, alternative, map.get(&one_of.value_field)))
        });
        let entry = match tagged {
            Some((tag, alternative, inner)) => OneOfItem {
                type_tag: tag.to_string(),
                output: render(alternative, &item_key, inner, &nested)?,
            },
            None => OneOfItem {
                type_tag: String::new(),
                output: wrong_value_type(&item_key, DataType::Map, item),
            },
        };
        rendered.push(entry);
    }

    Ok(RenderedOutput::OneOf { items: rendered })
}

fn wrong_value_type(property_key: &str, expected: DataType, value: &Value) -> RenderedOutput {
    let json = value.to_json();
    error!(
        property = property_key,
        expected = %expected,
        found = %value.kind(),
        value = %json,
        "Unexpected value for property {}, of type {}",
        property_key,
        expected
    );
    RenderedOutput::Error(TypeMismatch {
        property: property_key.to_string(),
        expected,
        found: value.kind(),
        value: value.clone(),
        message: format!("Unexpected value: {}", json),
    })
}
