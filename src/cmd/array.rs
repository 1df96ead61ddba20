//! Array field replay command: `fieldview array`.

use anyhow::{Context, Result, bail};
use std::fmt;
use std::path::Path;

use fieldview::array::{ArrayField, IdGenerator, ReadOnlyFieldBuilder};
use fieldview::fieldview_config::FieldviewConfig;
use fieldview::preview::{PreviewContext, RenderedOutput};
use fieldview::schema::PropertyKind;
use fieldview::ui::icons::{ADD, REMOVE, SWAP};
use fieldview::ui::render_text;
use fieldview::value::Value;

use super::{load_collection, load_entity};

/// One step replayed against an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    Append,
    Remove(usize),
    Move { from: usize, to: usize },
    Resync,
}

impl fmt::Display for ArrayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayOp::Append => write!(f, "append"),
            ArrayOp::Remove(index) => write!(f, "remove:{}", index),
            ArrayOp::Move { from, to } => write!(f, "move:{}:{}", from, to),
            ArrayOp::Resync => write!(f, "resync"),
        }
    }
}

impl std::str::FromStr for ArrayOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let index = |raw: &str| -> Result<usize> {
            raw.parse()
                .with_context(|| format!("Invalid position '{}' in operation '{}'", raw, s))
        };
        match parts.as_slice() {
            ["append"] => Ok(ArrayOp::Append),
            ["resync"] => Ok(ArrayOp::Resync),
            ["remove", i] => Ok(ArrayOp::Remove(index(*i)?)),
            ["move", from, to] => Ok(ArrayOp::Move {
                from: index(*from)?,
                to: index(*to)?,
            }),
            _ => bail!(
                "Invalid operation '{}'. Valid values: append, remove:<i>, move:<from>:<to>, resync",
                s
            ),
        }
    }
}

pub fn cmd_array(
    config: &FieldviewConfig,
    schema: &Path,
    entity: &Path,
    property_key: &str,
    ops: &[ArrayOp],
) -> Result<()> {
    let collection = load_collection(schema)?;
    let Some(property) = collection.property(property_key) else {
        bail!(
            "Collection '{}' has no property '{}'",
            collection.name,
            property_key
        );
    };
    let PropertyKind::Array(array) = &property.kind else {
        bail!(
            "Property '{}' is a {}, not an array",
            property_key,
            property.data_type()
        );
    };

    let values = load_entity(entity)?;
    let mut backing = match values.get(property_key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => bail!(
            "Value of '{}' is a {}, not an array",
            property_key,
            other.kind()
        ),
    };

    let mut field = ArrayField::initialize(property_key, config.id_strategy()?.generator(), &backing)?;

    println!(
        "{} {}",
        console::style(property.label(property_key)).bold(),
        console::style(format!("({})", field.type_tag())).dim()
    );
    for op in ops {
        apply(&mut field, &mut backing, *op)
            .with_context(|| format!("Operation '{}' failed", op))?;
    }

    let context = PreviewContext::new(config.preview_size()?).with_settings(config.preview_settings());
    println!();
    println!("Entries:");
    for entry in field.entries(&backing) {
        let output = match &array.of {
            Some(of) => field.render_entry(
                &backing,
                entry.position,
                of,
                &context,
                &ReadOnlyFieldBuilder,
            )?,
            None => RenderedOutput::Json {
                raw: entry.content.map(Value::to_string).unwrap_or_default(),
            },
        };
        println!(
            "  #{} {} {}",
            entry.position,
            console::style(format!("id={}", entry.id)).dim(),
            render_text(&output, 1)
        );
    }

    println!();
    let result = serde_json::Value::Array(backing.iter().map(Value::to_json).collect());
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn apply<G: IdGenerator>(
    field: &mut ArrayField<G>,
    backing: &mut Vec<Value>,
    op: ArrayOp,
) -> Result<()> {
    match op {
        ArrayOp::Append => {
            let id = field.append(backing)?;
            println!("{}append -> id {}", ADD, id);
        }
        ArrayOp::Remove(position) => {
            let id = field.remove(backing, position)?;
            println!("{}remove #{} (id {})", REMOVE, position, id);
        }
        ArrayOp::Move { from, to } => {
            field.move_entry(backing, from, to)?;
            println!("{}swap #{} <-> #{}", SWAP, from, to);
        }
        ArrayOp::Resync => {
            field.resync(backing)?;
            println!("resync -> {} fresh ids", field.len());
        }
    }
    Ok(())
}
