//! Entity preview command: `fieldview preview`.

use anyhow::{Context, Result, bail};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use fieldview::fieldview_config::FieldviewConfig;
use fieldview::preview::{self, PreviewContext, RenderedOutput};
use fieldview::reference::{InMemoryResolver, resolve_all};
use fieldview::ui::TextRenderer;
use fieldview::ui::icons::WARN;

use super::{load_collection, load_entity};

pub async fn cmd_preview(
    config: &FieldviewConfig,
    schema: &Path,
    entity: &Path,
    only: Option<&str>,
    refs: Option<&Path>,
    json: bool,
) -> Result<()> {
    let collection = load_collection(schema)?;
    let values = load_entity(entity)?;
    let context = PreviewContext::new(config.preview_size()?).with_settings(config.preview_settings());

    let properties: Vec<_> = match only {
        Some(key) => {
            let Some(property) = collection.property(key) else {
                bail!("Collection '{}' has no property '{}'", collection.name, key);
            };
            vec![(key, property)]
        }
        None => collection.ordered_properties(),
    };

    let mut outputs: Vec<(&str, &str, RenderedOutput)> = Vec::with_capacity(properties.len());
    for (key, property) in properties {
        let output = preview::render(property, key, values.get(key), &context)
            .with_context(|| format!("Failed to render property '{}'", key))?;
        outputs.push((key, property.label(key), output));
    }

    if json {
        let map: BTreeMap<&str, &RenderedOutput> =
            outputs.iter().map(|(key, _, output)| (*key, output)).collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    let resolved = match refs {
        Some(path) => {
            let resolver = InMemoryResolver::load(path)?;
            let references: Vec<_> = outputs
                .iter()
                .flat_map(|(_, _, output)| output.references())
                .cloned()
                .collect();
            resolve_all(&resolver, &references)
                .await
                .into_iter()
                .filter_map(|(reference, result)| result.ok().map(|r| (reference, r)))
                .collect()
        }
        None => HashMap::new(),
    };
    let renderer = TextRenderer::new().with_resolved(&resolved);

    println!(
        "{} {}",
        console::style(collection.singular_name.as_deref().unwrap_or(&collection.name)).bold(),
        console::style(format!("({})", context.size)).dim()
    );
    let mut mismatches = 0;
    for (_, label, output) in &outputs {
        mismatches += output.errors().len();
        let body = renderer.render(output, 0);
        if body.starts_with('\n') {
            println!("{}:{}", console::style(label).bold(), body);
        } else {
            println!("{}: {}", console::style(label).bold(), body);
        }
    }

    if mismatches > 0 {
        println!();
        println!(
            "{}{} value(s) did not match their property type",
            WARN,
            console::style(mismatches).yellow()
        );
    }

    Ok(())
}
