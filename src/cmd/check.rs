//! Schema validation command: `fieldview check`.

use anyhow::Result;
use std::path::Path;

use fieldview::ui::icons::CHECK;

use super::load_collection;

pub fn cmd_check(schema: &Path) -> Result<()> {
    let collection = load_collection(schema)?;

    println!(
        "{}{} ({})",
        CHECK,
        console::style(&collection.name).bold(),
        collection.path
    );
    if let Some(description) = &collection.description {
        println!("  {}", console::style(description).dim());
    }
    println!(
        "  {} properties ({} including nested)",
        collection.properties.len(),
        collection.property_count()
    );
    println!();
    for (key, property) in collection.ordered_properties() {
        let preview = property
            .preview_name
            .as_deref()
            .map(|name| format!(" [preview: {}]", name))
            .unwrap_or_default();
        println!(
            "  {:<20} {}{}",
            property.label(key),
            console::style(property.data_type()).cyan(),
            preview
        );
    }

    Ok(())
}
