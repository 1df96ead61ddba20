//! Plain terminal rendering of preview outputs.

use console::style;
use std::collections::HashMap;

use super::icons::{CALENDAR, CROSS, FILE, IMAGE, LINK};
use crate::preview::RenderedOutput;
use crate::reference::ResolvedReference;
use crate::schema::MediaType;
use crate::value::EntityReference;

/// Turns a [`RenderedOutput`] tree into styled, indented text.
///
/// The first line of a rendered value goes inline after its label; nested
/// entries follow on their own lines, indented two spaces per level.
#[derive(Debug, Default)]
pub struct TextRenderer<'a> {
    resolved: Option<&'a HashMap<EntityReference, ResolvedReference>>,
}

/// Render without reference resolution.
pub fn render_text(output: &RenderedOutput, indent: usize) -> String {
    TextRenderer::new().render(output, indent)
}

impl<'a> TextRenderer<'a> {
    pub fn new() -> Self {
        Self { resolved: None }
    }

    /// Show the summary of resolved entities next to their references.
    pub fn with_resolved(mut self, resolved: &'a HashMap<EntityReference, ResolvedReference>) -> Self {
        self.resolved = Some(resolved);
        self
    }

    pub fn render(&self, output: &RenderedOutput, indent: usize) -> String {
        match output {
            RenderedOutput::Empty => style("-").dim().to_string(),
            RenderedOutput::Error(mismatch) => format!(
                "{}{} {}",
                CROSS,
                style(&mismatch.message).red(),
                style(format!("(expected {}, found {})", mismatch.expected, mismatch.found)).dim()
            ),
            RenderedOutput::Text { value, multiline } => {
                if *multiline && value.contains('\n') {
                    value
                        .lines()
                        .map(|line| format!("\n{}{}", pad(indent + 1), line))
                        .collect()
                } else {
                    value.clone()
                }
            }
            RenderedOutput::Url { url, media } => {
                let icon = match media {
                    Some(MediaType::Image) => IMAGE.to_string(),
                    Some(_) => FILE.to_string(),
                    None => LINK.to_string(),
                };
                format!("{}{}", icon, style(url).underlined())
            }
            RenderedOutput::StorageThumbnail { path, .. } => format!("{}{}", FILE, path),
            RenderedOutput::Markdown { source } => source
                .lines()
                .map(|line| format!("\n{}{}", pad(indent + 1), style(line).italic()))
                .collect(),
            RenderedOutput::EnumChip(chip) => {
                let label = format!("[{}]", chip.label);
                if chip.known {
                    style(label).cyan().to_string()
                } else {
                    style(label).yellow().to_string()
                }
            }
            RenderedOutput::Number { value } => number_label(*value),
            RenderedOutput::Boolean { value } => {
                if *value {
                    style("yes").green().to_string()
                } else {
                    style("no").red().to_string()
                }
            }
            RenderedOutput::Timestamp { formatted, .. } => format!("{}{}", CALENDAR, formatted),
            RenderedOutput::Map { entries, hidden } => {
                if entries.is_empty() && *hidden == 0 {
                    return style("{}").dim().to_string();
                }
                let mut out = String::new();
                for entry in entries {
                    out.push('\n');
                    out.push_str(&pad(indent + 1));
                    out.push_str(&labelled(&entry.label, &self.render(&entry.output, indent + 1)));
                }
                if *hidden > 0 {
                    out.push_str(&format!(
                        "\n{}{}",
                        pad(indent + 1),
                        style(format!("... {} more", hidden)).dim()
                    ));
                }
                out
            }
            RenderedOutput::Reference { reference, .. } => self.render_reference(reference, output),
            RenderedOutput::EnumChips { items } => {
                if items.is_empty() {
                    return style("[]").dim().to_string();
                }
                items
                    .iter()
                    .map(|item| self.render(item, indent))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            RenderedOutput::ArrayOfMaps { items }
            | RenderedOutput::ArrayOfReferences { items }
            | RenderedOutput::StorageGallery { items }
            | RenderedOutput::List { items }
            | RenderedOutput::Array { items } => {
                if items.is_empty() {
                    return style("[]").dim().to_string();
                }
                items
                    .iter()
                    .map(|item| format!("\n{}- {}", pad(indent + 1), self.render(item, indent + 1)))
                    .collect()
            }
            RenderedOutput::OneOf { items } => {
                if items.is_empty() {
                    return style("[]").dim().to_string();
                }
                items
                    .iter()
                    .map(|item| {
                        format!(
                            "\n{}- {} {}",
                            pad(indent + 1),
                            style(format!("({})", item.type_tag)).dim(),
                            self.render(&item.output, indent + 1)
                        )
                    })
                    .collect()
            }
            RenderedOutput::Json { raw } => style(raw).dim().to_string(),
            RenderedOutput::Custom { kind, body } => {
                format!("{} {}", style(format!("<{}>", kind)).magenta(), body)
            }
        }
    }

    fn render_reference(&self, reference: &EntityReference, output: &RenderedOutput) -> String {
        let head = format!("{}{}", LINK, style(reference).blue());
        let preview_properties: &[String] = match output {
            RenderedOutput::Reference {
                preview_properties, ..
            } => preview_properties.as_slice(),
            _ => &[],
        };
        let Some(resolved) = self.resolved.and_then(|map| map.get(reference)) else {
            return head;
        };
        let summary: Vec<String> = resolved
            .summary(preview_properties)
            .into_iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        if summary.is_empty() {
            head
        } else {
            format!("{} {}", head, style(format!("({})", summary.join(", "))).dim())
        }
    }
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

fn labelled(label: &str, body: &str) -> String {
    if body.starts_with('\n') {
        format!("{}:{}", style(label).bold(), body)
    } else {
        format!("{}: {}", style(label).bold(), body)
    }
}

fn number_label(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
