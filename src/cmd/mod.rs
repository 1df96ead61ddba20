//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module    | Commands handled |
//! |-----------|------------------|
//! | `check`   | `Check`          |
//! | `preview` | `Preview`        |
//! | `array`   | `Array`          |
//! | `config`  | `Config`         |

pub mod array;
pub mod check;
pub mod config;
pub mod preview;

pub use array::{ArrayOp, cmd_array};
pub use check::cmd_check;
pub use config::cmd_config;
pub use preview::cmd_preview;

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::Path;

use fieldview::fieldview_config::FieldviewConfig;
use fieldview::preview::{CustomPreview, PreviewRegistry, RenderedOutput};
use fieldview::schema::Collection;
use fieldview::value::Value;

use super::Cli;

pub fn load_config(cli: &Cli, project_dir: &Path) -> Result<FieldviewConfig> {
    let config = FieldviewConfig::with_cli_args(project_dir.to_path_buf(), cli.verbose, cli.size)?;
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }
    Ok(config)
}

/// Previews a schema can name with `preview = "..."`.
pub fn builtin_previews() -> PreviewRegistry {
    let mut registry = PreviewRegistry::new();
    registry.register(
        "raw_json",
        CustomPreview::from_fn(|request| match request.value {
            Some(value) => RenderedOutput::Json {
                raw: value.to_string(),
            },
            None => RenderedOutput::Empty,
        }),
    );
    registry.register(
        "redacted",
        CustomPreview::from_fn(|request| RenderedOutput::Custom {
            kind: "redacted".to_string(),
            body: serde_json::json!({ "present": request.value.is_some_and(|v| !v.is_null()) }),
        }),
    );
    registry
}

/// Load a collection and bind the built-in previews.
pub fn load_collection(path: &Path) -> Result<Collection> {
    let mut collection = Collection::load(path)?;
    collection
        .bind_previews(&builtin_previews())
        .with_context(|| format!("Invalid collection schema: {}", path.display()))?;
    Ok(collection)
}

/// Load an entity's values from a JSON object file.
pub fn load_entity(path: &Path) -> Result<BTreeMap<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entity file: {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid entity JSON: {}", path.display()))?;
    match Value::from_json(json) {
        Value::Map(values) => Ok(values),
        other => bail!(
            "Entity file {} must contain a JSON object, found {}",
            path.display(),
            other.kind()
        ),
    }
}
