//! Project configuration for fieldview.
//!
//! Settings live in `.fieldview/fieldview.toml` and are layered
//! file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [preview]
//! default_size = "regular"
//! date_format = "%Y-%m-%d"
//! date_time_format = "%Y-%m-%d %H:%M:%S"
//! map_preview_limit = 3
//!
//! [array]
//! drag_hysteresis_px = 50.0
//! id_strategy = "sequence"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::array::{DEFAULT_HYSTERESIS_PX, DragReorder, IdStrategy};
use crate::preview::{
    DEFAULT_DATE_FORMAT, DEFAULT_DATE_TIME_FORMAT, DEFAULT_MAP_PREVIEW_LIMIT, PreviewSettings,
    PreviewSize, is_valid_time_format,
};

pub const CONFIG_DIR: &str = ".fieldview";
pub const CONFIG_FILE: &str = "fieldview.toml";

/// Overrides `[preview] default_size`.
pub const ENV_PREVIEW_SIZE: &str = "FIELDVIEW_PREVIEW_SIZE";
/// Overrides `[array] id_strategy`.
pub const ENV_ID_STRATEGY: &str = "FIELDVIEW_ID_STRATEGY";

/// Preview section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSection {
    /// Size used when the CLI and environment don't pick one
    #[serde(default)]
    pub default_size: PreviewSize,
    /// strftime format for date-only timestamps
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// strftime format for date-time timestamps
    #[serde(default = "default_date_time_format")]
    pub date_time_format: String,
    /// Map entries shown in small and tiny previews
    #[serde(default = "default_map_preview_limit")]
    pub map_preview_limit: usize,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_date_time_format() -> String {
    DEFAULT_DATE_TIME_FORMAT.to_string()
}

fn default_map_preview_limit() -> usize {
    DEFAULT_MAP_PREVIEW_LIMIT
}

impl Default for PreviewSection {
    fn default() -> Self {
        Self {
            default_size: PreviewSize::default(),
            date_format: default_date_format(),
            date_time_format: default_date_time_format(),
            map_preview_limit: default_map_preview_limit(),
        }
    }
}

/// Array field section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArraySection {
    /// Pixels past the target midpoint a drag must travel before swapping
    #[serde(default = "default_drag_hysteresis")]
    pub drag_hysteresis_px: f64,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

fn default_drag_hysteresis() -> f64 {
    DEFAULT_HYSTERESIS_PX
}

impl Default for ArraySection {
    fn default() -> Self {
        Self {
            drag_hysteresis_px: default_drag_hysteresis(),
            id_strategy: IdStrategy::default(),
        }
    }
}

/// The complete fieldview.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldviewToml {
    #[serde(default)]
    pub preview: PreviewSection,
    #[serde(default)]
    pub array: ArraySection,
}

impl FieldviewToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse fieldview.toml")
    }

    /// Load `fieldview.toml` from `config_dir`, or defaults if it doesn't exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize fieldview.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            date_format: self.preview.date_format.clone(),
            date_time_format: self.preview.date_time_format.clone(),
            map_preview_limit: self.preview.map_preview_limit,
        }
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (key, format) in [
            ("date_format", &self.preview.date_format),
            ("date_time_format", &self.preview.date_time_format),
        ] {
            if !is_valid_time_format(format) {
                warnings.push(format!(
                    "Invalid {} '{}': not a valid strftime format, timestamps will fall back to RFC 3339",
                    key, format
                ));
            }
        }

        if self.preview.map_preview_limit == 0 {
            warnings.push(
                "map_preview_limit is 0: small previews will hide every map entry".to_string(),
            );
        }

        let band = self.array.drag_hysteresis_px;
        if !band.is_finite() || band < 0.0 {
            warnings.push(format!(
                "Invalid drag_hysteresis_px '{}': should be a non-negative number",
                band
            ));
        }

        warnings
    }
}

/// Configuration combining fieldview.toml with environment and CLI settings.
#[derive(Debug, Clone)]
pub struct FieldviewConfig {
    /// Path to the project directory
    pub project_dir: PathBuf,
    /// Path to the .fieldview directory
    pub config_dir: PathBuf,
    /// Parsed fieldview.toml
    pub toml: FieldviewToml,
    /// CLI override: verbose mode
    pub verbose: bool,
    /// CLI override for the preview size
    pub cli_size: Option<PreviewSize>,
}

impl FieldviewConfig {
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let config_dir = project_dir.join(CONFIG_DIR);
        let toml = FieldviewToml::load_or_default(&config_dir)?;

        Ok(Self {
            project_dir,
            config_dir,
            toml,
            verbose: false,
            cli_size: None,
        })
    }

    pub fn with_cli_args(project_dir: PathBuf, verbose: bool, size: Option<PreviewSize>) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.verbose = verbose;
        config.cli_size = size;
        Ok(config)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Preview size (CLI → env → file).
    pub fn preview_size(&self) -> Result<PreviewSize> {
        if let Some(size) = self.cli_size {
            return Ok(size);
        }
        match std::env::var(ENV_PREVIEW_SIZE) {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid {} environment variable", ENV_PREVIEW_SIZE)),
            Err(_) => Ok(self.toml.preview.default_size),
        }
    }

    /// Id strategy for array fields (env → file).
    pub fn id_strategy(&self) -> Result<IdStrategy> {
        match std::env::var(ENV_ID_STRATEGY) {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid {} environment variable", ENV_ID_STRATEGY)),
            Err(_) => Ok(self.toml.array.id_strategy),
        }
    }

    pub fn preview_settings(&self) -> PreviewSettings {
        self.toml.preview_settings()
    }

    /// Drag reorder with the configured band, clamped to be non-negative.
    pub fn drag_reorder(&self) -> DragReorder {
        let band = self.toml.array.drag_hysteresis_px;
        if band.is_finite() && band >= 0.0 {
            DragReorder::new(band)
        } else {
            DragReorder::default()
        }
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
