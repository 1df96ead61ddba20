//! Presentation hints passed down through a preview.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_MAP_PREVIEW_LIMIT: usize = 3;

/// Target size of a preview cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewSize {
    Tiny,
    Small,
    #[default]
    Regular,
}

impl PreviewSize {
    /// The size used for values nested one level deeper.
    pub fn smaller(self) -> Self {
        match self {
            PreviewSize::Regular => PreviewSize::Small,
            PreviewSize::Small | PreviewSize::Tiny => PreviewSize::Tiny,
        }
    }
}

impl std::fmt::Display for PreviewSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewSize::Tiny => write!(f, "tiny"),
            PreviewSize::Small => write!(f, "small"),
            PreviewSize::Regular => write!(f, "regular"),
        }
    }
}

impl std::str::FromStr for PreviewSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(PreviewSize::Tiny),
            "small" => Ok(PreviewSize::Small),
            "regular" => Ok(PreviewSize::Regular),
            _ => bail!(
                "Invalid preview size '{}'. Valid values: tiny, small, regular",
                s
            ),
        }
    }
}

/// Formatting settings shared by every preview of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    pub date_format: String,
    pub date_time_format: String,
    /// Map entries shown below the regular size
    pub map_preview_limit: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_time_format: DEFAULT_DATE_TIME_FORMAT.to_string(),
            map_preview_limit: DEFAULT_MAP_PREVIEW_LIMIT,
        }
    }
}

/// Format a timestamp, falling back to RFC 3339 when `format` is not a
/// valid strftime string.
pub fn format_timestamp(value: &DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", value.format(format)) {
        Ok(()) => out,
        Err(_) => value.to_rfc3339(),
    }
}

/// Check a strftime string without formatting anything.
pub fn is_valid_time_format(format: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Everything a preview needs besides the descriptor and the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewContext {
    pub size: PreviewSize,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub settings: PreviewSettings,
}

impl PreviewContext {
    pub fn new(size: PreviewSize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_settings(mut self, settings: PreviewSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Context for values nested inside this one. Explicit dimensions do not
    /// carry over.
    pub fn nested(&self) -> Self {
        Self {
            size: self.size.smaller(),
            height: None,
            width: None,
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_preview_size_from_str() {
        assert_eq!("SMALL".parse::<PreviewSize>().unwrap(), PreviewSize::Small);
        let err = "huge".parse::<PreviewSize>().unwrap_err();
        assert!(err.to_string().contains("Invalid preview size 'huge'"));
    }

    #[test]
    fn test_nested_context_shrinks_and_drops_dimensions() {
        let context = PreviewContext::new(PreviewSize::Regular).with_dimensions(300, 40);
        let nested = context.nested();
        assert_eq!(nested.size, PreviewSize::Small);
        assert_eq!(nested.width, None);
        assert_eq!(nested.nested().size, PreviewSize::Tiny);
        assert_eq!(nested.nested().nested().size, PreviewSize::Tiny);
    }

    #[test]
    fn test_format_timestamp_falls_back_on_bad_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts, "%Y-%m-%d"), "2024-03-01");
        assert_eq!(format_timestamp(&ts, "%Q"), ts.to_rfc3339());
    }

    #[test]
    fn test_time_format_validation() {
        assert!(is_valid_time_format(DEFAULT_DATE_TIME_FORMAT));
        assert!(!is_valid_time_format("%Q"));
        assert!(!is_valid_time_format(""));
    }
}
