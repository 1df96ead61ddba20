//! Shared UI icons.
//!
//! Each icon falls back to a plain-text marker on terminals without emoji
//! support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");

// Value indicators
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "->");
pub static FILE: Emoji<'_, '_> = Emoji("📄 ", "[file]");
pub static IMAGE: Emoji<'_, '_> = Emoji("🖼️  ", "[img]");
pub static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "");

// Array operations
pub static ADD: Emoji<'_, '_> = Emoji("➕ ", "+");
pub static REMOVE: Emoji<'_, '_> = Emoji("🗑️  ", "-");
pub static SWAP: Emoji<'_, '_> = Emoji("🔄 ", "<>");
