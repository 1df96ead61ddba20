pub mod icons;
pub mod text;

pub use text::{TextRenderer, render_text};
