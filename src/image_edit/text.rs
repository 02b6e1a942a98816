//! Text module
//!
//! Glyph sources, single-line layout and the text stamping tool.

pub mod font;
mod render;
mod stamp;

pub use font::{BitmapFont, Glyph, GlyphSource, LineMetrics, TrueTypeFont, load_font_or_default};
pub use render::{draw_line, render_line};
pub use stamp::{MAX_TEXT_SIZE, MIN_TEXT_SIZE, TextStyle, stamp_text};
