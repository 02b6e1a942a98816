//! Glyph sources.
//!
//! A [`BitmapFont`] is always available; TrueType faces are loaded on demand and
//! replaced by the bitmap font when they cannot be read.

use std::path::Path;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use fontdue::{Font, FontSettings};
use tracing::{debug, warn};

use crate::image_edit::common::error::{EditError, Result};

/// Native cell size of the built-in font.
const BITMAP_CELL: usize = 8;

/// One rasterized character, positioned relative to the top of its line.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    pub width: usize,
    pub height: usize,
    /// Horizontal offset from the pen position
    pub left: i32,
    /// Vertical offset from the top of the line box
    pub top: i32,
    pub advance: f32,
    /// Row-major coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the line box to the baseline
    pub ascent: f32,
    pub height: f32,
}

pub trait GlyphSource {
    fn rasterize(&self, ch: char, px: f32) -> Glyph;
    fn line_metrics(&self, px: f32) -> LineMetrics;
}

/// The 8x8 public-domain bitmap font, scaled by whole multiples.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl BitmapFont {
    fn scale(px: f32) -> usize {
        ((px / BITMAP_CELL as f32).round() as usize).max(1)
    }
}

impl GlyphSource for BitmapFont {
    fn rasterize(&self, ch: char, px: f32) -> Glyph {
        let scale = Self::scale(px);
        let cell = BITMAP_CELL * scale;
        let rows = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; BITMAP_CELL]);

        let mut coverage = vec![0u8; cell * cell];
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..BITMAP_CELL {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    let y = row * scale + sy;
                    let start = y * cell + col * scale;
                    coverage[start..start + scale].fill(u8::MAX);
                }
            }
        }

        Glyph {
            width: cell,
            height: cell,
            left: 0,
            top: 0,
            advance: cell as f32,
            coverage,
        }
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        let cell = (BITMAP_CELL * Self::scale(px)) as f32;
        LineMetrics {
            ascent: cell,
            height: cell,
        }
    }
}

pub struct TrueTypeFont {
    font: Font,
}

impl TrueTypeFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| EditError::DecodeError(format!("font: {}", e)))?;
        Ok(Self { font })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| EditError::InputReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes)
    }
}

impl GlyphSource for TrueTypeFont {
    fn rasterize(&self, ch: char, px: f32) -> Glyph {
        let ascent = self.line_metrics(px).ascent;
        let (metrics, coverage) = self.font.rasterize(ch, px);
        Glyph {
            width: metrics.width,
            height: metrics.height,
            left: metrics.xmin,
            top: (ascent - (metrics.ymin + metrics.height as i32) as f32).round() as i32,
            advance: metrics.advance_width,
            coverage,
        }
    }

    fn line_metrics(&self, px: f32) -> LineMetrics {
        match self.font.horizontal_line_metrics(px) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                height: m.ascent - m.descent,
            },
            None => LineMetrics {
                ascent: px * 0.8,
                height: px,
            },
        }
    }
}

/// Loads the TrueType face at `path`, or the built-in bitmap font when there is
/// no path or the face cannot be read.
pub fn load_font_or_default(path: Option<&Path>) -> Box<dyn GlyphSource> {
    let Some(path) = path else {
        return Box::new(BitmapFont);
    };
    match TrueTypeFont::from_path(path) {
        Ok(font) => {
            debug!(font = %path.display(), "Loaded TrueType font");
            Box::new(font)
        }
        Err(e) => {
            warn!(font = %path.display(), error = %e, "Falling back to built-in bitmap font");
            Box::new(BitmapFont)
        }
    }
}
