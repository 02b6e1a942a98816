//! Text stamped at the center of a selection, optionally rotated.

use tracing::{debug, info, instrument};

use crate::image_edit::common::error::{EditError, Result};
use crate::image_edit::draw::{Canvas, Color, Coverage};
use crate::image_edit::pixels::PixelBuffer;
use crate::image_edit::region::Region;
use crate::image_edit::text::font::GlyphSource;
use crate::image_edit::text::render::render_line;

pub const MIN_TEXT_SIZE: f32 = 1.0;
pub const MAX_TEXT_SIZE: f32 = 512.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub size_px: f32,
    pub color: Color,
    /// Clockwise rotation on screen, in degrees
    pub angle_degrees: f64,
}

impl TextStyle {
    pub fn new(text: impl Into<String>, size_px: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            size_px,
            color,
            angle_degrees: 0.0,
        }
    }

    pub fn rotated(mut self, angle_degrees: f64) -> Self {
        self.angle_degrees = angle_degrees;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_TEXT_SIZE..=MAX_TEXT_SIZE).contains(&self.size_px) {
            return Err(EditError::invalid(format!(
                "text size {} outside {}..={}",
                self.size_px, MIN_TEXT_SIZE, MAX_TEXT_SIZE
            )));
        }
        if !self.angle_degrees.is_finite() {
            return Err(EditError::invalid("text angle is not finite"));
        }
        Ok(())
    }
}

/// Draws `style.text` centred on the midpoint of the region's extent.
#[instrument(skip(buffer, region, style, font), fields(text = %style.text, size = style.size_px))]
pub fn stamp_text(
    buffer: &PixelBuffer,
    region: &Region,
    style: &TextStyle,
    font: &dyn GlyphSource,
) -> Result<PixelBuffer> {
    style.validate()?;
    region.validate()?;

    let mut out = buffer.clone();
    let center = match region.center() {
        Some(c) if !style.text.is_empty() && !region.is_degenerate() => c,
        _ => {
            debug!("No text or no selection, nothing to stamp");
            return Ok(out);
        }
    };

    let line = render_line(font, &style.text, style.size_px);
    let mut canvas = Canvas::new(&mut out);
    draw_rotated(&mut canvas, &line, (center.x, center.y), style.angle_degrees, style.color);

    info!(
        center_x = center.x,
        center_y = center.y,
        angle = style.angle_degrees,
        "Text stamped"
    );
    Ok(out)
}

/// Inverse-maps every destination pixel into the coverage bitmap, sampling bilinearly.
fn draw_rotated(canvas: &mut Canvas<'_>, line: &Coverage, center: (f64, f64), angle: f64, color: Color) {
    if line.width == 0 || line.height == 0 {
        return;
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let half_w = line.width as f64 / 2.0;
    let half_h = line.height as f64 / 2.0;
    // snap the unrotated origin to the grid so upright text stays crisp
    let cx = (center.0 - half_w).round() + half_w;
    let cy = (center.1 - half_h).round() + half_h;

    let extent_x = half_w * cos.abs() + half_h * sin.abs();
    let extent_y = half_w * sin.abs() + half_h * cos.abs();
    let x0 = (cx - extent_x).floor() as i64 - 1;
    let x1 = (cx + extent_x).ceil() as i64 + 1;
    let y0 = (cy - extent_y).floor() as i64 - 1;
    let y1 = (cy + extent_y).ceil() as i64 + 1;

    for y in y0.max(0)..y1.min(canvas.height()) {
        for x in x0.max(0)..x1.min(canvas.width()) {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            let sx = cos * dx + sin * dy + half_w - 0.5;
            let sy = -sin * dx + cos * dy + half_h - 0.5;
            let coverage = sample(line, sx, sy);
            if coverage > 0.0 {
                canvas.blend(x, y, color, coverage);
            }
        }
    }
}

fn sample(line: &Coverage, x: f64, y: f64) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let at = |col: f64, row: f64| -> f64 {
        if col < 0.0 || row < 0.0 || col >= line.width as f64 || row >= line.height as f64 {
            return 0.0;
        }
        f64::from(line.get(col as usize, row as usize)) / 255.0
    };
    let v = at(x0, y0) * (1.0 - fx) * (1.0 - fy)
        + at(x0 + 1.0, y0) * fx * (1.0 - fy)
        + at(x0, y0 + 1.0) * (1.0 - fx) * fy
        + at(x0 + 1.0, y0 + 1.0) * fx * fy;
    v as f32
}
