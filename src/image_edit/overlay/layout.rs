//! Pixel geometry of the camera HUD for a given image size.

use crate::image_edit::overlay::types::{BATTERY_FLOOR, OverlayConfig};

/// Integer rectangle that may extend past the image; drawing clips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// Shrinks by `amount` on every side, never below zero size.
    pub fn inset(&self, amount: i64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2 * amount).max(0),
            height: (self.height - 2 * amount).max(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub width: i64,
    pub height: i64,
    /// `min(width, height)`, the unit every ratio multiplies
    pub unit: f64,
    pub margin: i64,
    pub inset: i64,
    pub corner_length: i64,
    pub corner_radius: i64,
    pub line_width: i64,
    pub battery_body: PixelRect,
    pub battery_head: PixelRect,
    /// Area available to the charge fill
    pub battery_inner: PixelRect,
    pub rec_dot_radius: f64,
    pub rec_text_px: f32,
    pub timer_text_px: f32,
    pub timer_stroke: usize,
}

impl OverlayLayout {
    pub fn compute(width: usize, height: usize, config: &OverlayConfig) -> Self {
        let unit = width.min(height) as f64;
        let scaled = |ratio: f64| (unit * ratio).round() as i64;
        let at_least_one = |ratio: f64| scaled(ratio).max(1);

        let margin = scaled(config.margin_ratio);
        let inset = scaled(config.inset_ratio);
        let line_width = at_least_one(config.line_width_ratio);

        let body = PixelRect::new(
            inset,
            inset,
            scaled(config.battery_width_ratio).max(4 * line_width + 1),
            scaled(config.battery_height_ratio).max(4 * line_width + 1),
        );
        let head_height = ((body.height as f64 * config.battery_head_height_fraction).round() as i64).max(1);
        let head = PixelRect::new(
            body.right(),
            body.y + (body.height - head_height) / 2,
            at_least_one(config.battery_head_width_ratio),
            head_height,
        );
        // one line of outline plus one line of clearance
        let inner = body.inset(2 * line_width);

        Self {
            width: width as i64,
            height: height as i64,
            unit,
            margin,
            inset,
            corner_length: scaled(config.corner_length_ratio),
            corner_radius: scaled(config.corner_radius_ratio),
            line_width,
            battery_body: body,
            battery_head: head,
            battery_inner: inner,
            rec_dot_radius: (unit * config.rec_dot_radius_ratio).max(1.0),
            rec_text_px: (unit * config.rec_text_ratio).max(1.0) as f32,
            timer_text_px: (unit * config.timer_text_ratio).max(1.0) as f32,
            timer_stroke: at_least_one(config.timer_stroke_ratio) as usize,
        }
    }

    /// Charge fill for `ratio`, raised to [`BATTERY_FLOOR`] first.
    ///
    /// Ratios above 1 are not clamped, but the fill never extends past the
    /// image width.
    pub fn battery_fill(&self, ratio: f64) -> PixelRect {
        let ratio = ratio.max(BATTERY_FLOOR);
        let inner = self.battery_inner;
        let width = (inner.width as f64 * ratio).floor().min(self.width as f64) as i64;
        PixelRect { width, ..inner }
    }

    /// Corner points of the frame with the direction pointing into the image.
    pub fn corners(&self) -> [((i64, i64), (i64, i64)); 4] {
        let left = self.margin;
        let top = self.margin;
        let right = self.width - 1 - self.margin;
        let bottom = self.height - 1 - self.margin;
        [
            ((left, top), (1, 1)),
            ((right, top), (-1, 1)),
            ((left, bottom), (1, -1)),
            ((right, bottom), (-1, -1)),
        ]
    }
}
