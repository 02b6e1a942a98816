//! Camera overlay configuration

use std::path::PathBuf;

use crate::image_edit::draw::Color;

/// Battery ratios are raised to this floor so the gauge never reads empty.
pub const BATTERY_FLOOR: f64 = 0.2;
/// At or below this ratio the gauge uses the warning colour.
pub const BATTERY_WARNING_THRESHOLD: f64 = 0.3;
/// At or below this ratio (and above the warning one) the gauge uses the caution colour.
pub const BATTERY_CAUTION_THRESHOLD: f64 = 0.6;

/// Literal label drawn next to the recording dot.
pub const REC_LABEL: &str = "REC";

/// Sizes and colours of the camera HUD.
///
/// Every `*_ratio` is relative to `min(width, height)` of the target image, so
/// the overlay looks the same at any resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Distance of the corner brackets from the image edge
    pub margin_ratio: f64,
    pub corner_length_ratio: f64,
    pub corner_radius_ratio: f64,
    pub line_width_ratio: f64,
    /// Distance of the battery, REC and timer blocks from the image edge
    pub inset_ratio: f64,
    pub battery_width_ratio: f64,
    pub battery_height_ratio: f64,
    pub battery_head_width_ratio: f64,
    /// Head height as a fraction of the body height
    pub battery_head_height_fraction: f64,
    pub rec_dot_radius_ratio: f64,
    pub rec_text_ratio: f64,
    pub timer_text_ratio: f64,
    pub timer_stroke_ratio: f64,

    pub frame_color: Color,
    pub battery_outline_color: Color,
    pub battery_warning_color: Color,
    pub battery_caution_color: Color,
    pub battery_normal_color: Color,
    pub rec_dot_color: Color,
    pub text_color: Color,
    pub text_stroke_color: Color,

    /// TrueType face for labels; the built-in bitmap font is used when unset or unreadable
    pub font_path: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            margin_ratio: 0.04,
            corner_length_ratio: 0.10,
            corner_radius_ratio: 0.025,
            line_width_ratio: 0.006,
            inset_ratio: 0.08,
            battery_width_ratio: 0.09,
            battery_height_ratio: 0.045,
            battery_head_width_ratio: 0.012,
            battery_head_height_fraction: 0.5,
            rec_dot_radius_ratio: 0.015,
            rec_text_ratio: 0.04,
            timer_text_ratio: 0.05,
            timer_stroke_ratio: 0.004,

            frame_color: Color::WHITE,
            battery_outline_color: Color::WHITE,
            battery_warning_color: Color::rgb(255, 59, 48),
            battery_caution_color: Color::rgb(255, 204, 0),
            battery_normal_color: Color::rgb(52, 199, 89),
            rec_dot_color: Color::RED,
            text_color: Color::WHITE,
            text_stroke_color: Color::BLACK,

            font_path: None,
        }
    }
}

impl OverlayConfig {
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_frame_color(mut self, color: Color) -> Self {
        self.frame_color = color;
        self
    }

    pub fn with_text_colors(mut self, fill: Color, stroke: Color) -> Self {
        self.text_color = fill;
        self.text_stroke_color = stroke;
        self
    }

    /// Gauge colour for a battery ratio, after applying [`BATTERY_FLOOR`].
    pub fn battery_color(&self, ratio: f64) -> Color {
        let ratio = ratio.max(BATTERY_FLOOR);
        if ratio <= BATTERY_WARNING_THRESHOLD {
            self.battery_warning_color
        } else if ratio <= BATTERY_CAUTION_THRESHOLD {
            self.battery_caution_color
        } else {
            self.battery_normal_color
        }
    }
}
