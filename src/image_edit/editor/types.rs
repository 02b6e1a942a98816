//! Editor configuration types

use std::ops::RangeInclusive;
use std::path::Path;

use crate::image_edit::draw::Color;
use crate::image_edit::overlay::OverlayConfig;
use crate::image_edit::text::TextStyle;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Encoding of the edited image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    /// Alpha is dropped, JPEG has no alpha channel
    Jpeg { quality: u8 },
    Tiff(TiffCompression),
}

impl OutputFormat {
    /// Guesses the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg { quality: 90 }),
            "tif" | "tiff" => Some(OutputFormat::Tiff(TiffCompression::DeflateBalanced)),
            _ => None,
        }
    }
}

/// Starting values of the editor tools.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorDefaults {
    pub block_size: usize,
    pub blur_intensity: usize,
    pub blur_angle: f64,
    pub text_size: f32,
    pub text_size_range: RangeInclusive<f32>,
    pub text_angle: f64,
    pub text_angle_range: RangeInclusive<f64>,
    pub text_color: Color,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            block_size: 20,
            blur_intensity: 15,
            blur_angle: 0.0,
            text_size: 20.0,
            text_size_range: 8.0..=72.0,
            text_angle: 0.0,
            text_angle_range: -90.0..=90.0,
            text_color: Color::BLACK,
        }
    }
}

impl EditorDefaults {
    /// Text style for `text` with the default size, colour and angle.
    pub fn text_style(&self, text: impl Into<String>) -> TextStyle {
        TextStyle::new(text, self.text_size, self.text_color).rotated(self.text_angle)
    }

    /// Pulls a user-chosen size and angle into the tool's ranges.
    pub fn clamp_text(&self, size: f32, angle: f64) -> (f32, f64) {
        (
            size.clamp(*self.text_size_range.start(), *self.text_size_range.end()),
            angle.clamp(*self.text_angle_range.start(), *self.text_angle_range.end()),
        )
    }
}

/// One editing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Mosaic { block_size: usize },
    MotionBlur { intensity: usize, angle: f64 },
    CameraOverlay { battery_ratio: f64, timer_text: String },
    Text(TextStyle),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Mosaic { .. } => "mosaic",
            Effect::MotionBlur { .. } => "motion_blur",
            Effect::CameraOverlay { .. } => "camera_overlay",
            Effect::Text(_) => "text",
        }
    }

    /// Whether the effect works on a selection rather than the whole image.
    pub fn needs_region(&self) -> bool {
        !matches!(self, Effect::CameraOverlay { .. })
    }
}

/// Configuration for region edits
#[derive(Debug, Clone)]
pub struct EditConfig {
    pub output_format: OutputFormat,
    /// Whether to reject zero-sized images after decoding
    pub validate_dimensions: bool,
    /// Upper bound on the blur kernel size; `None` accepts any intensity
    pub max_blur_intensity: Option<usize>,
    pub overlay: OverlayConfig,
    pub defaults: EditorDefaults,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Png,
            validate_dimensions: true,
            max_blur_intensity: Some(200),
            overlay: OverlayConfig::default(),
            defaults: EditorDefaults::default(),
        }
    }
}

impl EditConfig {
    pub fn builder() -> EditConfigBuilder {
        EditConfigBuilder::default()
    }
}

/// Builder for EditConfig
#[derive(Default)]
pub struct EditConfigBuilder {
    output_format: Option<OutputFormat>,
    validate_dimensions: Option<bool>,
    max_blur_intensity: Option<Option<usize>>,
    overlay: Option<OverlayConfig>,
    defaults: Option<EditorDefaults>,
}

impl EditConfigBuilder {
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_blur_intensity(mut self, max: Option<usize>) -> Self {
        self.max_blur_intensity = Some(max);
        self
    }

    pub fn overlay(mut self, overlay: OverlayConfig) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn defaults(mut self, defaults: EditorDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn build(self) -> EditConfig {
        let default = EditConfig::default();
        EditConfig {
            output_format: self.output_format.unwrap_or(default.output_format),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_blur_intensity: self.max_blur_intensity.unwrap_or(default.max_blur_intensity),
            overlay: self.overlay.unwrap_or(default.overlay),
            defaults: self.defaults.unwrap_or(default.defaults),
        }
    }
}
