//! Pixel buffer types

use crate::image_edit::common::error::{EditError, Result};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Dense, row-major RGBA image with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    /// Interleaved [R, G, B, A, R, G, B, A, ...], `width * height * 4` bytes
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps an RGBA byte vector, checking `len == width * height * 4`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                EditError::FormatError(format!("{}x{} overflows the address space", width, height))
            })?;
        if data.len() != expected {
            return Err(EditError::FormatError(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let data = rgba.repeat(width * height);
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub(crate) fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    /// Panics if `(x, y)` lies outside the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgba);
    }
}

/// Channel order of a foreign pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgba8,
    Rgb8,
    /// Little-endian `0xAARRGGBB` words, as used by most desktop toolkits
    Bgra8,
    Argb8,
    Gray8,
    GrayAlpha8,
}

impl PixelLayout {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelLayout::Rgba8 | PixelLayout::Bgra8 | PixelLayout::Argb8 => 4,
            PixelLayout::Rgb8 => 3,
            PixelLayout::GrayAlpha8 => 2,
            PixelLayout::Gray8 => 1,
        }
    }

    /// Reorders one source pixel into RGBA. Layouts without alpha get 255.
    #[inline]
    pub(crate) fn to_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelLayout::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelLayout::Rgb8 => [px[0], px[1], px[2], u8::MAX],
            PixelLayout::Bgra8 => [px[2], px[1], px[0], px[3]],
            PixelLayout::Argb8 => [px[1], px[2], px[3], px[0]],
            PixelLayout::Gray8 => [px[0], px[0], px[0], u8::MAX],
            PixelLayout::GrayAlpha8 => [px[0], px[0], px[0], px[1]],
        }
    }
}

/// Borrowed view of a native image handle: raw bytes plus explicit geometry.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub width: usize,
    pub height: usize,
    /// Bytes from the start of one row to the start of the next
    pub stride: usize,
    pub layout: PixelLayout,
    pub data: &'a [u8],
}

impl<'a> RawFrame<'a> {
    /// A tightly packed frame (`stride == width * bytes_per_pixel`).
    pub fn packed(width: usize, height: usize, layout: PixelLayout, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            stride: width * layout.bytes_per_pixel(),
            layout,
            data,
        }
    }
}
