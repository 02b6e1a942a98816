//! Conversion between native image handles and [`PixelBuffer`].
//!
//! Every source is force-converted to straight 8-bit RGBA. Alpha is copied as-is,
//! never premultiplied, so `to_rgba(&from_rgba(a, w, h)?)? == a` byte for byte.

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::image_edit::common::error::{EditError, Result};
use crate::image_edit::pixels::types::{CHANNELS, PixelBuffer, RawFrame};

/// Anything that can be read as a dense RGBA array.
pub trait RgbaSource {
    fn to_rgba(&self) -> Result<PixelBuffer>;
}

/// Reads `source` into a fresh RGBA buffer.
pub fn to_rgba<S: RgbaSource + ?Sized>(source: &S) -> Result<PixelBuffer> {
    source.to_rgba()
}

/// Wraps raw RGBA bytes, failing with `FormatError` on a length mismatch.
pub fn from_rgba(bytes: Vec<u8>, width: usize, height: usize) -> Result<PixelBuffer> {
    PixelBuffer::new(width, height, bytes)
}

impl RgbaSource for PixelBuffer {
    fn to_rgba(&self) -> Result<PixelBuffer> {
        Ok(self.clone())
    }
}

impl RgbaSource for RgbaImage {
    fn to_rgba(&self) -> Result<PixelBuffer> {
        let (width, height) = self.dimensions();
        PixelBuffer::new(width as usize, height as usize, self.as_raw().clone())
    }
}

impl RgbaSource for DynamicImage {
    fn to_rgba(&self) -> Result<PixelBuffer> {
        match self {
            DynamicImage::ImageRgba8(rgba) => rgba.to_rgba(),
            other => {
                debug!(color = ?other.color(), "Converting image to RGBA8");
                other.to_rgba8().to_rgba()
            }
        }
    }
}

impl RgbaSource for RawFrame<'_> {
    fn to_rgba(&self) -> Result<PixelBuffer> {
        let bpp = self.layout.bytes_per_pixel();
        let row_bytes = self.width * bpp;

        if self.stride < row_bytes {
            return Err(EditError::FormatError(format!(
                "stride {} is shorter than a {}-pixel {:?} row ({} bytes)",
                self.stride, self.width, self.layout, row_bytes
            )));
        }
        if self.height > 0 {
            let required = self.stride * (self.height - 1) + row_bytes;
            if self.data.len() < required {
                return Err(EditError::FormatError(format!(
                    "frame holds {} bytes, {}x{} {:?} needs {}",
                    self.data.len(),
                    self.width,
                    self.height,
                    self.layout,
                    required
                )));
            }
        }

        let mut data = Vec::with_capacity(self.width * self.height * CHANNELS);
        for y in 0..self.height {
            let row = &self.data[y * self.stride..y * self.stride + row_bytes];
            for px in row.chunks_exact(bpp) {
                data.extend_from_slice(&self.layout.to_rgba(px));
            }
        }
        PixelBuffer::new(self.width, self.height, data)
    }
}

impl PixelBuffer {
    /// Copies the buffer into the `image` crate's native RGBA handle.
    pub fn to_image(&self) -> Result<RgbaImage> {
        let width = u32::try_from(self.width())
            .map_err(|_| EditError::FormatError(format!("width {} exceeds u32", self.width())))?;
        let height = u32::try_from(self.height())
            .map_err(|_| EditError::FormatError(format!("height {} exceeds u32", self.height())))?;
        RgbaImage::from_raw(width, height, self.as_bytes().to_vec()).ok_or_else(|| {
            EditError::FormatError(format!("{}x{} buffer rejected by image", width, height))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_edit::pixels::types::PixelLayout;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

    fn gradient(width: usize, height: usize) -> Vec<u8> {
        (0..width * height * CHANNELS).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn test_round_trip_is_byte_exact() {
        let bytes = gradient(5, 3);
        let buffer = from_rgba(bytes.clone(), 5, 3).unwrap();
        let back = to_rgba(&buffer).unwrap();
        assert_eq!(back.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_round_trip_through_native_image() {
        let mut bytes = gradient(4, 4);
        // semi-transparent pixel must survive without premultiplication
        bytes[0..4].copy_from_slice(&[200, 100, 50, 10]);
        let buffer = from_rgba(bytes.clone(), 4, 4).unwrap();
        let native = buffer.to_image().unwrap();
        assert_eq!(native.get_pixel(0, 0), &Rgba([200, 100, 50, 10]));
        let back = to_rgba(&native).unwrap();
        assert_eq!(back.into_bytes(), bytes);
    }

    #[test]
    fn test_length_mismatch_is_format_error() {
        let result = from_rgba(vec![0u8; 10], 2, 2);
        assert!(matches!(result, Err(EditError::FormatError(_))));
    }

    #[test]
    fn test_dynamic_rgb_gets_opaque_alpha() {
        let rgb = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let buffer = to_rgba(&DynamicImage::ImageRgb8(rgb)).unwrap();
        assert_eq!(buffer.pixel(1, 1), [1, 2, 3, 255]);
    }

    #[test]
    fn test_dynamic_gray_expands_channels() {
        let gray = GrayImage::from_pixel(3, 1, Luma([77]));
        let buffer = to_rgba(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(buffer.pixel(2, 0), [77, 77, 77, 255]);
    }

    #[test]
    fn test_raw_bgra_frame_with_padding() {
        // 2x2 BGRA with 4 bytes of row padding
        let data = [
            10, 20, 30, 40, 11, 21, 31, 41, 0, 0, 0, 0, //
            12, 22, 32, 42, 13, 23, 33, 43, 0, 0, 0, 0,
        ];
        let frame = RawFrame {
            width: 2,
            height: 2,
            stride: 12,
            layout: PixelLayout::Bgra8,
            data: &data,
        };
        let buffer = to_rgba(&frame).unwrap();
        assert_eq!(buffer.pixel(0, 0), [30, 20, 10, 40]);
        assert_eq!(buffer.pixel(1, 1), [33, 23, 13, 43]);
    }

    #[test]
    fn test_raw_frame_last_row_may_omit_padding() {
        let data = [1, 2, 3, 9, 9, 4, 5, 6];
        let frame = RawFrame {
            width: 1,
            height: 2,
            stride: 5,
            layout: PixelLayout::Rgb8,
            data: &data,
        };
        let buffer = to_rgba(&frame).unwrap();
        assert_eq!(buffer.pixel(0, 1), [4, 5, 6, 255]);
    }

    #[test]
    fn test_raw_frame_short_stride_is_format_error() {
        let data = [0u8; 16];
        let frame = RawFrame {
            width: 2,
            height: 2,
            stride: 4,
            layout: PixelLayout::Rgba8,
            data: &data,
        };
        assert!(matches!(to_rgba(&frame), Err(EditError::FormatError(_))));
    }

    #[test]
    fn test_raw_frame_truncated_data_is_format_error() {
        let data = [0u8; 7];
        let frame = RawFrame::packed(2, 1, PixelLayout::Rgba8, &data);
        assert!(matches!(to_rgba(&frame), Err(EditError::FormatError(_))));
    }

    #[test]
    fn test_argb_and_gray_alpha_layouts() {
        let argb = [128, 1, 2, 3];
        let buffer = to_rgba(&RawFrame::packed(1, 1, PixelLayout::Argb8, &argb)).unwrap();
        assert_eq!(buffer.pixel(0, 0), [1, 2, 3, 128]);

        let ga = [50, 60];
        let buffer = to_rgba(&RawFrame::packed(1, 1, PixelLayout::GrayAlpha8, &ga)).unwrap();
        assert_eq!(buffer.pixel(0, 0), [50, 50, 50, 60]);
    }
}
