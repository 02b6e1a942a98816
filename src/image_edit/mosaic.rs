//! Masked pixelation.
//!
//! The whole image is cut into `block_size` squares anchored at the origin
//! (edge tiles are clipped). Each tile touching the mask is replaced, on its
//! masked pixels only, by the truncated per-channel mean of those same pixels.

use tracing::{debug, info, instrument};

use crate::image_edit::common::error::{EditError, Result};
use crate::image_edit::pixels::{CHANNELS, PixelBuffer};
use crate::image_edit::region::{Mask, Region, rasterize};

#[instrument(skip(buffer, mask), fields(width = buffer.width(), height = buffer.height()))]
pub fn apply_mosaic(buffer: &PixelBuffer, mask: &Mask, block_size: usize) -> Result<PixelBuffer> {
    if block_size == 0 {
        return Err(EditError::invalid("mosaic block size must be at least 1"));
    }
    check_mask(buffer, mask)?;

    let mut out = buffer.clone();
    if block_size == 1 {
        debug!("Single-pixel blocks leave the image unchanged");
        return Ok(out);
    }

    let (width, height) = (buffer.width(), buffer.height());
    let mut touched = 0usize;

    for ty in (0..height).step_by(block_size) {
        let y_end = (ty + block_size).min(height);
        for tx in (0..width).step_by(block_size) {
            let x_end = (tx + block_size).min(width);

            let mut sums = [0u64; CHANNELS];
            let mut count = 0u64;
            for y in ty..y_end {
                for x in tx..x_end {
                    if mask.get(x, y) {
                        let px = buffer.pixel(x, y);
                        for (sum, &v) in sums.iter_mut().zip(px.iter()) {
                            *sum += u64::from(v);
                        }
                        count += 1;
                    }
                }
            }
            if count == 0 {
                continue;
            }

            let mean = sums.map(|s| (s / count) as u8);
            for y in ty..y_end {
                for x in tx..x_end {
                    if mask.get(x, y) {
                        out.set_pixel(x, y, mean);
                    }
                }
            }
            touched += 1;
        }
    }

    info!(block_size, tiles = touched, "Mosaic applied");
    Ok(out)
}

/// Rasterizes `region` and pixelates it.
pub fn apply_mosaic_to_region(
    buffer: &PixelBuffer,
    region: &Region,
    block_size: usize,
) -> Result<PixelBuffer> {
    if block_size == 0 {
        return Err(EditError::invalid("mosaic block size must be at least 1"));
    }
    let (mask, _) = rasterize(region, buffer.width(), buffer.height())?;
    apply_mosaic(buffer, &mask, block_size)
}

pub(crate) fn check_mask(buffer: &PixelBuffer, mask: &Mask) -> Result<()> {
    if mask.width() != buffer.width() || mask.height() != buffer.height() {
        return Err(EditError::DimensionMismatch {
            mask_width: mask.width(),
            mask_height: mask.height(),
            image_width: buffer.width(),
            image_height: buffer.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 31 + y * 17) % 256) as u8;
                buffer.set_pixel(x, y, [v, 255 - v, v / 2, 200 + (x % 50) as u8]);
            }
        }
        buffer
    }

    #[test]
    fn test_quadrant_average() {
        // 4x4 image, left half 10s, right half 20s, one 4x4 block
        let mut buffer = PixelBuffer::filled(4, 4, [10, 10, 10, 255]);
        for y in 0..4 {
            for x in 2..4 {
                buffer.set_pixel(x, y, [20, 20, 20, 255]);
            }
        }
        let out = apply_mosaic(&buffer, &Mask::full(4, 4), 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), [15, 15, 15, 255]);
            }
        }
    }

    #[test]
    fn test_mean_truncates() {
        let mut buffer = PixelBuffer::filled(2, 1, [10, 10, 10, 255]);
        buffer.set_pixel(1, 0, [11, 11, 11, 254]);
        let out = apply_mosaic(&buffer, &Mask::full(2, 1), 2).unwrap();
        assert_eq!(out.pixel(0, 0), [10, 10, 10, 254]);
        assert_eq!(out.pixel(1, 0), [10, 10, 10, 254]);
    }

    #[test]
    fn test_only_masked_pixels_are_averaged_and_written() {
        let mut buffer = PixelBuffer::filled(2, 2, [100, 0, 0, 255]);
        buffer.set_pixel(1, 0, [0, 100, 0, 255]);
        buffer.set_pixel(0, 1, [0, 0, 200, 255]);
        let mut mask = Mask::new(2, 2);
        mask.set(0, 0);
        mask.set(1, 0);

        let out = apply_mosaic(&buffer, &mask, 2).unwrap();
        assert_eq!(out.pixel(0, 0), [50, 50, 0, 255]);
        assert_eq!(out.pixel(1, 0), [50, 50, 0, 255]);
        assert_eq!(out.pixel(0, 1), [0, 0, 200, 255]);
        assert_eq!(out.pixel(1, 1), [100, 0, 0, 255]);
    }

    #[test]
    fn test_pixels_outside_mask_untouched() {
        let buffer = checker(23, 17);
        let region = Region::polygon([(3, 2), (19, 5), (12, 15), (1, 11)]);
        let (mask, _) = rasterize(&region, 23, 17).unwrap();

        for block in [1, 2, 3, 5, 8, 40] {
            let out = apply_mosaic(&buffer, &mask, block).unwrap();
            for y in 0..17 {
                for x in 0..23 {
                    if !mask.get(x, y) {
                        assert_eq!(out.pixel(x, y), buffer.pixel(x, y), "block {block} at ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_uniform_region_is_unchanged() {
        let buffer = PixelBuffer::filled(100, 100, [255, 0, 0, 255]);
        let out = apply_mosaic_to_region(&buffer, &Region::rect(0.0, 0.0, 100.0, 100.0), 50).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_edge_tiles_are_clipped() {
        // 5 wide with block 4: second column of tiles is 1 pixel wide
        let mut buffer = PixelBuffer::filled(5, 1, [0, 0, 0, 255]);
        buffer.set_pixel(4, 0, [9, 9, 9, 255]);
        let out = apply_mosaic(&buffer, &Mask::full(5, 1), 4).unwrap();
        assert_eq!(out.pixel(3, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(4, 0), [9, 9, 9, 255]);
    }

    #[test]
    fn test_grid_is_anchored_at_origin() {
        // Same 2-pixel selection, shifted by one: straddles a tile boundary
        let mut buffer = PixelBuffer::filled(4, 1, [0, 0, 0, 255]);
        buffer.set_pixel(1, 0, [100, 100, 100, 255]);
        buffer.set_pixel(2, 0, [50, 50, 50, 255]);
        let mut mask = Mask::new(4, 1);
        mask.set(1, 0);
        mask.set(2, 0);

        let out = apply_mosaic(&buffer, &mask, 2).unwrap();
        assert_eq!(out.pixel(1, 0), [100, 100, 100, 255]);
        assert_eq!(out.pixel(2, 0), [50, 50, 50, 255]);
    }

    #[test]
    fn test_single_pixel_blocks_are_noop() {
        let buffer = checker(7, 7);
        let out = apply_mosaic(&buffer, &Mask::full(7, 7), 1).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_empty_region_returns_copy() {
        let buffer = checker(6, 6);
        let out = apply_mosaic_to_region(&buffer, &Region::Polygon(vec![]), 3).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        let buffer = checker(4, 4);
        assert!(matches!(
            apply_mosaic(&buffer, &Mask::full(4, 4), 0),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_mask_size_must_match() {
        let buffer = checker(4, 4);
        assert!(matches!(
            apply_mosaic(&buffer, &Mask::full(3, 4), 2),
            Err(EditError::DimensionMismatch { .. })
        ));
    }
}
