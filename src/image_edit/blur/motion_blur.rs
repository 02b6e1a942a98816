//! Masked motion blur with radial feathering.
//!
//! Work is confined to the region's bounding box. Inside it the RGB channels
//! are correlated with the line kernel, replicating the box border, and the
//! result is blended back with weight `mask * radial` where the radial term
//! falls from 1 at the box center to 0 at the farthest image corner. Alpha is
//! never touched.

use tracing::{debug, debug_span, info, instrument};

use crate::image_edit::blur::kernel::{BlurKernel, Tap};
use crate::image_edit::common::error::{EditError, Result};
use crate::image_edit::mosaic::check_mask;
use crate::image_edit::pixels::PixelBuffer;
use crate::image_edit::region::{BoundingBox, Mask, Region, rasterize};

#[instrument(
    skip(buffer, mask),
    fields(width = buffer.width(), height = buffer.height(), bbox = ?bbox)
)]
pub fn apply_motion_blur(
    buffer: &PixelBuffer,
    mask: &Mask,
    bbox: BoundingBox,
    intensity: usize,
    angle_degrees: f64,
) -> Result<PixelBuffer> {
    let kernel = BlurKernel::new(intensity, angle_degrees)?;
    check_mask(buffer, mask)?;

    let bbox = bbox.clamp_to(buffer.width(), buffer.height());
    if bbox.is_empty() || kernel.is_identity() {
        debug!("Empty bounding box or identity kernel, nothing to blur");
        return Ok(buffer.clone());
    }
    if !(bbox.y..bbox.bottom()).any(|y| mask.row(y)[bbox.x..bbox.right()].contains(&1)) {
        debug!("Mask is empty inside the bounding box");
        return Ok(buffer.clone());
    }

    let blurred = {
        let _span = debug_span!("convolve", kernel_size = kernel.size()).entered();
        convolve_rgb(buffer, bbox, &kernel.taps())
    };

    let falloff = RadialFalloff::new(bbox.center(), buffer.width(), buffer.height());
    let mut out = buffer.clone();
    let mut blended = 0usize;
    {
        let _span = debug_span!("blend").entered();
        for y in bbox.y..bbox.bottom() {
            for x in bbox.x..bbox.right() {
                if !mask.get(x, y) {
                    continue;
                }
                let weight = falloff.weight(x, y);
                if weight <= 0.0 {
                    continue;
                }
                let original = buffer.pixel(x, y);
                let smeared = blurred[(y - bbox.y) * bbox.width + (x - bbox.x)];
                let mut px = original;
                for c in 0..3 {
                    let v = f32::from(original[c]) * (1.0 - weight) + f32::from(smeared[c]) * weight;
                    px[c] = v.round().clamp(0.0, 255.0) as u8;
                }
                out.set_pixel(x, y, px);
                blended += 1;
            }
        }
    }

    info!(intensity, angle_degrees, pixels = blended, "Motion blur applied");
    Ok(out)
}

/// Rasterizes `region` and blurs it.
pub fn apply_motion_blur_to_region(
    buffer: &PixelBuffer,
    region: &Region,
    intensity: usize,
    angle_degrees: f64,
) -> Result<PixelBuffer> {
    if intensity == 0 {
        return Err(EditError::invalid("blur intensity must be at least 1"));
    }
    let (mask, bbox) = rasterize(region, buffer.width(), buffer.height())?;
    apply_motion_blur(buffer, &mask, bbox, intensity, angle_degrees)
}

/// Correlates the RGB channels of the `bbox` crop with `taps`, clamping reads to the crop.
fn convolve_rgb(buffer: &PixelBuffer, bbox: BoundingBox, taps: &[Tap]) -> Vec<[u8; 3]> {
    let max_x = (bbox.width - 1) as isize;
    let max_y = (bbox.height - 1) as isize;
    let mut out = Vec::with_capacity(bbox.width * bbox.height);

    for ly in 0..bbox.height as isize {
        for lx in 0..bbox.width as isize {
            let mut acc = [0.0f32; 3];
            for tap in taps {
                let sx = (lx + tap.dx).clamp(0, max_x) as usize + bbox.x;
                let sy = (ly + tap.dy).clamp(0, max_y) as usize + bbox.y;
                let px = buffer.pixel(sx, sy);
                for c in 0..3 {
                    acc[c] += f32::from(px[c]) * tap.weight;
                }
            }
            out.push(acc.map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }
    out
}

/// Linear falloff from a center point, measured in whole-image coordinates.
struct RadialFalloff {
    cx: f64,
    cy: f64,
    max_distance: f64,
}

impl RadialFalloff {
    fn new((cx, cy): (f64, f64), width: usize, height: usize) -> Self {
        let right = width.saturating_sub(1) as f64;
        let bottom = height.saturating_sub(1) as f64;
        let max_distance = [(0.0, 0.0), (right, 0.0), (0.0, bottom), (right, bottom)]
            .iter()
            .map(|&(x, y): &(f64, f64)| (x - cx).hypot(y - cy))
            .fold(0.0, f64::max);
        Self { cx, cy, max_distance }
    }

    fn weight(&self, x: usize, y: usize) -> f32 {
        if self.max_distance <= 0.0 {
            return 1.0;
        }
        let distance = (x as f64 - self.cx).hypot(y as f64 - self.cy);
        (1.0 - distance / self.max_distance).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripes(width: usize, height: usize) -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in 0..width {
                let v = if x % 2 == 0 { 0 } else { 255 };
                let alpha = (40 + (x * 13 + y * 7) % 200) as u8;
                buffer.set_pixel(x, y, [v, (y * 9 % 256) as u8, 255 - v, alpha]);
            }
        }
        buffer
    }

    fn alpha_channel(buffer: &PixelBuffer) -> Vec<u8> {
        buffer.as_bytes().chunks_exact(4).map(|px| px[3]).collect()
    }

    #[test]
    fn test_alpha_is_preserved() {
        let buffer = stripes(21, 15);
        let region = Region::polygon([(2, 1), (18, 3), (15, 13), (4, 11)]);
        for (intensity, angle) in [(3, 0.0), (7, 90.0), (12, 213.5)] {
            let out = apply_motion_blur_to_region(&buffer, &region, intensity, angle).unwrap();
            assert_eq!(alpha_channel(&out), alpha_channel(&buffer));
        }
    }

    #[test]
    fn test_unit_intensity_returns_input() {
        let buffer = stripes(12, 12);
        let region = Region::rect(0.0, 0.0, 12.0, 12.0);
        for angle in [0.0, 45.0, 300.0, -17.0] {
            let out = apply_motion_blur_to_region(&buffer, &region, 1, angle).unwrap();
            assert_eq!(out, buffer);
        }
    }

    #[test]
    fn test_outside_bbox_is_unchanged() {
        let buffer = stripes(30, 20);
        let region = Region::polygon([(8, 5), (20, 6), (14, 15)]);
        let (mask, bbox) = rasterize(&region, 30, 20).unwrap();
        let out = apply_motion_blur(&buffer, &mask, bbox, 9, 90.0).unwrap();

        for y in 0..20 {
            for x in 0..30 {
                if !bbox.contains(x, y) || !mask.get(x, y) {
                    assert_eq!(out.pixel(x, y), buffer.pixel(x, y), "pixel ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn test_horizontal_blur_mixes_stripes_at_center() {
        let buffer = stripes(21, 21);
        let out =
            apply_motion_blur_to_region(&buffer, &Region::rect(0.0, 0.0, 21.0, 21.0), 5, 90.0)
                .unwrap();
        let before = buffer.pixel(10, 10);
        let after = out.pixel(10, 10);
        assert_ne!(before[0], after[0]);
        assert!(after[0] > 40 && after[0] < 215, "red was {}", after[0]);
        // weight is zero at the far corner
        assert_eq!(out.pixel(0, 0), buffer.pixel(0, 0));
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let buffer = PixelBuffer::filled(16, 16, [90, 120, 30, 77]);
        let out =
            apply_motion_blur_to_region(&buffer, &Region::rect(2.0, 2.0, 10.0, 10.0), 6, 33.0)
                .unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_caller_bbox_past_usize_range_is_clamped() {
        let buffer = stripes(8, 8);
        let bbox = BoundingBox {
            x: usize::MAX - 2,
            y: 3,
            width: 50,
            height: 50,
        };
        let out = apply_motion_blur(&buffer, &Mask::full(8, 8), bbox, 5, 0.0).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_empty_region_is_noop() {
        let buffer = stripes(8, 8);
        let out = apply_motion_blur_to_region(&buffer, &Region::polygon([(1, 1)]), 5, 0.0).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_radial_falloff() {
        let falloff = RadialFalloff::new((5.0, 5.0), 11, 11);
        assert_eq!(falloff.weight(5, 5), 1.0);
        assert_eq!(falloff.weight(0, 0), 0.0);
        assert!(falloff.weight(5, 0) > 0.0 && falloff.weight(5, 0) < 1.0);

        let single = RadialFalloff::new((0.0, 0.0), 1, 1);
        assert_eq!(single.weight(0, 0), 1.0);
    }

    #[test]
    fn test_invalid_intensity_is_rejected() {
        let buffer = stripes(4, 4);
        assert!(matches!(
            apply_motion_blur(&buffer, &Mask::full(4, 4), BoundingBox::empty(), 0, 0.0),
            Err(EditError::InvalidParameter(_))
        ));
    }
}
