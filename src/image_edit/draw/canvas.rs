//! Clipped source-over drawing onto a [`PixelBuffer`].

use crate::image_edit::draw::color::Color;
use crate::image_edit::pixels::PixelBuffer;

/// 8-bit coverage bitmap, 0 = transparent, 255 = fully covered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Coverage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Coverage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Keeps the larger of the current and the new value.
    #[inline]
    pub fn max_at(&mut self, x: usize, y: usize, value: u8) {
        let cell = &mut self.data[y * self.width + x];
        *cell = (*cell).max(value);
    }

    /// Grows every covered pixel into a disc of `radius`, padding the bitmap by `radius`.
    pub fn dilate(&self, radius: usize) -> Coverage {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as isize;
        let offsets: Vec<(isize, isize)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        let mut out = Coverage::new(self.width + 2 * radius, self.height + 2 * radius);
        for y in 0..self.height {
            for x in 0..self.width {
                let v = self.get(x, y);
                if v == 0 {
                    continue;
                }
                for &(dx, dy) in &offsets {
                    let ox = (x as isize + r + dx) as usize;
                    let oy = (y as isize + r + dy) as usize;
                    out.max_at(ox, oy, v);
                }
            }
        }
        out
    }
}

pub struct Canvas<'a> {
    buffer: &'a mut PixelBuffer,
}

impl<'a> Canvas<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self { buffer }
    }

    pub fn width(&self) -> i64 {
        self.buffer.width() as i64
    }

    pub fn height(&self) -> i64 {
        self.buffer.height() as i64
    }

    /// Composites `color` at `(x, y)` scaled by `coverage` in `[0, 1]`. Off-canvas writes are dropped.
    pub fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let sa = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        if sa >= 1.0 {
            self.buffer.set_pixel(x, y, color.to_array());
            return;
        }

        let dst = self.buffer.pixel(x, y);
        let da = f32::from(dst[3]) / 255.0;
        let oa = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / oa;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.buffer.set_pixel(
            x,
            y,
            [
                mix(color.r, dst[0]),
                mix(color.g, dst[1]),
                mix(color.b, dst[2]),
                (oa * 255.0).round().clamp(0.0, 255.0) as u8,
            ],
        );
    }

    /// Fills `[x, x + width) x [y, y + height)`.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(self.width());
        let y1 = y.saturating_add(height).min(self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    /// Draws the outline of a rectangle, `thickness` pixels thick, inside its bounds.
    pub fn stroke_rect(&mut self, x: i64, y: i64, width: i64, height: i64, thickness: i64, color: Color) {
        let t = thickness.min(width / 2).min(height / 2).max(1);
        self.fill_rect(x, y, width, t, color);
        self.fill_rect(x, y + height - t, width, t, color);
        self.fill_rect(x, y + t, t, height - 2 * t, color);
        self.fill_rect(x + width - t, y + t, t, height - 2 * t, color);
    }

    /// Anti-aliased filled disc.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let x0 = (cx - radius - 1.0).floor() as i64;
        let x1 = (cx + radius + 1.0).ceil() as i64;
        let y0 = (cy - radius - 1.0).floor() as i64;
        let y1 = (cy + radius + 1.0).ceil() as i64;
        for y in y0.max(0)..=y1.min(self.height() - 1) {
            for x in x0.max(0)..=x1.min(self.width() - 1) {
                let d = (x as f64 - cx).hypot(y as f64 - cy);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0) as f32;
                self.blend(x, y, color, coverage);
            }
        }
    }

    /// Anti-aliased ring quarter around `(cx, cy)`.
    ///
    /// `quadrant` holds the signs of the quarter to draw, e.g. `(-1, -1)` for the
    /// upper-left quarter.
    pub fn stroke_quarter_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        thickness: f64,
        quadrant: (i64, i64),
        color: Color,
    ) {
        let reach = (radius + thickness).ceil() as i64 + 1;
        let (qx, qy) = quadrant;
        let half = thickness / 2.0;
        for dy in 0..=reach {
            for dx in 0..=reach {
                let x = (cx + (dx * qx) as f64).round() as i64;
                let y = (cy + (dy * qy) as f64).round() as i64;
                let d = (x as f64 - cx).hypot(y as f64 - cy);
                let coverage = (half + 0.5 - (d - radius).abs()).clamp(0.0, 1.0) as f32;
                self.blend(x, y, color, coverage);
            }
        }
    }

    /// Paints `color` through `coverage` with its top-left corner at `(x, y)`.
    pub fn draw_coverage(&mut self, x: i64, y: i64, coverage: &Coverage, color: Color) {
        for cy in 0..coverage.height {
            for cx in 0..coverage.width {
                let v = coverage.get(cx, cy);
                if v > 0 {
                    self.blend(x + cx as i64, y + cy as i64, color, f32::from(v) / 255.0);
                }
            }
        }
    }
}
