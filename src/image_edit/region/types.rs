//! Region and mask types

use crate::image_edit::common::error::{EditError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

/// A user selection: a free-form polygon or an axis-aligned rectangle.
///
/// Both shapes go through the same rasterizer; a rectangle is the closed
/// polygon through its four corners, corners inclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Ordered vertices, implicitly closed
    Polygon(Vec<Point>),
}

impl Region {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Region::Rect { x, y, width, height }
    }

    pub fn polygon<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Region::Polygon(points.into_iter().map(Into::into).collect())
    }

    /// Rejects input that is malformed rather than merely empty.
    pub fn validate(&self) -> Result<()> {
        match self {
            Region::Rect { x, y, width, height } => {
                if ![x, y, width, height].iter().all(|v| v.is_finite()) {
                    return Err(EditError::invalid("rectangle has a non-finite coordinate"));
                }
                if *width < 0.0 || *height < 0.0 {
                    return Err(EditError::invalid(format!(
                        "rectangle extent {}x{} is negative",
                        width, height
                    )));
                }
                Ok(())
            }
            Region::Polygon(points) => {
                if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    return Err(EditError::invalid(format!(
                        "polygon vertex ({}, {}) is not finite",
                        p.x, p.y
                    )));
                }
                Ok(())
            }
        }
    }

    /// True when the region encloses nothing: fewer than two vertices or a zero-area rectangle.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Region::Rect { width, height, .. } => *width <= 0.0 || *height <= 0.0,
            Region::Polygon(points) => points.len() < 2,
        }
    }

    /// Closed outline of the region.
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            Region::Rect { x, y, width, height } => vec![
                Point::new(*x, *y),
                Point::new(x + width, *y),
                Point::new(x + width, y + height),
                Point::new(*x, y + height),
            ],
            Region::Polygon(points) => points.clone(),
        }
    }

    /// Midpoint of the vertex extent, unclamped. `None` for a region without vertices.
    pub fn center(&self) -> Option<Point> {
        let vertices = self.vertices();
        let first = vertices.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in &vertices[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some(Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0))
    }
}

/// Axis-aligned pixel rectangle, already clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Geometric center in pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + (self.width as f64 - 1.0) / 2.0,
            self.y as f64 + (self.height as f64 - 1.0) / 2.0,
        )
    }

    /// Shrinks the box to fit a `width` x `height` image.
    pub fn clamp_to(&self, width: usize, height: usize) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.right().min(width) - x,
            height: self.bottom().min(height) - y,
        }
    }
}

/// One byte per pixel: 1 inside the region (boundary included), 0 outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// A mask selecting every pixel.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![1; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        self.data[y * self.width + x] = 1;
    }

    /// Sets `(x, y)` when it lies inside the mask; other coordinates are clipped.
    #[inline]
    pub(crate) fn set_clipped(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.set(x as usize, y as usize);
        }
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    pub(crate) fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Smallest box holding every set pixel.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for y in 0..self.height {
            for (x, &v) in self.row(y).iter().enumerate() {
                if v != 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        if min_x == usize::MAX {
            return BoundingBox::empty();
        }
        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_edges_saturate_near_usize_max() {
        let bbox = BoundingBox {
            x: usize::MAX - 1,
            y: usize::MAX - 3,
            width: 10,
            height: 10,
        };
        assert_eq!(bbox.right(), usize::MAX);
        assert_eq!(bbox.bottom(), usize::MAX);
        assert!(bbox.clamp_to(20, 20).is_empty());
    }

    #[test]
    fn test_clamp_to_trims_overhang() {
        let bbox = BoundingBox {
            x: 5,
            y: 2,
            width: 10,
            height: 4,
        };
        assert_eq!(
            bbox.clamp_to(8, 8),
            BoundingBox {
                x: 5,
                y: 2,
                width: 3,
                height: 4
            }
        );
    }
}
