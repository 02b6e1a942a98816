//! Polygon to mask rasterization.
//!
//! Vertices are rounded to the pixel grid, the interior is filled with the
//! even-odd rule at integer scanlines and the outline is drawn on top, so
//! boundary pixels always belong to the mask. Anything outside the image is
//! clipped away.

use tracing::{debug, instrument};

use crate::image_edit::common::error::Result;
use crate::image_edit::region::types::{BoundingBox, Mask, Region};

/// Segment endpoints further than this outside the image are clipped before stepping.
const CLIP_MARGIN: f64 = 2.0;

#[instrument(skip(region), fields(kind = region_kind(region)))]
pub fn rasterize(region: &Region, width: usize, height: usize) -> Result<(Mask, BoundingBox)> {
    region.validate()?;

    let mut mask = Mask::new(width, height);
    if region.is_degenerate() || width == 0 || height == 0 {
        debug!("Degenerate region, nothing to rasterize");
        return Ok((mask, BoundingBox::empty()));
    }

    let vertices: Vec<(f64, f64)> = region
        .vertices()
        .iter()
        .map(|p| (p.x.round(), p.y.round()))
        .collect();

    let bbox = vertex_bounds(&vertices, width, height);
    if bbox.is_empty() {
        debug!("Region lies entirely outside the image");
        return Ok((mask, bbox));
    }

    fill_even_odd(&mut mask, &vertices, bbox);

    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        draw_segment(&mut mask, a, b);
    }

    debug!(
        bbox_x = bbox.x,
        bbox_y = bbox.y,
        bbox_width = bbox.width,
        bbox_height = bbox.height,
        "Region rasterized"
    );
    Ok((mask, bbox))
}

fn region_kind(region: &Region) -> &'static str {
    match region {
        Region::Rect { .. } => "rect",
        Region::Polygon(_) => "polygon",
    }
}

/// Smallest pixel box holding every vertex, clamped to the image.
fn vertex_bounds(vertices: &[(f64, f64)], width: usize, height: usize) -> BoundingBox {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in vertices {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let x0 = min_x.max(0.0);
    let y0 = min_y.max(0.0);
    let x1 = max_x.min(width as f64 - 1.0);
    let y1 = max_y.min(height as f64 - 1.0);
    if x0 > x1 || y0 > y1 {
        return BoundingBox::empty();
    }

    BoundingBox {
        x: x0 as usize,
        y: y0 as usize,
        width: (x1 - x0) as usize + 1,
        height: (y1 - y0) as usize + 1,
    }
}

fn fill_even_odd(mask: &mut Mask, vertices: &[(f64, f64)], bbox: BoundingBox) {
    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());
    let max_x = (mask.width() - 1) as f64;

    for y in bbox.y..bbox.bottom() {
        let scan = y as f64;
        crossings.clear();

        for (i, &(ax, ay)) in vertices.iter().enumerate() {
            let (bx, by) = vertices[(i + 1) % vertices.len()];
            if ay == by {
                continue;
            }
            // half-open in y so a shared vertex is counted once
            let (lo, hi) = if ay < by { (ay, by) } else { (by, ay) };
            if scan >= lo && scan < hi {
                crossings.push(ax + (scan - ay) * (bx - ax) / (by - ay));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for span in crossings.chunks_exact(2) {
            let start = span[0].ceil().max(0.0);
            let end = span[1].floor().min(max_x);
            if start > end {
                continue;
            }
            for x in start as usize..=end as usize {
                mask.set(x, y);
            }
        }
    }
}

/// Bresenham line between two grid points, clipped to the mask.
fn draw_segment(mask: &mut Mask, a: (f64, f64), b: (f64, f64)) {
    let Some(((x0, y0), (x1, y1))) = clip_segment(a, b, mask.width(), mask.height()) else {
        return;
    };

    let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
    let (x1, y1) = (x1.round() as i64, y1.round() as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        mask.set_clipped(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Liang-Barsky clip against the image grown by [`CLIP_MARGIN`].
fn clip_segment(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    width: usize,
    height: usize,
) -> Option<((f64, f64), (f64, f64))> {
    let (min_x, min_y) = (-CLIP_MARGIN, -CLIP_MARGIN);
    let max_x = width as f64 - 1.0 + CLIP_MARGIN;
    let max_y = height as f64 - 1.0 + CLIP_MARGIN;

    let dx = x1 - x0;
    let dy = y1 - y0;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (x0 + t0 * dx, y0 + t0 * dy),
        (x0 + t1 * dx, y0 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_edit::common::error::EditError;
    use crate::image_edit::region::types::Point;

    #[test]
    fn test_full_image_rect_selects_everything() {
        let (mask, bbox) = rasterize(&Region::rect(0.0, 0.0, 10.0, 8.0), 10, 8).unwrap();
        assert_eq!(mask.count(), 80);
        assert_eq!(
            bbox,
            BoundingBox {
                x: 0,
                y: 0,
                width: 10,
                height: 8
            }
        );
    }

    #[test]
    fn test_rect_corners_are_inclusive() {
        let (mask, bbox) = rasterize(&Region::rect(2.0, 3.0, 4.0, 2.0), 10, 10).unwrap();
        // x in 2..=6, y in 3..=5
        assert_eq!(mask.count(), 5 * 3);
        assert!(mask.get(2, 3));
        assert!(mask.get(6, 5));
        assert!(!mask.get(7, 5));
        assert!(!mask.get(2, 6));
        assert_eq!(bbox, mask.bounding_box());
    }

    #[test]
    fn test_triangle_interior_and_outline() {
        let region = Region::polygon([(0, 0), (8, 0), (0, 8)]);
        let (mask, bbox) = rasterize(&region, 10, 10).unwrap();
        assert!(mask.get(0, 0));
        assert!(mask.get(8, 0));
        assert!(mask.get(0, 8));
        assert!(mask.get(2, 2));
        assert!(mask.get(4, 4)); // on the hypotenuse
        assert!(!mask.get(6, 6));
        assert!(!mask.get(9, 9));
        assert_eq!(bbox.width, 9);
        assert_eq!(bbox.height, 9);
    }

    #[test]
    fn test_concave_polygon_even_odd() {
        // U shape: the notch between the arms stays unselected
        let region = Region::polygon([
            (0, 0),
            (2, 0),
            (2, 6),
            (6, 6),
            (6, 0),
            (8, 0),
            (8, 8),
            (0, 8),
        ]);
        let (mask, _) = rasterize(&region, 10, 10).unwrap();
        assert!(mask.get(1, 3));
        assert!(mask.get(7, 3));
        assert!(!mask.get(4, 3));
        assert!(mask.get(4, 7));
    }

    #[test]
    fn test_degenerate_regions_are_empty_not_errors() {
        for region in [
            Region::Polygon(vec![]),
            Region::polygon([(3, 3)]),
            Region::rect(1.0, 1.0, 0.0, 5.0),
        ] {
            let (mask, bbox) = rasterize(&region, 6, 6).unwrap();
            assert!(mask.is_empty());
            assert!(bbox.is_empty());
        }
    }

    #[test]
    fn test_region_outside_image_is_clipped() {
        let (mask, bbox) = rasterize(&Region::rect(20.0, 20.0, 5.0, 5.0), 10, 10).unwrap();
        assert!(mask.is_empty());
        assert!(bbox.is_empty());
    }

    #[test]
    fn test_partially_outside_polygon_is_clipped_to_image() {
        let region = Region::polygon([(-50, -50), (5, -50), (5, 5), (-50, 5)]);
        let (mask, bbox) = rasterize(&region, 10, 10).unwrap();
        assert_eq!(mask.count(), 36);
        assert_eq!(
            bbox,
            BoundingBox {
                x: 0,
                y: 0,
                width: 6,
                height: 6
            }
        );
    }

    #[test]
    fn test_far_away_vertices_do_not_hang() {
        let region = Region::polygon([(-1.0e9, 0.0), (1.0e9, 0.0), (0.0, 4.0)]);
        let (mask, _) = rasterize(&region, 4, 4).unwrap();
        assert!(mask.get(0, 0));
        assert!(mask.get(3, 0));
    }

    #[test]
    fn test_fractional_points_round_to_grid() {
        let region = Region::Polygon(vec![
            Point::new(0.6, 0.4),
            Point::new(2.4, 0.4),
            Point::new(2.4, 2.4),
            Point::new(0.6, 2.4),
        ]);
        let (mask, _) = rasterize(&region, 4, 4).unwrap();
        assert!(mask.get(1, 0));
        assert!(mask.get(2, 2));
        assert!(!mask.get(0, 0));
        assert_eq!(mask.count(), 6);
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let region = Region::Polygon(vec![Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0)]);
        assert!(matches!(
            rasterize(&region, 4, 4),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_negative_rect_extent_is_rejected() {
        assert!(matches!(
            rasterize(&Region::rect(1.0, 1.0, -2.0, 2.0), 4, 4),
            Err(EditError::InvalidParameter(_))
        ));
    }
}
