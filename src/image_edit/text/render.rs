use crate::image_edit::draw::{Canvas, Color, Coverage};
use crate::image_edit::text::font::GlyphSource;

/// Lays out a single line of `text` at `px` pixels and returns its coverage.
///
/// The bitmap is cropped to the union of the line box and every glyph's ink.
pub fn render_line(font: &dyn GlyphSource, text: &str, px: f32) -> Coverage {
    let metrics = font.line_metrics(px);
    let mut placed = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let (mut min_x, mut min_y) = (0i64, 0i64);
    let mut max_x = 0i64;
    let mut max_y = metrics.height.ceil() as i64;

    for ch in text.chars() {
        let glyph = font.rasterize(ch, px);
        let gx = pen.round() as i64 + i64::from(glyph.left);
        let gy = i64::from(glyph.top);
        pen += glyph.advance;
        if glyph.width > 0 && glyph.height > 0 {
            min_x = min_x.min(gx);
            min_y = min_y.min(gy);
            max_x = max_x.max(gx + glyph.width as i64);
            max_y = max_y.max(gy + glyph.height as i64);
        }
        placed.push((gx, gy, glyph));
    }
    max_x = max_x.max(pen.ceil() as i64);

    let mut out = Coverage::new((max_x - min_x) as usize, (max_y - min_y) as usize);
    for (gx, gy, glyph) in &placed {
        for y in 0..glyph.height {
            for x in 0..glyph.width {
                let v = glyph.coverage[y * glyph.width + x];
                if v > 0 {
                    let ox = (gx - min_x) as usize + x;
                    let oy = (gy - min_y) as usize + y;
                    out.max_at(ox, oy, v);
                }
            }
        }
    }
    out
}

/// Paints a rendered line with its top-left at `(x, y)`, optionally under an
/// outline `stroke_width` pixels wide. The outline grows the text by
/// `stroke_width` on every side, so the ink itself stays at `(x, y)`.
pub fn draw_line(
    canvas: &mut Canvas<'_>,
    x: i64,
    y: i64,
    line: &Coverage,
    fill: Color,
    stroke: Option<(Color, usize)>,
) {
    if let Some((stroke_color, width)) = stroke {
        if width > 0 {
            let outline = line.dilate(width);
            let w = width as i64;
            canvas.draw_coverage(x - w, y - w, &outline, stroke_color);
        }
    }
    canvas.draw_coverage(x, y, line, fill);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_edit::pixels::PixelBuffer;
    use crate::image_edit::text::font::BitmapFont;

    #[test]
    fn test_line_width_follows_advances() {
        let line = render_line(&BitmapFont, "REC", 16.0);
        assert_eq!((line.width, line.height), (48, 16));
        assert!(line.data.iter().any(|&v| v == 255));
    }

    #[test]
    fn test_empty_text_has_no_ink() {
        let line = render_line(&BitmapFont, "", 16.0);
        assert_eq!(line.width, 0);
    }

    #[test]
    fn test_stroke_surrounds_fill() {
        let mut buffer = PixelBuffer::filled(40, 20, [0, 0, 255, 255]);
        let line = render_line(&BitmapFont, "I", 8.0);
        {
            let mut canvas = Canvas::new(&mut buffer);
            draw_line(&mut canvas, 10, 5, &line, Color::WHITE, Some((Color::BLACK, 1)));
        }
        let mut white = 0;
        let mut black = 0;
        for y in 0..20 {
            for x in 0..40 {
                match buffer.pixel(x, y) {
                    [255, 255, 255, 255] => white += 1,
                    [0, 0, 0, 255] => black += 1,
                    _ => {}
                }
            }
        }
        assert!(white > 0);
        assert!(black > 0);
        // far corner keeps the background
        assert_eq!(buffer.pixel(0, 0), [0, 0, 255, 255]);
    }
}
