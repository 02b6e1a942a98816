use tracing::{debug, debug_span, instrument};

use crate::image_edit::draw::Canvas;
use crate::image_edit::overlay::layout::OverlayLayout;
use crate::image_edit::overlay::types::{OverlayConfig, REC_LABEL};
use crate::image_edit::pixels::PixelBuffer;
use crate::image_edit::text::{GlyphSource, draw_line, load_font_or_default, render_line};

/// Composites the camera HUD onto a copy of `buffer`.
///
/// `battery_ratio` is raised to the gauge floor; the timer is skipped when empty.
/// Output depends only on the arguments.
#[instrument(skip(buffer, config), fields(width = buffer.width(), height = buffer.height()))]
pub fn add_camera_overlay(
    buffer: &PixelBuffer,
    battery_ratio: f64,
    timer_text: &str,
    config: &OverlayConfig,
) -> PixelBuffer {
    let font = load_font_or_default(config.font_path.as_deref());
    add_camera_overlay_with_font(buffer, battery_ratio, timer_text, config, font.as_ref())
}

/// Same as [`add_camera_overlay`] with an already loaded font.
pub fn add_camera_overlay_with_font(
    buffer: &PixelBuffer,
    battery_ratio: f64,
    timer_text: &str,
    config: &OverlayConfig,
    font: &dyn GlyphSource,
) -> PixelBuffer {
    let mut out = buffer.clone();
    if out.is_empty() {
        debug!("Empty image, no overlay drawn");
        return out;
    }

    let layout = OverlayLayout::compute(out.width(), out.height(), config);
    let mut canvas = Canvas::new(&mut out);

    debug_span!("corners").in_scope(|| draw_corners(&mut canvas, &layout, config));
    debug_span!("battery").in_scope(|| draw_battery(&mut canvas, &layout, config, battery_ratio));
    debug_span!("rec").in_scope(|| draw_rec(&mut canvas, &layout, config, font));
    if timer_text.is_empty() {
        debug!("No timer text");
    } else {
        debug_span!("timer").in_scope(|| draw_timer(&mut canvas, &layout, config, font, timer_text));
    }

    out
}

/// Start and length of a run of `len` pixels leaving `start` in direction `dir`.
fn span(start: i64, len: i64, dir: i64) -> (i64, i64) {
    if dir > 0 { (start, len) } else { (start - len + 1, len) }
}

fn draw_corners(canvas: &mut Canvas<'_>, layout: &OverlayLayout, config: &OverlayConfig) {
    let lw = layout.line_width;
    let radius = layout.corner_radius.min(layout.corner_length);
    let arm = layout.corner_length - radius;
    let color = config.frame_color;

    for ((px, py), (dx, dy)) in layout.corners() {
        if arm > 0 {
            let (hx, hw) = span(px + dx * radius, arm, dx);
            let (hy, hh) = span(py, lw, dy);
            canvas.fill_rect(hx, hy, hw, hh, color);

            let (vx, vw) = span(px, lw, dx);
            let (vy, vh) = span(py + dy * radius, arm, dy);
            canvas.fill_rect(vx, vy, vw, vh, color);
        }
        if radius > 0 {
            // arc runs along the centre line of the arms
            let centre_offset = (lw - 1) as f64 / 2.0;
            let cx = (px + dx * radius) as f64;
            let cy = (py + dy * radius) as f64;
            let arc_radius = (radius as f64 - centre_offset).max(0.5);
            canvas.stroke_quarter_arc(cx, cy, arc_radius, lw as f64, (-dx, -dy), color);
        }
    }
}

fn draw_battery(canvas: &mut Canvas<'_>, layout: &OverlayLayout, config: &OverlayConfig, ratio: f64) {
    let body = layout.battery_body;
    let head = layout.battery_head;
    canvas.stroke_rect(body.x, body.y, body.width, body.height, layout.line_width, config.battery_outline_color);
    canvas.fill_rect(head.x, head.y, head.width, head.height, config.battery_outline_color);

    let fill = layout.battery_fill(ratio);
    debug!(ratio, fill_width = fill.width, "Battery gauge");
    canvas.fill_rect(fill.x, fill.y, fill.width, fill.height, config.battery_color(ratio));
}

fn draw_rec(canvas: &mut Canvas<'_>, layout: &OverlayLayout, config: &OverlayConfig, font: &dyn GlyphSource) {
    let line = render_line(font, REC_LABEL, layout.rec_text_px);
    let text_x = layout.width - layout.inset - line.width as i64;
    let text_y = layout.inset;
    draw_line(canvas, text_x, text_y, &line, config.text_color, None);

    let dot_r = layout.rec_dot_radius;
    let dot_x = text_x as f64 - 2.0 * dot_r;
    let dot_y = text_y as f64 + line.height as f64 / 2.0;
    canvas.fill_circle(dot_x, dot_y, dot_r, config.rec_dot_color);
}

fn draw_timer(
    canvas: &mut Canvas<'_>,
    layout: &OverlayLayout,
    config: &OverlayConfig,
    font: &dyn GlyphSource,
    text: &str,
) {
    let line = render_line(font, text, layout.timer_text_px);
    let stroke = layout.timer_stroke;
    let x = layout.inset;
    let y = layout.height - layout.inset - line.height as i64 - stroke as i64;
    draw_line(
        canvas,
        x,
        y,
        &line,
        config.text_color,
        Some((config.text_stroke_color, stroke)),
    );
}
