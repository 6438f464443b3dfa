use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::config::Corners;

/// Converts inclusive corners (in either order) to an imageproc rect on a
/// `width` x `height` canvas.
///
/// Edges past the canvas are pinned one pixel outside it, which leaves the
/// visible part unchanged and keeps the rect inside `i32`. `None` when the
/// rectangle misses the canvas entirely.
pub(crate) fn canvas_rect(corners: Corners, width: u32, height: u32) -> Option<Rect> {
    let (x1, x2) = (corners.x1.min(corners.x2), corners.x1.max(corners.x2));
    let (y1, y2) = (corners.y1.min(corners.y2), corners.y1.max(corners.y2));
    span_rect(
        (i64::from(x1), i64::from(y1)),
        (i64::from(x2), i64::from(y2)),
        (i64::from(width), i64::from(height)),
    )
}

fn span_rect(top_left: (i64, i64), bottom_right: (i64, i64), canvas: (i64, i64)) -> Option<Rect> {
    let ((x1, y1), (x2, y2), (w, h)) = (top_left, bottom_right, canvas);
    if x2 < 0 || y2 < 0 || x1 >= w || y1 >= h {
        return None;
    }
    let (x1, x2) = (x1.max(-1), x2.min(w));
    let (y1, y2) = (y1.max(-1), y2.min(h));
    Some(Rect::at(x1 as i32, y1 as i32).of_size((x2 - x1 + 1) as u32, (y2 - y1 + 1) as u32))
}

/// Draws a rectangle outline whose stroke is centered on the corner lines.
///
/// A stroke of `t` pixels covers the inward offsets `-(t/2) ..= t - t/2 - 1`
/// from each edge: `t/2` pixels outside, the rest on or inside the edge.
/// `thickness <= 0` fills the rectangle instead. Corners may come in either
/// order and may lie anywhere in the `i32` plane.
pub fn draw_outline(canvas: &mut RgbImage, corners: Corners, color: [u8; 3], thickness: i32) {
    let color = Rgb(color);
    let (width, height) = canvas.dimensions();

    if thickness <= 0 {
        if let Some(rect) = canvas_rect(corners, width, height) {
            draw_filled_rect_mut(canvas, rect, color);
        }
        return;
    }

    let (w, h) = (i64::from(width), i64::from(height));
    let (x1, x2) = (
        i64::from(corners.x1.min(corners.x2)),
        i64::from(corners.x1.max(corners.x2)),
    );
    let (y1, y2) = (
        i64::from(corners.y1.min(corners.y2)),
        i64::from(corners.y1.max(corners.y2)),
    );

    let outer = -(i64::from(thickness) / 2);
    let end = outer + i64::from(thickness);
    // Rings below this offset enclose the whole canvas and draw nothing.
    let first = (-x1).min(-y1).min(x2 - (w - 1)).min(y2 - (h - 1)).max(outer);

    for offset in first..end {
        let ring_tl = (x1 + offset, y1 + offset);
        let ring_br = (x2 - offset, y2 - offset);
        // Inner rings collapse once the stroke is wider than the rectangle.
        if ring_tl.0 > ring_br.0 || ring_tl.1 > ring_br.1 {
            break;
        }
        // Once a ring leaves the canvas every inner ring does too.
        let Some(rect) = span_rect(ring_tl, ring_br, (w, h)) else {
            break;
        };
        draw_hollow_rect_mut(canvas, rect, color);
    }
}
