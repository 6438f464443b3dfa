use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;

use super::outline::canvas_rect;
use crate::config::{Corners, VeilStyle};

#[derive(Debug, thiserror::Error)]
pub enum BlendError {
    #[error("cannot blend a {overlay:?} overlay into a {canvas:?} canvas")]
    SizeMismatch { overlay: (u32, u32), canvas: (u32, u32) },
}

/// Weighted per-channel sum of two equally sized buffers, written into `dst`:
/// `dst = overlay * alpha + dst * beta + gamma`, rounded half to even and
/// saturated to `0..=255`.
///
/// `dst` is left untouched when the dimensions differ.
pub fn add_weighted(overlay: &RgbImage, alpha: f64, dst: &mut RgbImage, beta: f64, gamma: f64) -> Result<(), BlendError> {
    if overlay.dimensions() != dst.dimensions() {
        return Err(BlendError::SizeMismatch {
            overlay: overlay.dimensions(),
            canvas: dst.dimensions(),
        });
    }
    blend(overlay, alpha, dst, beta, gamma);
    Ok(())
}

fn blend(overlay: &RgbImage, alpha: f64, dst: &mut RgbImage, beta: f64, gamma: f64) {
    for (out, over) in dst.pixels_mut().zip(overlay.pixels()) {
        for c in 0..3 {
            let value = over.0[c] as f64 * alpha + out.0[c] as f64 * beta + gamma;
            out.0[c] = value.round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Darkens `corners` with a translucent fill.
///
/// The fill is painted opaque on a scratch copy of the whole canvas and the
/// copy is blended back with weight `alpha`; pixels outside the box blend
/// with themselves and keep their value.
pub fn draw_veil(canvas: &mut RgbImage, corners: Corners, veil: &VeilStyle) {
    let (width, height) = canvas.dimensions();
    let Some(rect) = canvas_rect(corners, width, height) else {
        return;
    };
    let alpha = veil.clamped_alpha() as f64;
    let mut overlay = canvas.clone();
    draw_filled_rect_mut(&mut overlay, rect, Rgb(veil.color));
    blend(&overlay, alpha, canvas, 1.0 - alpha, 0.0);
}
