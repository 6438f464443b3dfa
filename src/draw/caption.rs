//! Caption text: font loading, measuring, centering and stroked rendering.

use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Corners, saturate};

const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Glyph height in pixels at caption scale 1.0.
pub const BASE_GLYPH_PX: f32 = 30.0;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a usable TrueType/OpenType font: {0}")]
    Invalid(#[from] InvalidFont),
}

/// Pixel footprint of a rendered caption.
///
/// `height` is the ink extent above the baseline and `baseline` the room
/// reserved below it; both include half the stroke, `width` the full stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: i32,
    pub height: i32,
    pub baseline: i32,
}

/// Face used to measure and draw captions.
#[derive(Debug, Clone)]
pub struct CaptionFont {
    font: FontArc,
}

impl CaptionFont {
    /// The bundled DejaVu Sans face.
    pub fn embedded() -> Result<Self, FontError> {
        Ok(Self {
            font: FontArc::try_from_slice(EMBEDDED_FONT)?,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            font: FontArc::try_from_vec(data)?,
        })
    }

    /// Loads `path` when given, otherwise the embedded face.
    pub fn load(path: Option<&Path>) -> Result<Self, FontError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    pub fn px_scale(scale: f32) -> PxScale {
        PxScale::from(BASE_GLYPH_PX * scale)
    }

    /// Measures `text` as it will be drawn with the given scale and stroke.
    pub fn measure(&self, text: &str, scale: f32, thickness: i32) -> TextExtent {
        let px = Self::px_scale(scale);
        let thickness = thickness.max(1);
        let (advance, _) = text_size(px, &self.font, text);

        let scaled = self.font.as_scaled(px);
        let mut top = 0f32;
        for c in text.chars() {
            if let Some(outline) = scaled.outline_glyph(scaled.scaled_glyph(c)) {
                top = top.min(outline.px_bounds().min.y);
            }
        }

        TextExtent {
            width: (advance as i32).saturating_add(thickness),
            height: ((-top).round() as i32).saturating_add(thickness / 2 + thickness % 2),
            baseline: (-scaled.descent() + thickness as f32 * 0.5).round() as i32,
        }
    }

    fn ascent(&self, scale: f32) -> f32 {
        self.font.as_scaled(Self::px_scale(scale)).ascent()
    }
}

/// Baseline-left origin that centers a caption of `extent` in `corners`.
///
/// The vertical term adds the text height to the box height before halving,
/// which drops the baseline into the lower half of the box. Halving rounds
/// toward negative infinity, so text wider than its box starts left of it.
pub fn place_caption(corners: Corners, extent: TextExtent) -> (i32, i32) {
    let (x1, y1) = (i64::from(corners.x1), i64::from(corners.y1));
    let box_width = i64::from(corners.x2) - x1;
    let box_height = i64::from(corners.y2) - y1;
    let x = x1 + (box_width - i64::from(extent.width)).div_euclid(2);
    let y = y1 + (box_height + i64::from(extent.height)).div_euclid(2);
    (saturate(x), saturate(y))
}

/// Draws `text` with its baseline-left corner at `origin`.
///
/// Strokes wider than one pixel are built by stamping the glyphs at every
/// offset of a `thickness`-wide disc. The offsets span
/// `-(t/2) ..= t - t/2 - 1` like the ROI stroke, so even strokes lean one
/// pixel up and to the left.
pub fn draw_caption(
    canvas: &mut RgbImage,
    font: &CaptionFont,
    text: &str,
    origin: (i32, i32),
    scale: f32,
    thickness: i32,
    color: [u8; 3],
) {
    let px = CaptionFont::px_scale(scale);
    let color = Rgb(color);
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let left = i64::from(origin.0);
    let top = i64::from(origin.1) - font.ascent(scale).round() as i64;

    // Generous bound on how far glyph ink strays from the draw position.
    let (text_w, text_h) = text_size(px, &font.font, text);
    let reach = i64::from(text_w.max(text_h)) + 2 * px.x.max(px.y).ceil() as i64;

    let t = i64::from(thickness.max(1));
    let lo = -(t / 2);
    let hi = t - t / 2 - 1;
    let diameter_sq = (t - 1) * (t - 1) + 1;
    for dy in lo..=hi {
        for dx in lo..=hi {
            // Distance from the disc center in half-pixel units.
            let (a, b) = (2 * dx - (lo + hi), 2 * dy - (lo + hi));
            if a * a + b * b > diameter_sq {
                continue;
            }
            let (x, y) = (left + dx, top + dy);
            if x + reach < 0 || y + reach < 0 || x - reach >= width || y - reach >= height {
                continue;
            }
            draw_text_mut(canvas, color, x as i32, y as i32, px, &font.font, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATE_BOX: Corners = Corners::new(809, 73, 1266, 194);

    #[test]
    fn plate_box_placement_from_fixed_metrics() {
        let extent = TextExtent {
            width: 465,
            height: 71,
            baseline: 32,
        };
        assert_eq!(place_caption(PLATE_BOX, extent), (805, 169));
    }

    #[test]
    fn narrow_text_is_centered() {
        let extent = TextExtent {
            width: 301,
            height: 40,
            baseline: 10,
        };
        // (457 - 301) / 2 = 78, (121 + 40) / 2 = 80
        assert_eq!(place_caption(PLATE_BOX, extent), (887, 153));
    }

    #[test]
    fn odd_overflow_rounds_down() {
        let corners = Corners::new(100, 50, 110, 60);
        let extent = TextExtent {
            width: 13,
            height: 5,
            baseline: 1,
        };
        // (10 - 13) / 2 = -1.5 -> -2; (10 + 5) / 2 = 7.5 -> 7
        assert_eq!(place_caption(corners, extent), (98, 57));
    }

    #[test]
    fn thicker_stroke_grows_extent() {
        let font = CaptionFont::embedded().expect("embedded font");
        let thin = font.measure("RAH972U", 3.2, 1);
        let thick = font.measure("RAH972U", 3.2, 7);
        assert_eq!(thick.width - thin.width, 6);
        assert_eq!(thick.height - thin.height, 3);
        assert!(thin.height > 40 && thin.height < 110, "height {}", thin.height);
        assert!(thin.width > thin.height);
    }

    #[test]
    fn longer_text_measures_wider() {
        let font = CaptionFont::embedded().expect("embedded font");
        let short = font.measure("RAH", 1.0, 1);
        let long = font.measure("RAH972U", 1.0, 1);
        assert!(long.width > short.width);
    }

    #[test]
    fn missing_font_file_is_reported() {
        let err = CaptionFont::from_file(Path::new("no/such/font.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").expect("write");
        let err = CaptionFont::from_file(&path).unwrap_err();
        assert!(matches!(err, FontError::Invalid(_)));
    }

    #[test]
    fn caption_ink_sits_on_the_baseline() {
        let font = CaptionFont::embedded().expect("embedded font");
        let mut img = RgbImage::new(400, 160);
        let origin = (20, 110);
        let extent = font.measure("RAH972U", 1.5, 3);
        draw_caption(&mut img, &font, "RAH972U", origin, 1.5, 3, [0, 255, 0]);

        let inked: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty(), "nothing drawn");

        let lowest = inked.iter().map(|&(_, y)| y as i32).max().unwrap_or(0);
        let highest = inked.iter().map(|&(_, y)| y as i32).min().unwrap_or(0);
        let leftmost = inked.iter().map(|&(x, _)| x as i32).min().unwrap_or(0);
        let rightmost = inked.iter().map(|&(x, _)| x as i32).max().unwrap_or(0);

        // No descenders in this text: ink stops within a stroke of the baseline.
        assert!(lowest <= origin.1 + 4, "lowest ink row {lowest}");
        assert!(highest >= origin.1 - extent.height - 3, "highest ink row {highest}");
        assert!(leftmost >= origin.0 - 3);
        assert!(rightmost <= origin.0 + extent.width + 3);
    }

    fn ink_span(font: &CaptionFont, thickness: i32) -> (i32, i32) {
        let mut img = RgbImage::new(200, 160);
        draw_caption(&mut img, font, "I", (80, 110), 2.0, thickness, [0, 255, 0]);
        let (mut xs, mut ys) = (Vec::new(), Vec::new());
        for (x, y, p) in img.enumerate_pixels() {
            if p.0 != [0, 0, 0] {
                xs.push(x as i32);
                ys.push(y as i32);
            }
        }
        let span = |v: &[i32]| v.iter().max().unwrap_or(&0) - v.iter().min().unwrap_or(&0) + 1;
        (span(&xs), span(&ys))
    }

    #[test]
    fn stroke_adds_thickness_minus_one_pixels() {
        let font = CaptionFont::embedded().expect("embedded font");
        let (thin_w, thin_h) = ink_span(&font, 1);
        for t in [2, 5, 6, 7] {
            let (w, h) = ink_span(&font, t);
            assert_eq!(w - thin_w, t - 1, "width at thickness {t}");
            assert_eq!(h - thin_h, t - 1, "height at thickness {t}");
        }
    }

    #[test]
    fn extreme_box_places_without_overflow() {
        let extent = TextExtent {
            width: 465,
            height: 71,
            baseline: 32,
        };
        let (x, y) = place_caption(Corners::new(i32::MIN, 0, 40, 10), extent);
        assert!(x < 0);
        assert_eq!(y, 40);

        let far = place_caption(Corners::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX), extent);
        // (0 - 465) / 2 rounds down to -233; the vertical sum saturates.
        assert_eq!(far, (i32::MAX - 233, i32::MAX));
    }

    #[test]
    fn far_away_origin_draws_nothing() {
        let font = CaptionFont::embedded().expect("embedded font");
        let mut img = RgbImage::new(40, 40);
        for origin in [(i32::MIN, i32::MIN), (i32::MAX, i32::MAX), (i32::MIN, 20)] {
            draw_caption(&mut img, &font, "RAH972U", origin, 3.2, 7, [0, 255, 0]);
        }
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn huge_thickness_measures_without_overflow() {
        let font = CaptionFont::embedded().expect("embedded font");
        let extent = font.measure("RAH972U", 1.0, i32::MAX);
        assert_eq!(extent.width, i32::MAX);
        assert!(extent.height > i32::MAX / 2);
    }
}
