use image::{Rgb, RgbImage};
use std::path::Path;

/// Generates a synthetic scene for exercising the annotator.
///
/// Creates a `width` x `height` image with:
/// - A smooth diagonal gradient background (every channel varies, none saturated)
/// - A dark "vehicle" block roughly where the default ROI sits
/// - A light "plate" strip inside the block
///
/// The output is a pure function of the dimensions.
pub fn sample_scene(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_fn(width, height, |x, y| {
        let r = 40 + (x * 160 / width.max(1)) as u8;
        let g = 60 + (y * 140 / height.max(1)) as u8;
        let b = 50 + ((x + y) * 120 / (width + height).max(1)) as u8;
        Rgb([r, g, b])
    });

    let dark = Rgb([35, 38, 44]);
    let light = Rgb([225, 225, 215]);

    // Vehicle body
    let (bx0, by0) = (width * 26 / 100, height * 30 / 100);
    let (bx1, by1) = (width * 72 / 100, height * 90 / 100);
    for y in by0..by1 {
        for x in bx0..bx1 {
            img.put_pixel(x, y, dark);
        }
    }

    // Plate
    let (px0, py0) = (width * 42 / 100, height * 70 / 100);
    let (px1, py1) = (width * 56 / 100, height * 76 / 100);
    for y in py0..py1 {
        for x in px0..px1 {
            img.put_pixel(x, y, light);
        }
    }

    img
}

/// Writes [`sample_scene`] to `path`, format chosen by extension.
pub fn write_sample_scene(path: &Path, width: u32, height: u32) -> Result<(), image::ImageError> {
    sample_scene(width, height).save(path)
}
