//! The annotation pipeline: load, outline, veil, caption, present, save.

use image::RgbImage;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::{AnnotationConfig, ConfigError, Corners};
use crate::draw::{CaptionFont, FontError, TextExtent, draw_caption, draw_outline, draw_veil, place_caption};
use crate::present::{PresentError, Presenter, presenter_for};

/// Errors that can end an annotation run.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("the image file {} was not found ({reason}). Check the path and try again.", path.display())]
    SourceNotFound { path: PathBuf, reason: String },

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Display(#[from] PresentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where the caption ended up, as computed during [`annotate_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionPlacement {
    pub extent: TextExtent,
    pub origin: (i32, i32),
}

/// Decodes `path` into an RGB buffer.
///
/// A missing file and an undecodable one are the same failure here.
pub fn load_source(path: &Path) -> Result<RgbImage, AnnotateError> {
    let img = image::open(path).map_err(|e| AnnotateError::SourceNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rgb = img.to_rgb8();
    info!("loaded {} ({}x{})", path.display(), rgb.width(), rgb.height());
    Ok(rgb)
}

/// Draws the ROI outline, the veiled caption box and the caption, in that
/// order, onto `canvas`. The canvas keeps its dimensions.
pub fn annotate_image(canvas: &mut RgbImage, config: &AnnotationConfig, font: &CaptionFont) -> CaptionPlacement {
    let outline = &config.outline;
    let caption = &config.caption;
    check_geometry("ROI", outline.corners, canvas);
    check_geometry("caption box", caption.corners, canvas);

    debug!(
        "outline {:?} thickness {} color {:?}",
        outline.corners, outline.thickness, outline.color
    );
    draw_outline(canvas, outline.corners, outline.color, outline.thickness);

    let extent = font.measure(&caption.text, caption.scale, caption.thickness);
    let origin = place_caption(caption.corners, extent);
    debug!("caption {:?} measured {extent:?}, origin {origin:?}", caption.text);

    draw_veil(canvas, caption.corners, &config.veil);
    draw_caption(
        canvas,
        font,
        &caption.text,
        origin,
        caption.scale,
        caption.thickness,
        caption.color,
    );

    CaptionPlacement { extent, origin }
}

fn check_geometry(label: &str, corners: Corners, canvas: &RgbImage) {
    if !corners.is_ordered() {
        warn!("{label} corners {corners:?} are not top-left/bottom-right ordered");
    }
    let (w, h) = canvas.dimensions();
    let fits = corners.x1.min(corners.x2) >= 0
        && corners.y1.min(corners.y2) >= 0
        && (corners.x1.max(corners.x2) as i64) < w as i64
        && (corners.y1.max(corners.y2) as i64) < h as i64;
    if !fits {
        warn!("{label} {corners:?} extends past the {w}x{h} canvas and will be clipped");
    }
}

/// Encodes `canvas` to `path`; the format follows the file extension.
pub fn save_output(canvas: &RgbImage, path: &Path) -> Result<(), AnnotateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| AnnotateError::Write {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
    }
    canvas.save(path).map_err(|source| AnnotateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Runs the whole pipeline with the presenter chosen by the display
/// settings. Returns the output path.
pub fn run(config: AnnotationConfig) -> Result<PathBuf, AnnotateError> {
    let mut presenter = presenter_for(&config.display);
    run_with(config, presenter.as_mut())
}

/// Runs the whole pipeline with an explicit presenter.
///
/// Nothing is drawn or written when the source cannot be loaded. The output
/// is written by the presenter once the user has seen the image.
pub fn run_with(config: AnnotationConfig, presenter: &mut dyn Presenter) -> Result<PathBuf, AnnotateError> {
    let mut canvas = load_source(&config.input)?;
    let font = CaptionFont::load(config.caption.font_path.as_deref())?;

    annotate_image(&mut canvas, &config, &font);

    let canvas = Rc::new(canvas);
    let frame = Rc::clone(&canvas);
    let output = config.output.clone();
    presenter.present(
        &canvas,
        &config.display.title,
        Box::new(move || save_output(&frame, &output)),
    )?;
    Ok(config.output)
}
