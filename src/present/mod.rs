//! Showing the finished image before it is written out.

use image::RgbImage;
use log::info;

use crate::annotate::AnnotateError;
use crate::config::DisplaySettings;

#[cfg(feature = "window")]
pub mod window;
#[cfg(feature = "window")]
pub use window::WindowPresenter;

#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error("display window failed: {0}")]
    Window(String),
}

/// Writes the annotated image to disk.
pub type Persist = Box<dyn FnOnce() -> Result<(), AnnotateError>>;

/// Hands the annotated buffer to the user and returns once they are done
/// looking at it.
pub trait Presenter {
    /// Shows `canvas`, waits for the user, runs `persist` and only then
    /// releases the display. `persist` must not run when the display fails
    /// before the user saw the image.
    fn present(&mut self, canvas: &RgbImage, title: &str, persist: Persist) -> Result<(), AnnotateError>;
}

/// Skips display entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPresenter;

impl Presenter for HeadlessPresenter {
    fn present(&mut self, canvas: &RgbImage, title: &str, persist: Persist) -> Result<(), AnnotateError> {
        let (width, height) = canvas.dimensions();
        info!("display suppressed for \"{title}\" ({width}x{height})");
        persist()
    }
}

/// Window presenter when display is enabled and the `window` feature is
/// built, headless otherwise.
pub fn presenter_for(display: &DisplaySettings) -> Box<dyn Presenter> {
    #[cfg(feature = "window")]
    if display.enabled {
        return Box::new(WindowPresenter);
    }

    if display.enabled {
        info!("built without the `window` feature; showing nothing");
    }
    Box::new(HeadlessPresenter)
}
