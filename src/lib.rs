pub mod annotate;
pub mod config;
pub mod draw;
pub mod present;
pub mod sample;

pub use annotate::{AnnotateError, CaptionPlacement, annotate_image, load_source, run, run_with, save_output};
pub use config::{AnnotationConfig, Corners};
