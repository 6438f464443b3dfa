use image::RgbImage;
use roi_annotator::present::{Persist, Presenter};
use roi_annotator::{AnnotateError, AnnotationConfig, load_source, run_with};
use std::fs;
use std::path::PathBuf;

/// Fails the test if the pipeline ever gets as far as presenting.
struct MustNotPresent;

impl Presenter for MustNotPresent {
    fn present(&mut self, _: &RgbImage, _: &str, _: Persist) -> Result<(), AnnotateError> {
        panic!("presenter reached after a failed load");
    }
}

fn config_for(input: PathBuf, output: PathBuf) -> AnnotationConfig {
    let mut config = AnnotationConfig::default();
    config.input = input;
    config.output = output;
    config.display.enabled = false;
    config
}

#[test]
fn missing_source_stops_before_any_side_effect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("does-not-exist.jpg");
    let output = dir.path().join("myResults.jpg");

    let err = run_with(config_for(input.clone(), output.clone()), &mut MustNotPresent).unwrap_err();
    match &err {
        AnnotateError::SourceNotFound { path, .. } => assert_eq!(path, &input),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Check the path"));
    assert!(!output.exists());
}

#[test]
fn undecodable_source_counts_as_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("corrupt.jpg");
    fs::write(&input, b"\xff\xd8 not really a jpeg").expect("write");
    let output = dir.path().join("myResults.jpg");

    let err = run_with(config_for(input, output.clone()), &mut MustNotPresent).unwrap_err();
    assert!(matches!(err, AnnotateError::SourceNotFound { .. }));
    assert!(!output.exists());
}

#[test]
fn load_source_reports_the_path() {
    let err = load_source(PathBuf::from("nowhere/at/all.png").as_path()).unwrap_err();
    assert!(err.to_string().contains("nowhere/at/all.png"));
}

#[test]
fn bad_font_path_fails_after_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.png");
    roi_annotator::sample::write_sample_scene(&input, 32, 32).expect("write scene");
    let output = dir.path().join("out.png");

    let mut config = config_for(input, output.clone());
    config.caption.font_path = Some(dir.path().join("missing.ttf"));

    let err = run_with(config, &mut MustNotPresent).unwrap_err();
    assert!(matches!(err, AnnotateError::Font(_)));
    assert!(!output.exists());
}

#[test]
fn unwritable_output_is_a_write_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.png");
    roi_annotator::sample::write_sample_scene(&input, 32, 32).expect("write scene");
    // Unknown extension: the encoder cannot pick a format.
    let output = dir.path().join("out.unknownformat");

    let err = run_with(
        config_for(input, output.clone()),
        &mut roi_annotator::present::HeadlessPresenter,
    )
    .unwrap_err();
    assert!(matches!(err, AnnotateError::Write { .. }));
}
