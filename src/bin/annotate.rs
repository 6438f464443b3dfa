use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use roi_annotator::{AnnotateError, AnnotationConfig};

#[derive(Parser, Debug)]
#[command(
    name = "annotate",
    about = "Outline a region of interest and add a veiled caption box to an image",
    version
)]
struct Cli {
    /// Source image (defaults to the configured input)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Where to write the annotated image
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// TOML or JSON settings file, applied before the other flags
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Caption text drawn in the box
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// Do not open a window; just write the output
    #[arg(long = "no-display")]
    no_display: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long = "print-config")]
    print_config: bool,
}

impl Cli {
    fn into_config(self) -> Result<(AnnotationConfig, bool), AnnotateError> {
        let mut config = match &self.config {
            Some(path) => AnnotationConfig::from_file(path)?,
            None => AnnotationConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(text) = self.text {
            config.caption.text = text;
        }
        if self.no_display {
            config.display.enabled = false;
        }
        Ok((config, self.print_config))
    }
}

fn execute(cli: Cli) -> Result<(), AnnotateError> {
    let (config, print_config) = cli.into_config()?;
    if print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    roi_annotator::run(config)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
