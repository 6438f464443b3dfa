//! Annotation settings: where to read and write, what to draw and how.
//!
//! The defaults reproduce the stock plate annotation (green ROI around the
//! vehicle, veiled caption box with the plate number above it).

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_INPUT: &str = "../Basic_Operations/assignment-001-given.jpg";
const DEFAULT_OUTPUT: &str = "myResults.jpg";
const DEFAULT_TITLE: &str = "Image";
const DEFAULT_CAPTION: &str = "RAH972U";
const GREEN: [u8; 3] = [0, 255, 0];
const BLACK: [u8; 3] = [0, 0, 0];

/// Errors raised while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("cannot render config as TOML: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Inclusive, axis-aligned pixel rectangle given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Corners {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Horizontal distance between the corners (not the pixel count),
    /// saturating at the `i32` range.
    pub fn width(&self) -> i32 {
        saturate(i64::from(self.x2) - i64::from(self.x1))
    }

    /// Vertical distance between the corners (not the pixel count),
    /// saturating at the `i32` range.
    pub fn height(&self) -> i32 {
        saturate(i64::from(self.y2) - i64::from(self.y1))
    }

    pub fn is_ordered(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }
}

pub(crate) fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineStyle {
    pub color: [u8; 3],
    /// Stroke width in pixels; zero or negative fills the rectangle.
    pub thickness: i32,
    pub corners: Corners,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color: GREEN,
            thickness: 6,
            corners: Corners::new(261, 198, 989, 924),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    pub text: String,
    /// Multiplier applied to the base glyph height.
    pub scale: f32,
    pub thickness: i32,
    pub color: [u8; 3],
    /// TTF/OTF face to use instead of the embedded one.
    pub font_path: Option<PathBuf>,
    /// Box the text is centered in; also the veiled region.
    pub corners: Corners,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            text: DEFAULT_CAPTION.to_string(),
            scale: 3.2,
            thickness: 7,
            color: GREEN,
            font_path: None,
            corners: Corners::new(809, 73, 1266, 194),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VeilStyle {
    pub color: [u8; 3],
    /// Weight of the veil color in the blend, clamped to `[0, 1]`.
    pub alpha: f32,
}

impl Default for VeilStyle {
    fn default() -> Self {
        Self {
            color: BLACK,
            alpha: 0.4,
        }
    }
}

impl VeilStyle {
    pub fn clamped_alpha(&self) -> f32 {
        self.alpha.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub enabled: bool,
    pub title: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Everything one annotation run needs. Built once, consumed by
/// [`crate::annotate::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outline: OutlineStyle,
    pub caption: CaptionStyle,
    pub veil: VeilStyle,
    pub display: DisplaySettings,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            outline: OutlineStyle::default(),
            caption: CaptionStyle::default(),
            veil: VeilStyle::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl AnnotationConfig {
    /// Reads a `.toml` or `.json` file. Keys left out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
