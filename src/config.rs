// Application settings, read from a JSON file next to the executable.
// Every field has a default, so a missing default file is not an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::overlay::MarkerStyle;

/// Default config location, relative to the executable's directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/configuration.json";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub video_path: PathBuf,
    pub window_title: String,
    pub window_width: usize,
    pub window_height: usize,
    pub log_level: String,
    pub marker: MarkerStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            video_path: PathBuf::from("assets/video.mp4"),
            window_title: "Frame Picker".to_string(),
            window_width: 960,
            window_height: 540,
            log_level: "info".to_string(),
            marker: MarkerStyle::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Read `path`. With `required == false` a missing file yields defaults.
    pub fn load(path: &Path, required: bool) -> Result<Self, Error> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(path, &text),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(Error::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Directory holding the running executable, falling back to the cwd.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Absolute paths and `camera:` sources pass through; anything else is
/// taken relative to `base`.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    let is_camera = path
        .to_str()
        .is_some_and(|s| s.starts_with(crate::source::CAMERA_SCHEME));
    if path.is_absolute() || is_camera {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
