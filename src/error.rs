// Crate-wide error type. Every variant states *where* things went wrong.
// Core calls (open/read) turn these into `false` plus a log line; only the
// window and an explicit config file can stop the program.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("video resource not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("frame read error: {0}")]
    FrameRead(String),
    #[error("camera init error: {0}")]
    CameraInit(String),
    #[error("window init error: {0}")]
    WindowInit(String),
    #[error("window update error: {0}")]
    WindowUpdate(String),
    #[error("config error in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
