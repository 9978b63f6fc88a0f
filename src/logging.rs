// Log setup: everything goes to stdout and is also appended to a file.
// The file defaults to ./logs/<name>_<UTC timestamp>.log; `LOG_FILE_PATH`
// points it somewhere else.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable overriding the log file location.
pub const LOG_ENV: &str = "LOG_FILE_PATH";
pub const LOG_DIR: &str = "logs";
pub const LOG_NAME: &str = "frame_picker";

/// `2026_10_16-07_05_09` style stamp used in log file names.
pub fn file_stamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year]_[month]_[day]-[hour]_[minute]_[second]"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Where the log file goes: the override if set, else `logs/<name>_<stamp>.log`.
pub fn log_file_path(override_path: Option<PathBuf>, name: &str, stamp: &str) -> PathBuf {
    override_path.unwrap_or_else(|| Path::new(".").join(LOG_DIR).join(format!("{name}_{stamp}.log")))
}

/// Open `path` for appending, creating its directory first.
pub fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
/// A log file that cannot be opened only disables the file output.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let path = log_file_path(
        std::env::var_os(LOG_ENV).map(PathBuf::from),
        LOG_NAME,
        &file_stamp(OffsetDateTime::now_utc()),
    );
    let (file_layer, file_error) = match open_append(&path) {
        Ok(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    match file_error {
        None => info!(path = %path.display(), "logging to file"),
        Some(e) => warn!(path = %path.display(), error = %e, "file logging disabled"),
    }
}
