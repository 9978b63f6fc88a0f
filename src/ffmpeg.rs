// Container video through an `ffmpeg` child process.
// ffprobe reports geometry and rate up front; ffmpeg then pipes raw bgr24
// frames on stdout. Rewinding restarts the process from the beginning.

use std::ffi::OsString;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::source::FrameDecoder;
use crate::types::{ChannelOrder, Frame};

#[derive(Debug, Deserialize)]
struct StreamReport {
    #[serde(default)]
    streams: Vec<ReportedStream>,
}

#[derive(Debug, Deserialize)]
struct ReportedStream {
    width: Option<usize>,
    height: Option<usize>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

/// What ffprobe told us about the first video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub width: usize,
    pub height: usize,
    pub fps: Option<f64>,
}

pub struct FfmpegDecoder {
    path: PathBuf,
    info: StreamInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
}

impl FfmpegDecoder {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let info = inspect(path)?;
        let mut decoder = Self {
            path: path.to_path_buf(),
            info,
            child: None,
            stdout: None,
        };
        decoder.spawn()?;
        Ok(decoder)
    }

    pub fn info(&self) -> StreamInfo {
        self.info
    }

    fn spawn(&mut self) -> Result<(), Error> {
        let mut child = Command::new("ffmpeg")
            .args(decode_args(&self.path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::decode(&self.path, format!("spawn ffmpeg: {e}")))?;
        self.stdout = child.stdout.take();
        self.child = Some(child);
        debug!(path = %self.path.display(), "ffmpeg started");
        Ok(())
    }

    fn stop(&mut self) {
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            // already exited is fine
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn frame_rate(&self) -> Option<f64> {
        self.info.fps
    }

    fn decode_next(&mut self) -> Result<Option<Frame>, Error> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut data = vec![0u8; self.info.width * self.info.height * 3];
        match stdout.read_exact(&mut data) {
            Ok(()) => Ok(Some(Frame {
                width: self.info.width,
                height: self.info.height,
                order: ChannelOrder::Bgr,
                data,
            })),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(Error::FrameRead(format!("ffmpeg pipe: {e}"))),
        }
    }

    fn rewind(&mut self) -> Result<(), Error> {
        self.stop();
        self.spawn()
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        self.stop();
    }
}

/// ffmpeg arguments for piping `path` as raw bgr24.
/// Rotation metadata is ignored so every frame keeps the coded size ffprobe
/// reported; an autorotated portrait clip would arrive as height x width.
fn decode_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-noautorotate", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_os_string());
    args.extend(["-f", "rawvideo", "-pix_fmt", "bgr24", "-"].map(OsString::from));
    args
}

fn inspect(path: &Path) -> Result<StreamInfo, Error> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::decode(path, format!("spawn ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::decode(path, stderr.trim()));
    }
    parse_stream_report(&output.stdout).map_err(|reason| Error::decode(path, reason))
}

fn parse_stream_report(json: &[u8]) -> Result<StreamInfo, String> {
    let report: StreamReport = serde_json::from_slice(json).map_err(|e| e.to_string())?;
    let stream = report
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| "no video stream".to_string())?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            let fps = stream
                .avg_frame_rate
                .as_deref()
                .and_then(parse_rate)
                .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate));
            Ok(StreamInfo { width, height, fps })
        }
        _ => Err("video stream has no size".to_string()),
    }
}

/// Parse ffprobe's `num/den` rate (or a plain number). `0/0` gives none.
pub fn parse_rate(s: &str) -> Option<f64> {
    let rate = match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => s.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates() {
        assert_eq!(parse_rate("30/1"), Some(30.0));
        assert_eq!(parse_rate("25"), Some(25.0));
        assert!((parse_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("0/1"), None);
        assert_eq!(parse_rate("abc"), None);
    }

    #[test]
    fn decoder_keeps_coded_orientation() {
        let args = decode_args(Path::new("clips/portrait.mp4"));
        let pos = |flag: &str| args.iter().position(|a| a == flag);
        let input = pos("-i").unwrap();
        assert!(pos("-noautorotate").unwrap() < input);
        assert_eq!(args[input + 1], OsString::from("clips/portrait.mp4"));
        assert_eq!(args.last(), Some(&OsString::from("-")));
        assert!(pos("bgr24").unwrap() > input);
    }

    #[test]
    fn stream_json_prefers_average_rate() {
        let json = br#"{"programs":[],"streams":[{"width":1280,"height":720,
            "r_frame_rate":"60/1","avg_frame_rate":"30/1"}]}"#;
        let info = parse_stream_report(json).unwrap();
        assert_eq!(info, StreamInfo { width: 1280, height: 720, fps: Some(30.0) });
    }

    #[test]
    fn stream_json_falls_back_to_r_frame_rate() {
        let json = br#"{"streams":[{"width":640,"height":360,"r_frame_rate":"24/1","avg_frame_rate":"0/0"}]}"#;
        assert_eq!(parse_stream_report(json).unwrap().fps, Some(24.0));
    }

    #[test]
    fn stream_json_without_stream_is_rejected() {
        assert!(parse_stream_report(br#"{"streams":[]}"#).is_err());
        assert!(parse_stream_report(br#"{}"#).is_err());
        assert!(parse_stream_report(br#"{"streams":[{"width":0,"height":0}]}"#).is_err());
        assert!(parse_stream_report(b"garbage").is_err());
    }
}
