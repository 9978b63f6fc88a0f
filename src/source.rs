// Frame source: opens a video resource and hands out frames one at a time,
// looping back to the first frame when the stream ends.
// Backends (clip, ffmpeg, camera) sit behind `FrameDecoder`; `VideoSource`
// turns their errors into the boolean results the player works with.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::clip::ClipDecoder;
use crate::error::Error;
use crate::ffmpeg::FfmpegDecoder;
use crate::types::Frame;

/// Rate used when a backend reports none (or nonsense).
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Paths starting with this select a live camera, e.g. `camera:0`.
pub const CAMERA_SCHEME: &str = "camera:";

/// One decoding backend. `Ok(None)` from `decode_next` marks end-of-stream.
pub trait FrameDecoder {
    fn frame_rate(&self) -> Option<f64>;
    fn decode_next(&mut self) -> Result<Option<Frame>, Error>;
    fn rewind(&mut self) -> Result<(), Error>;
}

#[derive(Default)]
pub struct VideoSource {
    decoder: Option<Box<dyn FrameDecoder>>,
    path: Option<PathBuf>,
    current: Option<Frame>,
    // frame 0, decoded right after a rewind and handed out by the next read
    pending: Option<Frame>,
}

impl VideoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built backend (used for in-memory clips).
    pub fn with_decoder(decoder: Box<dyn FrameDecoder>) -> Self {
        Self {
            decoder: Some(decoder),
            ..Self::default()
        }
    }

    /// Open `path`. Returns false when it does not exist or cannot be decoded;
    /// the reason is logged, never returned.
    pub fn open(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.release();
        match open_decoder(path) {
            Ok(decoder) => {
                info!(path = %path.display(), fps = ?decoder.frame_rate(), "video opened");
                self.decoder = Some(decoder);
                self.path = Some(path.to_path_buf());
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open video");
                false
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reported rate, or `DEFAULT_FRAME_RATE` if there is none.
    pub fn frame_rate(&self) -> f64 {
        self.decoder
            .as_ref()
            .and_then(|d| d.frame_rate())
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(DEFAULT_FRAME_RATE)
    }

    /// Advance one frame. At end-of-stream the decoder is rewound, frame 0 is
    /// shown immediately, and false is returned; the next call returns true.
    /// A stream that is still empty after the rewind is released.
    pub fn read_next_frame(&mut self) -> bool {
        // 1) Frame 0 held back by the last loop restart goes out first.
        if let Some(frame) = self.pending.take() {
            self.current = Some(frame);
            return true;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return false;
        };

        // 2) Normal case: one more frame from the backend.
        let first = match decoder.decode_next() {
            Ok(Some(frame)) => {
                self.current = Some(frame);
                return true;
            }
            Err(e) => {
                warn!(error = %e, "frame read failed");
                return false;
            }
            // 3) End of stream: rewind and peek at frame 0 so it is visible now.
            Ok(None) => {
                debug!("end of stream, looping");
                if let Err(e) = decoder.rewind() {
                    warn!(error = %e, "rewind failed");
                    return false;
                }
                decoder.decode_next()
            }
        };

        match first {
            Ok(Some(first)) => {
                self.current = Some(first.clone());
                self.pending = Some(first);
            }
            // 4) Nothing even after rewinding: looping would only respin the backend.
            Ok(None) => {
                warn!("stream has no frames, releasing it");
                self.release();
            }
            Err(e) => warn!(error = %e, "failed to read first frame after rewind"),
        }
        false
    }

    /// Copy of the last frame read, if any.
    pub fn current_frame(&self) -> Option<Frame> {
        self.current.clone()
    }

    /// Native size of the last frame read.
    pub fn frame_size(&self) -> Option<(usize, usize)> {
        self.current.as_ref().map(Frame::size)
    }

    /// Drop the backend and any held frame. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(path) = self.path.take() {
            info!(path = %path.display(), "video released");
        }
        self.decoder = None;
        self.current = None;
        self.pending = None;
    }
}

fn open_decoder(path: &Path) -> Result<Box<dyn FrameDecoder>, Error> {
    if let Some(index) = path.to_str().and_then(|s| s.strip_prefix(CAMERA_SCHEME)) {
        return open_camera(path, index);
    }
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let decoder: Box<dyn FrameDecoder> = match ext.as_str() {
        "gif" => Box::new(ClipDecoder::open_gif(path)?),
        "png" | "apng" => Box::new(ClipDecoder::open_png(path)?),
        "jpg" | "jpeg" | "bmp" | "webp" => Box::new(ClipDecoder::open_still(path)?),
        _ => Box::new(FfmpegDecoder::open(path)?),
    };
    Ok(decoder)
}

#[cfg(feature = "camera")]
fn open_camera(path: &Path, index: &str) -> Result<Box<dyn FrameDecoder>, Error> {
    let index: u32 = index
        .parse()
        .map_err(|_| Error::decode(path, format!("bad camera index {index:?}")))?;
    Ok(Box::new(crate::camera::CameraDecoder::open(index, 640, 480)?))
}

#[cfg(not(feature = "camera"))]
fn open_camera(path: &Path, _index: &str) -> Result<Box<dyn FrameDecoder>, Error> {
    Err(Error::decode(path, "built without the `camera` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelOrder;

    fn clip(n: u8) -> Vec<Frame> {
        (0..n)
            .map(|i| Frame::filled(4, 3, ChannelOrder::Bgr, [i, i, i]))
            .collect()
    }

    fn source(n: u8, fps: Option<f64>) -> VideoSource {
        VideoSource::with_decoder(Box::new(ClipDecoder::new(clip(n), fps)))
    }

    #[test]
    fn unopened_source_is_inert() {
        let mut src = VideoSource::new();
        assert_eq!(src.frame_rate(), DEFAULT_FRAME_RATE);
        assert!(!src.read_next_frame());
        assert!(src.current_frame().is_none());
        src.release();
        src.release();
        assert!(!src.is_open());
    }

    #[test]
    fn missing_path_fails_to_open() {
        let mut src = VideoSource::new();
        assert!(!src.open("definitely/not/here.mp4"));
        assert!(!src.is_open());
        assert!(src.current_frame().is_none());
    }

    #[test]
    fn camera_path_without_feature_or_device_fails() {
        let mut src = VideoSource::new();
        // no index at all: rejected either way
        assert!(!src.open("camera:x"));
    }

    #[test]
    fn frame_rate_falls_back_on_zero_or_missing() {
        assert_eq!(source(2, None).frame_rate(), 30.0);
        assert_eq!(source(2, Some(0.0)).frame_rate(), 30.0);
        assert_eq!(source(2, Some(f64::NAN)).frame_rate(), 30.0);
        assert_eq!(source(2, Some(25.0)).frame_rate(), 25.0);
    }

    #[test]
    fn current_frame_is_stable_between_reads() {
        let mut src = source(3, None);
        assert!(src.current_frame().is_none());
        assert!(src.read_next_frame());
        let a = src.current_frame();
        let b = src.current_frame();
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn loops_after_last_frame() {
        let frames = clip(3);
        let mut src = source(3, None);
        for f in &frames {
            assert!(src.read_next_frame());
            assert_eq!(src.current_frame().as_ref(), Some(f));
        }
        // N+1: end of stream, rewound, frame 0 already visible
        assert!(!src.read_next_frame());
        assert_eq!(src.current_frame().as_ref(), Some(&frames[0]));
        // retry yields frame 0, then the sequence continues
        assert!(src.read_next_frame());
        assert_eq!(src.current_frame().as_ref(), Some(&frames[0]));
        assert!(src.read_next_frame());
        assert_eq!(src.current_frame().as_ref(), Some(&frames[1]));
    }

    #[test]
    fn held_copy_is_independent_of_source() {
        let mut src = source(2, None);
        src.read_next_frame();
        let mut copy = src.current_frame().unwrap();
        copy.put_rgb(0, 0, [255, 255, 255]);
        assert_ne!(src.current_frame().unwrap(), copy);
    }

    /// Counts rewinds so a test can see how often the backend is restarted.
    struct EmptyStream {
        rewinds: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl FrameDecoder for EmptyStream {
        fn frame_rate(&self) -> Option<f64> {
            None
        }
        fn decode_next(&mut self) -> Result<Option<Frame>, Error> {
            Ok(None)
        }
        fn rewind(&mut self) -> Result<(), Error> {
            self.rewinds.set(self.rewinds.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn empty_stream_is_released_instead_of_respun() {
        let rewinds = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut src = VideoSource::with_decoder(Box::new(EmptyStream {
            rewinds: rewinds.clone(),
        }));
        for _ in 0..30 {
            assert!(!src.read_next_frame());
        }
        assert_eq!(rewinds.get(), 1);
        assert!(!src.is_open());
        assert!(src.current_frame().is_none());
    }

    #[test]
    fn release_drops_frames() {
        let mut src = source(2, None);
        src.read_next_frame();
        src.release();
        assert!(src.current_frame().is_none());
        assert!(!src.read_next_frame());
    }
}
