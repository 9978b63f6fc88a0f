// In-memory clips: every frame decoded up front, cursor walks the list.
// Animated GIF/APNG and still images (a one-frame clip) load through `image`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, DynamicImage};

use crate::error::Error;
use crate::source::FrameDecoder;
use crate::types::Frame;

pub struct ClipDecoder {
    frames: Vec<Frame>,
    cursor: usize,
    fps: Option<f64>,
}

impl ClipDecoder {
    pub fn new(frames: Vec<Frame>, fps: Option<f64>) -> Self {
        Self { frames, cursor: 0, fps }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn open_gif(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        let frames = GifDecoder::new(reader)
            .and_then(|d| d.into_frames().collect_frames())
            .map_err(|e| Error::decode(path, e))?;
        Self::from_animation(path, frames)
    }

    /// APNG if the file is animated, otherwise a still image.
    pub fn open_png(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        let decoder = PngDecoder::new(reader).map_err(|e| Error::decode(path, e))?;
        if !decoder.is_apng().map_err(|e| Error::decode(path, e))? {
            return Self::open_still(path);
        }
        let frames = decoder
            .apng()
            .and_then(|d| d.into_frames().collect_frames())
            .map_err(|e| Error::decode(path, e))?;
        Self::from_animation(path, frames)
    }

    pub fn open_still(path: &Path) -> Result<Self, Error> {
        let img = image::open(path).map_err(|e| Error::decode(path, e))?;
        Ok(Self::new(vec![Frame::from_rgb_image(img.to_rgb8())], None))
    }

    fn from_animation(path: &Path, frames: Vec<image::Frame>) -> Result<Self, Error> {
        if frames.is_empty() {
            return Err(Error::decode(path, "animation has no frames"));
        }
        let fps = delay_to_fps(frames[0].delay());
        let frames = frames
            .into_iter()
            .map(|f| Frame::from_rgb_image(DynamicImage::ImageRgba8(f.into_buffer()).to_rgb8()))
            .collect();
        Ok(Self::new(frames, fps))
    }
}

/// Frames per second implied by one frame's display delay; none for zero delay.
fn delay_to_fps(delay: image::Delay) -> Option<f64> {
    let (numer, denom) = delay.numer_denom_ms();
    if numer == 0 || denom == 0 {
        return None;
    }
    Some(1000.0 * denom as f64 / numer as f64)
}

impl FrameDecoder for ClipDecoder {
    fn frame_rate(&self) -> Option<f64> {
        self.fps
    }

    fn decode_next(&mut self) -> Result<Option<Frame>, Error> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> Result<(), Error> {
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelOrder;
    use image::Delay;

    #[test]
    fn walks_then_reports_end() {
        let frames = vec![
            Frame::filled(1, 1, ChannelOrder::Rgb, [1, 1, 1]),
            Frame::filled(1, 1, ChannelOrder::Rgb, [2, 2, 2]),
        ];
        let mut clip = ClipDecoder::new(frames.clone(), None);
        assert_eq!(clip.len(), 2);
        assert_eq!(clip.decode_next().unwrap(), Some(frames[0].clone()));
        assert_eq!(clip.decode_next().unwrap(), Some(frames[1].clone()));
        assert_eq!(clip.decode_next().unwrap(), None);
        assert_eq!(clip.decode_next().unwrap(), None);
        clip.rewind().unwrap();
        assert_eq!(clip.decode_next().unwrap(), Some(frames[0].clone()));
    }

    #[test]
    fn empty_clip_ends_immediately() {
        let mut clip = ClipDecoder::new(Vec::new(), Some(10.0));
        assert!(clip.is_empty());
        assert_eq!(clip.decode_next().unwrap(), None);
    }

    #[test]
    fn delay_converts_to_rate() {
        assert_eq!(delay_to_fps(Delay::from_numer_denom_ms(40, 1)), Some(25.0));
        assert_eq!(delay_to_fps(Delay::from_numer_denom_ms(0, 1)), None);
    }

    #[test]
    fn unreadable_gif_is_a_decode_error() {
        let path = std::env::temp_dir().join(format!("frame-picker-bad-{}.gif", std::process::id()));
        std::fs::write(&path, b"not a gif").unwrap();
        let res = ClipDecoder::open_gif(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(res, Err(Error::Decode { .. })));
    }
}
