// Live camera backend (feature `camera`). Opens a device through nokhwa and
// hands out RGB frames. A camera never ends, so rewinding does nothing.

use crate::error::Error;
use crate::source::FrameDecoder;
use crate::types::{ChannelOrder, Frame};

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

pub struct CameraDecoder {
    cam: Camera,
    fps: u32,
}

impl CameraDecoder {
    /// Open camera `index` close to the requested resolution and start streaming.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let fps = cam.frame_rate();
        Ok(Self { cam, fps })
    }
}

impl FrameDecoder for CameraDecoder {
    fn frame_rate(&self) -> Option<f64> {
        (self.fps > 0).then_some(self.fps as f64)
    }

    fn decode_next(&mut self) -> Result<Option<Frame>, Error> {
        // blocks until the device delivers
        let raw = self
            .cam
            .frame()
            .map_err(|e| Error::FrameRead(format!("Fetch frame: {e}")))?;
        let rgb_img = raw
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::FrameRead(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let mut data = Vec::with_capacity((w as usize) * (h as usize) * 3);
        for pixel in rgb_img.pixels() {
            data.extend_from_slice(&[pixel[0], pixel[1], pixel[2]]);
        }

        Ok(Some(Frame {
            width: w as usize,
            height: h as usize,
            order: ChannelOrder::Rgb,
            data,
        }))
    }

    fn rewind(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl Drop for CameraDecoder {
    fn drop(&mut self) {
        let _ = self.cam.stop_stream();
    }
}
