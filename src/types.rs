// Core value types shared by the source, mapper, overlay and player.
// A Frame is an owned pixel buffer: cloning it copies the bytes, so a frame
// handed to the overlay can never alias the one the source keeps.

/// Byte order of the three channels inside a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Blue, green, red. What the ffmpeg backend produces (`bgr24`).
    Bgr,
    /// Red, green, blue. What the window expects.
    Rgb,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,        // pixels per row
    pub height: usize,       // rows
    pub order: ChannelOrder, // channel order of `data`
    pub data: Vec<u8>,       // width * height * 3 bytes, row-major
}

impl Frame {
    /// A frame filled with one colour, given in RGB and stored in `order`.
    pub fn filled(width: usize, height: usize, order: ChannelOrder, rgb: [u8; 3]) -> Self {
        let px = match order {
            ChannelOrder::Rgb => rgb,
            ChannelOrder::Bgr => [rgb[2], rgb[1], rgb[0]],
        };
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&px);
        }
        Self { width, height, order, data }
    }

    /// Wrap an `image` RGB buffer without copying.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (w, h) = img.dimensions();
        Self {
            width: w as usize,
            height: h as usize,
            order: ChannelOrder::Rgb,
            data: img.into_raw(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Fresh copy of this frame in RGB order. Never touches `self`.
    pub fn to_rgb(&self) -> Frame {
        let mut data = self.data.clone();
        if self.order == ChannelOrder::Bgr {
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            order: ChannelOrder::Rgb,
            data,
        }
    }

    /// Pixel at (x,y) as RGB regardless of storage order.
    pub fn rgb_at(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        // a hand-built frame may carry fewer bytes than width * height * 3
        let px = self.data.get(i..i + 3)?;
        Some(match self.order {
            ChannelOrder::Rgb => [px[0], px[1], px[2]],
            ChannelOrder::Bgr => [px[2], px[1], px[0]],
        })
    }

    /// Write an RGB colour at (x,y); out-of-bounds writes are dropped.
    #[inline]
    pub fn put_rgb(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 3;
        let px = match self.order {
            ChannelOrder::Rgb => rgb,
            ChannelOrder::Bgr => [rgb[2], rgb[1], rgb[0]],
        };
        if let Some(dst) = self.data.get_mut(i..i + 3) {
            dst.copy_from_slice(&px);
        }
    }

    /// Pack into 0x00RRGGBB words, the layout minifb draws.
    pub fn to_0rgb(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(3) {
            let (r, g, b) = match self.order {
                ChannelOrder::Rgb => (px[0], px[1], px[2]),
                ChannelOrder::Bgr => (px[2], px[1], px[0]),
            };
            out.push(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
        }
        out
    }
}

/// A marked position in frame-space pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size of the on-screen surface at the moment of a click or redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero in either axis means layout has not happened yet.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
