// Marker overlay: a filled disc with a thin ring around it, drawn on an RGB
// copy of the frame. The frame passed in is only read.

use serde::Deserialize;

use crate::types::{Frame, Point};

/// Colours (RGB) and radii of the point marker.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerStyle {
    pub fill: [u8; 3],
    pub outline: [u8; 3],
    pub fill_radius: i32,
    pub outline_radius: i32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill: [255, 0, 0],
            outline: [255, 255, 255],
            fill_radius: 8,
            outline_radius: 10,
        }
    }
}

/// Convert `frame` to RGB and, if there is a point, draw the marker on it.
pub fn render(frame: &Frame, point: Option<Point>, style: &MarkerStyle) -> Frame {
    // 1) Own RGB copy; the caller's frame keeps its bytes and channel order.
    let mut out = frame.to_rgb();
    let Some(p) = point else {
        return out;
    };

    // 2) Disc first, then the ring, so the ring stays visible where they meet.
    fill_circle(&mut out, p.x, p.y, style.fill_radius, style.fill);
    stroke_circle(&mut out, p.x, p.y, style.outline_radius, style.outline);
    out
}

/// Solid disc: every pixel within `r` of the centre.
fn fill_circle(fb: &mut Frame, cx: i32, cy: i32, r: i32, rgb: [u8; 3]) {
    if r < 0 {
        return;
    }
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                fb.put_rgb(cx + dx, cy + dy, rgb);
            }
        }
    }
}

/// One-pixel ring using the midpoint circle walk over one octant, mirrored.
fn stroke_circle(fb: &mut Frame, cx: i32, cy: i32, r: i32, rgb: [u8; 3]) {
    if r < 0 {
        return;
    }
    // 1) Start at (r, 0) and walk until the octant boundary x == y.
    let (mut x, mut y) = (r, 0);
    let mut err = 1 - r;
    while x >= y {
        // 2) Plot the eight symmetric points of this step.
        for (px, py) in [
            (x, y), (y, x), (-y, x), (-x, y),
            (-x, -y), (-y, -x), (y, -x), (x, -y),
        ] {
            fb.put_rgb(cx + px, cy + py, rgb);
        }
        // 3) Step y; step x inward once the midpoint falls outside.
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}
