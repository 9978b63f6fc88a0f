// Display-space → frame-space conversion.
// The window stretches the frame to fill itself (no letterboxing), so each
// axis is an independent linear rescale.

use crate::types::{DisplaySize, Point};

/// Map a click at `(ux, uy)` on a surface of size `display` onto a frame of
/// size `frame` (width, height).
///
/// `display` must be non-zero in both axes. That is not checked here: the
/// shell drops clicks until the window has a size.
pub fn map_to_frame(click: (i32, i32), display: DisplaySize, frame: (usize, usize)) -> Point {
    let (ux, uy) = click;
    let (fw, fh) = frame;
    let fx = (ux as f64 * fw as f64 / display.width as f64).round();
    let fy = (uy as f64 * fh as f64 / display.height as f64).round();
    Point::new(fx as i32, fy as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_size_display_maps_center_to_center() {
        let p = map_to_frame((320, 180), DisplaySize::new(640, 360), (1280, 720));
        assert_eq!(p, Point::new(640, 360));
    }

    #[test]
    fn same_size_is_identity() {
        let p = map_to_frame((17, 93), DisplaySize::new(200, 100), (200, 100));
        assert_eq!(p, Point::new(17, 93));
    }

    #[test]
    fn axes_scale_independently() {
        // wide display over a square frame
        let p = map_to_frame((400, 100), DisplaySize::new(800, 200), (100, 100));
        assert_eq!(p, Point::new(50, 50));
    }

    #[test]
    fn rounds_to_nearest() {
        // 1 * 3 / 2 = 1.5 -> 2, 1 * 5 / 3 = 1.67 -> 2, 1 * 4 / 3 = 1.33 -> 1
        assert_eq!(map_to_frame((1, 1), DisplaySize::new(2, 3), (3, 5)).x, 2);
        assert_eq!(map_to_frame((1, 1), DisplaySize::new(2, 3), (3, 5)).y, 2);
        assert_eq!(map_to_frame((1, 1), DisplaySize::new(3, 3), (4, 4)), Point::new(1, 1));
    }

    #[test]
    fn stays_inside_frame_for_clicks_inside_display() {
        let sizes = [(1u32, 1u32), (7, 3), (640, 360), (1920, 1080), (333, 777)];
        let frames = [(1usize, 1usize), (5, 9), (1280, 720), (64, 48), (4000, 3000)];
        for &(dw, dh) in &sizes {
            for &(fw, fh) in &frames {
                let display = DisplaySize::new(dw, dh);
                let step_x = (dw / 13).max(1) as usize;
                let step_y = (dh / 11).max(1) as usize;
                for ux in (0..dw as i32).step_by(step_x) {
                    for uy in (0..dh as i32).step_by(step_y) {
                        let p = map_to_frame((ux, uy), display, (fw, fh));
                        assert!(p.x >= 0 && p.x <= fw as i32, "{p:?} outside {fw}x{fh}");
                        assert!(p.y >= 0 && p.y <= fh as i32, "{p:?} outside {fw}x{fh}");
                    }
                }
            }
        }
    }

    #[test]
    fn monotonic_in_x() {
        let display = DisplaySize::new(300, 200);
        let mut last = i32::MIN;
        for ux in 0..300 {
            let p = map_to_frame((ux, 50), display, (1024, 768));
            assert!(p.x >= last);
            last = p.x;
        }
    }
}
