// Window shell: the on-screen surface plus input polling.
// Visual: a resizable window showing the video stretched to fill it; the
// title bar carries play state, the last picked coordinates, status and count.
// Left click marks a point, Space pauses, C clears, Up/Down/R drive the counter.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

use crate::error::Error;
use crate::events::{Command, Event};
use crate::playback::Playback;
use crate::types::{DisplaySize, Frame};

pub struct Shell {
    window: Window,
    mouse_was_down: bool,
}

impl Shell {
    /// Open a resizable window; frames are stretched to its current size.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        let window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self {
            window,
            mouse_was_down: false,
        })
    }

    /// Pace `present`/`idle` to the video's frame rate.
    pub fn set_tick_rate(&mut self, fps: f64) {
        let fps = fps.round().max(1.0) as usize;
        self.window.set_target_fps(fps);
    }

    /// Push one RGB frame to the screen.
    pub fn present(&mut self, frame: &Frame) -> Result<(), Error> {
        self.window
            .update_with_buffer(&frame.to_0rgb(), frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Keep the window responsive on ticks without a frame.
    pub fn idle(&mut self) {
        self.window.update();
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Current size of the drawing surface in window pixels.
    pub fn display_size(&self) -> DisplaySize {
        let (w, h) = self.window.get_size();
        DisplaySize::new(w as u32, h as u32)
    }

    /// Position of a fresh left click (press edge) inside the window.
    fn clicked_at(&mut self) -> Option<(i32, i32)> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = down && !self.mouse_was_down;
        self.mouse_was_down = down;
        if !pressed {
            return None;
        }
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32))
    }

    fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Commands for this iteration's input. Clicks are dropped until the
    /// window has a non-zero size.
    pub fn poll_commands(&mut self, display: DisplaySize) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some((x, y)) = self.clicked_at() {
            if !display.is_empty() {
                commands.push(Command::Click { x, y, display });
            }
        }
        let keys = [
            (Key::Space, Command::TogglePlayback),
            (Key::C, Command::ClearPoint),
            (Key::Up, Command::Increment),
            (Key::Down, Command::Decrement),
            (Key::R, Command::ResetCount),
        ];
        for (key, command) in keys {
            if self.pressed_once(key) {
                commands.push(command);
            }
        }
        commands
    }
}

/// What the title bar shows; rebuilt from events.
#[derive(Debug, Default)]
pub struct StatusLine {
    playback: Option<Playback>,
    coords: Option<(i32, i32)>,
    status: Option<String>,
    count: i64,
    dirty: bool,
}

impl StatusLine {
    /// Fold a non-frame event into the line.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::FrameReady(_) => return,
            Event::CoordinatesChanged { x, y } => self.coords = Some((x, y)),
            Event::StatusMessage(text) => self.status = Some(text),
            Event::PlaybackChanged(p) => self.playback = Some(p),
            Event::CountChanged(n) => self.count = n,
        }
        self.dirty = true;
    }

    /// True once after any change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn render(&self, title: &str) -> String {
        let mut line = title.to_string();
        match self.playback {
            Some(Playback::Playing) => line.push_str(" | PLAYING"),
            Some(Playback::Paused) => line.push_str(" | PAUSED"),
            None => {}
        }
        if let Some((x, y)) = self.coords {
            line.push_str(&format!(" | X: {x}, Y: {y}"));
        }
        if let Some(status) = &self.status {
            line.push_str(&format!(" | {status}"));
        }
        line.push_str(&format!(" | Count: {}", self.count));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_collects_events() {
        let mut line = StatusLine::default();
        assert!(!line.take_dirty());
        assert_eq!(line.render("Picker"), "Picker | Count: 0");

        line.apply(Event::PlaybackChanged(Playback::Paused));
        line.apply(Event::CoordinatesChanged { x: 640, y: 360 });
        line.apply(Event::StatusMessage("Point cleared".into()));
        line.apply(Event::CountChanged(3));
        assert!(line.take_dirty());
        assert!(!line.take_dirty());
        assert_eq!(
            line.render("Picker"),
            "Picker | PAUSED | X: 640, Y: 360 | Point cleared | Count: 3"
        );
    }

    #[test]
    fn frames_do_not_dirty_the_line() {
        let mut line = StatusLine::default();
        line.apply(Event::FrameReady(Frame::filled(
            1,
            1,
            crate::types::ChannelOrder::Rgb,
            [0, 0, 0],
        )));
        assert!(!line.take_dirty());
    }
}
