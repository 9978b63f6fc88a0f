// Orchestration: owns the frame source, the play/pause + point state and
// the outbound event sender. Everything runs on the caller's thread; the
// shell drives it with one `Tick` per frame period and discrete clicks/keys.

use std::path::Path;
use std::sync::mpsc::Sender;

use tracing::{debug, info, trace, warn};

use crate::counter::Counter;
use crate::events::{Command, Event};
use crate::mapper::map_to_frame;
use crate::overlay::{self, MarkerStyle};
use crate::playback::{ClearOutcome, Playback, PlaybackState};
use crate::source::VideoSource;
use crate::types::{DisplaySize, Point};

pub const STATUS_NOT_LOADED: &str = "Video not loaded";

pub struct Player {
    source: VideoSource,
    state: PlaybackState,
    style: MarkerStyle,
    counter: Counter,
    events: Sender<Event>,
}

impl Player {
    pub fn new(events: Sender<Event>, style: MarkerStyle) -> Self {
        Self::with_source(VideoSource::new(), events, style)
    }

    /// Start from a source that is already open (e.g. an in-memory clip).
    pub fn with_source(source: VideoSource, events: Sender<Event>, style: MarkerStyle) -> Self {
        Self {
            source,
            state: PlaybackState::new(),
            style,
            counter: Counter::new(events.clone()),
            events,
        }
    }

    pub fn source(&self) -> &VideoSource {
        &self.source
    }

    pub fn playback(&self) -> Playback {
        self.state.playback()
    }

    pub fn point(&self) -> Option<Point> {
        self.state.point()
    }

    pub fn count(&self) -> i64 {
        self.counter.count()
    }

    /// Tick rate the shell should use.
    pub fn frame_rate(&self) -> f64 {
        self.source.frame_rate()
    }

    /// Apply one inbound command.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Load(path) => {
                self.load(path);
            }
            Command::Tick(display) => {
                self.tick(display);
            }
            Command::Click { x, y, display } => {
                self.on_click(x, y, display);
            }
            Command::TogglePlayback => {
                self.toggle_playback();
            }
            Command::ClearPoint => {
                self.clear_point();
            }
            Command::Increment => {
                self.counter.increment();
            }
            Command::Decrement => {
                self.counter.decrement();
            }
            Command::ResetCount => {
                self.counter.reset();
            }
        }
    }

    /// Open a new video. On success playback restarts and the point is dropped.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !self.source.open(path) {
            warn!(path = %path.display(), "video not loaded");
            self.emit(Event::StatusMessage(STATUS_NOT_LOADED.to_string()));
            return false;
        }
        self.state.set_playback(Playback::Playing);
        self.state.clear_point();
        info!(path = %path.display(), fps = self.source.frame_rate(), "playing");
        self.emit(Event::PlaybackChanged(Playback::Playing));
        true
    }

    /// One redraw cycle. Returns whether a frame was emitted.
    pub fn tick(&mut self, display: DisplaySize) -> bool {
        // 1) Advance only while playing. False means loop restart or a read
        //    error; either way we still show whatever frame we hold.
        if self.state.playback().is_playing() {
            let advanced = self.source.read_next_frame();
            trace!(advanced, "tick");
        }

        // 2) Nothing read yet (or the source is gone): this tick shows nothing.
        let Some(frame) = self.source.current_frame() else {
            return false;
        };

        // 3) Composite the marker on an RGB copy and hand it to the window.
        let (dw, dh) = (display.width, display.height);
        trace!(display_width = dw, display_height = dh, "compositing frame");
        let composited = overlay::render(&frame, self.state.point(), &self.style);
        self.emit(Event::FrameReady(composited));
        true
    }

    /// Convert a click in display space and make it the marked point.
    /// Ignored while no frame has been read, since the frame size is unknown.
    pub fn on_click(&mut self, ux: i32, uy: i32, display: DisplaySize) -> Option<Point> {
        let Some(frame_size) = self.source.frame_size() else {
            debug!(ux, uy, "click ignored, no frame yet");
            return None;
        };
        // 1) Window pixels -> frame pixels (window stretches the frame).
        let point = map_to_frame((ux, uy), display, frame_size);
        debug!(ux, uy, fx = point.x, fy = point.y, "click mapped");

        // 2) Replace the previous point; the next tick draws it.
        self.set_point(point.x, point.y);
        self.emit(Event::CoordinatesChanged { x: point.x, y: point.y });
        Some(point)
    }

    pub fn set_point(&mut self, fx: i32, fy: i32) {
        self.state.set_point(Point::new(fx, fy));
    }

    pub fn clear_point(&mut self) -> ClearOutcome {
        let outcome = self.state.clear_point();
        debug!(?outcome, "clear point");
        self.emit(Event::StatusMessage(outcome.message().to_string()));
        outcome
    }

    pub fn toggle_playback(&mut self) -> Playback {
        let playback = self.state.toggle();
        debug!(?playback, "playback toggled");
        self.emit(Event::PlaybackChanged(playback));
        playback
    }

    pub fn release(&mut self) {
        self.source.release();
    }

    fn emit(&self, event: Event) {
        if self.events.send(event).is_err() {
            trace!("event receiver dropped");
        }
    }
}
