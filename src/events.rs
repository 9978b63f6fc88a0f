// Messages between the window shell and the core.
// Commands flow in through `Player::handle`; events flow out over an
// mpsc channel whose sender is handed to the core at construction.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::playback::Playback;
use crate::types::{DisplaySize, Frame};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Load(PathBuf),
    Tick(DisplaySize),
    Click { x: i32, y: i32, display: DisplaySize },
    TogglePlayback,
    ClearPoint,
    Increment,
    Decrement,
    ResetCount,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Composited RGB frame ready to show.
    FrameReady(Frame),
    /// Frame-space position of the latest click.
    CoordinatesChanged { x: i32, y: i32 },
    StatusMessage(String),
    PlaybackChanged(Playback),
    CountChanged(i64),
}

/// Create the outbound channel.
pub fn channel() -> (Sender<Event>, Receiver<Event>) {
    mpsc::channel()
}
