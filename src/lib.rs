//! Looping video viewer that maps clicks on the window to source-frame pixels
//! and keeps a single marker drawn on the picture.
//!
//! The core (`source`, `mapper`, `overlay`, `playback`, `player`) has no
//! window dependency; `shell` is the minifb front end that feeds it
//! [`events::Command`]s and shows the [`events::Event`]s it emits.

pub mod clip;
pub mod config;
pub mod counter;
pub mod error;
pub mod events;
pub mod ffmpeg;
pub mod logging;
pub mod mapper;
pub mod overlay;
pub mod playback;
pub mod player;
pub mod shell;
pub mod source;
pub mod types;

#[cfg(feature = "camera")]
pub mod camera;

pub use error::Error;
pub use player::Player;
pub use types::{ChannelOrder, DisplaySize, Frame, Point};
