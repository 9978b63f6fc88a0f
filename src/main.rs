// Frame Picker: plays a video in a window and reports where you click, in
// the video's own pixel coordinates.
// • Left click: mark a point (one at a time, drawn as a red dot with a white ring).
// • Space: play/pause. C: clear the point. Up/Down/R: the little counter.
// • ESC quits.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use frame_picker::config::{self, AppConfig, DEFAULT_CONFIG_PATH};
use frame_picker::events::{self, Command, Event};
use frame_picker::shell::{Shell, StatusLine};
use frame_picker::{Error, Player, logging};

#[derive(Parser)]
#[command(name = "frame-picker")]
#[command(about = "Pick frame-space coordinates on a looping video", long_about = None)]
struct Cli {
    /// Video to play (file path or `camera:<index>`); defaults to the configured one
    video: Option<PathBuf>,

    /// JSON config file (default: config/configuration.json next to the binary)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let base = config::install_dir();

    let cfg = match &cli.config {
        Some(path) => AppConfig::load(path, true)?,
        None => AppConfig::load(&base.join(DEFAULT_CONFIG_PATH), false)?,
    };
    logging::init(&cfg.log_level);

    let (tx, rx) = events::channel();
    let mut player = Player::new(tx, cfg.marker.clone());

    // A missing video is not fatal: the window opens and stays empty.
    // An explicit path is taken as given; the configured one lives next to the binary.
    let video = match cli.video {
        Some(path) => path,
        None => config::resolve(&base, &cfg.video_path),
    };
    player.handle(Command::Load(video));

    let mut shell = Shell::new(&cfg.window_title, cfg.window_width, cfg.window_height)?;
    shell.set_tick_rate(player.frame_rate());
    let mut status = StatusLine::default();

    /* ------------------------------ Main loop ------------------------------ */
    while shell.is_open() && !shell.esc_pressed() {
        let display = shell.display_size();

        // 1) Input first so a click lands on the frame the user is looking at.
        for command in shell.poll_commands(display) {
            player.handle(command);
        }

        // 2) One tick: advance (if playing) and composite the marker.
        player.handle(Command::Tick(display));

        // 3) Drain what the core said; keep only the newest frame.
        let mut latest = None;
        for event in rx.try_iter() {
            match event {
                Event::FrameReady(frame) => latest = Some(frame),
                other => status.apply(other),
            }
        }

        // 4) Present (this also sleeps to the video's frame rate).
        match latest {
            Some(frame) => shell.present(&frame)?,
            None => shell.idle(),
        }
        if status.take_dirty() {
            shell.set_title(&status.render(&cfg.window_title));
        }
    }

    player.release();
    info!("bye");
    Ok(())
}
