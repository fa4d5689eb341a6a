#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Times Table experience.

mod config;
mod scene;
mod script;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use times_table_rendering::{Presentation, RenderingBackend};
use times_table_system_clock::{FrameClock, SteppedTimeSource, SystemTimeSource, TimeSource};
use times_table_world::{query, World};

use crate::{
    config::{FileConfig, Overrides},
    script::{ScriptedBackend, DEFAULT_SCRIPT},
    session::Session,
};

const WINDOW_TITLE: &str = "Times Table";
const VIRTUAL_CLOCK_RESOLUTION: Duration = Duration::from_micros(100);

/// Multiplication tile game driven by scripted input.
#[derive(Debug, Parser)]
#[command(name = "times-table", author, version, about)]
struct Cli {
    /// TOML file with [board], [clock] and [window] tables
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for token placement; drawn at random when absent
    #[arg(short, long)]
    seed: Option<u64>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Whitespace-separated input steps, one frame each (e.g. "pause right*3 lmb:300:300 quit")
    #[arg(long, value_name = "STEPS")]
    script: Option<String>,

    /// Print every frame as a text board
    #[arg(long)]
    show_frames: bool,

    /// Pace frames with a virtual clock instead of sleeping
    #[arg(long)]
    virtual_time: bool,
}

fn play<T: TimeSource>(
    session: &mut Session,
    clock: FrameClock<T>,
    cli: &Cli,
    presentation: Presentation,
) -> Result<()> {
    let frames = script::parse_script(cli.script.as_deref().unwrap_or(DEFAULT_SCRIPT))
        .context("invalid --script")?;
    ScriptedBackend::new(frames, clock, cli.show_frames)
        .run(presentation, |dt, input, scene| session.frame(dt, input, scene))
}

/// Entry point for the Times Table command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = file.resolve(Overrides {
        seed: cli.seed,
        target_fps: cli.fps,
        virtual_time: cli.virtual_time,
    })?;

    let world = World::new(settings.world);
    println!("{}", query::welcome_banner(&world));

    let mut session = Session::new(world, settings.layout);
    let presentation = Presentation::new(WINDOW_TITLE, settings.layout, session.scene());
    if settings.virtual_time {
        let source = SteppedTimeSource::new(VIRTUAL_CLOCK_RESOLUTION)?;
        let clock = FrameClock::new(source, settings.target_fps)?;
        play(&mut session, clock, &cli, presentation)?;
    } else {
        let clock = FrameClock::new(SystemTimeSource::new(), settings.target_fps)?;
        play(&mut session, clock, &cli, presentation)?;
    }

    println!("{}", session.summary());
    Ok(())
}
