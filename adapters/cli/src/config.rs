//! Layered session configuration: TOML file first, command-line overrides on top.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use times_table_core::{CellCoord, GridSize};
use times_table_rendering::BoardLayout;
use times_table_system_clock::DEFAULT_TARGET_FPS;
use times_table_world::Config;

/// Contents of the optional configuration file. Every key may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    #[serde(default)]
    board: BoardSection,
    #[serde(default)]
    clock: ClockSection,
    #[serde(default)]
    window: WindowSection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoardSection {
    size: Option<u32>,
    start: Option<[u32; 2]>,
    step_scale: Option<f32>,
    seed: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClockSection {
    target_fps: Option<u32>,
    virtual_time: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowSection {
    size: Option<u32>,
    gameplay_offset: Option<u32>,
}

/// Values supplied on the command line; they win over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) target_fps: Option<u32>,
    pub(crate) virtual_time: bool,
}

/// Fully resolved settings for one session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) world: Config,
    pub(crate) layout: BoardLayout,
    pub(crate) target_fps: u32,
    pub(crate) virtual_time: bool,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub(crate) fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Merges the file with `overrides` and validates the result. A seed that
    /// neither source provides is drawn at random.
    pub(crate) fn resolve(&self, overrides: Overrides) -> Result<Settings> {
        let defaults = Config::default();
        let grid_size = self
            .board
            .size
            .map_or(defaults.grid_size(), GridSize::new);
        let start_cell = self
            .board
            .start
            .map_or(defaults.start_cell(), |[column, row]| {
                CellCoord::new(column, row)
            });
        let step_scale = self.board.step_scale.unwrap_or(defaults.step_scale());
        let seed = overrides
            .seed
            .or(self.board.seed)
            .unwrap_or_else(rand::random);
        debug!("token seed {seed}");

        let world = Config::new(grid_size, start_cell, step_scale, seed)
            .context("invalid [board] settings")?;
        let layout = BoardLayout::new(
            grid_size,
            self.window
                .size
                .unwrap_or(BoardLayout::DEFAULT_WINDOW_SIZE),
            self.window
                .gameplay_offset
                .unwrap_or(BoardLayout::DEFAULT_GAMEPLAY_OFFSET),
        )
        .context("invalid [window] settings")?;

        Ok(Settings {
            world,
            layout,
            target_fps: overrides
                .target_fps
                .or(self.clock.target_fps)
                .unwrap_or(DEFAULT_TARGET_FPS),
            virtual_time: overrides.virtual_time || self.clock.virtual_time.unwrap_or(false),
        })
    }
}
