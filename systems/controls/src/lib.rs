#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system translating player input into world commands.

use times_table_core::{CellCoord, Command, Key};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Key pressed on this frame, if any.
    pub key: Option<Key>,
    /// Indicates whether the window asked to close on this frame.
    pub quit_signal: bool,
    /// Board cell under the cursor while the primary button is held.
    pub paint_cell: Option<CellCoord>,
    /// Board cell under the cursor while the secondary button is held.
    pub erase_cell: Option<CellCoord>,
}

impl ControlInput {
    /// Creates an input descriptor carrying a single key press.
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self {
            key: Some(key),
            quit_signal: false,
            paint_cell: None,
            erase_cell: None,
        }
    }

    /// Creates an input descriptor carrying a window close request.
    #[must_use]
    pub const fn quit() -> Self {
        Self {
            key: None,
            quit_signal: true,
            paint_cell: None,
            erase_cell: None,
        }
    }
}

/// Controls system mapping keys and pointer buttons onto commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Controls;

impl Controls {
    /// Creates a new controls system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits the commands requested by the provided frame input.
    ///
    /// Board edits come first so that a wall painted on the same frame as a
    /// step is already in place when the step resolves.
    pub fn handle(&self, input: ControlInput, out: &mut Vec<Command>) {
        if let Some(cell) = input.paint_cell {
            out.push(Command::PaintWall { cell });
        }
        if let Some(cell) = input.erase_cell {
            out.push(Command::EraseCell { cell });
        }

        if input.quit_signal {
            out.push(Command::Quit);
            return;
        }

        let Some(key) = input.key else {
            return;
        };
        if let Some(direction) = key.direction() {
            out.push(Command::SteerPlayer { direction });
            return;
        }
        match key {
            Key::Pause => out.push(Command::TogglePause),
            Key::ClearWalls => out.push(Command::ClearWalls),
            Key::Escape => out.push(Command::Quit),
            Key::Up | Key::Down | Key::Left | Key::Right => {}
        }
    }
}
