#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Times Table.
//!
//! The world owns the board, the six number tokens, the player and the
//! session tally. Every mutation arrives as a [`Command`] through [`apply`],
//! and every observable consequence leaves as an [`Event`].

mod grid;
mod player;
mod tokens;

pub use grid::Grid;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use times_table_core::{
    CellCoord, CellKind, Collision, Command, Event, GridSize, PlayerPosition, RunState,
    ScoreMilestone, TOKEN_COUNT, WELCOME_BANNER,
};

use self::{player::Player, tokens::TokenSet};

const DEFAULT_GRID_SIZE: GridSize = GridSize::new(15);
const DEFAULT_START_CELL: CellCoord = CellCoord::new(7, 7);
const DEFAULT_STEP_SCALE: f32 = 1.0;
const DEFAULT_RNG_SEED: u64 = 0x7ab1_1c2a_9e3d_5f01;

const PAIR_LEN: usize = 2;

/// Construction parameters for a [`World`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    grid_size: GridSize,
    start_cell: CellCoord,
    step_scale: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a validated configuration.
    pub fn new(
        grid_size: GridSize,
        start_cell: CellCoord,
        step_scale: f32,
        rng_seed: u64,
    ) -> Result<Self, ConfigError> {
        if grid_size.get() == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if grid_size.cell_count() < TOKEN_COUNT {
            return Err(ConfigError::GridTooSmall {
                size: grid_size.get(),
                required: TOKEN_COUNT,
            });
        }
        if !grid_size.contains(start_cell) {
            return Err(ConfigError::StartOutsideGrid {
                column: start_cell.column(),
                row: start_cell.row(),
                size: grid_size.get(),
            });
        }
        if !step_scale.is_finite() || step_scale <= 0.0 {
            return Err(ConfigError::InvalidStepScale(step_scale));
        }

        Ok(Self {
            grid_size,
            start_cell,
            step_scale,
            rng_seed,
        })
    }

    /// Returns a copy of the configuration seeded with `rng_seed`.
    #[must_use]
    pub const fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Side length of the board.
    #[must_use]
    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Cell the player returns to at the start of every round.
    #[must_use]
    pub const fn start_cell(&self) -> CellCoord {
        self.start_cell
    }

    /// Distance covered by a single step, in cells.
    #[must_use]
    pub const fn step_scale(&self) -> f32 {
        self.step_scale
    }

    /// Seed feeding token placement.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            start_cell: DEFAULT_START_CELL,
            step_scale: DEFAULT_STEP_SCALE,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Reasons a [`Config`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board has no cells.
    #[error("grid size must be positive")]
    EmptyGrid,
    /// The board cannot hold every token.
    #[error("a {size}x{size} board cannot hold {required} tokens")]
    GridTooSmall {
        /// Requested side length.
        size: u32,
        /// Minimum number of cells needed.
        required: usize,
    },
    /// The start cell does not lie on the board.
    #[error("start cell ({column}, {row}) lies outside the {size}x{size} board")]
    StartOutsideGrid {
        /// Requested start column.
        column: u32,
        /// Requested start row.
        row: u32,
        /// Requested side length.
        size: u32,
    },
    /// The step scale is zero, negative or not finite.
    #[error("step scale must be a positive finite number (received {0})")]
    InvalidStepScale(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tally {
    expected_product: u32,
    picked: [u32; PAIR_LEN],
    active_index: usize,
    score: i32,
}

impl Tally {
    const fn fresh(expected_product: u32) -> Self {
        Self {
            expected_product,
            picked: [0; PAIR_LEN],
            active_index: 0,
            score: 0,
        }
    }
}

/// Represents the authoritative Times Table world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    grid: Grid,
    tokens: TokenSet,
    player: Player,
    run_state: RunState,
    tally: Tally,
    rng: ChaCha8Rng,
    rounds_started: u32,
}

impl World {
    /// Creates a world with its first round laid out and paused.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(config.grid_size),
            tokens: TokenSet::new(),
            player: Player::at(config.start_cell),
            run_state: RunState::Paused,
            tally: Tally::fresh(0),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            rounds_started: 0,
            config,
        };
        let mut startup_events = Vec::new();
        world.setup_round(&mut startup_events);
        world
    }

    fn transition(&mut self, to: RunState, out_events: &mut Vec<Event>) {
        let from = self.run_state;
        if from == to {
            return;
        }
        self.run_state = to;
        debug!("run state {from:?} -> {to:?}");
        out_events.push(Event::RunStateChanged { from, to });
    }

    fn setup_round(&mut self, out_events: &mut Vec<Event>) {
        self.player.reset(self.config.start_cell);
        self.grid.reset_preserving_walls();
        self.transition(RunState::Paused, out_events);

        let placed = self.tokens.spawn_all(&mut self.grid, &mut self.rng);
        let expected_product = self.tokens.target_product();
        self.tally = Tally::fresh(expected_product);
        self.rounds_started = self.rounds_started.saturating_add(1);

        debug!("placed {placed} tokens");
        info!(
            "round {} started, target product {expected_product}",
            self.rounds_started
        );
        out_events.push(Event::RoundStarted { expected_product });
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        if let Some(direction) = self.player.take_pending_step() {
            let from = self.player.position();
            self.player.step(direction, self.config.step_scale);
            out_events.push(Event::PlayerMoved {
                from,
                to: self.player.position(),
            });
        }

        let position = self.player.position();
        let Some(cell) = position.cell_within(self.grid.size()) else {
            self.end_round(Collision::OutOfBounds, position, out_events);
            return;
        };

        match self.grid.get(cell) {
            CellKind::Wall => self.end_round(Collision::Wall, position, out_events),
            CellKind::Number => self.resolve_pick(cell, out_events),
            CellKind::Empty => {}
        }
    }

    fn end_round(
        &mut self,
        collision: Collision,
        position: PlayerPosition,
        out_events: &mut Vec<Event>,
    ) {
        info!(
            "round {} lost at ({}, {}): {collision:?}",
            self.rounds_started, position.x, position.y
        );
        out_events.push(Event::PlayerCollided {
            collision,
            position,
        });
        self.transition(RunState::Restart, out_events);
    }

    fn resolve_pick(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some((token, value)) = self.tokens.take_at(cell, &mut self.grid) else {
            warn!(
                "number cell ({}, {}) carries no token, clearing it",
                cell.column(),
                cell.row()
            );
            self.grid.set(cell, CellKind::Empty);
            return;
        };

        let pick_index = self.tally.active_index;
        self.tally.picked[pick_index] = u32::from(value.get());
        out_events.push(Event::TokenPicked {
            token,
            cell,
            value,
            pick_index,
        });

        if pick_index == PAIR_LEN - 1 {
            let product = self.tally.picked[0] * self.tally.picked[1];
            let matched = product == self.tally.expected_product;
            if matched {
                self.tally.score += 1;
            } else {
                self.tally.score -= 1;
            }
            let score = self.tally.score;
            debug!(
                "pair {:?} -> {product} (expected {}), score {score}",
                self.tally.picked, self.tally.expected_product
            );
            out_events.push(Event::PairResolved {
                product,
                expected_product: self.tally.expected_product,
                matched,
                score,
            });

            if let Some(milestone) = ScoreMilestone::for_score(score) {
                info!("score milestone {milestone:?} reached at {score}");
                out_events.push(Event::ScoreMilestoneReached { milestone, score });
            }
        }

        self.tally.active_index = (pick_index + 1) % PAIR_LEN;
    }

    fn edit_cell(&mut self, cell: CellCoord, kind: CellKind, out_events: &mut Vec<Event>) {
        if !self.grid.contains(cell) {
            debug!(
                "ignoring edit at ({}, {}) outside the board",
                cell.column(),
                cell.row()
            );
            return;
        }

        let previous = self.grid.get(cell);
        if previous == kind {
            return;
        }
        if previous == CellKind::Number {
            if let Some(token) = self.tokens.release_at(cell) {
                debug!("token {} removed by cell edit", token.get());
            }
        }

        self.grid.set(cell, kind);
        out_events.push(Event::CellEdited {
            cell,
            previous,
            kind,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session reached [`RunState::Quit`] every command is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.run_state.is_terminal() {
        debug!("ignoring {command:?} after quit");
        return;
    }

    match command {
        Command::SetupRound => world.setup_round(out_events),
        Command::SteerPlayer { direction } => {
            world.player.steer(direction);
            out_events.push(Event::PlayerSteered { direction });
        }
        Command::TogglePause => match world.run_state {
            RunState::Running => world.transition(RunState::Paused, out_events),
            RunState::Paused => world.transition(RunState::Running, out_events),
            RunState::Restart | RunState::Quit => {}
        },
        Command::Quit => world.transition(RunState::Quit, out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if world.run_state == RunState::Running {
                world.advance(out_events);
            }
        }
        Command::PaintWall { cell } => world.edit_cell(cell, CellKind::Wall, out_events),
        Command::EraseCell { cell } => world.edit_cell(cell, CellKind::Empty, out_events),
        Command::ClearWalls => {
            let cleared = world.grid.clear_walls();
            debug!("cleared {cleared} walls");
            out_events.push(Event::WallsCleared { cleared });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use times_table_core::{CellCoord, CellKind, PlayerSnapshot, RunState, TokenView};

    use super::{Config, Grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Content of the provided cell, `None` when it lies off the board.
    #[must_use]
    pub fn cell_kind(world: &World, cell: CellCoord) -> Option<CellKind> {
        world
            .grid
            .contains(cell)
            .then(|| world.grid.get(cell))
    }

    /// Captures the tokens currently on the board.
    #[must_use]
    pub fn token_view(world: &World) -> TokenView {
        world.tokens.view(&world.grid)
    }

    /// Captures the player's position and heading.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Current run state.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world.run_state
    }

    /// Product the player has to reproduce this round.
    #[must_use]
    pub fn expected_product(world: &World) -> u32 {
        world.tally.expected_product
    }

    /// Values collected so far in the current pair.
    #[must_use]
    pub fn picked_values(world: &World) -> [u32; 2] {
        world.tally.picked
    }

    /// Slot the next collected value will be stored in.
    #[must_use]
    pub fn active_pick_index(world: &World) -> usize {
        world.tally.active_index
    }

    /// Score of the current round.
    #[must_use]
    pub fn score(world: &World) -> i32 {
        world.tally.score
    }

    /// Number of rounds laid out since the world was created.
    #[must_use]
    pub fn rounds_started(world: &World) -> u32 {
        world.rounds_started
    }
}

/// Helpers that arrange deterministic boards for tests.
#[cfg(any(test, feature = "round_scaffolding"))]
pub mod scaffolding {
    use times_table_core::{CellCoord, TokenValue};

    use super::{Tally, World};

    /// Replaces the token layout with explicit placements, in token order, and
    /// restarts the tally against the new target pair.
    pub fn arrange_tokens(world: &mut World, placements: &[(CellCoord, TokenValue)]) {
        world.tokens.arrange(&mut world.grid, placements);
        world.tally = Tally::fresh(world.tokens.target_product());
    }
}
