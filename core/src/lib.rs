#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Times Table engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters distil raw input into
//! [`Command`] values, the world executes those commands via its `apply` entry
//! point, and then broadcasts [`Event`] values that systems react to. Systems
//! consume event streams, query immutable snapshots, and respond exclusively
//! with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Times Table.";

/// Number of number tokens spawned every round.
pub const TOKEN_COUNT: usize = 6;

/// Score at which the world reports [`ScoreMilestone::Ceiling`].
pub const SCORE_CEILING: i32 = 10;

/// Lifecycle of a gameplay session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// Ticks advance movement and collision.
    Running,
    /// Ticks are ignored; wall editing and steering remain available.
    Paused,
    /// The round ended on a collision and awaits round setup.
    Restart,
    /// Terminal state; the world ignores every further command.
    Quit,
}

impl RunState {
    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Quit)
    }
}

/// Content of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable grass.
    #[default]
    Empty,
    /// Cell occupied by an active number token.
    Number,
    /// Player-painted obstacle that ends the round on contact.
    Wall,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Unit velocity `(dx, dy)` associated with the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete keys the game reacts to, independent of any windowing backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Steers the player upward.
    Up,
    /// Steers the player downward.
    Down,
    /// Steers the player to the left.
    Left,
    /// Steers the player to the right.
    Right,
    /// Toggles between running and paused.
    Pause,
    /// Converts every wall back into grass.
    ClearWalls,
    /// Leaves the game.
    Escape,
}

impl Key {
    /// Movement direction bound to the key, if it is a directional key.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Pause | Self::ClearWalls | Self::Escape => None,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh round: resets the player, the board and the tally.
    SetupRound,
    /// Sets the player's velocity and queues a single step in that direction.
    SteerPlayer {
        /// Direction the player should face and step toward.
        direction: Direction,
    },
    /// Flips between running and paused. Other states are unaffected.
    TogglePause,
    /// Ends the session.
    Quit,
    /// Advances the simulation by one tick.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Turns the provided cell into a wall.
    PaintWall {
        /// Cell to convert.
        cell: CellCoord,
    },
    /// Turns the provided cell back into grass.
    EraseCell {
        /// Cell to convert.
        cell: CellCoord,
    },
    /// Converts every wall on the board back into grass.
    ClearWalls,
}

/// Reason a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collision {
    /// The player stepped past the edge of the board.
    OutOfBounds,
    /// The player stepped onto a wall.
    Wall,
}

/// Score thresholds surfaced to observers. Neither changes the run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreMilestone {
    /// The score reached [`SCORE_CEILING`].
    Ceiling,
    /// The score dropped below zero.
    BelowZero,
}

impl ScoreMilestone {
    /// Classifies a score, returning the milestone it represents if any.
    #[must_use]
    pub const fn for_score(score: i32) -> Option<Self> {
        if score == SCORE_CEILING {
            Some(Self::Ceiling)
        } else if score < 0 {
            Some(Self::BelowZero)
        } else {
            None
        }
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a tick was processed.
    TimeAdvanced {
        /// Duration carried by the tick.
        dt: Duration,
    },
    /// Announces that a fresh round was laid out.
    RoundStarted {
        /// Product the player has to reproduce this round.
        expected_product: u32,
    },
    /// Announces a run-state transition.
    RunStateChanged {
        /// State before the transition.
        from: RunState,
        /// State after the transition.
        to: RunState,
    },
    /// Confirms that the player turned toward a new heading.
    PlayerSteered {
        /// Heading applied to the player.
        direction: Direction,
    },
    /// Confirms that the player took a single step.
    PlayerMoved {
        /// Position before the step.
        from: PlayerPosition,
        /// Position after the step.
        to: PlayerPosition,
    },
    /// Reports the collision that ended the round.
    PlayerCollided {
        /// Kind of collision.
        collision: Collision,
        /// Position at which the collision happened.
        position: PlayerPosition,
    },
    /// Confirms that the player collected a number token.
    TokenPicked {
        /// Identifier of the collected token.
        token: TokenId,
        /// Cell the token occupied.
        cell: CellCoord,
        /// Value written on the token.
        value: TokenValue,
        /// Slot of the pair the value was stored in.
        pick_index: usize,
    },
    /// Reports the outcome of a completed pair of picks.
    PairResolved {
        /// Product of the two collected values.
        product: u32,
        /// Product the player had to reproduce.
        expected_product: u32,
        /// Whether the product matched.
        matched: bool,
        /// Score after applying the outcome.
        score: i32,
    },
    /// Reports that the score crossed a noteworthy threshold.
    ScoreMilestoneReached {
        /// Threshold that was reached.
        milestone: ScoreMilestone,
        /// Score at the time of detection.
        score: i32,
    },
    /// Confirms a single-cell edit performed through the pointer.
    CellEdited {
        /// Cell that changed.
        cell: CellCoord,
        /// Content the cell held before the edit.
        previous: CellKind,
        /// Content the cell holds now.
        kind: CellKind,
    },
    /// Confirms that every wall was removed.
    WallsCleared {
        /// Number of walls converted back into grass.
        cleared: u32,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Side length of the square board measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridSize(u32);

impl GridSize {
    /// Creates a new board size wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the number of cells along each edge.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.0 as usize * self.0 as usize
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.0 && cell.row() < self.0
    }
}

/// Continuous player position measured in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    /// Horizontal coordinate; whole numbers align with columns.
    pub x: f32,
    /// Vertical coordinate; whole numbers align with rows.
    pub y: f32,
}

impl PlayerPosition {
    /// Creates a position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates the position that sits exactly on the provided cell.
    #[must_use]
    pub fn at_cell(cell: CellCoord) -> Self {
        Self::new(cell.column() as f32, cell.row() as f32)
    }

    /// Signed cell indices obtained by truncating toward zero.
    #[must_use]
    pub fn truncated(&self) -> (i32, i32) {
        (self.x.trunc() as i32, self.y.trunc() as i32)
    }

    /// Cell the position falls into, when it lies on a board of `size`.
    #[must_use]
    pub fn cell_within(&self, size: GridSize) -> Option<CellCoord> {
        let (column, row) = self.truncated();
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        let cell = CellCoord::new(column, row);
        size.contains(cell).then_some(cell)
    }
}

/// Unique identifier assigned to a number token; `0` and `1` form the target pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(u32);

impl TokenId {
    /// Creates a new token identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Digit written on a number token, always within `1..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenValue(u8);

impl TokenValue {
    /// Smallest value a token may carry.
    pub const MIN: u8 = 1;
    /// Largest value a token may carry.
    pub const MAX: u8 = 9;

    /// Creates a token value, rejecting digits outside `1..=9`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a token value, clamping the digit into `1..=9`.
    #[must_use]
    pub const fn from_clamped(value: u8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Retrieves the digit.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Immutable representation of a single active token used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSnapshot {
    /// Identifier of the token.
    pub id: TokenId,
    /// Cell currently occupied by the token.
    pub cell: CellCoord,
    /// Value written on the token.
    pub value: TokenValue,
}

/// Read-only snapshot describing every active token on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenView {
    snapshots: Vec<TokenSnapshot>,
}

impl TokenView {
    /// Creates a new token view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TokenSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured token snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenSnapshot> {
        self.snapshots.iter()
    }

    /// Returns the token occupying the provided cell, if any.
    #[must_use]
    pub fn at(&self, cell: CellCoord) -> Option<&TokenSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Number of active tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no token is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TokenSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: PlayerPosition,
    /// Current velocity, `None` while the player never moved.
    pub velocity: Option<Direction>,
}

impl PlayerSnapshot {
    /// Heading used for presentation: the last velocity, facing down by default.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.velocity.unwrap_or(Direction::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellKind, Direction, GridSize, Key, PlayerPosition, RunState, ScoreMilestone,
        TokenId, TokenValue,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn contract_types_round_trip_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
        assert_round_trip(&CellKind::Wall);
        assert_round_trip(&RunState::Restart);
        assert_round_trip(&TokenId::new(4));
        assert_round_trip(&TokenValue::new(9).expect("valid digit"));
    }

    #[test]
    fn token_value_rejects_digits_outside_range() {
        assert!(TokenValue::new(0).is_none());
        assert!(TokenValue::new(10).is_none());
        assert_eq!(TokenValue::new(1).map(|value| value.get()), Some(1));
        assert_eq!(TokenValue::new(9).map(|value| value.get()), Some(9));
        assert_eq!(TokenValue::from_clamped(0).get(), 1);
        assert_eq!(TokenValue::from_clamped(12).get(), 9);
    }

    #[test]
    fn truncation_rounds_toward_zero() {
        assert_eq!(PlayerPosition::new(-0.5, 3.9).truncated(), (0, 3));
        assert_eq!(PlayerPosition::new(-1.0, 0.0).truncated(), (-1, 0));
    }

    #[test]
    fn cell_within_rejects_positions_off_the_board() {
        let size = GridSize::new(15);
        assert_eq!(
            PlayerPosition::new(14.0, 0.0).cell_within(size),
            Some(CellCoord::new(14, 0))
        );
        assert!(PlayerPosition::new(15.0, 0.0).cell_within(size).is_none());
        assert!(PlayerPosition::new(3.0, -1.0).cell_within(size).is_none());
    }

    #[test]
    fn only_arrow_keys_carry_directions() {
        assert_eq!(Key::Left.direction(), Some(Direction::Left));
        assert!(Key::Pause.direction().is_none());
        assert!(Key::ClearWalls.direction().is_none());
        assert!(Key::Escape.direction().is_none());
    }

    #[test]
    fn milestones_cover_ceiling_and_negative_scores() {
        assert_eq!(ScoreMilestone::for_score(10), Some(ScoreMilestone::Ceiling));
        assert_eq!(ScoreMilestone::for_score(-1), Some(ScoreMilestone::BelowZero));
        assert_eq!(ScoreMilestone::for_score(0), None);
        assert_eq!(ScoreMilestone::for_score(11), None);
    }
}
