#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Times Table adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;
use times_table_core::{
    CellCoord, CellKind, Direction, GridSize, Key, PlayerSnapshot, RunState, TokenSnapshot,
    TokenValue,
};

/// Edge length of a single tile in the sprite atlas, in pixels.
pub const ATLAS_TILE: u32 = 64;

const PRODUCT_DIGIT_TOP: f32 = 5.0;
const PRODUCT_DIGIT_ADVANCE: f32 = 37.0;
const BUTTON_BOTTOM_INSET: u32 = 86;
const BUTTON_HEIGHT: u32 = 100;

/// Pixel rectangle inside the sprite atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasRect {
    /// Left edge in atlas pixels.
    pub x: u32,
    /// Top edge in atlas pixels.
    pub y: u32,
    /// Width in atlas pixels.
    pub width: u32,
    /// Height in atlas pixels.
    pub height: u32,
}

impl AtlasRect {
    /// Creates a new atlas rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    const fn tile(column: u32, row: u32) -> Self {
        Self::new(column * ATLAS_TILE, row * ATLAS_TILE, ATLAS_TILE, ATLAS_TILE)
    }
}

/// On-screen buttons drawn beneath the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Left button.
    Quit,
    /// Right button.
    Play,
}

/// Visual state of an on-screen button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Pointer is elsewhere.
    Idle,
    /// Pointer hovers the button.
    Hovered,
    /// Pointer hovers the button with the primary button held.
    Pressed,
}

impl ButtonState {
    const fn atlas_column(self) -> u32 {
        match self {
            Self::Idle => 0,
            Self::Hovered => 4,
            Self::Pressed => 8,
        }
    }
}

/// Every sprite the game draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    /// Decimal digit; values above nine wrap around.
    Digit(u8),
    /// Empty board cell.
    Grass,
    /// Wall cell.
    Wall,
    /// Player avatar facing the provided direction.
    Player(Direction),
    /// On-screen button in the provided state.
    Button(ButtonId, ButtonState),
}

impl SpriteId {
    /// Atlas region holding the sprite.
    #[must_use]
    pub const fn rect(self) -> AtlasRect {
        match self {
            Self::Digit(digit) => match digit % 10 {
                0 => AtlasRect::tile(4, 1),
                digit @ 1..=5 => AtlasRect::tile(digit as u32 - 1, 0),
                digit => AtlasRect::tile(digit as u32 - 6, 1),
            },
            Self::Grass => AtlasRect::tile(1, 2),
            Self::Wall => AtlasRect::tile(0, 2),
            Self::Player(Direction::Down) => AtlasRect::tile(0, 3),
            Self::Player(Direction::Up) => AtlasRect::tile(1, 3),
            Self::Player(Direction::Right) => AtlasRect::tile(2, 3),
            Self::Player(Direction::Left) => AtlasRect::tile(3, 3),
            Self::Button(button, state) => {
                let row = match button {
                    ButtonId::Quit => 4,
                    ButtonId::Play => 6,
                };
                AtlasRect::new(
                    state.atlas_column() * ATLAS_TILE,
                    row * ATLAS_TILE,
                    4 * ATLAS_TILE,
                    2 * ATLAS_TILE,
                )
            }
        }
    }

    /// Sprite drawn for a board cell. Number cells without a known value fall
    /// back to grass.
    #[must_use]
    pub const fn for_cell(kind: CellKind, value: Option<TokenValue>) -> Self {
        match (kind, value) {
            (CellKind::Wall, _) => Self::Wall,
            (CellKind::Number, Some(value)) => Self::Digit(value.get()),
            (CellKind::Number, None) | (CellKind::Empty, _) => Self::Grass,
        }
    }
}

/// Splits the expected product into decimal digits, most significant first.
#[must_use]
pub fn expected_product_digits(product: u32) -> Vec<u8> {
    if product == 0 {
        return vec![0];
    }

    let mut digits = Vec::new();
    let mut remaining = product;
    while remaining > 0 {
        digits.push((remaining % 10) as u8);
        remaining /= 10;
    }
    digits.reverse();
    digits
}

/// Axis-aligned rectangle in window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ScreenRect {
    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let end = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x <= end.x && point.y <= end.y
    }
}

/// Maps board cells to window pixels and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    grid_size: GridSize,
    window_size: u32,
    gameplay_offset: u32,
    tile_size: u32,
}

impl BoardLayout {
    /// Default square window edge, in pixels.
    pub const DEFAULT_WINDOW_SIZE: u32 = 915;

    /// Default space reserved around the board, in pixels.
    pub const DEFAULT_GAMEPLAY_OFFSET: u32 = 128;

    /// Creates a layout for a square window.
    ///
    /// Returns an error when the board would end up with zero-sized tiles.
    pub fn new(
        grid_size: GridSize,
        window_size: u32,
        gameplay_offset: u32,
    ) -> Result<Self, RenderingError> {
        if grid_size.get() == 0 {
            return Err(RenderingError::EmptyGrid);
        }

        let tile_size = window_size.saturating_sub(gameplay_offset) / grid_size.get();
        if tile_size == 0 {
            return Err(RenderingError::BoardDoesNotFit {
                grid_size: grid_size.get(),
                window_size,
                gameplay_offset,
            });
        }

        Ok(Self {
            grid_size,
            window_size,
            gameplay_offset,
            tile_size,
        })
    }

    /// Board the layout was built for.
    #[must_use]
    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Square window edge, in pixels.
    #[must_use]
    pub const fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Edge length of a board tile, in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Distance between the window edge and the board.
    #[must_use]
    pub const fn margin(&self) -> u32 {
        self.gameplay_offset / 2
    }

    /// Top-left pixel of the provided cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        let margin = self.margin() as f32;
        let tile = self.tile_size as f32;
        Vec2::new(
            cell.column() as f32 * tile + margin,
            cell.row() as f32 * tile + margin,
        )
    }

    /// Board cell under the provided window pixel, or `None` when the pixel
    /// lies outside the board.
    #[must_use]
    pub fn cell_at(&self, pointer: Vec2) -> Option<CellCoord> {
        if !pointer.is_finite() {
            return None;
        }

        let local = (pointer - Vec2::splat(self.margin() as f32)) / self.tile_size as f32;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let cell = CellCoord::new(local.x.floor() as u32, local.y.floor() as u32);
        self.grid_size.contains(cell).then_some(cell)
    }

    /// Top-left pixel of digit `index` when `count` digits are drawn.
    #[must_use]
    pub fn product_digit_origin(&self, index: usize, count: usize) -> Vec2 {
        let half_tile = (ATLAS_TILE / 2) as f32;
        let first = (self.window_size / 2) as f32 - count.saturating_sub(1) as f32 * half_tile;
        Vec2::new(first + index as f32 * PRODUCT_DIGIT_ADVANCE, PRODUCT_DIGIT_TOP)
    }

    /// Window rectangle covered by the provided button.
    #[must_use]
    pub fn button_rect(&self, button: ButtonId) -> ScreenRect {
        let width = (4 * ATLAS_TILE) as f32;
        let left = (self.window_size / 2) as f32 - width;
        let x = match button {
            ButtonId::Quit => left,
            ButtonId::Play => left + width,
        };
        ScreenRect {
            origin: Vec2::new(x, self.window_size.saturating_sub(BUTTON_BOTTOM_INSET) as f32),
            size: Vec2::new(width, BUTTON_HEIGHT as f32),
        }
    }

    /// Visual state of the provided button under the current pointer.
    #[must_use]
    pub fn button_state(&self, button: ButtonId, pointer: Option<PointerInput>) -> ButtonState {
        match pointer {
            Some(pointer) if self.button_rect(button).contains(pointer.position) => {
                if pointer.primary {
                    ButtonState::Pressed
                } else {
                    ButtonState::Hovered
                }
            }
            _ => ButtonState::Idle,
        }
    }
}

/// Discrete input event captured on a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// The window asked to close.
    Quit,
    /// A key went down.
    KeyDown(Key),
}

/// Pointer position and held buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Position in window pixels.
    pub position: Vec2,
    /// Whether the primary button is held.
    pub primary: bool,
    /// Whether the secondary button is held.
    pub secondary: bool,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Discrete event observed on this frame, if any.
    pub event: Option<InputEvent>,
    /// Pointer state when the pointer is over the window.
    pub pointer: Option<PointerInput>,
}

/// Renderable snapshot of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Side length of the board.
    pub grid_size: GridSize,
    /// Row-major cell contents.
    pub cells: Vec<CellKind>,
    /// Tokens currently on the board.
    pub tokens: Vec<TokenSnapshot>,
    /// Player position and heading.
    pub player: PlayerSnapshot,
    /// Product shown at the top of the window.
    pub expected_product: u32,
    /// Score of the current round.
    pub score: i32,
    /// Current run state.
    pub run_state: RunState,
    /// Sprites of the buttons under the board, quit first.
    pub buttons: [SpriteId; 2],
}

impl Scene {
    /// Content of the provided cell, `None` when it lies off the board.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellKind> {
        if !self.grid_size.contains(cell) {
            return None;
        }
        let index = cell.row() as usize * self.grid_size.get() as usize + cell.column() as usize;
        self.cells.get(index).copied()
    }

    /// Sprite drawn for the provided cell.
    #[must_use]
    pub fn cell_sprite(&self, cell: CellCoord) -> Option<SpriteId> {
        let kind = self.cell(cell)?;
        let value = self
            .tokens
            .iter()
            .find(|token| token.cell == cell)
            .map(|token| token.value);
        Some(SpriteId::for_cell(kind, value))
    }

    /// Sprite drawn for the player.
    #[must_use]
    pub fn player_sprite(&self) -> SpriteId {
        SpriteId::Player(self.player.facing())
    }

    /// Digit sprites spelling the expected product.
    #[must_use]
    pub fn product_sprites(&self) -> Vec<SpriteId> {
        expected_product_digits(self.expected_product)
            .into_iter()
            .map(SpriteId::Digit)
            .collect()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Mapping between board cells and window pixels.
    pub layout: BoardLayout,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, layout: BoardLayout, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            layout,
            scene,
        }
    }
}

/// Whether the backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Present another frame.
    Continue,
    /// Stop the backend.
    Exit,
}

/// Rendering backend capable of presenting Times Table scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the previous frame's
    /// duration and the input captured by the adapter, mutates the scene
    /// before it is presented and decides whether the backend continues.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameStatus;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// The board has no cells.
    #[error("grid size must be positive")]
    EmptyGrid,
    /// Tiles would be zero pixels wide.
    #[error(
        "a {grid_size}x{grid_size} board does not fit a {window_size} px window \
         with a {gameplay_offset} px offset"
    )]
    BoardDoesNotFit {
        /// Requested board side length.
        grid_size: u32,
        /// Requested window edge.
        window_size: u32,
        /// Requested gameplay offset.
        gameplay_offset: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_layout() -> BoardLayout {
        BoardLayout::new(
            GridSize::new(15),
            BoardLayout::DEFAULT_WINDOW_SIZE,
            BoardLayout::DEFAULT_GAMEPLAY_OFFSET,
        )
        .expect("classic board fits")
    }

    #[test]
    fn digit_sprites_follow_atlas_rows() {
        assert_eq!(SpriteId::Digit(1).rect(), AtlasRect::new(0, 0, 64, 64));
        assert_eq!(SpriteId::Digit(5).rect(), AtlasRect::new(256, 0, 64, 64));
        assert_eq!(SpriteId::Digit(6).rect(), AtlasRect::new(0, 64, 64, 64));
        assert_eq!(SpriteId::Digit(9).rect(), AtlasRect::new(192, 64, 64, 64));
        assert_eq!(SpriteId::Digit(0).rect(), AtlasRect::new(256, 64, 64, 64));
    }

    #[test]
    fn board_and_player_sprites_follow_atlas_rows() {
        assert_eq!(SpriteId::Grass.rect(), AtlasRect::new(64, 128, 64, 64));
        assert_eq!(SpriteId::Wall.rect(), AtlasRect::new(0, 128, 64, 64));
        assert_eq!(
            SpriteId::Player(Direction::Down).rect(),
            AtlasRect::new(0, 192, 64, 64)
        );
        assert_eq!(
            SpriteId::Player(Direction::Left).rect(),
            AtlasRect::new(192, 192, 64, 64)
        );
    }

    #[test]
    fn button_sprites_shift_right_per_state() {
        assert_eq!(
            SpriteId::Button(ButtonId::Quit, ButtonState::Idle).rect(),
            AtlasRect::new(0, 256, 256, 128)
        );
        assert_eq!(
            SpriteId::Button(ButtonId::Play, ButtonState::Pressed).rect(),
            AtlasRect::new(512, 384, 256, 128)
        );
    }

    #[test]
    fn cell_sprite_depends_on_kind_and_token() {
        let four = TokenValue::new(4);
        assert_eq!(SpriteId::for_cell(CellKind::Number, four), SpriteId::Digit(4));
        assert_eq!(SpriteId::for_cell(CellKind::Number, None), SpriteId::Grass);
        assert_eq!(SpriteId::for_cell(CellKind::Wall, four), SpriteId::Wall);
        assert_eq!(SpriteId::for_cell(CellKind::Empty, None), SpriteId::Grass);
    }

    #[test]
    fn product_digits_are_most_significant_first() {
        assert_eq!(expected_product_digits(0), vec![0]);
        assert_eq!(expected_product_digits(7), vec![7]);
        assert_eq!(expected_product_digits(81), vec![8, 1]);
        assert_eq!(expected_product_digits(120), vec![1, 2, 0]);
    }

    #[test]
    fn classic_layout_matches_window_geometry() {
        let layout = classic_layout();

        assert_eq!(layout.tile_size(), 52);
        assert_eq!(layout.margin(), 64);
        assert_eq!(
            layout.cell_origin(CellCoord::new(2, 3)),
            Vec2::new(168.0, 220.0)
        );
        assert_eq!(layout.product_digit_origin(0, 2), Vec2::new(425.0, 5.0));
        assert_eq!(layout.product_digit_origin(1, 2), Vec2::new(462.0, 5.0));
    }

    #[test]
    fn cell_at_maps_pixels_inside_the_board_only() {
        let layout = classic_layout();

        assert_eq!(layout.cell_at(Vec2::new(64.0, 64.0)), Some(CellCoord::new(0, 0)));
        assert_eq!(
            layout.cell_at(Vec2::new(843.0, 843.0)),
            Some(CellCoord::new(14, 14))
        );
        assert_eq!(layout.cell_at(Vec2::new(63.0, 100.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(844.0, 100.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(200.0, 900.0)), None);
        assert_eq!(layout.cell_at(Vec2::new(f32::NAN, 100.0)), None);
    }

    #[test]
    fn buttons_react_to_hover_and_press() {
        let layout = classic_layout();
        let hover = PointerInput {
            position: Vec2::new(210.0, 840.0),
            primary: false,
            secondary: false,
        };
        let press = PointerInput {
            primary: true,
            ..hover
        };

        assert_eq!(
            layout.button_rect(ButtonId::Quit).origin,
            Vec2::new(201.0, 829.0)
        );
        assert_eq!(
            layout.button_state(ButtonId::Quit, Some(hover)),
            ButtonState::Hovered
        );
        assert_eq!(
            layout.button_state(ButtonId::Quit, Some(press)),
            ButtonState::Pressed
        );
        assert_eq!(
            layout.button_state(ButtonId::Play, Some(press)),
            ButtonState::Idle
        );
        assert_eq!(layout.button_state(ButtonId::Quit, None), ButtonState::Idle);
    }

    #[test]
    fn layout_rejects_boards_that_do_not_fit() {
        assert_eq!(
            BoardLayout::new(GridSize::new(0), 915, 128),
            Err(RenderingError::EmptyGrid)
        );
        assert_eq!(
            BoardLayout::new(GridSize::new(15), 100, 128),
            Err(RenderingError::BoardDoesNotFit {
                grid_size: 15,
                window_size: 100,
                gameplay_offset: 128,
            })
        );
    }
}
