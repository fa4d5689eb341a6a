//! Scene capture and the plain-text board printed by the scripted backend.

use std::fmt;

use times_table_core::{CellCoord, Direction};
use times_table_rendering::{BoardLayout, ButtonId, ButtonState, PointerInput, Scene, SpriteId};
use times_table_world::{query, World};

/// Builds the renderable snapshot of `world`.
pub(crate) fn capture(
    world: &World,
    layout: &BoardLayout,
    pointer: Option<PointerInput>,
) -> Scene {
    let grid = query::grid(world);
    Scene {
        grid_size: grid.size(),
        cells: grid.cells().to_vec(),
        tokens: query::token_view(world).into_vec(),
        player: query::player(world),
        expected_product: query::expected_product(world),
        score: query::score(world),
        run_state: query::run_state(world),
        buttons: [ButtonId::Quit, ButtonId::Play]
            .map(|button| SpriteId::Button(button, layout.button_state(button, pointer))),
    }
}

/// Text rendering of a scene, one character per cell.
pub(crate) struct TextBoard<'a> {
    scene: &'a Scene,
}

impl<'a> TextBoard<'a> {
    pub(crate) fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }
}

fn sprite_glyph(sprite: SpriteId) -> char {
    match sprite {
        SpriteId::Digit(digit) => char::from(b'0' + digit % 10),
        SpriteId::Grass => '.',
        SpriteId::Wall => '#',
        SpriteId::Player(Direction::Up) => '^',
        SpriteId::Player(Direction::Down) => 'v',
        SpriteId::Player(Direction::Left) => '<',
        SpriteId::Player(Direction::Right) => '>',
        SpriteId::Button(..) => '?',
    }
}

fn button_label(sprite: SpriteId) -> &'static str {
    match sprite {
        SpriteId::Button(_, ButtonState::Hovered) => "hovered",
        SpriteId::Button(_, ButtonState::Pressed) => "pressed",
        _ => "idle",
    }
}

impl fmt::Display for TextBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene = self.scene;
        let target: String = scene
            .product_sprites()
            .into_iter()
            .map(sprite_glyph)
            .collect();
        writeln!(
            f,
            "target {target}  score {}  {:?}",
            scene.score, scene.run_state
        )?;

        let player_cell = scene.player.position.cell_within(scene.grid_size);
        let size = scene.grid_size.get();
        for row in 0..size {
            for column in 0..size {
                let cell = CellCoord::new(column, row);
                let sprite = if player_cell == Some(cell) {
                    scene.player_sprite()
                } else {
                    scene.cell_sprite(cell).unwrap_or(SpriteId::Grass)
                };
                write!(f, "{}", sprite_glyph(sprite))?;
            }
            writeln!(f)?;
        }

        write!(
            f,
            "[quit: {}] [play: {}]",
            button_label(scene.buttons[0]),
            button_label(scene.buttons[1])
        )
    }
}
