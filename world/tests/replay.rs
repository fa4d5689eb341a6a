use std::time::Duration;

use times_table_core::{CellCoord, Command, Direction, Event, RunState};
use times_table_world::{apply, query, Config, World};

fn scripted_commands() -> Vec<Command> {
    let tick = Command::Tick {
        dt: Duration::from_millis(16),
    };
    let mut commands = vec![
        Command::PaintWall {
            cell: CellCoord::new(0, 0),
        },
        Command::TogglePause,
    ];
    for direction in [
        Direction::Up,
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Right,
    ] {
        commands.push(Command::SteerPlayer { direction });
        commands.push(tick.clone());
    }
    commands.push(Command::SetupRound);
    commands.push(Command::Quit);
    commands
}

fn replay(config: Config) -> (Vec<Event>, World) {
    let mut world = World::new(config);
    let mut events = Vec::new();
    for command in scripted_commands() {
        apply(&mut world, command, &mut events);
    }
    (events, world)
}

#[test]
fn identical_seeds_replay_identical_event_logs() {
    let config = Config::default().with_seed(42);
    let (first_events, first_world) = replay(config);
    let (second_events, second_world) = replay(config);

    assert_eq!(first_events, second_events);
    assert_eq!(
        query::token_view(&first_world),
        query::token_view(&second_world)
    );
    assert_eq!(query::grid(&first_world), query::grid(&second_world));
    assert_eq!(query::run_state(&first_world), RunState::Quit);
}

#[test]
fn different_seeds_lay_out_different_boards() {
    let first = World::new(Config::default().with_seed(1));
    let second = World::new(Config::default().with_seed(2));

    assert_ne!(query::token_view(&first), query::token_view(&second));
}

#[test]
fn every_round_targets_the_product_of_the_first_pair() {
    let mut world = World::new(Config::default().with_seed(9));
    let mut events = Vec::new();

    for _ in 0..20 {
        events.clear();
        apply(&mut world, Command::SetupRound, &mut events);

        let tokens = query::token_view(&world).into_vec();
        let expected = u32::from(tokens[0].value.get()) * u32::from(tokens[1].value.get());
        assert_eq!(query::expected_product(&world), expected);
        assert_eq!(
            events.last(),
            Some(&Event::RoundStarted {
                expected_product: expected,
            })
        );
    }
}
