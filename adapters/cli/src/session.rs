//! Frame loop glue: input to commands, world ticks and round follow-ups.

use std::{fmt, time::Duration};

use log::info;
use times_table_core::{Command, Event, RunState, ScoreMilestone};
use times_table_rendering::{BoardLayout, FrameInput, FrameStatus, InputEvent, Scene};
use times_table_system_controls::{ControlInput, Controls};
use times_table_system_round::Round;
use times_table_world::{apply, query, World};

use crate::scene;

/// One game session driven frame by frame.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    layout: BoardLayout,
    controls: Controls,
    round: Round,
    commands: Vec<Command>,
    events: Vec<Event>,
    milestones: Vec<(ScoreMilestone, i32)>,
    frames: u64,
}

impl Session {
    pub(crate) fn new(world: World, layout: BoardLayout) -> Self {
        Self {
            world,
            layout,
            controls: Controls::new(),
            round: Round::new(),
            commands: Vec::new(),
            events: Vec::new(),
            milestones: Vec::new(),
            frames: 0,
        }
    }

    /// Scene for the current world state with no pointer over the window.
    pub(crate) fn scene(&self) -> Scene {
        scene::capture(&self.world, &self.layout, None)
    }

    fn control_input(&self, input: FrameInput) -> ControlInput {
        let (key, quit_signal) = match input.event {
            Some(InputEvent::KeyDown(key)) => (Some(key), false),
            Some(InputEvent::Quit) => (None, true),
            None => (None, false),
        };
        let held_cell = |held: bool| {
            input
                .pointer
                .filter(|_| held)
                .and_then(|pointer| self.layout.cell_at(pointer.position))
        };

        ControlInput {
            key,
            quit_signal,
            paint_cell: held_cell(input.pointer.is_some_and(|pointer| pointer.primary)),
            erase_cell: held_cell(input.pointer.is_some_and(|pointer| pointer.secondary)),
        }
    }

    /// Runs one frame: input, tick, round follow-up and scene capture.
    pub(crate) fn frame(
        &mut self,
        dt: Duration,
        input: FrameInput,
        scene: &mut Scene,
    ) -> FrameStatus {
        self.frames += 1;

        let control_input = self.control_input(input);
        self.commands.clear();
        self.controls.handle(control_input, &mut self.commands);
        self.commands.push(Command::Tick { dt });

        while !self.commands.is_empty() {
            self.events.clear();
            for command in self.commands.drain(..) {
                apply(&mut self.world, command, &mut self.events);
            }
            let milestones = &mut self.milestones;
            self.round.handle(
                &self.events,
                |milestone, score| {
                    info!("score milestone {milestone:?} at {score}");
                    milestones.push((milestone, score));
                },
                &mut self.commands,
            );
        }

        *scene = scene::capture(&self.world, &self.layout, input.pointer);
        if query::run_state(&self.world) == RunState::Quit {
            FrameStatus::Exit
        } else {
            FrameStatus::Continue
        }
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary {
            frames: self.frames,
            rounds: query::rounds_started(&self.world),
            rounds_lost: self.round.rounds_lost(),
            score: query::score(&self.world),
            run_state: query::run_state(&self.world),
            milestones: self.milestones.len(),
        }
    }
}

/// End-of-run statistics printed by the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    frames: u64,
    rounds: u32,
    rounds_lost: u32,
    score: i32,
    run_state: RunState,
    milestones: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames: {}, rounds: {}, lost: {}, score: {}, state: {:?}, milestones: {}",
            self.frames, self.rounds, self.rounds_lost, self.score, self.run_state, self.milestones
        )
    }
}
