//! Headless rendering backend replaying a scripted input stream.

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::info;
use thiserror::Error;
use times_table_core::Key;
use times_table_rendering::{
    FrameInput, FrameStatus, InputEvent, PointerInput, Presentation, RenderingBackend, Scene,
};
use times_table_system_clock::{FrameClock, TimeSource};

use crate::scene::TextBoard;

/// Script played when none is supplied on the command line.
pub(crate) const DEFAULT_SCRIPT: &str =
    "pause right*2 up*3 idle*10 lmb:400:400 rmb:400:400 left*2 pause idle escape";

/// Longest script accepted, in frames.
pub(crate) const MAX_SCRIPT_FRAMES: usize = 1 << 20;

/// Reasons a script cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    #[error("unknown script step `{0}`")]
    UnknownStep(String),
    #[error("malformed pointer coordinates in `{0}`")]
    MalformedPointer(String),
    #[error("malformed repeat count in `{0}`")]
    MalformedRepeat(String),
    #[error("script expands past {MAX_SCRIPT_FRAMES} frames at `{0}`")]
    TooLong(String),
}

/// Parses whitespace-separated steps into one [`FrameInput`] per frame.
pub(crate) fn parse_script(raw: &str) -> Result<Vec<FrameInput>, ScriptError> {
    let mut frames = Vec::new();
    for token in raw.split_whitespace() {
        let (step, repeat) = match token.split_once('*') {
            Some((step, count)) => {
                let repeat = count
                    .parse::<usize>()
                    .map_err(|_| ScriptError::MalformedRepeat(token.to_owned()))?;
                (step, repeat)
            }
            None => (token, 1),
        };
        let input = parse_step(step)?;
        if repeat > MAX_SCRIPT_FRAMES - frames.len() {
            return Err(ScriptError::TooLong(token.to_owned()));
        }
        frames.extend(std::iter::repeat(input).take(repeat));
    }
    Ok(frames)
}

fn parse_step(step: &str) -> Result<FrameInput, ScriptError> {
    let key = |key| FrameInput {
        event: Some(InputEvent::KeyDown(key)),
        pointer: None,
    };

    let input = match step {
        "up" => key(Key::Up),
        "down" => key(Key::Down),
        "left" => key(Key::Left),
        "right" => key(Key::Right),
        "pause" => key(Key::Pause),
        "clear" => key(Key::ClearWalls),
        "escape" => key(Key::Escape),
        "quit" => FrameInput {
            event: Some(InputEvent::Quit),
            pointer: None,
        },
        "idle" => FrameInput::default(),
        _ => {
            let Some((button, coordinates)) = step.split_once(':') else {
                return Err(ScriptError::UnknownStep(step.to_owned()));
            };
            let primary = match button {
                "lmb" => true,
                "rmb" => false,
                _ => return Err(ScriptError::UnknownStep(step.to_owned())),
            };
            let position = parse_position(coordinates)
                .ok_or_else(|| ScriptError::MalformedPointer(step.to_owned()))?;
            FrameInput {
                event: None,
                pointer: Some(PointerInput {
                    position,
                    primary,
                    secondary: !primary,
                }),
            }
        }
    };
    Ok(input)
}

fn parse_position(coordinates: &str) -> Option<Vec2> {
    let (x, y) = coordinates.split_once(':')?;
    Some(Vec2::new(x.parse().ok()?, y.parse().ok()?))
}

/// Backend presenting scenes as text and feeding scripted input.
#[derive(Debug)]
pub(crate) struct ScriptedBackend<T> {
    frames: Vec<FrameInput>,
    clock: FrameClock<T>,
    show_frames: bool,
}

impl<T> ScriptedBackend<T> {
    pub(crate) fn new(frames: Vec<FrameInput>, clock: FrameClock<T>, show_frames: bool) -> Self {
        Self {
            frames,
            clock,
            show_frames,
        }
    }
}

impl<T: TimeSource> RenderingBackend for ScriptedBackend<T> {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameStatus,
    {
        let Self {
            frames,
            mut clock,
            show_frames,
        } = self;
        let Presentation {
            window_title,
            layout,
            mut scene,
        } = presentation;

        info!(
            "presenting {window_title}: {} frames at {} px tiles",
            frames.len(),
            layout.tile_size()
        );
        if show_frames {
            println!("{}", TextBoard::new(&scene));
        }

        for (frame, input) in frames.into_iter().enumerate() {
            let tick_start = clock.now();
            let status = update_scene(clock.delta(), input, &mut scene);
            if show_frames {
                println!("frame {frame}\n{}", TextBoard::new(&scene));
            }
            let _ = clock.update_and_wait(tick_start);

            if status == FrameStatus::Exit {
                info!("session ended after {} frames", frame + 1);
                return Ok(());
            }
        }

        info!("script exhausted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_expand_repeats() {
        let frames = parse_script("up*3 idle pause").expect("valid script");

        assert_eq!(frames.len(), 5);
        assert_eq!(frames[2].event, Some(InputEvent::KeyDown(Key::Up)));
        assert_eq!(frames[3], FrameInput::default());
        assert_eq!(frames[4].event, Some(InputEvent::KeyDown(Key::Pause)));
    }

    #[test]
    fn pointer_steps_hold_one_button() {
        let frames = parse_script("lmb:10:20 rmb:30.5:40").expect("valid script");

        assert_eq!(
            frames[0].pointer,
            Some(PointerInput {
                position: Vec2::new(10.0, 20.0),
                primary: true,
                secondary: false,
            })
        );
        assert_eq!(
            frames[1].pointer,
            Some(PointerInput {
                position: Vec2::new(30.5, 40.0),
                primary: false,
                secondary: true,
            })
        );
    }

    #[test]
    fn malformed_steps_are_rejected() {
        assert_eq!(
            parse_script("jump"),
            Err(ScriptError::UnknownStep("jump".to_owned()))
        );
        assert_eq!(
            parse_script("up*x"),
            Err(ScriptError::MalformedRepeat("up*x".to_owned()))
        );
        assert_eq!(
            parse_script("lmb:1"),
            Err(ScriptError::MalformedPointer("lmb:1".to_owned()))
        );
        assert_eq!(
            parse_script("mmb:1:2"),
            Err(ScriptError::UnknownStep("mmb:1:2".to_owned()))
        );
    }

    #[test]
    fn oversized_repeats_are_rejected() {
        assert_eq!(
            parse_script("idle*18446744073709551615"),
            Err(ScriptError::TooLong("idle*18446744073709551615".to_owned()))
        );
        assert_eq!(
            parse_script("idle*99999999999999999999"),
            Err(ScriptError::MalformedRepeat(
                "idle*99999999999999999999".to_owned()
            ))
        );

        let full = format!("up*{MAX_SCRIPT_FRAMES}");
        assert_eq!(
            parse_script(&full).map(|frames| frames.len()),
            Ok(MAX_SCRIPT_FRAMES)
        );
        assert_eq!(
            parse_script(&format!("{full} idle")),
            Err(ScriptError::TooLong("idle".to_owned()))
        );
    }

    #[test]
    fn default_script_parses() {
        assert!(!parse_script(DEFAULT_SCRIPT).expect("valid script").is_empty());
    }
}
