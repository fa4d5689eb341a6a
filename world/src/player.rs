use times_table_core::{CellCoord, Direction, PlayerPosition, PlayerSnapshot};

/// Avatar steered by the arrow keys.
///
/// Movement is edge-triggered: every steer queues exactly one step, and the
/// queue never holds more than one.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    position: PlayerPosition,
    velocity: Option<Direction>,
    pending_step: Option<Direction>,
}

impl Player {
    pub(crate) fn at(start: CellCoord) -> Self {
        Self {
            position: PlayerPosition::at_cell(start),
            velocity: None,
            pending_step: None,
        }
    }

    pub(crate) fn steer(&mut self, direction: Direction) {
        self.velocity = Some(direction);
        self.pending_step = Some(direction);
    }

    pub(crate) fn take_pending_step(&mut self) -> Option<Direction> {
        self.pending_step.take()
    }

    pub(crate) fn step(&mut self, direction: Direction, step_scale: f32) {
        let (dx, dy) = direction.delta();
        self.position.x += dx as f32 * step_scale;
        self.position.y += dy as f32 * step_scale;
    }

    /// Moves back to the start cell. The heading survives so the avatar keeps
    /// facing the way it last moved.
    pub(crate) fn reset(&mut self, start: CellCoord) {
        self.position = PlayerPosition::at_cell(start);
        self.pending_step = None;
    }

    pub(crate) fn position(&self) -> PlayerPosition {
        self.position
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steer_queues_a_single_step() {
        let mut player = Player::at(CellCoord::new(7, 7));
        player.steer(Direction::Up);
        player.steer(Direction::Left);

        assert_eq!(player.take_pending_step(), Some(Direction::Left));
        assert_eq!(player.take_pending_step(), None);
        assert_eq!(player.snapshot().velocity, Some(Direction::Left));
    }

    #[test]
    fn step_scales_the_unit_velocity() {
        let mut player = Player::at(CellCoord::new(2, 2));
        player.step(Direction::Right, 1.0);
        player.step(Direction::Down, 2.0);

        assert_eq!(player.position(), PlayerPosition::new(3.0, 4.0));
    }

    #[test]
    fn reset_keeps_heading_but_drops_pending_step() {
        let mut player = Player::at(CellCoord::new(1, 1));
        player.steer(Direction::Right);
        player.reset(CellCoord::new(5, 5));

        assert_eq!(player.position(), PlayerPosition::new(5.0, 5.0));
        assert_eq!(player.take_pending_step(), None);
        assert_eq!(player.snapshot().facing(), Direction::Right);
    }
}
