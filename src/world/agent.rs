use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;
use super::grid::{World, WorldError};
use crate::lang::action::Action;
use crate::lang::condition::Condition;

/// Why a primitive action could not be carried out.
///
/// These are expected outcomes of running a user program, not bugs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("blocked: cannot move from ({x}, {y}) facing {facing}")]
    Blocked { x: usize, y: usize, facing: Direction },

    #[error("no beeper to pick up at ({x}, {y})")]
    NoBeeper { x: usize, y: usize },

    #[error("agent is off the grid: {0}")]
    OffGrid(#[from] WorldError),
}

/// The robot: a position and a heading.
///
/// All mutation goes through the primitives below. Each primitive either
/// succeeds and updates state, or fails and leaves agent and world as
/// they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    x: usize,
    y: usize,
    facing: Direction,
}

impl Agent {
    pub fn new(x: usize, y: usize, facing: Direction) -> Self {
        Self { x, y, facing }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Whether the agent stands on an open cell of `world`.
    pub fn fits(&self, world: &World) -> bool {
        !world.is_blocked(self.x as i64, self.y as i64)
    }

    /// The cell one step ahead, possibly off-grid.
    pub fn front(&self) -> (i64, i64) {
        let (dx, dy) = self.facing.delta();
        (self.x as i64 + dx, self.y as i64 + dy)
    }

    pub fn move_forward(&mut self, world: &World) -> Result<(), ActionError> {
        let (nx, ny) = self.front();
        if world.is_blocked(nx, ny) {
            return Err(ActionError::Blocked {
                x: self.x,
                y: self.y,
                facing: self.facing,
            });
        }
        self.x = nx as usize;
        self.y = ny as usize;
        Ok(())
    }

    pub fn turn_left(&mut self) {
        self.facing = self.facing.left();
    }

    pub fn turn_right(&mut self) {
        self.facing = self.facing.right();
    }

    pub fn pick_up(&mut self, world: &mut World) -> Result<(), ActionError> {
        match world.remove_beeper(self.x, self.y)? {
            Some(_) => Ok(()),
            None => Err(ActionError::NoBeeper {
                x: self.x,
                y: self.y,
            }),
        }
    }

    pub fn put_down(&mut self, world: &mut World) -> Result<(), ActionError> {
        world.add_beeper(self.x, self.y)?;
        Ok(())
    }

    /// Carry out one primitive action.
    pub fn perform(&mut self, action: Action, world: &mut World) -> Result<(), ActionError> {
        match action {
            Action::Move => self.move_forward(world),
            Action::PickUp => self.pick_up(world),
            Action::PutDown => self.put_down(world),
            Action::TurnLeft => {
                self.turn_left();
                Ok(())
            }
            Action::TurnRight => {
                self.turn_right();
                Ok(())
            }
        }
    }

    /// Evaluate a condition. Pure: never mutates and never fails.
    pub fn check(&self, condition: Condition, world: &World) -> bool {
        match condition {
            Condition::FrontIsClear => {
                let (fx, fy) = self.front();
                !world.is_blocked(fx, fy)
            }
            Condition::FrontIsBlocked => {
                let (fx, fy) = self.front();
                world.is_blocked(fx, fy)
            }
            Condition::BeepersPresent => self.beepers_here(world) > 0,
            Condition::NoBeepersPresent => self.beepers_here(world) == 0,
            Condition::Facing(dir) => self.facing == dir,
        }
    }

    fn beepers_here(&self, world: &World) -> u32 {
        world.beepers(self.x, self.y).unwrap_or(0)
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) facing {}", self.x, self.y, self.facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::CellKind;

    fn world_3x3() -> World {
        World::new(3, 3).unwrap()
    }

    // =========================================================================
    // Movement
    // =========================================================================

    #[test]
    fn test_move_east() {
        let world = world_3x3();
        let mut agent = Agent::new(0, 0, Direction::East);
        agent.move_forward(&world).unwrap();
        assert_eq!(agent.position(), (1, 0));
    }

    #[test]
    fn test_move_north_increases_y() {
        let world = world_3x3();
        let mut agent = Agent::new(1, 1, Direction::North);
        agent.move_forward(&world).unwrap();
        assert_eq!(agent.position(), (1, 2));
    }

    #[test]
    fn test_move_into_wall_leaves_state_unchanged() {
        let mut world = world_3x3();
        world.set_contents(1, 0, CellKind::Wall).unwrap();
        let mut agent = Agent::new(0, 0, Direction::East);

        let err = agent.move_forward(&world).unwrap_err();
        assert!(matches!(err, ActionError::Blocked { x: 0, y: 0, .. }));
        assert_eq!(agent, Agent::new(0, 0, Direction::East));
    }

    #[test]
    fn test_move_off_grid_is_blocked() {
        let world = world_3x3();
        let mut agent = Agent::new(0, 0, Direction::South);
        assert!(agent.move_forward(&world).is_err());
        assert_eq!(agent, Agent::new(0, 0, Direction::South));

        let mut agent = Agent::new(2, 2, Direction::East);
        assert!(agent.move_forward(&world).is_err());
        assert_eq!(agent.position(), (2, 2));
    }

    #[test]
    fn test_turns() {
        let mut agent = Agent::new(0, 0, Direction::East);
        agent.turn_left();
        assert_eq!(agent.facing(), Direction::North);
        agent.turn_right();
        agent.turn_right();
        assert_eq!(agent.facing(), Direction::South);
    }

    // =========================================================================
    // Beepers
    // =========================================================================

    #[test]
    fn test_pick_up_empty_cell_fails_without_change() {
        let mut world = world_3x3();
        let before = world.clone();
        let mut agent = Agent::new(1, 1, Direction::East);

        let err = agent.pick_up(&mut world).unwrap_err();
        assert_eq!(err, ActionError::NoBeeper { x: 1, y: 1 });
        assert_eq!(world, before);
    }

    #[test]
    fn test_put_down_then_pick_up() {
        let mut world = world_3x3();
        let mut agent = Agent::new(2, 1, Direction::West);

        agent.perform(Action::PutDown, &mut world).unwrap();
        agent.perform(Action::PutDown, &mut world).unwrap();
        assert_eq!(world.beepers(2, 1).unwrap(), 2);

        agent.perform(Action::PickUp, &mut world).unwrap();
        assert_eq!(world.contents(2, 1).unwrap(), CellKind::Beepers(1));
    }

    // =========================================================================
    // Conditions
    // =========================================================================

    #[test]
    fn test_front_conditions() {
        let mut world = world_3x3();
        world.set_contents(1, 0, CellKind::Wall).unwrap();

        let agent = Agent::new(0, 0, Direction::East);
        assert!(agent.check(Condition::FrontIsBlocked, &world));
        assert!(!agent.check(Condition::FrontIsClear, &world));

        let agent = Agent::new(0, 0, Direction::North);
        assert!(agent.check(Condition::FrontIsClear, &world));

        let agent = Agent::new(0, 0, Direction::West);
        assert!(agent.check(Condition::FrontIsBlocked, &world));
    }

    #[test]
    fn test_beeper_conditions() {
        let mut world = world_3x3();
        world.set_contents(0, 0, CellKind::Beepers(1)).unwrap();

        let on_pile = Agent::new(0, 0, Direction::East);
        let elsewhere = Agent::new(1, 0, Direction::East);

        assert!(on_pile.check(Condition::BeepersPresent, &world));
        assert!(!on_pile.check(Condition::NoBeepersPresent, &world));
        assert!(elsewhere.check(Condition::NoBeepersPresent, &world));
    }

    #[test]
    fn test_facing_condition() {
        let world = world_3x3();
        let agent = Agent::new(0, 0, Direction::South);
        assert!(agent.check(Condition::Facing(Direction::South), &world));
        assert!(!agent.check(Condition::Facing(Direction::North), &world));
    }

    #[test]
    fn test_fits() {
        let mut world = world_3x3();
        world.set_contents(2, 2, CellKind::Wall).unwrap();
        assert!(Agent::new(0, 0, Direction::East).fits(&world));
        assert!(!Agent::new(2, 2, Direction::East).fits(&world));
        assert!(!Agent::new(3, 0, Direction::East).fits(&world));
    }
}
