use serde::{Deserialize, Serialize};

use crate::world::direction::Direction;

/// A read-only predicate over the agent and the world.
///
/// Conditions guard `If` blocks. Evaluating one never mutates state and
/// never fails; see [`crate::world::agent::Agent::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// The cell ahead is inside the grid and not a wall.
    FrontIsClear,

    /// The cell ahead is a wall or off-grid.
    FrontIsBlocked,

    /// The current cell holds at least one beeper.
    BeepersPresent,

    /// The current cell holds no beeper.
    NoBeepersPresent,

    /// The agent faces the given direction.
    Facing(Direction),
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::FrontIsClear => write!(f, "front_is_clear"),
            Condition::FrontIsBlocked => write!(f, "front_is_blocked"),
            Condition::BeepersPresent => write!(f, "beepers_present"),
            Condition::NoBeepersPresent => write!(f, "no_beepers_present"),
            Condition::Facing(dir) => write!(f, "facing_{}", dir),
        }
    }
}
