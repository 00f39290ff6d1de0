use serde::{Deserialize, Serialize};

/// A primitive robot action.
///
/// Actions are the only instructions that touch the world. Each one maps
/// onto exactly one [`crate::world::agent::Agent`] primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step one cell forward. Fails if the cell ahead is a wall or off-grid.
    Move,

    /// Take one beeper from the current cell. Fails if there is none.
    PickUp,

    /// Drop one beeper on the current cell. Always succeeds.
    PutDown,

    /// Rotate 90° counter-clockwise.
    TurnLeft,

    /// Rotate 90° clockwise.
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Move,
        Action::PickUp,
        Action::PutDown,
        Action::TurnLeft,
        Action::TurnRight,
    ];

    /// Keyword used by the disassembler and in status messages.
    pub fn keyword(&self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::PickUp => "pick_up",
            Action::PutDown => "put_down",
            Action::TurnLeft => "turn_left",
            Action::TurnRight => "turn_right",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
