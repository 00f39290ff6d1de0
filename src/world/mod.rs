//! The grid world and the agent that moves through it.
//!
//! Coordinates are `(x, y)` with `(0, 0)` in the south-west corner:
//! east increases `x`, north increases `y`.

pub mod agent;
pub mod direction;
pub mod grid;

pub use agent::{ActionError, Agent};
pub use direction::Direction;
pub use grid::{CellKind, World, WorldError};
