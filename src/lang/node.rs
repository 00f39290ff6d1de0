use serde::{Deserialize, Serialize};

use super::action::Action;
use super::condition::Condition;

/// A structured code block of a Karel program.
///
/// Blocks form a tree: `If` and `Repeat` own their nested sequences, and
/// `Macro` refers by name to a body held in the
/// [`super::program::MacroRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    // ────────────────────────────── Actions ─────────────────────────────
    /// A single primitive action.
    ///
    /// Lowers to: `ACT action`
    Action(Action),

    // ─────────────────────────── Control flow ───────────────────────────
    /// Run `then_branch` when `condition` holds, `else_branch` otherwise.
    ///
    /// Lowers to: `JUMP_FALSE cond, +(T+2)` `<then>` `JUMP +(E+1)` `<else>`
    If {
        condition: Condition,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },

    /// Run `body` exactly `count` times. A count of zero is legal and
    /// produces nothing.
    ///
    /// Lowers to: `<body>` repeated `count` times (unrolled, no back-jump).
    Repeat { count: u32, body: Vec<Node> },

    // ───────────────────────────── Macros ───────────────────────────────
    /// Reference to a named macro, inlined at compile time.
    Macro(String),
}

impl Node {
    pub fn action(action: Action) -> Self {
        Node::Action(action)
    }

    pub fn if_else(condition: Condition, then_branch: Vec<Node>, else_branch: Vec<Node>) -> Self {
        Node::If {
            condition,
            then_branch,
            else_branch,
        }
    }

    pub fn repeat(count: u32, body: Vec<Node>) -> Self {
        Node::Repeat { count, body }
    }

    pub fn call(name: impl Into<String>) -> Self {
        Node::Macro(name.into())
    }

    /// Short label for the block, as shown in an editor list.
    pub fn label(&self) -> String {
        match self {
            Node::Action(action) => action.keyword().to_string(),
            Node::If { condition, .. } => format!("if {}", condition),
            Node::Repeat { count, .. } => format!("repeat {}", count),
            Node::Macro(name) => name.clone(),
        }
    }
}

impl From<Action> for Node {
    fn from(action: Action) -> Self {
        Node::Action(action)
    }
}
