use serde::{Deserialize, Serialize};

use crate::lang::action::Action;
use crate::lang::condition::Condition;

// =============================================================================
// OP - Flat Karel instructions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Perform a primitive action on the agent.
    Act(Action),

    /// Evaluate the condition. If false, jump by the relative offset;
    /// if true, continue with the next instruction.
    JumpIfFalse(Condition, i64),

    /// Unconditional relative jump. Offset is added to the instruction's
    /// own index: Jump(1) is a no-op fall-through, Jump(2) skips one.
    Jump(i64),
}

/// One compiled instruction and the program line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub line: usize,
    pub op: Op,
}

impl Instruction {
    pub fn act(line: usize, action: Action) -> Self {
        Self {
            line,
            op: Op::Act(action),
        }
    }

    pub fn jump_if_false(line: usize, condition: Condition, offset: i64) -> Self {
        Self {
            line,
            op: Op::JumpIfFalse(condition, offset),
        }
    }

    pub fn jump(line: usize, offset: i64) -> Self {
        Self {
            line,
            op: Op::Jump(offset),
        }
    }

    /// Relative offset of a jump, if this is one.
    pub fn offset(&self) -> Option<i64> {
        match self.op {
            Op::Act(_) => None,
            Op::JumpIfFalse(_, offset) | Op::Jump(offset) => Some(offset),
        }
    }

    /// Absolute jump target when this instruction sits at `index`.
    pub fn target(&self, index: usize) -> Option<i64> {
        self.offset().map(|offset| index as i64 + offset)
    }
}
