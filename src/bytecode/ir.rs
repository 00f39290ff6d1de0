use crate::bytecode::Instruction;
use serde::{Deserialize, Serialize};

/// A compiled Karel program: one flat, index-addressable instruction
/// stream. Jump offsets are relative to the jumping instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub ops: Vec<Instruction>,
}

impl CompiledProgram {
    pub fn new(ops: Vec<Instruction>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.ops.get(index)
    }
}

impl From<Vec<Instruction>> for CompiledProgram {
    fn from(ops: Vec<Instruction>) -> Self {
        Self { ops }
    }
}
