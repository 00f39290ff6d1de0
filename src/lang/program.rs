use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node::Node;

/// A Karel program: the ordered top-level blocks built by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub blocks: Vec<Node>,
}

impl Program {
    pub fn new(blocks: Vec<Node>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, line: usize) -> Option<&Node> {
        self.blocks.get(line)
    }

    pub fn push(&mut self, node: Node) {
        self.blocks.push(node);
    }

    /// Insert `node` so it becomes block `line`. Returns `false` if `line`
    /// is past the end.
    pub fn insert(&mut self, line: usize, node: Node) -> bool {
        if line > self.blocks.len() {
            return false;
        }
        self.blocks.insert(line, node);
        true
    }

    pub fn remove(&mut self, line: usize) -> Option<Node> {
        if line < self.blocks.len() {
            Some(self.blocks.remove(line))
        } else {
            None
        }
    }

    /// Swap in `node` at `line`, returning the block it replaced.
    pub fn replace(&mut self, line: usize, node: Node) -> Option<Node> {
        self.blocks
            .get_mut(line)
            .map(|slot| std::mem::replace(slot, node))
    }
}

impl From<Vec<Node>> for Program {
    fn from(blocks: Vec<Node>) -> Self {
        Self { blocks }
    }
}

/// Named, reusable macro bodies.
///
/// Names are unique; adding a macro under an existing name replaces its
/// body. A body must not reach its own name through references; the
/// compiler rejects such cycles with
/// [`crate::bytecode::compile_error::CompileError::MacroCycle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRegistry {
    macros: BTreeMap<String, Vec<Node>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a macro. Returns the previous body, if any.
    pub fn insert(&mut self, name: impl Into<String>, body: Vec<Node>) -> Option<Vec<Node>> {
        self.macros.insert(name.into(), body)
    }

    pub fn get(&self, name: &str) -> Option<&[Node]> {
        self.macros.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Node>> {
        self.macros.remove(name)
    }

    /// Macro names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
