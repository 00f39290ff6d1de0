use log::{debug, trace};

use crate::{
    bytecode::{CompiledProgram, Instruction, compile_error::CompileError},
    lang::{
        condition::Condition,
        node::Node,
        program::{MacroRegistry, Program},
    },
};

/// Most instructions a single compile may produce. Loops are unrolled, so
/// nested repeat counts multiply.
pub const MAX_INSTRUCTIONS: usize = 1 << 20;

/// Flattens a structured program into a linear instruction stream.
///
/// Lowering is pure and post-order: each block's children are compiled
/// first, so their lengths are known when the enclosing jumps are emitted
/// and no patching pass is needed.
pub struct Compiler<'a> {
    /// Macro bodies, inlined at every reference
    macros: &'a MacroRegistry,
}

impl<'a> Compiler<'a> {
    pub fn new(macros: &'a MacroRegistry) -> Self {
        Self { macros }
    }

    /// Compile every top-level block. Instructions produced from block `i`
    /// all carry line `i`.
    pub fn compile_program(&self, program: &Program) -> Result<CompiledProgram, CompileError> {
        let mut ops = Vec::new();
        for (line, node) in program.blocks.iter().enumerate() {
            let mut expanding = Vec::new();
            ops.extend(self.compile_node(node, line, &mut expanding)?);
            check_len(ops.len(), line)?;
        }

        debug!(
            "compiled {} blocks into {} instructions",
            program.len(),
            ops.len()
        );

        Ok(CompiledProgram::new(ops))
    }

    /// Compile one macro's body on its own, attributed to `line`.
    pub fn compile_macro(&self, name: &str, line: usize) -> Result<CompiledProgram, CompileError> {
        let mut expanding = Vec::new();
        let ops = self.expand_macro(name, line, &mut expanding)?;
        Ok(CompiledProgram::new(ops))
    }

    /// Compile a sequence of blocks in order. `expanding` is the stack of
    /// macro names currently being inlined.
    pub fn compile_nodes(
        &self,
        nodes: &[Node],
        line: usize,
        expanding: &mut Vec<String>,
    ) -> Result<Vec<Instruction>, CompileError> {
        let mut ops = Vec::new();
        for node in nodes {
            ops.extend(self.compile_node(node, line, expanding)?);
            check_len(ops.len(), line)?;
        }
        Ok(ops)
    }

    fn compile_node(
        &self,
        node: &Node,
        line: usize,
        expanding: &mut Vec<String>,
    ) -> Result<Vec<Instruction>, CompileError> {
        match node {
            Node::Action(action) => Ok(vec![Instruction::act(line, *action)]),

            Node::If {
                condition,
                then_branch,
                else_branch,
            } => self.compile_if(*condition, then_branch, else_branch, line, expanding),

            Node::Repeat { count, body } => self.compile_repeat(*count, body, line, expanding),

            Node::Macro(name) => self.expand_macro(name, line, expanding),
        }
    }

    /// Emit an if/else as jumps:
    /// ```text
    ///   JumpIfFalse(cond, T+2)   ; skip then + trailing jump
    ///   <then_ops>               ; T instructions
    ///   Jump(E+1)                ; skip else
    ///   <else_ops>               ; E instructions
    /// ```
    fn compile_if(
        &self,
        condition: Condition,
        then_branch: &[Node],
        else_branch: &[Node],
        line: usize,
        expanding: &mut Vec<String>,
    ) -> Result<Vec<Instruction>, CompileError> {
        let mut then_ops = self.compile_nodes(then_branch, line, expanding)?;
        let else_ops = self.compile_nodes(else_branch, line, expanding)?;

        then_ops.push(Instruction::jump(line, else_ops.len() as i64 + 1));

        let mut result = Vec::with_capacity(1 + then_ops.len() + else_ops.len());
        result.push(Instruction::jump_if_false(
            line,
            condition,
            then_ops.len() as i64 + 1,
        ));
        result.extend(then_ops);
        result.extend(else_ops);
        Ok(result)
    }

    /// Unroll a counted loop: the body is lowered once and repeated
    /// verbatim. The body is lowered even when `count` is zero, so bad
    /// macro references inside it are still reported. The unrolled size is
    /// checked before anything is copied.
    fn compile_repeat(
        &self,
        count: u32,
        body: &[Node],
        line: usize,
        expanding: &mut Vec<String>,
    ) -> Result<Vec<Instruction>, CompileError> {
        let body_ops = self.compile_nodes(body, line, expanding)?;

        let total = body_ops
            .len()
            .checked_mul(count as usize)
            .ok_or(CompileError::TooManyInstructions {
                line,
                limit: MAX_INSTRUCTIONS,
            })?;
        check_len(total, line)?;

        let mut result = Vec::with_capacity(total);
        for _ in 0..count {
            result.extend_from_slice(&body_ops);
        }
        Ok(result)
    }

    fn expand_macro(
        &self,
        name: &str,
        line: usize,
        expanding: &mut Vec<String>,
    ) -> Result<Vec<Instruction>, CompileError> {
        if let Some(start) = expanding.iter().position(|active| active == name) {
            let mut chain = expanding[start..].to_vec();
            chain.push(name.to_string());
            return Err(CompileError::MacroCycle { chain });
        }

        let body = self
            .macros
            .get(name)
            .ok_or_else(|| CompileError::UnknownMacro {
                name: name.to_string(),
                line,
            })?;

        trace!("expanding macro '{}' at line {}", name, line);

        expanding.push(name.to_string());
        let result = self.compile_nodes(body, line, expanding);
        expanding.pop();
        result
    }
}

fn check_len(len: usize, line: usize) -> Result<(), CompileError> {
    if len > MAX_INSTRUCTIONS {
        return Err(CompileError::TooManyInstructions {
            line,
            limit: MAX_INSTRUCTIONS,
        });
    }
    Ok(())
}
