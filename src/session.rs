//! A Karel session: one world, one agent, the user's program and macros,
//! and at most one live run.
//!
//! Editing the program or the macros drops the compiled run; the driver
//! must call [`Session::compile_program`] again before stepping.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bytecode::{CompileError, CompiledProgram, Compiler};
use crate::lang::node::Node;
use crate::lang::program::{MacroRegistry, Program};
use crate::runtime::{Interpreter, InterpreterConfig, RunState, RuntimeError};
use crate::world::{Agent, CellKind, Direction, World, WorldError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("invalid session: {0}")]
    Invalid(String),

    #[error("cannot access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode binary session: {0}")]
    Decode(#[from] postcard::Error),

    #[error("cannot decode json session: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a driver reads back after each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Whether another step may follow.
    pub continues: bool,
    pub state: RunState,
    pub status: String,
    pub line: Option<usize>,
    pub agent: Agent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    world: World,
    agent: Agent,
    program: Program,
    macros: MacroRegistry,
    /// Derived from `program` and `macros`; never persisted.
    #[serde(skip)]
    interpreter: Interpreter,
}

impl Session {
    /// An empty `width` x `height` world with the agent at (0, 0) facing east.
    pub fn new(width: usize, height: usize) -> Result<Self, SessionError> {
        Self::with_world(World::new(width, height)?)
    }

    /// A prepared world with the agent at (0, 0) facing east.
    pub fn with_world(world: World) -> Result<Self, SessionError> {
        Self::with_agent(world, Agent::new(0, 0, Direction::East))
    }

    pub fn with_agent(world: World, agent: Agent) -> Result<Self, SessionError> {
        let session = Self {
            world,
            agent,
            program: Program::default(),
            macros: MacroRegistry::new(),
            interpreter: Interpreter::new(),
        };
        session.validate()?;
        Ok(session)
    }

    /// Replace the interpreter configuration. Drops any compiled run.
    pub fn set_config(&mut self, config: InterpreterConfig) {
        self.interpreter = Interpreter::with_config(config);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn macros(&self) -> &MacroRegistry {
        &self.macros
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn state(&self) -> RunState {
        self.interpreter.state()
    }

    pub fn current_source_line(&self) -> Option<usize> {
        self.interpreter.current_source_line()
    }

    pub fn last_status_message(&self) -> &str {
        self.interpreter.last_status_message()
    }

    pub fn trace(&self) -> &[String] {
        self.interpreter.trace()
    }

    // -------------------------------------------------------------------------
    // World and agent setup
    // -------------------------------------------------------------------------

    /// Change one cell. A wall cannot be placed under the agent.
    pub fn set_cell(&mut self, x: usize, y: usize, kind: CellKind) -> Result<(), SessionError> {
        if kind == CellKind::Wall && self.agent.position() == (x, y) {
            return Err(SessionError::Invalid(format!(
                "cannot place a wall under the agent at ({}, {})",
                x, y
            )));
        }
        self.world.set_contents(x, y, kind)?;
        Ok(())
    }

    /// Move the agent somewhere else, e.g. before a fresh run.
    pub fn place_agent(&mut self, agent: Agent) -> Result<(), SessionError> {
        if !agent.fits(&self.world) {
            return Err(SessionError::Invalid(format!(
                "agent at {} is not on an open cell",
                agent
            )));
        }
        self.agent = agent;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Program editing
    // -------------------------------------------------------------------------

    pub fn set_program(&mut self, program: Program) {
        self.program = program;
        self.invalidate();
    }

    pub fn push_block(&mut self, node: Node) {
        self.program.push(node);
        self.invalidate();
    }

    pub fn insert_block(&mut self, line: usize, node: Node) -> Result<(), SessionError> {
        if !self.program.insert(line, node) {
            return Err(SessionError::Invalid(format!(
                "cannot insert at line {} of a {}-block program",
                line,
                self.program.len()
            )));
        }
        self.invalidate();
        Ok(())
    }

    pub fn remove_block(&mut self, line: usize) -> Option<Node> {
        let removed = self.program.remove(line);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    pub fn replace_block(&mut self, line: usize, node: Node) -> Option<Node> {
        let replaced = self.program.replace(line, node);
        if replaced.is_some() {
            self.invalidate();
        }
        replaced
    }

    // -------------------------------------------------------------------------
    // Macros
    // -------------------------------------------------------------------------

    /// Define or redefine a macro. Returns the body it replaced.
    pub fn add_macro(&mut self, name: impl Into<String>, body: Vec<Node>) -> Option<Vec<Node>> {
        let previous = self.macros.insert(name, body);
        self.invalidate();
        previous
    }

    pub fn has_macro(&self, name: &str) -> bool {
        self.macros.contains(name)
    }

    pub fn macro_body(&self, name: &str) -> Option<&[Node]> {
        self.macros.get(name)
    }

    pub fn remove_macro(&mut self, name: &str) -> Option<Vec<Node>> {
        let removed = self.macros.remove(name);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------

    /// Compile the current program and macros and rewind to a fresh run.
    /// Returns the number of instructions. On error no run is available.
    pub fn compile_program(&mut self) -> Result<usize, CompileError> {
        match Compiler::new(&self.macros).compile_program(&self.program) {
            Ok(compiled) => {
                let len = compiled.len();
                self.interpreter.load(compiled);
                Ok(len)
            }
            Err(e) => {
                debug!("compile failed: {}", e);
                self.interpreter.invalidate();
                Err(e)
            }
        }
    }

    /// The instruction sequence of the current run, if compiled.
    pub fn compiled(&self) -> Option<&CompiledProgram> {
        self.interpreter.program()
    }

    /// Execute one instruction and report the outcome.
    pub fn step(&mut self) -> Result<StepReport, RuntimeError> {
        let continues = self.interpreter.step(&mut self.agent, &mut self.world)?;
        Ok(self.report(continues))
    }

    /// Step until the run completes or fails.
    pub fn run_to_completion(&mut self) -> Result<RunState, RuntimeError> {
        self.interpreter
            .run_to_completion(&mut self.agent, &mut self.world)
    }

    fn report(&self, continues: bool) -> StepReport {
        StepReport {
            continues,
            state: self.interpreter.state(),
            status: self.interpreter.last_status_message().to_string(),
            line: self.interpreter.current_source_line(),
            agent: self.agent,
        }
    }

    fn invalidate(&mut self) {
        if self.interpreter.state() != RunState::Uncompiled {
            debug!("program edited, dropping compiled run");
        }
        self.interpreter.invalidate();
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        let session: Session = postcard::from_bytes(bytes)?;
        session.validate()?;
        Ok(session)
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        let session: Session = serde_json::from_str(text)?;
        session.validate()?;
        Ok(session)
    }

    /// Write the session to `path`: JSON for `.json` files, postcard
    /// otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        if is_json(path) {
            std::fs::write(path, self.to_json()?)?;
        } else {
            std::fs::write(path, self.to_bytes()?)?;
        }
        debug!("saved session to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let session = if is_json(path) {
            Self::from_json(&std::fs::read_to_string(path)?)?
        } else {
            Self::from_bytes(&std::fs::read(path)?)?
        };
        debug!("loaded session from {}", path.display());
        Ok(session)
    }

    fn validate(&self) -> Result<(), SessionError> {
        self.world.validate()?;
        if !self.agent.fits(&self.world) {
            return Err(SessionError::Invalid(format!(
                "agent at {} is outside the {}x{} world or on a wall",
                self.agent,
                self.world.width(),
                self.world.height()
            )));
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}
