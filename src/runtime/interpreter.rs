use log::{info, trace, warn};

use crate::bytecode::{CompiledProgram, Op};
use crate::runtime::runtime_error::RuntimeError;
use crate::world::{Agent, World};

/// Where the interpreter is in its lifecycle.
///
/// `Completed` and `Failed` are terminal until a fresh program is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No instruction sequence loaded.
    #[default]
    Uncompiled,
    /// Loaded, cursor at the first instruction.
    Ready,
    /// At least one instruction executed, more remain.
    Running,
    /// The cursor ran past the last instruction.
    Completed,
    /// An action could not be carried out. The cursor stays on it.
    Failed,
}

impl RunState {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Uncompiled => "uncompiled",
            RunState::Ready => "ready",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterpreterConfig {
    /// Cap on steps taken by [`Interpreter::run_to_completion`]. Compiled
    /// programs always terminate; this guards hand-built sequences.
    pub max_steps: Option<usize>,
}

/// Steps a compiled program one instruction at a time against an agent
/// and its world.
///
/// Each [`step`](Interpreter::step) does a bounded amount of work and
/// returns, so a UI can redraw between steps.
#[derive(Debug, Default)]
pub struct Interpreter {
    program: Option<CompiledProgram>,
    cursor: usize,
    state: RunState,
    last_line: Option<usize>,
    last_status: String,
    trace: Vec<String>,
    steps: usize,
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Install a freshly compiled program and rewind to its start.
    pub fn load(&mut self, program: CompiledProgram) {
        self.program = Some(program);
        self.cursor = 0;
        self.state = RunState::Ready;
        self.last_line = None;
        self.last_status = "ready".to_string();
        self.trace.clear();
        self.steps = 0;
    }

    /// Drop the compiled program. Stepping fails until the next `load`.
    pub fn invalidate(&mut self) {
        self.program = None;
        self.cursor = 0;
        self.state = RunState::Uncompiled;
        self.last_line = None;
        self.last_status.clear();
        self.trace.clear();
        self.steps = 0;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn program(&self) -> Option<&CompiledProgram> {
        self.program.as_ref()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Status line for the most recent step.
    pub fn last_status_message(&self) -> &str {
        &self.last_status
    }

    /// One status line per executed step, oldest first.
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    /// Line of the instruction last executed, or of the one about to run
    /// if nothing has executed yet.
    pub fn current_source_line(&self) -> Option<usize> {
        self.last_line.or_else(|| {
            self.program
                .as_ref()
                .and_then(|p| p.get(self.cursor))
                .map(|instr| instr.line)
        })
    }

    /// Execute the instruction under the cursor.
    ///
    /// Returns `Ok(true)` if more steps can follow, `Ok(false)` once the
    /// run has completed or failed. A failed action is reported through
    /// the status message and leaves agent, world and cursor untouched.
    pub fn step(&mut self, agent: &mut Agent, world: &mut World) -> Result<bool, RuntimeError> {
        let program = self.program.as_ref().ok_or(RuntimeError::NotCompiled)?;

        if self.state.is_finished() {
            return Err(RuntimeError::RunFinished { state: self.state });
        }

        let len = program.len();
        let Some(instr) = program.get(self.cursor).copied() else {
            self.complete("program completed".to_string());
            return Ok(false);
        };

        self.steps += 1;
        trace!("step {} ip={} {:?}", self.steps, self.cursor, instr.op);

        let line = instr.line;
        let (next, status) = match instr.op {
            Op::Act(action) => match agent.perform(action, world) {
                Ok(()) => (
                    self.cursor + 1,
                    format!("line {}: {} ok, agent at {}", line, action, agent),
                ),
                Err(e) => {
                    let status = format!("line {}: {} failed: {}", line, action, e);
                    warn!("{}", status);
                    self.last_line = Some(line);
                    self.state = RunState::Failed;
                    self.record(status);
                    return Ok(false);
                }
            },

            Op::JumpIfFalse(condition, offset) => {
                let holds = agent.check(condition, world);
                let next = if holds {
                    self.cursor + 1
                } else {
                    jump_target(self.cursor, offset, len)?
                };
                let verdict = if holds { "true" } else { "false" };
                (next, format!("line {}: {} is {}", line, condition, verdict))
            }

            Op::Jump(offset) => (
                jump_target(self.cursor, offset, len)?,
                format!("line {}: jump", line),
            ),
        };

        self.cursor = next;
        self.last_line = Some(line);

        if self.cursor >= len {
            self.complete(format!("{}; program completed", status));
            Ok(false)
        } else {
            self.state = RunState::Running;
            self.record(status);
            Ok(true)
        }
    }

    /// Step until the run completes or fails. Returns the final state.
    pub fn run_to_completion(
        &mut self,
        agent: &mut Agent,
        world: &mut World,
    ) -> Result<RunState, RuntimeError> {
        loop {
            if let Some(limit) = self.config.max_steps {
                if self.steps >= limit {
                    return Err(RuntimeError::StepLimitExceeded { limit });
                }
            }
            if !self.step(agent, world)? {
                return Ok(self.state);
            }
        }
    }

    fn complete(&mut self, status: String) {
        info!("run completed after {} steps", self.steps);
        self.state = RunState::Completed;
        self.record(status);
    }

    fn record(&mut self, status: String) {
        self.trace.push(status.clone());
        self.last_status = status;
    }
}

fn jump_target(index: usize, offset: i64, len: usize) -> Result<usize, RuntimeError> {
    let target = index as i64 + offset;
    if target < 0 || target as u64 > len as u64 {
        return Err(RuntimeError::JumpOutOfBounds {
            index,
            offset,
            target,
            len,
        });
    }
    Ok(target as usize)
}
