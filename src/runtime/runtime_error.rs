use thiserror::Error;

use super::interpreter::RunState;

/// Misuse of the interpreter by its driver.
///
/// Agent failures such as walking into a wall are not runtime errors: they
/// end the run in [`RunState::Failed`] and are reported through the status
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("runtime error: no compiled program\n  hint: compile the program before stepping")]
    NotCompiled,

    #[error("runtime error: run already {state}\n  hint: recompile to start a fresh run")]
    RunFinished { state: RunState },

    #[error(
        "runtime error: jump out of bounds: ip={index}, offset={offset}, target={target}, length={len}"
    )]
    JumpOutOfBounds {
        index: usize,
        offset: i64,
        target: i64,
        len: usize,
    },

    #[error("runtime error: execution step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },
}
