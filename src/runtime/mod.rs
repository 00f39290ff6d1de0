pub mod interpreter;
pub mod runtime_error;

pub use interpreter::{Interpreter, InterpreterConfig, RunState};
pub use runtime_error::RuntimeError;
