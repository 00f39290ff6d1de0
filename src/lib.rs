//! # Karel
//!
//! A structured-block robot language for a 2-D grid world.
//!
//! Programs are trees of [`lang::node::Node`] blocks plus a registry of
//! named macros. The [`bytecode::compile::Compiler`] flattens them into a
//! linear sequence of instructions with relative jumps, and the
//! [`runtime::interpreter::Interpreter`] steps through that sequence one
//! instruction at a time against a [`world::grid::World`] and its
//! [`world::agent::Agent`].
//!
//! [`session::Session`] ties the pieces together for a UI or CLI driver.

pub mod bytecode;
pub mod lang;
pub mod runtime;
pub mod session;
pub mod world;

pub use session::{Session, SessionError, StepReport};
