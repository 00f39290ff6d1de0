//! # Karel program model
//!
//! This module defines the structured, user-authored form of a Karel
//! program. The editor builds it, the bytecode compiler consumes it.
//!
//! ## Documentation conventions
//!
//! - A *block* is one top-level [`node::Node`] of a [`program::Program`].
//! - The *line* of a block is its index in the program; every instruction
//!   compiled from a block, including nested and macro-expanded ones,
//!   reports that same line.

pub mod action;
pub mod condition;
pub mod node;
pub mod program;
