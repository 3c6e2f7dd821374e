//! A tiny interactive command interpreter.
//!
//! This crate reads lines from an input stream, splits them into a command
//! and its arguments, executes a small fixed set of built-in commands
//! (`exit`, `echo`, `type`, `pwd`, `cd`), and otherwise resolves external
//! programs on the search path and launches them, forwarding their output.
//! It is intentionally small and easy to read: no quoting, redirection,
//! pipelines, or job control.
//!
//! The main entry point is [`Interpreter`], which dispatches tokenized lines
//! to builtins or to the external command launcher using a set of pluggable
//! factories. The public modules [`command`] and [`env`] expose the traits
//! and session state needed to implement your own commands.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
mod lexer;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
