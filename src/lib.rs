//! An embeddable interactive shell with typed command arguments.
//!
//! The host application declares commands as [`command::CommandSpec`]s, each
//! with named [`argument::ArgumentSpec`]s, and hands them to an [`Interpreter`].
//! The interpreter reads lines shaped like
//!
//! ```text
//! greet --name=Ada --times=3 --loud
//! ```
//!
//! binds `--name=value` and `--flag` tokens to the declared arguments, converts
//! values to their declared types and runs the command's action. Malformed
//! lines and failing commands are reported to the user and the loop goes on
//! until the exit command is entered.
//!
//! Commands can pass what they did on to [`event::CommandListener`]s attached
//! to the interpreter.

pub mod argument;
pub mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod event;
mod interpreter;
pub mod io_adapters;
mod lexer;
pub mod parser;
pub mod registry;
mod settings;

/// The interactive command runner and its lifecycle.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, State};
pub use settings::Settings;
