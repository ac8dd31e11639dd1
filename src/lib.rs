//! A tiny line-oriented command interpreter.
//!
//! Each input line is split on `;` into commands. A command is either one of the
//! built-ins (`exit`, `cd`, `pwd`), an external program, or an external program whose
//! standard output is redirected into a file with `>` (create only) or `>+` (prepend
//! to an existing file).
//!
//! The main entry points are [`Interpreter`], which executes one line at a time
//! against an [`env::Environment`], and [`Session`], which frames input lines from a
//! reader and drives an interpreter until end of input or `exit`.
//!
//! Every failure is reported to the user with the same fixed message, see
//! [`error::ERROR_MESSAGE`].

mod builtin;
pub mod cli;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
pub mod framer;
mod interpreter;
pub mod lexer;
pub mod parser;
mod redirect;
mod session;

pub use interpreter::Interpreter;
pub use session::{Mode, Session};
