use crate::env::Environment;
use crate::error::ShellResult;
use std::ffi::{OsStr, OsString};
use std::io::Write;

/// Object-safe trait for any command the interpreter can run.
///
/// Implemented by the built-ins via a blanket impl and by external programs.
/// `stdout` is the interpreter's own output stream; external programs only flush
/// it before they start, so their output stays in order with the transcript.
pub trait ExecutableCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment)
    -> ShellResult<()>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize `name`. Implementations may use
/// the environment to resolve executables (e.g. through `PATH`).
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        name: &OsStr,
        args: &[OsString],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
