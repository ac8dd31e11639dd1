use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// The one diagnostic the user ever sees, whatever went wrong.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Everything that can make a single command fail.
///
/// The variants carry detail for the debug log only. Users always get
/// [`ERROR_MESSAGE`], see [`report`].
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}: invalid arguments")]
    Usage(String),

    #[error("invalid redirection: {0}")]
    Redirection(&'static str),

    #[error("{0}: cannot redirect output of a built-in")]
    RedirectedBuiltin(String),

    #[error("{}: file exists", .0.display())]
    TargetExists(PathBuf),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: scratch file cannot be its own redirection target", .0.display())]
    ScratchConflict(PathBuf),

    #[error("cd: HOME not set")]
    HomeUnset,

    #[error("cd: {}: not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("end of input")]
    EndOfInput,

    #[error("line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Wrap an I/O failure on a named file.
    pub fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ShellError::Resource {
            path: path.into(),
            source,
        }
    }
}

pub type ShellResult<T> = Result<T, ShellError>;

/// Write the canonical error message to `out`.
///
/// The error itself only goes to the debug log.
pub fn report(out: &mut dyn Write, err: &ShellError) -> io::Result<()> {
    log::debug!("reporting error: {err}");
    out.write_all(ERROR_MESSAGE.as_bytes())?;
    out.flush()
}
