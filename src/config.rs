use std::path::PathBuf;

/// Prompt printed before every interactive read.
pub const DEFAULT_PROMPT: &str = "myshell> ";

/// Bytes taken per read; a read this long without a newline is an overlong line.
pub const DEFAULT_LINE_LIMIT: usize = 513;

/// Scratch file used to stage a file's old content during `>+`.
pub const DEFAULT_SCRATCH: &str = "temp";

/// Fixed knobs of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub line_limit: usize,
    /// Relative names resolve against the session working directory.
    pub scratch: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            line_limit: DEFAULT_LINE_LIMIT,
            scratch: PathBuf::from(DEFAULT_SCRATCH),
        }
    }
}
