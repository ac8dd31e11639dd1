use crate::error::{ShellError, ShellResult};
use crate::lexer::{is_blank, split_args};
use std::ffi::{OsStr, OsString};

/// Names handled in-process; they can never be redirected.
pub const BUILTINS: [&str; 3] = ["exit", "cd", "pwd"];

pub fn is_builtin(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| BUILTINS.contains(&name))
}

/// How a redirected command treats its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectionMode {
    /// `>`: the target must not exist yet.
    Overwrite,
    /// `>+`: output goes in front of whatever the target already holds.
    Prepend,
}

impl RedirectionMode {
    pub fn delimiter(self) -> &'static [u8] {
        match self {
            RedirectionMode::Overwrite => b">",
            RedirectionMode::Prepend => b">+",
        }
    }
}

/// Result of looking at a raw command before parsing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Plain,
    Redirect(RedirectionMode),
}

/// A command whose standard output goes to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub argv: Vec<OsString>,
    pub target: OsString,
    pub mode: RedirectionMode,
}

/// A parsed command, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Nothing but whitespace; runs as a no-op.
    Empty,
    /// Built-in or external program, output on the terminal.
    Simple(Vec<OsString>),
    Redirect(Redirection),
}

/// Decide how to parse `raw` by plain substring search.
///
/// `>+` wins over `>`, since it contains one.
pub fn classify(raw: &[u8]) -> CommandKind {
    if find(raw, b">+").is_some() {
        CommandKind::Redirect(RedirectionMode::Prepend)
    } else if raw.contains(&b'>') {
        CommandKind::Redirect(RedirectionMode::Overwrite)
    } else {
        CommandKind::Plain
    }
}

/// Parse one command as produced by [`crate::lexer::split_commands`].
pub fn parse_command(raw: &[u8]) -> ShellResult<Command> {
    let kind = classify(raw);
    log::debug!("classified \"{}\" as {kind:?}", raw.escape_ascii());
    match kind {
        CommandKind::Plain => {
            let argv = split_args(raw);
            if argv.is_empty() {
                Ok(Command::Empty)
            } else {
                Ok(Command::Simple(argv))
            }
        }
        CommandKind::Redirect(mode) => parse_redirection(raw, mode),
    }
}

/// Split a redirected command into its argument vector and target filename.
///
/// Fails when:
/// - `raw` holds more than one `>` character (the one inside `>+` counts),
/// - either side of the delimiter is missing or only whitespace,
/// - the filename side is more than one word,
/// - the command is a built-in.
///
/// A command side that yields no words is [`Command::Empty`].
pub fn parse_redirection(raw: &[u8], mode: RedirectionMode) -> ShellResult<Command> {
    if raw.iter().filter(|&&b| b == b'>').count() > 1 {
        return Err(ShellError::Redirection("more than one '>'"));
    }

    let delimiter = mode.delimiter();
    let at = find(raw, delimiter)
        .ok_or(ShellError::Redirection("missing redirection operator"))?;
    let (command_part, target_part) = (&raw[..at], &raw[at + delimiter.len()..]);
    if is_blank(command_part) || is_blank(target_part) {
        return Err(ShellError::Redirection("missing command or filename"));
    }

    let mut targets = split_args(target_part);
    if targets.len() != 1 {
        return Err(ShellError::Redirection("filename must be a single word"));
    }

    let argv = split_args(command_part);
    let Some(name) = argv.first() else {
        return Ok(Command::Empty);
    };
    if is_builtin(name) {
        return Err(ShellError::RedirectedBuiltin(
            name.to_string_lossy().into_owned(),
        ));
    }

    Ok(Command::Redirect(Redirection {
        argv,
        target: targets.swap_remove(0),
        mode,
    }))
}

/// Offset of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
