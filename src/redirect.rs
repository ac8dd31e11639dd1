//! Running a program with its standard output sent to a file.
//!
//! A target that does not exist yet is created and receives the output, whatever
//! the mode. An existing target is refused with `>`; with `>+` the new output is put
//! in front of the old content, which is staged in a scratch file meanwhile.
//!
//! Once the target is open it stands in for the program's output entirely: a
//! program that cannot be found or started leaves the error message in the target,
//! not on the terminal.

use crate::config::Config;
use crate::env::Environment;
use crate::error::{self, ShellError, ShellResult};
use crate::external::{resolve_program, spawn_and_wait};
use crate::parser::{Redirection, RedirectionMode};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Permissions for files the shell creates: `rw-r--r--`.
const CREATE_MODE: u32 = 0o644;

pub(crate) fn run_redirection(
    redir: &Redirection,
    env: &Environment,
    config: &Config,
    out: &mut dyn Write,
) -> ShellResult<()> {
    let target = env.resolve(&redir.target);
    let exists = target.exists();
    log::debug!(
        "redirect {:?} ({:?}) to {} (exists: {exists})",
        redir.argv,
        redir.mode,
        target.display()
    );

    match (exists, redir.mode) {
        (true, RedirectionMode::Overwrite) => Err(ShellError::TargetExists(target)),
        (true, RedirectionMode::Prepend) => {
            let scratch = env.resolve(&config.scratch);
            prepend_output(&redir.argv, &target, &scratch, env, out)
        }
        (false, _) => write_output(&redir.argv, &target, env, out),
    }
}

/// Send the output of `argv` into `target`, which does not exist yet.
fn write_output(
    argv: &[OsString],
    target: &Path,
    env: &Environment,
    out: &mut dyn Write,
) -> ShellResult<()> {
    let file = create_options()
        .read(true)
        .write(true)
        .create(true)
        .open(target)
        .map_err(|e| ShellError::resource(target, e))?;

    exec_into(argv, target, file, env, out)
}

/// Put the output of `argv` in front of the current content of `target`.
///
/// The old content is copied aside, the target is truncated and handed to the
/// child, and once the child is gone the old content is appended back. The old
/// content is put back even when the child could not be started.
fn prepend_output(
    argv: &[OsString],
    target: &Path,
    scratch: &Path,
    env: &Environment,
    out: &mut dyn Write,
) -> ShellResult<()> {
    if same_file(target, scratch) {
        return Err(ShellError::ScratchConflict(target.to_path_buf()));
    }

    let staged = Scratch::stage(target, scratch.to_path_buf())?;
    let truncated = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(target)
        .map_err(|e| ShellError::resource(target, e))?;
    let ran = exec_into(argv, target, truncated, env, out);

    staged.restore_into(target)?;
    ran
}

/// Run `argv` with `file` as its standard output.
///
/// When the program cannot be found or started, the error message is written
/// into `file` in place of its output and the command counts as done.
fn exec_into(
    argv: &[OsString],
    target: &Path,
    file: File,
    env: &Environment,
    out: &mut dyn Write,
) -> ShellResult<()> {
    let mut failure_sink = file
        .try_clone()
        .map_err(|e| ShellError::resource(target, e))?;
    let ran = lookup(env, argv)
        .and_then(|program| spawn_and_wait(&program, argv, Stdio::from(file), env, out));

    match ran {
        Err(err @ (ShellError::CommandNotFound(_) | ShellError::Spawn { .. })) => {
            error::report(&mut failure_sink, &err).map_err(|e| ShellError::resource(target, e))
        }
        other => other,
    }
}

fn lookup(env: &Environment, argv: &[OsString]) -> ShellResult<PathBuf> {
    let name = argv.first().map(OsString::as_os_str).unwrap_or_default();
    resolve_program(env, name)
        .ok_or_else(|| ShellError::CommandNotFound(name.to_string_lossy().into_owned()))
}

fn same_file(a: &Path, b: &Path) -> bool {
    matches!(
        (fs::canonicalize(a), fs::canonicalize(b)),
        (Ok(a), Ok(b)) if a == b
    )
}

fn create_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.mode(CREATE_MODE);
    options
}

/// A copy of a file's content, removed again when dropped.
struct Scratch {
    path: PathBuf,
    file: File,
}

impl Scratch {
    /// Copy all of `source` into a fresh file at `path`, rewound for reading.
    fn stage(source: &Path, path: PathBuf) -> ShellResult<Self> {
        let mut original = File::open(source).map_err(|e| ShellError::resource(source, e))?;
        let file = create_options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| ShellError::resource(&path, e))?;

        let mut scratch = Scratch { path, file };
        let copied = io::copy(&mut original, &mut scratch.file)
            .map_err(|e| ShellError::resource(&scratch.path, e))?;
        scratch
            .file
            .seek(SeekFrom::Start(0))
            .map_err(|e| ShellError::resource(&scratch.path, e))?;
        log::debug!("staged {copied} bytes of {} in {}", source.display(), scratch.path.display());
        Ok(scratch)
    }

    /// Append the staged bytes to the end of `target`.
    fn restore_into(mut self, target: &Path) -> ShellResult<()> {
        let mut dest = OpenOptions::new()
            .append(true)
            .open(target)
            .map_err(|e| ShellError::resource(target, e))?;
        io::copy(&mut self.file, &mut dest).map_err(|e| ShellError::resource(target, e))?;
        Ok(())
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("could not remove {}: {e}", self.path.display());
        }
    }
}
