use crate::command::{CommandFactory, ExecutableCommand};
use crate::env::Environment;
use crate::error::{ShellError, ShellResult};
use crate::interpreter::Factory;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Command that is not a builtin.
pub struct ExternalCommand {
    program: PathBuf,
    argv: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: PathBuf, argv: Vec<OsString>) -> Self {
        Self { program, argv }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &OsStr,
        args: &[OsString],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let program = resolve_program(env, name)?;
        let argv = std::iter::once(name.to_os_string())
            .chain(args.iter().cloned())
            .collect();
        Some(Box::new(ExternalCommand::new(program, argv)))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> ShellResult<()> {
        spawn_and_wait(&self.program, &self.argv, Stdio::inherit(), env, stdout)
    }
}

/// Start `program` with `argv` and block until it is gone.
///
/// `argv[0]` is passed through as typed, not as the resolved path. The child runs in
/// the session working directory with the session variables, unchanged, and writes to
/// `child_stdout`. Its exit status is logged and otherwise ignored: a program that
/// ran and failed is not an error of the shell.
pub(crate) fn spawn_and_wait(
    program: &Path,
    argv: &[OsString],
    child_stdout: Stdio,
    env: &Environment,
    out: &mut dyn Write,
) -> ShellResult<()> {
    let Some((name, args)) = argv.split_first() else {
        return Ok(());
    };
    out.flush()?;

    let mut cmd = std::process::Command::new(program);
    cmd.arg0(name)
        .args(args)
        .stdout(child_stdout)
        .envs(&env.vars)
        .current_dir(&env.current_dir);

    log::debug!("spawning {} as {argv:?}", program.display());
    let mut child = cmd.spawn().map_err(|source| ShellError::Spawn {
        program: name.to_string_lossy().into_owned(),
        source,
    })?;
    match child.wait() {
        Ok(status) => log::debug!("{name:?} finished: {status}"),
        Err(e) => log::warn!("{name:?}: wait failed: {e}"),
    }
    Ok(())
}

/// Find the executable for `name` using the session's `PATH` and working directory.
pub(crate) fn resolve_program(env: &Environment, name: &OsStr) -> Option<PathBuf> {
    let search_paths = env.get_var("PATH").unwrap_or_default();
    let found = find_command_path(search_paths, &env.current_dir, Path::new(name));
    log::debug!("resolved {name:?} to {found:?}");
    found
}

/// Resolve a command path the way `execvp` does.
///
/// Behavior:
/// - Empty name: `None`.
/// - Name containing a `/` (absolute, `./foo`, `bin/sh`): used as a path, relative to
///   `cwd` when not absolute; no `PATH` search.
/// - Anything else: each directory in `search_paths` is tried in order, relative
///   entries resolving against `cwd`.
///
/// Only executable regular files are returned.
pub fn find_command_path(search_paths: &OsStr, cwd: &Path, name: &Path) -> Option<PathBuf> {
    if name.as_os_str().is_empty() {
        return None;
    }

    if name.as_os_str().as_bytes().contains(&b'/') {
        let path = cwd.join(name);
        return is_executable(&path).then_some(path);
    }

    std::env::split_paths(search_paths)
        .map(|dir| cwd.join(dir).join(name))
        .find(|path| is_executable(path))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn make_executable(path: &Path) {
        File::create(path).expect("create file");
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    #[test]
    fn absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(OsStr::new("/nowhere"), Path::new("/"), path);
        assert_eq!(found.as_deref(), Some(path));
    }

    #[test]
    fn absolute_nonexisting() {
        let path = Path::new("/bin/nonexisting");
        assert!(find_command_path(OsStr::new("/bin"), Path::new("/"), path).is_none());
    }

    #[test]
    fn single_component_found_in_path() {
        let found = find_command_path(OsStr::new("/nowhere:/bin"), Path::new("/"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found, Path::new("/bin/sh"));
    }

    #[test]
    fn single_component_not_found_in_path() {
        let res = find_command_path(OsStr::new("/bin"), Path::new("/"), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    fn relative_path_resolves_against_cwd() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("bin")).unwrap();
        make_executable(&tmp.path().join("bin").join("tool"));

        let found = find_command_path(OsStr::new("/bin"), tmp.path(), Path::new("bin/tool"))
            .expect("Expected to find relative 'bin/tool'");
        assert!(found.ends_with("bin/tool"));

        let found = find_command_path(OsStr::new("/bin"), tmp.path(), Path::new("./bin/tool"));
        assert!(found.is_some());
    }

    #[test]
    fn bare_name_does_not_search_cwd() {
        let tmp = TempDir::new().unwrap();
        make_executable(&tmp.path().join("tool"));

        assert!(find_command_path(OsStr::new("/nowhere"), tmp.path(), Path::new("tool")).is_none());
        assert!(find_command_path(OsStr::new("."), tmp.path(), Path::new("tool")).is_some());
    }

    #[test]
    fn non_executable_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("notes")).unwrap();
        let search = tmp.path().as_os_str();
        assert!(find_command_path(search, Path::new("/"), Path::new("notes")).is_none());
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(OsStr::new("/bin"), Path::new("/"), Path::new("")).is_none());
    }

    #[test]
    fn resolve_program_without_path_finds_nothing() {
        let env = Environment::empty("/");
        assert!(resolve_program(&env, OsStr::new("sh")).is_none());
    }

    fn words(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn spawn_writes_to_given_stdout() {
        let tmp = TempDir::new().unwrap();
        let mut env = Environment::new();
        env.current_dir = tmp.path().to_path_buf();
        let file = File::create(tmp.path().join("out")).unwrap();
        let program = resolve_program(&env, OsStr::new("echo")).expect("echo on PATH");

        let argv = words(&["echo", "hello"]);
        let mut transcript: Vec<u8> = Vec::new();
        spawn_and_wait(&program, &argv, Stdio::from(file), &env, &mut transcript).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join("out")).unwrap(), "hello\n");
        assert!(transcript.is_empty());
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::empty(tmp.path());
        File::create(tmp.path().join("notes")).unwrap();

        let argv = words(&["notes"]);
        let res = spawn_and_wait(
            &tmp.path().join("notes"),
            &argv,
            Stdio::null(),
            &env,
            &mut std::io::sink(),
        );
        assert!(matches!(res, Err(ShellError::Spawn { .. })));
    }

    #[test]
    fn child_gets_variables_and_arguments_byte_for_byte() {
        let tmp = TempDir::new().unwrap();
        let mut env = Environment::new();
        env.current_dir = tmp.path().to_path_buf();
        env.set_var("MYSHELL_RAW", OsStr::from_bytes(b"caf\xe9"));
        let file = File::create(tmp.path().join("out")).unwrap();
        let program = resolve_program(&env, OsStr::new("sh")).expect("sh on PATH");

        let mut argv = words(&["sh", "-c", "printf '%s|%s' \"$MYSHELL_RAW\" \"$0\""]);
        argv.push(OsStr::from_bytes(b"\xff").to_os_string());
        spawn_and_wait(&program, &argv, Stdio::from(file), &env, &mut std::io::sink()).unwrap();

        assert_eq!(fs::read(tmp.path().join("out")).unwrap(), b"caf\xe9|\xff");
    }
}
