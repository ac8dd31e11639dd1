use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Session state shared by built-ins and spawned programs.
///
/// The environment contains:
/// - `vars`: environment variables handed to every spawned program, and where
///   `cd` looks up `HOME`.
/// - `current_dir`: the working directory. `cd` changes it, `pwd` prints it, every
///   child starts in it, and relative redirection targets resolve against it.
/// - `should_exit`: set by `exit`; the session stops once it sees it.
///
/// The process working directory is never changed; this value is the only source
/// of truth for the session.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<OsString, OsString>,
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Snapshot the current process variables and working directory.
    ///
    /// Names and values are kept as raw OS strings, so variables that are not
    /// valid Unicode reach spawned programs byte for byte.
    pub fn new() -> Self {
        let vars = stdenv::vars_os().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    /// An environment with no variables, rooted at `current_dir`.
    pub fn empty(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: current_dir.into(),
            should_exit: false,
        }
    }

    pub fn get_var(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn set_var(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Resolve `path` against the session working directory.
    pub fn resolve(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        if path.is_absolute() {
            path
        } else {
            self.current_dir.join(path)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
