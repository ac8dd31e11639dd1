use crate::command::{CommandFactory, ExecutableCommand};
use crate::env::Environment;
use crate::error::{ShellError, ShellResult};
use crate::interpreter::Factory;
use argh::{EarlyExit, FromArgs};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "pwd" or "cd".
    fn name() -> &'static str;

    /// Parse the words following the name.
    ///
    /// argh only takes `&str`, so it sees a lossy copy of `args`; built-ins whose
    /// arguments are paths take the raw words back afterwards.
    fn from_os_args(args: &[OsString]) -> Result<Self, EarlyExit> {
        let args = lossy(args);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Self::from_args(&[Self::name()], &args)
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> ShellResult<()>;
}

fn lossy(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> ShellResult<()> {
        T::execute(*self, stdout, env)
    }
}

/// Stand-in for a builtin whose arguments argh refused.
struct InvalidArgs {
    name: String,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> ShellResult<()> {
        Err(ShellError::Usage(self.name))
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &OsStr,
        args: &[OsString],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_os_args(args) {
            Ok(cmd) => Box::new(cmd),
            // --help counts too: built-ins take no flags.
            Err(EarlyExit { output, .. }) => {
                log::debug!(
                    "{}: rejected arguments {args:?}: {}",
                    T::name(),
                    output.trim_end()
                );
                Box::new(InvalidArgs {
                    name: T::name().to_string(),
                })
            }
        })
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> ShellResult<()> {
        stdout.write_all(env.current_dir.as_os_str().as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    pub target: Option<PathBuf>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_os_args(args: &[OsString]) -> Result<Self, EarlyExit> {
        let words = lossy(args);
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut cd = Self::from_args(&[Self::name()], &words)?;
        // The positional is always last, also after `--`.
        if cd.target.is_some() {
            cd.target = args.last().map(PathBuf::from);
        }
        Ok(cd)
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> ShellResult<()> {
        let target = match self.target {
            Some(t) => t,
            None => match env.get_var("HOME") {
                Some(home) if !home.is_empty() => PathBuf::from(home),
                _ => return Err(ShellError::HomeUnset),
            },
        };

        let new_dir = env.resolve(target);
        let canonical =
            fs::canonicalize(&new_dir).map_err(|e| ShellError::resource(&new_dir, e))?;
        if !canonical.is_dir() {
            return Err(ShellError::NotADirectory(canonical));
        }

        log::debug!("cd: {}", canonical.display());
        env.current_dir = canonical;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Leave the shell.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> ShellResult<()> {
        env.should_exit = true;
        Ok(())
    }
}
