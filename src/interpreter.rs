use crate::command::CommandFactory;
use crate::config::Config;
use crate::env::Environment;
use crate::error::{self, ShellError, ShellResult};
use crate::lexer;
use crate::parser::{self, Command};
use crate::redirect;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: BuiltinCommand and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Executes lines of commands against a session [`Environment`].
///
/// The interpreter keeps the environment (working directory, variables, exit flag)
/// and a list of [`CommandFactory`] objects that are queried, in order, to create
/// commands by name. See [`Default`] for the factories included out of the box.
///
/// Example
/// ```
/// use myshell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out: Vec<u8> = Vec::new();
/// sh.execute_line(b"pwd; exit", &mut out).unwrap();
/// assert!(out.ends_with(b"\n"));
/// assert!(sh.should_exit());
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(env: Environment, config: Config, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env,
            config,
            commands,
        }
    }

    /// The default command set over a given environment and configuration.
    pub fn with_env(env: Environment, config: Config) -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(
            env,
            config,
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Pwd>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        )
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// `exit` ran; nothing more should be executed.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Fails when no factory knows `name` or when the command itself fails.
    pub fn run(
        &mut self,
        name: &OsStr,
        args: &[OsString],
        stdout: &mut dyn Write,
    ) -> ShellResult<()> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                return cmd.execute(stdout, &mut self.env);
            }
        }
        Err(ShellError::CommandNotFound(name.to_string_lossy().into_owned()))
    }

    /// Parse and run one command, as split from a line.
    pub fn execute_command(&mut self, raw: &[u8], stdout: &mut dyn Write) -> ShellResult<()> {
        match parser::parse_command(raw)? {
            Command::Empty => Ok(()),
            Command::Simple(argv) => match argv.split_first() {
                Some((name, args)) => self.run(name, args, stdout),
                None => Ok(()),
            },
            Command::Redirect(redir) => {
                redirect::run_redirection(&redir, &self.env, &self.config, stdout)
            }
        }
    }

    /// Run every command of `line` in order.
    ///
    /// A failing command is reported on `stdout` and the next one runs anyway.
    /// Stops early after `exit`. Only failures to write to `stdout` are returned.
    pub fn execute_line(&mut self, line: &[u8], stdout: &mut dyn Write) -> io::Result<()> {
        for raw in lexer::split_commands(line) {
            if let Err(err) = self.execute_command(raw, stdout) {
                error::report(stdout, &err)?;
            }
            if self.should_exit() {
                log::debug!("exit requested");
                break;
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter over the process environment with the built-ins
    /// `exit`, `cd`, `pwd` and the external command launcher.
    fn default() -> Self {
        Self::with_env(Environment::new(), Config::default())
    }
}
