use crate::error::{ShellError, ShellResult};
use crate::session::Mode;
use argh::{EarlyExit, FromArgs};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(FromArgs, Debug, PartialEq)]
/// A minimal command interpreter. Reads commands from standard input, or runs the
/// given batch file.
pub struct Cli {
    #[argh(positional)]
    /// file of commands to run instead of reading standard input.
    pub batch_file: Option<PathBuf>,
}

impl Cli {
    /// Parse a full argument list, program name first.
    ///
    /// Every argument is a file name, also one that looks like a flag, so more than
    /// one argument is the only usage error.
    pub fn parse_from(args: &[OsString]) -> ShellResult<Self> {
        let Some((program, rest)) = args.split_first() else {
            return Ok(Cli { batch_file: None });
        };
        let program = program.to_string_lossy();
        let words: Vec<String> = std::iter::once("--".to_string())
            .chain(rest.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        let mut cli = Cli::from_args(&[program.as_ref()], &words).map_err(|EarlyExit { output, .. }| {
            log::debug!("bad command line {rest:?}: {}", output.trim_end());
            ShellError::Usage(program.to_string())
        })?;
        // argh saw a lossy copy; open the file by the name exactly as given.
        cli.batch_file = rest.first().map(PathBuf::from);
        Ok(cli)
    }

    pub fn mode(&self) -> Mode {
        match self.batch_file {
            Some(_) => Mode::Batch,
            None => Mode::Interactive,
        }
    }
}
