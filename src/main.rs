use anyhow::Result;
use myshell::cli::Cli;
use myshell::config::Config;
use myshell::env::Environment;
use myshell::error::{self, ShellError};
use myshell::{Interpreter, Mode, Session};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<OsString> = std::env::args_os().collect();
    let mut out = io::stdout().lock();

    let cli = match Cli::parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            error::report(&mut out, &err)?;
            return Ok(());
        }
    };

    let config = Config::default();
    let mut interpreter = Interpreter::with_env(Environment::new(), config.clone());
    log::debug!("starting in {:?} mode", cli.mode());

    match &cli.batch_file {
        Some(path) => {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(source) => {
                    error::report(&mut out, &ShellError::resource(path, source))?;
                    return Ok(());
                }
            };
            Session::new(BufReader::new(file), out, Mode::Batch, &config).run(&mut interpreter)
        }
        None => Session::new(io::stdin().lock(), out, Mode::Interactive, &config)
            .run(&mut interpreter),
    }
}
