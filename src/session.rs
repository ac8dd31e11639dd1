use crate::config::Config;
use crate::error::{self, ShellError};
use crate::framer::LineReader;
use crate::interpreter::Interpreter;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Where input comes from, which decides prompting and end-of-input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Prompt before each read; end of input is an error.
    Interactive,
    /// Read a script; blank lines are skipped silently.
    Batch,
}

/// The read-echo-execute loop.
///
/// Every line read is echoed to the output before it runs, so the output is a full
/// transcript of the session. Overlong lines are echoed, reported and dropped.
pub struct Session<R, W> {
    reader: LineReader<R>,
    out: W,
    mode: Mode,
    prompt: String,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, mode: Mode, config: &Config) -> Self {
        Self {
            reader: LineReader::new(input, config.line_limit),
            out,
            mode,
            prompt: config.prompt.clone(),
        }
    }

    /// Give back the output stream, e.g. to inspect a captured transcript.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run lines through `interpreter` until end of input or `exit`.
    ///
    /// Command failures are reported in the transcript and never end the loop; only
    /// I/O failures on the input or output streams are returned.
    pub fn run(&mut self, interpreter: &mut Interpreter) -> Result<()> {
        loop {
            if self.mode == Mode::Interactive {
                self.out.write_all(self.prompt.as_bytes())?;
                self.out.flush()?;
            }

            let Some(line) = self.reader.read_line().context("failed to read input")? else {
                if self.mode == Mode::Interactive {
                    error::report(&mut self.out, &ShellError::EndOfInput)?;
                }
                break;
            };

            if self.mode == Mode::Batch && line.is_blank() {
                continue;
            }
            self.out.write_all(line.as_bytes())?;

            if line.is_overlong() {
                self.reader
                    .discard_rest(&mut self.out)
                    .context("failed to read input")?;
                error::report(&mut self.out, &ShellError::LineTooLong(line.as_bytes().len()))?;
                continue;
            }

            interpreter.execute_line(line.text(), &mut self.out)?;
            if interpreter.should_exit() {
                break;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}
