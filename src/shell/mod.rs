//! Terminal form session.
//!
//! Reads one command per line and plays the part of the form's pickers,
//! text fields, toggles, the Estimate button and the price display.
//! Input and output are generic so sessions can be scripted.

mod command;
mod render;

use std::io::{self, BufRead, Write};

pub use command::{Command, CommandError, HELP};
pub use render::{render_form, render_price};

use crate::currency::CurrencyFormat;
use crate::estimator::{Estimator, Refresh};
use crate::form::FormState;

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct FormSession<'a> {
    estimator: &'a Estimator,
    format: CurrencyFormat,
    form: FormState,
    report_prediction_errors: bool,
    prompt: bool,
}

impl<'a> FormSession<'a> {
    pub fn new(estimator: &'a Estimator, format: CurrencyFormat) -> Self {
        Self {
            estimator,
            format,
            form: FormState::default(),
            report_prediction_errors: false,
            prompt: false,
        }
    }

    /// Print a notice when an estimate fails instead of failing silently.
    pub fn report_prediction_errors(mut self, enabled: bool) -> Self {
        self.report_prediction_errors = enabled;
        self
    }

    /// Print `> ` before reading each line.
    pub fn with_prompt(mut self, enabled: bool) -> Self {
        self.prompt = enabled;
        self
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Drive the session until `quit` or end of input.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily and rejected like
    /// any other unknown command.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        output.write_all(render_form(&self.form, &self.format).as_bytes())?;

        let mut buf = Vec::new();
        loop {
            if self.prompt {
                write!(output, "> ")?;
                output.flush()?;
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);

            match Command::parse(line) {
                Ok(Some(command)) => {
                    if self.execute(command, &mut output)? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!("Rejected input {:?}: {}", line, e);
                    writeln!(output, "error: {}", e)?;
                }
            }
        }

        output.flush()
    }

    pub fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> io::Result<Flow> {
        tracing::debug!(?command, "Executing command");
        match command {
            Command::Set(edit) => self.form.apply(edit),
            Command::Toggle(toggle) => self.form.toggle(toggle),
            Command::Estimate => {
                if let Refresh::Unchanged(e) = self.estimator.refresh(&mut self.form) {
                    if self.report_prediction_errors {
                        writeln!(output, "Estimate unavailable: {}", e)?;
                    }
                }
                output.write_all(render_price(&self.form, &self.format).as_bytes())?;
            }
            Command::Show => {
                output.write_all(render_form(&self.form, &self.format).as_bytes())?;
            }
            Command::Reset => self.form.reset(),
            Command::Help => output.write_all(HELP.as_bytes())?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
