//! Line-oriented prompting with validation.
//!
//! [`Prompter`] reads one line per attempt and hands it to a parser. A parser
//! rejects a line by returning [`AppErr::Validation`]; the prompter prints the
//! reason and asks again. Any other error (closed input, a failed database
//! lookup inside the parser) is returned to the caller untouched.

pub mod parse;

use crate::error::{AppErr, Result};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use tracing::debug;

pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_retries: Option<u32>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_retries: None,
        }
    }

    /// `None` keeps asking forever.
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, msg: impl Display) -> Result<()> {
        writeln!(self.output, "{msg}")?;
        Ok(())
    }

    /// Reads one line without its terminator. End of input is an error, a
    /// line that is not UTF-8 is rejected like any other bad entry.
    pub fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(AppErr::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed",
            )));
        }
        let line = String::from_utf8(raw)
            .map_err(|_| AppErr::Validation("entry is not valid UTF-8 text".to_string()))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Prompts until `parse` accepts a line, honouring the retry bound.
    pub fn read_validated<T>(
        &mut self,
        prompt: &str,
        parse: impl FnMut(&str) -> Result<T>,
    ) -> Result<T> {
        let limit = self.max_retries;
        self.read_with_limit(prompt, limit, parse)
    }

    /// Like [`Prompter::read_validated`] but never gives up.
    pub fn read_unbounded<T>(
        &mut self,
        prompt: &str,
        parse: impl FnMut(&str) -> Result<T>,
    ) -> Result<T> {
        self.read_with_limit(prompt, None, parse)
    }

    fn read_with_limit<T>(
        &mut self,
        prompt: &str,
        limit: Option<u32>,
        mut parse: impl FnMut(&str) -> Result<T>,
    ) -> Result<T> {
        let mut attempts = 0u32;
        loop {
            write!(self.output, "{prompt} ")?;
            match self.read_line().and_then(|line| parse(&line)) {
                Ok(value) => return Ok(value),
                Err(AppErr::Validation(reason)) => {
                    attempts += 1;
                    debug!(prompt, attempts, %reason, "input rejected");
                    writeln!(self.output, "Your input is invalid! {reason}")?;
                    if let Some(max) = limit
                        && attempts >= max
                    {
                        return Err(AppErr::RetriesExhausted { attempts });
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
