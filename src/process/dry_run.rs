//! [`Dispatcher`] that prints commands instead of running them.

use crate::command::CommandInvocation;
use crate::traits::Dispatcher;
use std::io::Write;

/// Writes one line per command to `out`, prefixed with `run` or `spawn`.
///
/// Awaited commands "succeed" with empty output.
pub struct DryRunDispatcher<W: Write> {
    out: W,
}

impl<W: Write> DryRunDispatcher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Dispatcher for DryRunDispatcher<W> {
    type Error = std::io::Error;

    fn run(&mut self, command: &CommandInvocation) -> Result<String, Self::Error> {
        writeln!(self.out, "run   {}", command)?;
        Ok(String::new())
    }

    fn spawn(&mut self, command: &CommandInvocation) -> Result<(), Self::Error> {
        writeln!(self.out, "spawn {}", command)
    }
}
