//! [`Dispatcher`] backed by `std::process`.
//!
//! Awaited commands inherit stderr so the external tool's own diagnostics
//! reach the terminal; their stdout is captured and returned.  Detached
//! commands inherit all standard streams and are never waited on.

use crate::command::CommandInvocation;
use crate::traits::Dispatcher;
use log::debug;
use std::process::{Command, Stdio};

/// Runs every invocation as a child process.
#[derive(Debug, Default)]
pub struct ProcessDispatcher;

impl ProcessDispatcher {
    pub fn new() -> Self {
        Self
    }
}

/// Failure to start a child or a child reporting failure.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The executable could not be started (usually: not on `PATH`).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.  `code` is `None` when it
    /// was killed by a signal.
    #[error("{program} exited with {}", describe_code(.code))]
    ExitStatus { program: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".into(),
    }
}

fn command_for(invocation: &CommandInvocation) -> Command {
    let mut cmd = Command::new(invocation.program());
    cmd.args(invocation.args());
    cmd
}

impl Dispatcher for ProcessDispatcher {
    type Error = DispatchError;

    fn run(&mut self, invocation: &CommandInvocation) -> Result<String, DispatchError> {
        debug!("run: {}", invocation);
        let output = command_for(invocation)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| DispatchError::Spawn {
                program: invocation.program().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(DispatchError::ExitStatus {
                program: invocation.program().to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn spawn(&mut self, invocation: &CommandInvocation) -> Result<(), DispatchError> {
        debug!("spawn: {}", invocation);
        let child = command_for(invocation)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| DispatchError::Spawn {
                program: invocation.program().to_string(),
                source,
            })?;
        debug!("{} started as pid {}", invocation.program(), child.id());
        // Dropping the handle neither waits for nor kills the child.
        drop(child);
        Ok(())
    }
}
