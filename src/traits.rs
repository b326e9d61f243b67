//! The seam between the bootstrap sequence and whatever actually runs
//! commands.
//!
//! The [`Session`](crate::bootstrap::Session) only depends on
//! [`Dispatcher`]; real processes, a dry-run printer and test doubles all
//! plug in here.

use crate::command::CommandInvocation;

/// Something that can execute a [`CommandInvocation`].
///
/// # Contract
///
/// * [`run`](Dispatcher::run) **blocks** until the command has exited and
///   returns its standard output.  A command that never exits blocks forever.
/// * [`spawn`](Dispatcher::spawn) starts the command and returns without
///   observing its termination.
/// * Any failure is returned as `Err`; callers decide whether to go on.
pub trait Dispatcher {
    /// The error type produced by this dispatcher.
    type Error: std::error::Error + Send + 'static;

    /// Execute `command` and wait for it to finish.
    fn run(&mut self, command: &CommandInvocation) -> Result<String, Self::Error>;

    /// Start `command` in the background (fire-and-forget).
    fn spawn(&mut self, command: &CommandInvocation) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    //  Mock Dispatcher

    /// Records every call and fails the `fail_at`-th one (0-indexed).
    #[derive(Debug, Default)]
    struct MockDispatcher {
        log: Vec<(bool, String)>,
        fail_at: Option<usize>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl MockDispatcher {
        fn record(&mut self, awaited: bool, command: &CommandInvocation) -> Result<(), MockError> {
            if self.fail_at == Some(self.log.len()) {
                return Err(MockError);
            }
            self.log.push((awaited, command.to_string()));
            Ok(())
        }
    }

    impl Dispatcher for MockDispatcher {
        type Error = MockError;

        fn run(&mut self, command: &CommandInvocation) -> Result<String, MockError> {
            self.record(true, command)?;
            Ok(String::new())
        }

        fn spawn(&mut self, command: &CommandInvocation) -> Result<(), MockError> {
            self.record(false, command)
        }
    }

    fn cmd(s: &str) -> CommandInvocation {
        CommandInvocation::parse_with(s, |_| None).unwrap()
    }

    #[test]
    fn mock_dispatcher_records_calls() {
        let mut d = MockDispatcher::default();
        d.run(&cmd("riverctl set-repeat 50 300")).unwrap();
        d.spawn(&cmd("mako")).unwrap();
        assert_eq!(
            d.log,
            [
                (true, "riverctl set-repeat 50 300".to_string()),
                (false, "mako".to_string())
            ]
        );
    }

    #[test]
    fn mock_dispatcher_fails_on_request() {
        let mut d = MockDispatcher {
            fail_at: Some(1),
            ..Default::default()
        };
        d.run(&cmd("a")).unwrap();
        assert!(d.spawn(&cmd("b")).is_err());
        assert_eq!(d.log, [(true, "a".to_string())]);
    }
}
