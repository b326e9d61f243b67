//! Builders for `riverctl` invocations.

use crate::command::{CommandInvocation, Keybinding, ParseError};

/// Default name of river's control utility.
pub const RIVERCTL: &str = "riverctl";

/// Renders settings into `riverctl <subcommand> ...` invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiverCtl {
    program: String,
}

impl Default for RiverCtl {
    fn default() -> Self {
        Self::new(RIVERCTL)
    }
}

impl RiverCtl {
    /// Use `program` (looked up through `PATH`) as the control utility.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn subcommand<I, S>(&self, name: &str, args: I) -> Result<CommandInvocation, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.program.is_empty() {
            return Err(ParseError::Empty);
        }
        let argv = [self.program.clone(), name.to_string()]
            .into_iter()
            .chain(args.into_iter().map(Into::into));
        CommandInvocation::new(argv)
    }

    /// `map <mode> <modifiers> <key> <action...>`
    pub fn map(&self, binding: &Keybinding) -> Result<CommandInvocation, ParseError> {
        binding.to_invocation(&self.program)
    }

    pub fn background_color(&self, color: &str) -> Result<CommandInvocation, ParseError> {
        self.subcommand("background-color", [color])
    }

    pub fn border_color_focused(&self, color: &str) -> Result<CommandInvocation, ParseError> {
        self.subcommand("border-color-focused", [color])
    }

    pub fn border_color_unfocused(&self, color: &str) -> Result<CommandInvocation, ParseError> {
        self.subcommand("border-color-unfocused", [color])
    }

    /// `set-repeat <rate> <delay>`: `rate` repeats per second after `delay` ms.
    pub fn set_repeat(&self, rate: u32, delay: u32) -> Result<CommandInvocation, ParseError> {
        self.subcommand("set-repeat", [rate.to_string(), delay.to_string()])
    }

    /// `rule-add <match-args...> <action>`; the rule is passed through as is.
    pub fn rule_add(&self, rule: &[String]) -> Result<CommandInvocation, ParseError> {
        if rule.is_empty() {
            return Err(ParseError::Empty);
        }
        self.subcommand("rule-add", rule.iter().cloned())
    }

    pub fn default_layout(&self, namespace: &str) -> Result<CommandInvocation, ParseError> {
        if namespace.is_empty() {
            return Err(ParseError::Empty);
        }
        self.subcommand("default-layout", [namespace])
    }
}
