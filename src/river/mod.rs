//! river-specific vocabulary.
//!
//! Everything that knows `riverctl` subcommand names or river's stock
//! keybindings lives here; the rest of the crate deals in
//! [`CommandInvocation`](crate::command::CommandInvocation)s.

pub mod bindings;
pub mod ctl;
