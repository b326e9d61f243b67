//! **river-init** — session bootstrap for the river Wayland compositor.
//!
//! At login river runs its init executable once.  This crate registers the
//! session's keybindings, tag bindings, colours, keyboard repeat and window
//! rules through `riverctl`, then starts the background daemons and the
//! layout generator.
//!
//! # Architecture
//!
//! * [`tags::TagTable`] — the ordered, validated tag definitions; each tag
//!   derives four `map` bindings.
//! * [`bootstrap::plan`] — renders a [`config::Config`] into the ordered
//!   command sequence.
//! * [`traits::Dispatcher`] — abstracts how a command is executed, so the
//!   sequence is not coupled to real processes.  [`process`] holds the
//!   process-backed and dry-run implementations.
//! * [`river`] — `riverctl` subcommand builders and stock bindings.

pub mod bootstrap;
pub mod command;
pub mod config;
pub mod process;
pub mod river;
pub mod tags;
pub mod traits;
