//! Concrete [`Dispatcher`](crate::traits::Dispatcher) backends.
//!
//! [`spawner::ProcessDispatcher`] runs real child processes found through
//! `PATH`; [`dry_run::DryRunDispatcher`] only prints what would be run.

pub mod dry_run;
pub mod spawner;
