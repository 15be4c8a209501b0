//! Command execution module
//!
//! This module handles the actual execution of command groups: the command
//! model, the executors that run commands on the host, and the group runner.

pub mod command;
pub mod executor;
pub mod runner;

pub use command::{CommandGroup, CommandLine};
pub use executor::{DryRunExecutor, Executor, SystemExecutor};
pub use runner::GroupRunner;
