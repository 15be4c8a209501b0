//! Process executors
//!
//! The [`Executor`] trait is the seam between the group runner and the host.
//! [`SystemExecutor`] spawns real processes; [`DryRunExecutor`] only records
//! what would have been run.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::execution::command::{CommandGroup, CommandLine};
use crate::types::{TaskError, TaskResult};

/// Runs a single command to completion and reports its exit status
pub trait Executor {
    /// Called by the group runner before the commands of `group` run
    fn begin_group(&mut self, _group: &CommandGroup) {}

    /// Execute `command`, blocking until it exits.
    ///
    /// Returns the exit status; a process killed by a signal reports `-1`.
    fn execute(&mut self, command: &CommandLine) -> TaskResult<i32>;
}

/// Executor that spawns processes in the project root with inherited stdio
pub struct SystemExecutor {
    working_dir: PathBuf,
}

impl SystemExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, command: &CommandLine) -> TaskResult<i32> {
        debug!(command = %command, dir = %self.working_dir.display(), "spawning");

        let mut process = Command::new(command.program());
        process.args(command.argv()).current_dir(&self.working_dir);

        let status = process.status().map_err(|source| TaskError::Spawn {
            command: command.to_string(),
            source,
        })?;

        Ok(status.code().unwrap_or(-1))
    }
}

/// Executor that records commands per group and pretends every one succeeded
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    groups: Vec<CommandGroup>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded groups, in the order they started
    pub fn into_groups(self) -> Vec<CommandGroup> {
        self.groups
    }
}

impl Executor for DryRunExecutor {
    fn begin_group(&mut self, group: &CommandGroup) {
        self.groups
            .push(CommandGroup::new(group.label.clone(), Vec::new()));
    }

    fn execute(&mut self, command: &CommandLine) -> TaskResult<i32> {
        debug!(command = %command, "dry run");
        match self.groups.last_mut() {
            Some(group) => group.commands.push(command.clone()),
            None => self
                .groups
                .push(CommandGroup::new("", vec![command.clone()])),
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_records_per_group() {
        let mut executor = DryRunExecutor::new();
        executor.begin_group(&CommandGroup::new("first", Vec::new()));
        executor.execute(&CommandLine::new("a")).unwrap();
        executor.execute(&CommandLine::new("b")).unwrap();
        executor.begin_group(&CommandGroup::new("second", Vec::new()));
        executor.execute(&CommandLine::new("c")).unwrap();

        assert_eq!(
            executor.into_groups(),
            vec![
                CommandGroup::new("first", vec![CommandLine::new("a"), CommandLine::new("b")]),
                CommandGroup::new("second", vec![CommandLine::new("c")]),
            ]
        );
    }

    #[test]
    fn test_dry_run_without_group() {
        let mut executor = DryRunExecutor::new();
        executor.execute(&CommandLine::new("a")).unwrap();
        assert_eq!(
            executor.into_groups(),
            vec![CommandGroup::new("", vec![CommandLine::new("a")])]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_reports_exit_status() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut executor = SystemExecutor::new(temp_dir.path());

        assert_eq!(executor.execute(&CommandLine::new("true")).unwrap(), 0);
        assert_eq!(executor.execute(&CommandLine::shell("exit 3")).unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_runs_in_working_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut executor = SystemExecutor::new(temp_dir.path());

        executor
            .execute(&CommandLine::new("mkdir").arg("build"))
            .unwrap();
        assert!(temp_dir.path().join("build").is_dir());

        executor
            .execute(&CommandLine::remove_dir("build"))
            .unwrap();
        assert!(!temp_dir.path().join("build").exists());
    }

    #[test]
    fn test_system_executor_spawn_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut executor = SystemExecutor::new(temp_dir.path());

        let err = executor
            .execute(&CommandLine::new("firmtask-no-such-program"))
            .unwrap_err();
        assert!(matches!(err, TaskError::Spawn { .. }));
    }
}
