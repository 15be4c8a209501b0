//! Command-group runner
//!
//! Prints a banner for each group and runs its commands in order, stopping
//! at the first failure.

use colored::*;
use tracing::{debug, info};

use crate::execution::command::CommandGroup;
use crate::execution::executor::Executor;
use crate::types::{TaskError, TaskResult};

/// Banner printed before a group's commands run
pub fn format_banner(label: &str) -> String {
    format!("###\n###\n###\n### {}\n###", label)
}

/// Runs command groups against an [`Executor`]
pub struct GroupRunner<'a> {
    executor: &'a mut dyn Executor,
    echo: bool,
}

impl<'a> GroupRunner<'a> {
    pub fn new(executor: &'a mut dyn Executor) -> Self {
        Self {
            executor,
            echo: true,
        }
    }

    /// Runner that prints neither banners nor commands
    pub fn quiet(executor: &'a mut dyn Executor) -> Self {
        Self {
            executor,
            echo: false,
        }
    }

    /// Print the group banner, then run every command in order.
    ///
    /// Returns the first failure; commands after it are not run.
    pub fn run_group(&mut self, group: &CommandGroup) -> TaskResult<()> {
        if self.echo {
            println!("{}", format_banner(&group.label).bold());
        }
        info!(label = %group.label, commands = group.commands.len(), "running group");
        self.executor.begin_group(group);

        for command in &group.commands {
            if self.echo {
                println!("{} {}", "$".bright_black(), command);
            }
            let status = self.executor.execute(command)?;
            if status != 0 {
                return Err(TaskError::CommandFailed {
                    command: command.to_string(),
                    status,
                });
            }
            debug!(command = %command, "command succeeded");
        }

        Ok(())
    }
}
