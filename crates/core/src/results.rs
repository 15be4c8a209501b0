//! Result types for project operations
//!
//! This module contains the result types returned by project manager
//! operations, so the CLI layer only deals with presentation.

use crate::execution::command::{CommandGroup, CommandLine};
use crate::registry::{ParamSpec, RegisteredTask, TaskParams};

/// Information about a registered task
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
}

/// Command groups a task would run, in order
#[derive(Debug, Clone)]
pub struct TaskPlan {
    pub task_name: String,
    pub params: TaskParams,
    pub groups: Vec<CommandGroup>,
}

impl TaskPlan {
    pub fn commands(&self) -> impl Iterator<Item = &CommandLine> {
        self.groups.iter().flat_map(|group| group.commands.iter())
    }
}

impl From<&RegisteredTask> for TaskInfo {
    fn from(task: &RegisteredTask) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            params: task.params.clone(),
        }
    }
}
