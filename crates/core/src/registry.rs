//! Task registry
//!
//! An explicit name-to-handler map. It is built once when the project is
//! loaded and then passed by reference to whoever dispatches tasks.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::tasks::TaskContext;
use crate::types::{TaskError, TaskResult};

/// Handler invoked with the resolved parameters of a task
pub type TaskHandler = Box<dyn Fn(&mut TaskContext<'_>, &TaskParams) -> TaskResult<()>>;

/// Named parameter values for one task invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskParams {
    values: BTreeMap<String, String>,
}

impl TaskParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TaskParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A declared task parameter and its default value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub default: String,
    pub help: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            help: None,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A task as stored in the registry
pub struct RegisteredTask {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
    handler: TaskHandler,
}

impl RegisteredTask {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut TaskContext<'_>, &TaskParams) -> TaskResult<()> + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Merge `supplied` with the declared defaults, rejecting undeclared names
    pub fn resolve_params(&self, supplied: &TaskParams) -> TaskResult<TaskParams> {
        if let Some((name, _)) = supplied
            .iter()
            .find(|(name, _)| !self.params.iter().any(|p| p.name == *name))
        {
            return Err(TaskError::UnknownParameter {
                task: self.name.clone(),
                name: name.to_string(),
            });
        }

        Ok(self
            .params
            .iter()
            .map(|spec| {
                let value = supplied.get(&spec.name).unwrap_or(spec.default.as_str());
                (spec.name.clone(), value.to_string())
            })
            .collect())
    }
}

impl std::fmt::Debug for RegisteredTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTask")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Registry of tasks keyed by name
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, RegisteredTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task, returning the task it replaced, if any
    pub fn register(&mut self, task: RegisteredTask) -> Option<RegisteredTask> {
        debug!(task = %task.name, "registering task");
        self.tasks.insert(task.name.clone(), task)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTask> {
        self.tasks.get(name)
    }

    /// Registered tasks sorted by name
    pub fn tasks(&self) -> impl Iterator<Item = &RegisteredTask> {
        self.tasks.values()
    }

    /// Resolve the parameters of `name` and run its handler
    pub fn invoke(
        &self,
        name: &str,
        supplied: &TaskParams,
        ctx: &mut TaskContext<'_>,
    ) -> TaskResult<()> {
        let task = self
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;
        let params = task.resolve_params(supplied)?;

        info!(task = %name, params = ?params, "invoking task");
        (task.handler)(ctx, &params)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::execution::executor::DryRunExecutor;
    use crate::tasks::ProjectSettings;

    fn recording_task(name: &str, seen: Rc<RefCell<Vec<TaskParams>>>) -> RegisteredTask {
        RegisteredTask::new(name, move |_ctx, params| {
            seen.borrow_mut().push(params.clone());
            Ok(())
        })
        .param(ParamSpec::new("board", "nrf52840dk/nrf52840"))
    }

    #[test]
    fn test_invoke_applies_defaults_and_overrides() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = TaskRegistry::new();
        registry.register(recording_task("build", seen.clone()));

        let settings = ProjectSettings::default();
        let mut executor = DryRunExecutor::new();
        let mut ctx = TaskContext::new(&mut executor, &settings);

        registry.invoke("build", &TaskParams::new(), &mut ctx).unwrap();
        registry
            .invoke("build", &TaskParams::new().with("board", "X"), &mut ctx)
            .unwrap();

        let seen = seen.borrow();
        assert_eq!(seen[0].get("board"), Some("nrf52840dk/nrf52840"));
        assert_eq!(seen[1].get("board"), Some("X"));
    }

    #[test]
    fn test_unknown_task_and_parameter() {
        let mut registry = TaskRegistry::new();
        registry.register(recording_task("build", Rc::new(RefCell::new(Vec::new()))));

        let settings = ProjectSettings::default();
        let mut executor = DryRunExecutor::new();
        let mut ctx = TaskContext::new(&mut executor, &settings);

        let err = registry
            .invoke("flash", &TaskParams::new(), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, TaskError::UnknownTask(name) if name == "flash"));

        let err = registry
            .invoke("build", &TaskParams::new().with("bord", "X"), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, TaskError::UnknownParameter { name, .. } if name == "bord"));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = TaskRegistry::new();
        assert!(registry
            .register(RegisteredTask::new("ci", |_, _| Ok(())))
            .is_none());
        let replaced = registry.register(RegisteredTask::new("ci", |_, _| Ok(())).description("custom"));

        assert!(replaced.is_some());
        assert_eq!(registry.tasks().count(), 1);
        assert_eq!(
            registry.get("ci").and_then(|t| t.description.as_deref()),
            Some("custom")
        );
    }
}
