//! High-level project management interface
//!
//! This module provides the [`ProjectManager`] which serves as the primary
//! interface for all task operations. It loads `firmtask.yml`, resolves the
//! project settings and builds the task registry once, up front.
//!
//! ## Example
//!
//! ```rust,no_run
//! use firmtask_core::project_manager::{ProjectManager, ProjectManagerConfig};
//! use firmtask_core::registry::TaskParams;
//! use std::path::PathBuf;
//!
//! # fn example() -> firmtask_core::types::TaskResult<()> {
//! let manager = ProjectManager::new(ProjectManagerConfig {
//!     project_root: PathBuf::from("."),
//!     ..Default::default()
//! })?;
//!
//! // Show what `ci` would run
//! let plan = manager.plan_task("ci", &TaskParams::new())?;
//!
//! // Build for another board
//! manager.run_task("build", &TaskParams::new().with("board", "nrf5340dk/nrf5340/cpuapp"), false)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::configs::project::{load_project_config, ProjectConfig};
use crate::demos::Demo;
use crate::execution::executor::{DryRunExecutor, Executor, SystemExecutor};
use crate::registry::{TaskParams, TaskRegistry};
use crate::results::{TaskInfo, TaskPlan};
use crate::tasks::{
    register_builtin_tasks, register_config_task, CleanupPolicy, ProjectSettings, TaskContext,
    DEFAULT_BUILD_DIR,
};
use crate::types::{TaskError, TaskResult};

/// High-level project manager that owns the settings and the task registry
pub struct ProjectManager {
    pub settings: ProjectSettings,
    registry: TaskRegistry,
}

/// Configuration for initializing a project manager.
///
/// Every `Some` value overrides the corresponding `firmtask.yml` entry.
#[derive(Debug, Clone)]
pub struct ProjectManagerConfig {
    pub project_root: PathBuf,
    pub demo: Option<Demo>,
    pub build_dir: Option<String>,
    pub cleanup: Option<CleanupPolicy>,
}

impl Default for ProjectManagerConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            demo: None,
            build_dir: None,
            cleanup: None,
        }
    }
}

impl ProjectManager {
    /// Initialize a new project manager from the given project root
    pub fn new(config: ProjectManagerConfig) -> TaskResult<Self> {
        let project_config = load_project_config(&config.project_root)?.unwrap_or_default();
        Self::from_project_config(config, project_config)
    }

    /// Initialize from an already parsed project configuration
    pub fn from_project_config(
        config: ProjectManagerConfig,
        project_config: ProjectConfig,
    ) -> TaskResult<Self> {
        let settings = Self::resolve_settings(&config, &project_config)?;
        debug!(?settings, "resolved project settings");

        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry, &settings);
        for task in project_config.tasks.unwrap_or_default() {
            register_config_task(&mut registry, task);
        }

        Ok(Self { settings, registry })
    }

    /// List all registered tasks
    pub fn list_tasks(&self) -> Vec<TaskInfo> {
        self.registry.tasks().map(TaskInfo::from).collect()
    }

    /// Record the command groups of a task without running anything
    pub fn plan_task(&self, name: &str, params: &TaskParams) -> TaskResult<TaskPlan> {
        let resolved = self.resolve_params(name, params)?;

        let mut executor = DryRunExecutor::new();
        let mut ctx = TaskContext::quiet(&mut executor, &self.settings);
        self.registry.invoke(name, params, &mut ctx)?;

        Ok(TaskPlan {
            task_name: name.to_string(),
            params: resolved,
            groups: executor.into_groups(),
        })
    }

    /// Execute a task against the host, or only echo it when `dry_run` is set
    pub fn run_task(&self, name: &str, params: &TaskParams, dry_run: bool) -> TaskResult<()> {
        info!(task = %name, dry_run, root = %self.settings.root.display(), "running task");

        let mut executor: Box<dyn Executor> = if dry_run {
            Box::new(DryRunExecutor::new())
        } else {
            Box::new(SystemExecutor::new(self.settings.root.clone()))
        };
        self.run_task_with(executor.as_mut(), name, params)
    }

    /// Execute a task against a caller-provided executor
    pub fn run_task_with(
        &self,
        executor: &mut dyn Executor,
        name: &str,
        params: &TaskParams,
    ) -> TaskResult<()> {
        let mut ctx = TaskContext::new(executor, &self.settings);
        self.registry.invoke(name, params, &mut ctx)
    }

    /// Parameters `name` would run with, defaults applied
    pub fn resolve_params(&self, name: &str, params: &TaskParams) -> TaskResult<TaskParams> {
        self.registry
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?
            .resolve_params(params)
    }

    // Private helper methods

    fn resolve_settings(
        config: &ProjectManagerConfig,
        project_config: &ProjectConfig,
    ) -> TaskResult<ProjectSettings> {
        let build_dir = config
            .build_dir
            .clone()
            .or_else(|| project_config.build_dir.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string())
            .trim()
            .to_string();

        // `clean` and `ci` remove this directory, so it must stay under the root
        let path = Path::new(&build_dir);
        if path.as_os_str().is_empty()
            || path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
            || path.components().all(|c| c == Component::CurDir)
        {
            return Err(TaskError::Config(format!(
                "Refusing to use '{}' as the build directory: it must be a subdirectory of the project root",
                build_dir
            )));
        }

        let demo = config.demo.or(project_config.demo);
        if let (None, Some(board)) = (demo, &project_config.board) {
            warn!(%board, "no demo selected; the configured board is not used by any task");
        }

        Ok(ProjectSettings {
            root: config.project_root.clone(),
            demo,
            board: project_config.board.clone(),
            build_dir,
            cleanup: config
                .cleanup
                .or(project_config.cleanup)
                .unwrap_or_default(),
        })
    }
}
