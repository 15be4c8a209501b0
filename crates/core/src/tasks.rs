//! Built-in tasks and the context handlers run in
//!
//! `clean` is always available. `build` and `ci` come from the selected
//! demo project. Project tasks from `firmtask.yml` are registered on top.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::configs::tasks::TaskConfig;
use crate::demos::Demo;
use crate::execution::command::{CommandGroup, CommandLine};
use crate::execution::executor::Executor;
use crate::execution::runner::GroupRunner;
use crate::registry::{ParamSpec, RegisteredTask, TaskRegistry};
use crate::types::TaskResult;
use crate::west::WestBuild;

pub const DEFAULT_BUILD_DIR: &str = "build";

/// What happens to the final cleanup group when an earlier group failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPolicy {
    /// Run cleanup regardless; the first failure is still reported
    #[default]
    Always,
    /// Abort the whole task at the first failure
    OnSuccess,
}

impl FromStr for CleanupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(CleanupPolicy::Always),
            "on-success" => Ok(CleanupPolicy::OnSuccess),
            other => Err(format!(
                "unknown cleanup policy '{}' (expected 'always' or 'on-success')",
                other
            )),
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupPolicy::Always => f.write_str("always"),
            CleanupPolicy::OnSuccess => f.write_str("on-success"),
        }
    }
}

/// Settings resolved from the CLI, `firmtask.yml` and defaults
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    pub root: PathBuf,
    pub demo: Option<Demo>,
    pub board: Option<String>,
    pub build_dir: String,
    pub cleanup: CleanupPolicy,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            demo: None,
            board: None,
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            cleanup: CleanupPolicy::default(),
        }
    }
}

/// Everything a task handler can use while it runs
pub struct TaskContext<'a> {
    runner: GroupRunner<'a>,
    settings: &'a ProjectSettings,
}

impl<'a> TaskContext<'a> {
    pub fn new(executor: &'a mut dyn Executor, settings: &'a ProjectSettings) -> Self {
        Self {
            runner: GroupRunner::new(executor),
            settings,
        }
    }

    /// Context whose runner prints neither banners nor commands
    pub fn quiet(executor: &'a mut dyn Executor, settings: &'a ProjectSettings) -> Self {
        Self {
            runner: GroupRunner::quiet(executor),
            settings,
        }
    }

    pub fn settings(&self) -> &ProjectSettings {
        self.settings
    }

    pub fn run_group(&mut self, group: &CommandGroup) -> TaskResult<()> {
        self.runner.run_group(group)
    }

    /// Run `groups` fail-fast, then `cleanup` according to the cleanup policy
    pub fn run_with_cleanup(
        &mut self,
        groups: &[CommandGroup],
        cleanup: &CommandGroup,
    ) -> TaskResult<()> {
        let outcome = groups.iter().try_for_each(|group| self.run_group(group));

        match (outcome, self.settings.cleanup) {
            (Ok(()), _) => self.run_group(cleanup),
            (Err(err), CleanupPolicy::Always) => {
                warn!(error = %err, "group failed, running cleanup anyway");
                if let Err(cleanup_err) = self.run_group(cleanup) {
                    warn!(error = %cleanup_err, "cleanup failed after an earlier failure");
                }
                Err(err)
            }
            (Err(err), CleanupPolicy::OnSuccess) => {
                warn!(error = %err, "group failed, skipping cleanup");
                Err(err)
            }
        }
    }
}

/// Group removing the build output directory
pub fn clean_group(label: &str, build_dir: &str) -> CommandGroup {
    CommandGroup::new(label, vec![CommandLine::remove_dir(build_dir)])
}

/// Register `clean`, plus `build` and `ci` when a demo is selected
pub fn register_builtin_tasks(registry: &mut TaskRegistry, settings: &ProjectSettings) {
    registry.register(
        RegisteredTask::new("clean", |ctx, _params| {
            let group = clean_group("clean", &ctx.settings().build_dir);
            ctx.run_group(&group)
        })
        .description("Remove the build output directory"),
    );

    let Some(demo) = settings.demo else {
        return;
    };
    let default_board = settings
        .board
        .clone()
        .unwrap_or_else(|| demo.default_board().to_string());

    registry.register(
        RegisteredTask::new("build", move |ctx, params| {
            let board = params.get("board").unwrap_or(demo.default_board());
            let build = WestBuild::new()
                .no_sysbuild(demo.no_sysbuild())
                .build_dir(&ctx.settings().build_dir)
                .board(board);
            ctx.run_group(&CommandGroup::new("west build", vec![build.into()]))
        })
        .description(format!("Build the {} demo", demo))
        .param(board_param(&default_board)),
    );

    registry.register(
        RegisteredTask::new("ci", move |ctx, params| {
            let board = params.get("board").unwrap_or(demo.default_board());
            let build_dir = ctx.settings().build_dir.clone();
            let groups = demo.ci_groups(board, &build_dir);
            ctx.run_with_cleanup(&groups, &clean_group("cleanup", &build_dir))
        })
        .description(format!("Run every build variant of the {} demo", demo))
        .param(board_param(&default_board)),
    );
}

fn board_param(default_board: &str) -> ParamSpec {
    ParamSpec::new("board", default_board).help("Target board identifier")
}

/// Register a task declared in `firmtask.yml`
pub fn register_config_task(registry: &mut TaskRegistry, config: TaskConfig) {
    let handler_config = config.clone();
    let mut task = RegisteredTask::new(config.name.clone(), move |ctx, params| {
        for group in handler_config.resolve_groups(params)? {
            ctx.run_group(&group)?;
        }
        Ok(())
    });
    if let Some(description) = &config.description {
        task = task.description(description.clone());
    }
    for (name, default) in config.params.iter().flatten() {
        task = task.param(ParamSpec::new(name.clone(), default.clone()));
    }

    if registry.register(task).is_some() {
        warn!(task = %config.name, "project task overrides a built-in task");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TaskParams;
    use crate::types::TaskError;

    /// Records rendered commands and fails those containing `fail_on`
    struct RecordingExecutor {
        executed: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl RecordingExecutor {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                executed: Vec::new(),
                fail_on,
            }
        }
    }

    impl Executor for RecordingExecutor {
        fn execute(&mut self, command: &CommandLine) -> TaskResult<i32> {
            let rendered = command.to_string();
            let failed = self.fail_on.is_some_and(|needle| rendered.contains(needle));
            self.executed.push(rendered);
            Ok(if failed { 1 } else { 0 })
        }
    }

    fn settings(demo: Demo, cleanup: CleanupPolicy) -> ProjectSettings {
        ProjectSettings {
            demo: Some(demo),
            cleanup,
            ..ProjectSettings::default()
        }
    }

    fn invoke(
        settings: &ProjectSettings,
        executor: &mut RecordingExecutor,
        task: &str,
        params: TaskParams,
    ) -> TaskResult<()> {
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry, settings);
        let mut ctx = TaskContext::new(executor, settings);
        registry.invoke(task, &params, &mut ctx)
    }

    #[test]
    fn test_clean_removes_build_dir() {
        let settings = ProjectSettings {
            build_dir: "out".to_string(),
            ..ProjectSettings::default()
        };
        let mut executor = RecordingExecutor::new(None);
        invoke(&settings, &mut executor, "clean", TaskParams::new()).unwrap();
        assert_eq!(executor.executed, vec!["rm -rf out"]);
    }

    #[test]
    fn test_build_uses_default_board_once() {
        let settings = settings(Demo::Kconfig, CleanupPolicy::Always);
        let mut executor = RecordingExecutor::new(None);
        invoke(&settings, &mut executor, "build", TaskParams::new()).unwrap();

        let joined = executor.executed.join("\n");
        assert_eq!(joined.matches("nrf52840dk_nrf52840").count(), 1);
        assert_eq!(executor.executed, vec!["west build --board nrf52840dk_nrf52840"]);
    }

    #[test]
    fn test_build_with_board_parameter() {
        let settings = settings(Demo::Basics, CleanupPolicy::Always);
        let mut executor = RecordingExecutor::new(None);
        invoke(
            &settings,
            &mut executor,
            "build",
            TaskParams::new().with("board", "X"),
        )
        .unwrap();

        assert_eq!(executor.executed, vec!["west build --no-sysbuild --board X"]);
        assert!(!executor.executed[0].contains("nrf52840dk"));
    }

    #[test]
    fn test_configured_board_becomes_default() {
        let settings = ProjectSettings {
            board: Some("nrf5340dk/nrf5340/cpuapp".to_string()),
            ..settings(Demo::Practice, CleanupPolicy::Always)
        };
        let mut executor = RecordingExecutor::new(None);
        invoke(&settings, &mut executor, "build", TaskParams::new()).unwrap();
        assert_eq!(
            executor.executed,
            vec!["west build --board nrf5340dk/nrf5340/cpuapp"]
        );
    }

    #[test]
    fn test_no_demo_only_registers_clean() {
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry, &ProjectSettings::default());
        let names: Vec<_> = registry.tasks().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["clean"]);
    }

    #[test]
    fn test_ci_removes_build_dir_first_and_last() {
        let settings = settings(Demo::Kconfig, CleanupPolicy::Always);
        let mut executor = RecordingExecutor::new(None);
        invoke(&settings, &mut executor, "ci", TaskParams::new()).unwrap();

        assert_eq!(executor.executed.first().map(String::as_str), Some("rm -rf build"));
        assert_eq!(executor.executed.last().map(String::as_str), Some("rm -rf build"));
        let first_build = executor
            .executed
            .iter()
            .position(|c| c.starts_with("west build"))
            .unwrap();
        assert!(first_build > 0);
    }

    #[test]
    fn test_cleanup_runs_after_failure_when_always() {
        let settings = settings(Demo::Kconfig, CleanupPolicy::Always);
        let mut executor = RecordingExecutor::new(Some("prj_release.conf"));
        let err = invoke(&settings, &mut executor, "ci", TaskParams::new()).unwrap_err();

        assert!(matches!(&err, TaskError::CommandFailed { command, status: 1 }
            if command.contains("prj_release.conf")));
        assert_eq!(executor.executed.last().map(String::as_str), Some("rm -rf build"));
        assert!(!executor.executed.iter().any(|c| c.contains("EXTRA_CONF_FILE")));
    }

    #[test]
    fn test_cleanup_skipped_after_failure_when_on_success() {
        let settings = settings(Demo::Kconfig, CleanupPolicy::OnSuccess);
        let mut executor = RecordingExecutor::new(Some("prj_release.conf"));
        invoke(&settings, &mut executor, "ci", TaskParams::new()).unwrap_err();

        assert!(executor
            .executed
            .last()
            .is_some_and(|c| c.contains("prj_release.conf")));
    }

    #[test]
    fn test_first_failure_wins_over_cleanup_failure() {
        let settings = settings(Demo::Practice, CleanupPolicy::Always);
        // Every command fails: the build group stops at `rm`, cleanup fails too.
        let mut executor = RecordingExecutor::new(Some(""));
        let err = invoke(&settings, &mut executor, "ci", TaskParams::new()).unwrap_err();

        assert!(matches!(err, TaskError::CommandFailed { command, .. } if command == "rm -rf build"));
        assert_eq!(executor.executed, vec!["rm -rf build", "rm -rf build"]);
    }

    #[test]
    fn test_config_task_overrides_builtin() {
        let config: TaskConfig = serde_yaml::from_str(
            r#"
name: build
params:
  board: custom_board
groups:
  - label: custom build for {{board}}
    commands:
      - [west, build, --board, "{{board}}"]
"#,
        )
        .unwrap();

        let settings = settings(Demo::Kconfig, CleanupPolicy::Always);
        let mut registry = TaskRegistry::new();
        register_builtin_tasks(&mut registry, &settings);
        register_config_task(&mut registry, config);

        let mut executor = RecordingExecutor::new(None);
        let mut ctx = TaskContext::new(&mut executor, &settings);
        registry.invoke("build", &TaskParams::new(), &mut ctx).unwrap();

        assert_eq!(executor.executed, vec!["west build --board custom_board"]);
    }
}
