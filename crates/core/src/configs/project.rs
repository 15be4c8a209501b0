use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::configs::tasks::TaskConfig;
use crate::demos::Demo;
use crate::tasks::CleanupPolicy;
use crate::types::{TaskError, TaskResult};

/// File name looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "firmtask.yml";

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Tutorial project whose built-in `build` and `ci` tasks are registered
    pub demo: Option<Demo>,
    /// Board identifier replacing the demo's default
    pub board: Option<String>,
    /// Build output directory, relative to the project root
    pub build_dir: Option<String>,
    /// Whether the final cleanup group runs after a failed group
    pub cleanup: Option<CleanupPolicy>,
    /// Project tasks; these override built-in tasks with the same name
    pub tasks: Option<Vec<TaskConfig>>,
}

pub fn parse_project_config(yaml_str: &str) -> TaskResult<ProjectConfig> {
    let config: ProjectConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// Load `firmtask.yml` from `project_root`, or `None` when there is none
pub fn load_project_config(project_root: &Path) -> TaskResult<Option<ProjectConfig>> {
    let config_path = project_root.join(PROJECT_CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        TaskError::Config(format!(
            "Failed to read project config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    parse_project_config(&content)
        .map(Some)
        .map_err(|e| {
            TaskError::Config(format!(
                "Failed to parse project config {}: {}",
                config_path.display(),
                e
            ))
        })
}

/// JSON schema of `firmtask.yml`
pub fn project_config_schema() -> TaskResult<String> {
    let schema = schemars::schema_for!(ProjectConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| TaskError::Config(format!("Failed to render schema: {}", e)))
}
