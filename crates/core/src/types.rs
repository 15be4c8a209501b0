use thiserror::Error;

/// The main error type for firmtask operations
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task '{0}' not found")]
    UnknownTask(String),

    #[error("Task '{task}' has no parameter named '{name}'")]
    UnknownParameter { task: String, name: String },

    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {status}")]
    CommandFailed { command: String, status: i32 },
}

impl TaskError {
    /// Process exit code to report for this error.
    ///
    /// A failed command propagates its own status; statuses that cannot be
    /// expressed as a process exit code collapse to 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            TaskError::CommandFailed { status, .. } => u8::try_from(*status)
                .ok()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

/// Result type alias for firmtask operations
pub type TaskResult<T> = Result<T, TaskError>;
