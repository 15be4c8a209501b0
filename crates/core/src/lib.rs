//! firmtask Core Library
//!
//! This is the core library for the firmtask task runner. It drives the
//! `west` and `cmake` command lines of the firmware tutorial projects: named
//! tasks run labelled command groups, each group fails fast, and `ci` always
//! knows how to leave the build directory behind clean.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`project_manager`] - High-level interface: settings, registry, planning and running
//! - [`registry`] - Task registry with parameter defaults
//! - [`tasks`] - Built-in `clean`/`build`/`ci` tasks and the handler context
//! - [`demos`] - Catalogue of the tutorial projects and their `ci` sequences
//! - [`execution`] - Command model, executors and the command-group runner
//! - [`west`] - Typed builders for `west` and `cmake` command lines
//! - [`configs`] - Parsing of `firmtask.yml`
//! - [`results`] - Result types for project operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`ProjectManager`]:
//!
//! ```rust,no_run
//! use firmtask_core::project_manager::{ProjectManager, ProjectManagerConfig};
//! use firmtask_core::registry::TaskParams;
//!
//! # fn example() -> firmtask_core::types::TaskResult<()> {
//! let manager = ProjectManager::new(ProjectManagerConfig::default())?;
//! manager.run_task("ci", &TaskParams::new(), false)?;
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod demos;
pub mod execution;
pub mod project_manager;
pub mod registry;
pub mod results;
pub mod tasks;
pub mod types;
pub mod west;

// Re-export the main types for easier usage
pub use project_manager::{ProjectManager, ProjectManagerConfig};
pub use types::{TaskError, TaskResult};
