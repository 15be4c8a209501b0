use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use firmtask_core::demos::Demo;
use firmtask_core::project_manager::{ProjectManager, ProjectManagerConfig};
use firmtask_core::registry::TaskParams;
use firmtask_core::tasks::CleanupPolicy;
use firmtask_core::TaskError;

mod commands;

/// firmtask - A task runner for the firmware tutorial projects
#[derive(Parser)]
#[command(name = "firmtask")]
#[command(about = "Run clean/build/ci tasks of the firmware tutorial projects")]
#[command(version)]
struct Cli {
    /// Path to the project root (defaults to current directory)
    #[arg(short = 'C', long, default_value = ".")]
    project: PathBuf,

    /// Tutorial project whose built-in tasks are registered
    #[arg(long)]
    demo: Option<Demo>,

    /// Build output directory, relative to the project root
    #[arg(long)]
    build_dir: Option<String>,

    /// Whether the final cleanup runs after a failure: always | on-success
    #[arg(long)]
    cleanup: Option<CleanupPolicy>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tasks available in this project
    List,
    /// Show the command groups of a task without running it
    Plan {
        /// Task name, e.g. "ci"
        task: String,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Run a task
    Run {
        /// Task name, e.g. "build"
        task: String,
        #[command(flatten)]
        params: ParamArgs,
        /// Print the commands instead of executing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the JSON schema of firmtask.yml
    Schema,
}

#[derive(Args)]
struct ParamArgs {
    /// Target board identifier
    #[arg(long)]
    board: Option<String>,

    /// Task parameter as NAME=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,
}

impl ParamArgs {
    fn into_task_params(self) -> TaskParams {
        let mut params: TaskParams = self.params.into_iter().collect();
        if let Some(board) = self.board {
            params.insert("board", board);
        }
        params
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}': expected NAME=VALUE", s))?;
    if name.is_empty() {
        return Err(format!("invalid parameter '{}': empty name", s));
    }
    Ok((name.to_string(), value.to_string()))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // The schema does not depend on a readable project
    if let Commands::Schema = cli.command {
        return commands::schema::execute();
    }

    let manager = ProjectManager::new(ProjectManagerConfig {
        project_root: cli.project,
        demo: cli.demo,
        build_dir: cli.build_dir,
        cleanup: cli.cleanup,
    })
    .context("Failed to load project")?;

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::List => commands::list::execute(&manager),
        Commands::Plan { task, params } => {
            commands::plan::execute(&manager, &task, &params.into_task_params())
        }
        Commands::Run {
            task,
            params,
            dry_run,
        } => commands::run::execute(&manager, &task, &params.into_task_params(), dry_run),
        Commands::Schema => commands::schema::execute(),
    }
}

/// Process status for a failed run: the failing command's own status when
/// there is one, 1 otherwise
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<TaskError>()
        .map(TaskError::exit_code)
        .unwrap_or(1)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}
