use anyhow::{Context, Result};
use colored::*;
use firmtask_core::project_manager::ProjectManager;
use firmtask_core::registry::TaskParams;

pub fn execute(
    manager: &ProjectManager,
    task: &str,
    params: &TaskParams,
    dry_run: bool,
) -> Result<()> {
    let mode = if dry_run { " (dry run)" } else { "" };
    println!("{} {}{}", "Running task".bold(), task.cyan(), mode.dimmed());
    println!();

    // Execute task using project manager
    manager
        .run_task(task, params, dry_run)
        .with_context(|| format!("Failed to run task '{}'", task))?;

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "All command groups completed successfully!".green().bold()
    );

    Ok(())
}
