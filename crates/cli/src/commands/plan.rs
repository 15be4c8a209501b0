use anyhow::{Context, Result};
use colored::*;
use firmtask_core::project_manager::ProjectManager;
use firmtask_core::registry::TaskParams;

pub fn execute(manager: &ProjectManager, task: &str, params: &TaskParams) -> Result<()> {
    println!("{} {}", "Execution plan for".bold(), task.cyan());

    // Get execution plan from project manager
    let plan = manager
        .plan_task(task, params)
        .with_context(|| format!("Failed to get execution plan for '{}'", task))?;

    for (name, value) in plan.params.iter() {
        println!("  {} {}={}", "with".dimmed(), name, value);
    }

    for (i, group) in plan.groups.iter().enumerate() {
        println!("\n{}. {}", i + 1, group.label.bold());
        for command in &group.commands {
            println!("   {} {}", "$".bright_black(), command);
        }
    }

    println!(
        "\n{} {} commands in {} groups",
        "Total:".bold(),
        plan.commands().count(),
        plan.groups.len()
    );

    Ok(())
}
