use anyhow::Result;
use colored::*;
use firmtask_core::project_manager::ProjectManager;

pub fn execute(manager: &ProjectManager) -> Result<()> {
    let heading = match manager.settings.demo {
        Some(demo) => format!("Tasks ({} demo)", demo),
        None => "Tasks".to_string(),
    };
    println!("{}", heading.bold().underline());

    let tasks = manager.list_tasks();
    if tasks.is_empty() {
        println!("  {}", "No tasks found".dimmed());
        return Ok(());
    }

    for task in tasks {
        match &task.description {
            Some(description) => println!("{} {}", task.name.blue().bold(), description.dimmed()),
            None => println!("{}", task.name.blue().bold()),
        }

        for param in &task.params {
            let help = param
                .help
                .as_deref()
                .map(|help| format!(" {}", help.dimmed()))
                .unwrap_or_default();
            println!(
                "  --param {}={}{}",
                param.name.cyan(),
                param.default,
                help
            );
        }
    }

    Ok(())
}
