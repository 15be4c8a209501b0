use anyhow::Result;
use firmtask_core::configs::project::project_config_schema;

pub fn execute() -> Result<()> {
    println!("{}", project_config_schema()?);
    Ok(())
}
