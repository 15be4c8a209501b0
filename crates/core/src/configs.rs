//! Configuration parsing for `firmtask.yml`

pub mod project;
pub mod tasks;
