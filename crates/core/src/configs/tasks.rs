use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::execution::command::{quote, CommandGroup, CommandLine};
use crate::registry::TaskParams;
use crate::types::{TaskError, TaskResult};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Command {
    /// Shell command line, run with `sh -c`
    Single(String),
    /// Program followed by its arguments, run without a shell
    Multiple(Vec<String>),
}

impl Command {
    /// Resolve `{{param}}` placeholders and build the command line.
    ///
    /// Substitution happens per argv element in the list form. In the shell
    /// form every value is quoted, so it reaches the program as one word.
    pub fn to_command_line(&self, params: &TaskParams) -> TaskResult<CommandLine> {
        match self {
            Command::Single(cmd) => Ok(CommandLine::shell(substitute_with(cmd, params, quote)?)),
            Command::Multiple(argv) => {
                let (program, args) = argv
                    .split_first()
                    .ok_or_else(|| TaskError::Config("Command list is empty".to_string()))?;
                let args = args
                    .iter()
                    .map(|arg| substitute(arg, params))
                    .collect::<TaskResult<Vec<_>>>()?;
                Ok(CommandLine::new(substitute(program, params)?).args(args))
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupConfig {
    pub label: String,
    pub commands: Vec<Command>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfig {
    pub name: String,
    pub description: Option<String>,
    /// Declared parameters and their default values
    pub params: Option<BTreeMap<String, String>>,
    pub groups: Vec<GroupConfig>,
}

impl TaskConfig {
    /// Build the command groups for one invocation
    pub fn resolve_groups(&self, params: &TaskParams) -> TaskResult<Vec<CommandGroup>> {
        self.groups
            .iter()
            .map(|group| {
                let commands = group
                    .commands
                    .iter()
                    .map(|command| command.to_command_line(params))
                    .collect::<TaskResult<Vec<_>>>()?;
                Ok(CommandGroup::new(substitute(&group.label, params)?, commands))
            })
            .collect()
    }
}

/// Replace every `{{name}}` in `template` with the parameter value
fn substitute(template: &str, params: &TaskParams) -> TaskResult<String> {
    substitute_with(template, params, str::to_string)
}

fn substitute_with<F>(template: &str, params: &TaskParams, render: F) -> TaskResult<String>
where
    F: Fn(&str) -> String,
{
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            TaskError::Config(format!("Unterminated placeholder in '{}'", template))
        })?;
        let name = after[..end].trim();
        let value = params.get(name).ok_or_else(|| {
            TaskError::Config(format!("Unknown placeholder '{{{{{}}}}}' in '{}'", name, template))
        })?;
        output.push_str(&render(value));
        rest = &after[end + 2..];
    }
    output.push_str(rest);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> TaskParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_placeholders() {
        let p = params(&[("board", "nrf52840dk/nrf52840")]);
        assert_eq!(
            substitute("west build --board {{board}}", &p).unwrap(),
            "west build --board nrf52840dk/nrf52840"
        );
        assert_eq!(substitute("{{ board }}-x", &p).unwrap(), "nrf52840dk/nrf52840-x");
        assert_eq!(substitute("no placeholders", &p).unwrap(), "no placeholders");
    }

    #[test]
    fn test_substitute_errors() {
        let p = params(&[]);
        assert!(substitute("{{missing}}", &p).is_err());
        assert!(substitute("{{open", &p).is_err());
    }

    #[test]
    fn test_list_command_keeps_values_whole() {
        let p = params(&[("overlay", "my overlay.conf")]);
        let command = Command::Multiple(vec![
            "west".to_string(),
            "build".to_string(),
            "--".to_string(),
            "-DEXTRA_CONF_FILE={{overlay}}".to_string(),
        ]);

        let line = command.to_command_line(&p).unwrap();
        assert_eq!(
            line.argv(),
            vec!["build", "--", "-DEXTRA_CONF_FILE=my overlay.conf"]
        );
    }

    #[test]
    fn test_shell_command_quotes_values() {
        let p = params(&[("board", "my board; echo INJECTED")]);
        let line = Command::Single("west build --board {{board}}".to_string())
            .to_command_line(&p)
            .unwrap();

        assert_eq!(
            line.argv(),
            vec!["-c", "west build --board 'my board; echo INJECTED'"]
        );
    }

    #[test]
    fn test_shell_command_keeps_plain_values_bare() {
        let p = params(&[("board", "nrf52840dk/nrf52840")]);
        let line = Command::Single("west build --board {{board}}".to_string())
            .to_command_line(&p)
            .unwrap();
        assert_eq!(line.to_string(), "west build --board nrf52840dk/nrf52840");
    }

    #[test]
    fn test_empty_list_command_rejected() {
        assert!(Command::Multiple(Vec::new())
            .to_command_line(&params(&[]))
            .is_err());
    }
}
