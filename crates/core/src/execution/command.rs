//! Command model
//!
//! Commands are kept as structured argument vectors so that board names,
//! overlay lists and paths never pass through shell quoting. The shell form
//! only exists for commands written by hand in `firmtask.yml`.

use std::fmt;

/// A single external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// Program plus argument vector, spawned directly
    Exec { program: String, args: Vec<String> },
    /// A command line handed to `sh -c`
    Shell(String),
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandLine::Exec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn shell(cmd: impl Into<String>) -> Self {
        CommandLine::Shell(cmd.into())
    }

    /// Append an argument. Has no effect on the shell form.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        if let CommandLine::Exec { args, .. } = &mut self {
            args.push(arg.into());
        }
        self
    }

    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        args.into_iter().fold(self, |cmd, arg| cmd.arg(arg))
    }

    /// `rm -rf <dir>`
    pub fn remove_dir(dir: &str) -> Self {
        CommandLine::new("rm").args(["-rf", dir])
    }

    /// Program name for the exec form, `sh` for the shell form
    pub fn program(&self) -> &str {
        match self {
            CommandLine::Exec { program, .. } => program,
            CommandLine::Shell(_) => "sh",
        }
    }

    /// Full argument vector, not including the program
    pub fn argv(&self) -> Vec<&str> {
        match self {
            CommandLine::Exec { args, .. } => args.iter().map(String::as_str).collect(),
            CommandLine::Shell(cmd) => vec!["-c", cmd.as_str()],
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Shell(cmd) => f.write_str(cmd),
            CommandLine::Exec { program, args } => {
                f.write_str(&quote(program))?;
                for arg in args {
                    write!(f, " {}", quote(arg))?;
                }
                Ok(())
            }
        }
    }
}

/// Quote a word so a shell reads it back as exactly one word
pub(crate) fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '=' | ':' | ',' | '+' | '@')
        });
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// An ordered, labelled sequence of commands executed as one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    pub label: String,
    pub commands: Vec<CommandLine>,
}

impl CommandGroup {
    pub fn new(label: impl Into<String>, commands: Vec<CommandLine>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }
}
