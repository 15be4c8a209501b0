//! Typed command builders for `west` and plain `cmake`
//!
//! Every option becomes its own argv element. List-valued cache variables
//! such as `EXTRA_CONF_FILE` are joined with `;` into a single argument, so
//! no shell quoting is involved.

use crate::execution::command::CommandLine;

/// West's own default build directory; only other values are passed on.
pub const WEST_DEFAULT_BUILD_DIR: &str = "build";

/// A `-D<NAME>=<VALUE>` CMake cache definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmakeDefine {
    pub name: String,
    pub value: String,
}

impl CmakeDefine {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Definition whose value is a `;`-separated CMake list
    pub fn list<S: AsRef<str>>(name: impl Into<String>, items: &[S]) -> Self {
        let value = items
            .iter()
            .map(|item| item.as_ref())
            .collect::<Vec<_>>()
            .join(";");
        Self::new(name, value)
    }

    pub fn to_arg(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

/// Builder for `west build`
#[derive(Debug, Clone, Default)]
pub struct WestBuild {
    board: Option<String>,
    no_sysbuild: bool,
    pristine: bool,
    target: Option<String>,
    build_dir: Option<String>,
    defines: Vec<CmakeDefine>,
}

impl WestBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(mut self, board: impl Into<String>) -> Self {
        self.board = Some(board.into());
        self
    }

    pub fn no_sysbuild(mut self, no_sysbuild: bool) -> Self {
        self.no_sysbuild = no_sysbuild;
        self
    }

    pub fn pristine(mut self) -> Self {
        self.pristine = true;
        self
    }

    /// Build target passed with `-t`, e.g. `hardenconfig`
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn build_dir(mut self, build_dir: &str) -> Self {
        self.build_dir = (build_dir != WEST_DEFAULT_BUILD_DIR).then(|| build_dir.to_string());
        self
    }

    pub fn define(mut self, define: CmakeDefine) -> Self {
        self.defines.push(define);
        self
    }

    pub fn to_command(&self) -> CommandLine {
        let mut cmd = CommandLine::new("west").arg("build");
        if self.no_sysbuild {
            cmd = cmd.arg("--no-sysbuild");
        }
        if let Some(dir) = &self.build_dir {
            cmd = cmd.args(["--build-dir", dir.as_str()]);
        }
        if let Some(board) = &self.board {
            cmd = cmd.args(["--board", board.as_str()]);
        }
        if self.pristine {
            cmd = cmd.arg("--pristine");
        }
        if let Some(target) = &self.target {
            cmd = cmd.args(["-t", target.as_str()]);
        }
        if !self.defines.is_empty() {
            cmd = cmd
                .arg("--")
                .args(self.defines.iter().map(CmakeDefine::to_arg));
        }
        cmd
    }
}

impl From<WestBuild> for CommandLine {
    fn from(build: WestBuild) -> Self {
        build.to_command()
    }
}

/// `west config -l`
pub fn west_config_list() -> CommandLine {
    CommandLine::new("west").args(["config", "-l"])
}

/// `west config <key> <value>`
pub fn west_config_set(key: &str, value: &str) -> CommandLine {
    CommandLine::new("west").args(["config", key, value])
}

/// `west config -d <key>`
pub fn west_config_delete(key: &str) -> CommandLine {
    CommandLine::new("west").args(["config", "-d", key])
}

/// `cmake -B <dir> <defines...>`
pub fn cmake_configure(build_dir: &str, defines: &[CmakeDefine]) -> CommandLine {
    CommandLine::new("cmake")
        .args(["-B", build_dir])
        .args(defines.iter().map(CmakeDefine::to_arg))
}

/// `cmake --build <dir> -- -j<jobs>`
pub fn cmake_build(build_dir: &str, jobs: u32) -> CommandLine {
    CommandLine::new("cmake")
        .args(["--build", build_dir, "--"])
        .arg(format!("-j{}", jobs))
}
