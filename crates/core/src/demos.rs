//! Catalogue of the tutorial projects
//!
//! Each demo knows its default board and the command groups its `ci` task
//! runs. The plain-CMake group of the basics demo targets a fixed board of its
//! own; every `west` invocation uses the board passed to the task.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::execution::command::{CommandGroup, CommandLine};
use crate::west::{
    cmake_build, cmake_configure, west_config_delete, west_config_list, west_config_set,
    CmakeDefine, WestBuild,
};

/// Board naming used since hardware model v2
pub const BOARD_NRF52840DK: &str = "nrf52840dk/nrf52840";
/// Board naming of older Zephyr releases
pub const BOARD_NRF52840DK_LEGACY: &str = "nrf52840dk_nrf52840";

const PLAIN_CMAKE_BOARD: &str = "nrf52dk/nrf52832";
const PLAIN_CMAKE_JOBS: u32 = 4;

const RELEASE_CONF: &str = "prj_release.conf";
const PROPS_BASICS_OVERLAY: &str = "dts/playground/props-basics.overlay";
const PROPS_PHANDLES_OVERLAY: &str = "dts/playground/props-phandles.overlay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    Basics,
    Kconfig,
    DevicetreeBasics,
    DevicetreeSemantics,
    Practice,
}

impl Demo {
    pub const ALL: [Demo; 5] = [
        Demo::Basics,
        Demo::Kconfig,
        Demo::DevicetreeBasics,
        Demo::DevicetreeSemantics,
        Demo::Practice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Demo::Basics => "basics",
            Demo::Kconfig => "kconfig",
            Demo::DevicetreeBasics => "devicetree-basics",
            Demo::DevicetreeSemantics => "devicetree-semantics",
            Demo::Practice => "practice",
        }
    }

    pub fn default_board(self) -> &'static str {
        match self {
            Demo::Basics | Demo::DevicetreeSemantics => BOARD_NRF52840DK,
            Demo::Kconfig | Demo::DevicetreeBasics | Demo::Practice => BOARD_NRF52840DK_LEGACY,
        }
    }

    /// Whether `west build` is passed `--no-sysbuild`
    pub fn no_sysbuild(self) -> bool {
        matches!(self, Demo::Basics | Demo::DevicetreeSemantics)
    }

    fn west_build(self, board: &str, build_dir: &str) -> WestBuild {
        WestBuild::new()
            .no_sysbuild(self.no_sysbuild())
            .build_dir(build_dir)
            .board(board)
    }

    /// Command groups of the `ci` task, without the final cleanup
    pub fn ci_groups(self, board: &str, build_dir: &str) -> Vec<CommandGroup> {
        let clean = || CommandLine::remove_dir(build_dir);
        let build = || self.west_build(board, build_dir);

        match self {
            Demo::Basics => vec![
                CommandGroup::new(
                    "plain CMake demo",
                    vec![
                        clean(),
                        cmake_configure(
                            build_dir,
                            &[CmakeDefine::new("BOARD", PLAIN_CMAKE_BOARD)],
                        ),
                        cmake_build(build_dir, PLAIN_CMAKE_JOBS),
                    ],
                ),
                CommandGroup::new("west demo", vec![clean(), build().into()]),
                CommandGroup::new(
                    "west build.board demo",
                    vec![
                        west_config_list(),
                        west_config_set("build.board", board),
                        clean(),
                        WestBuild::new()
                            .no_sysbuild(true)
                            .build_dir(build_dir)
                            .into(),
                        WestBuild::new()
                            .no_sysbuild(true)
                            .build_dir(build_dir)
                            .pristine()
                            .into(),
                        west_config_delete("build.board"),
                    ],
                ),
            ],
            Demo::Kconfig => {
                let release = || CmakeDefine::new("CONF_FILE", RELEASE_CONF);
                vec![
                    CommandGroup::new("Plain west build", vec![clean(), build().into()]),
                    CommandGroup::new(
                        "west release build",
                        vec![clean(), build().define(release()).into()],
                    ),
                    CommandGroup::new(
                        "west extra build",
                        vec![
                            clean(),
                            build()
                                .define(CmakeDefine::list(
                                    "EXTRA_CONF_FILE",
                                    &["extra0.conf", "extra1.conf"],
                                ))
                                .into(),
                        ],
                    ),
                    CommandGroup::new(
                        "west extra release build",
                        vec![
                            clean(),
                            build()
                                .define(release())
                                .define(CmakeDefine::list(
                                    "EXTRA_CONF_FILE",
                                    &["extra1.conf", "extra0.conf"],
                                ))
                                .into(),
                        ],
                    ),
                    CommandGroup::new(
                        "west hardenconfig",
                        vec![
                            clean(),
                            build().pristine().target("hardenconfig").into(),
                            build()
                                .pristine()
                                .target("hardenconfig")
                                .define(release())
                                .into(),
                        ],
                    ),
                ]
            }
            Demo::DevicetreeBasics => {
                let overlay = |files: &[&str]| -> CommandLine {
                    build()
                        .define(CmakeDefine::list("EXTRA_DTC_OVERLAY_FILE", files))
                        .into()
                };
                vec![
                    CommandGroup::new("Plain west build", vec![clean(), build().into()]),
                    CommandGroup::new(
                        "west build props-basics",
                        vec![clean(), overlay(&[PROPS_BASICS_OVERLAY])],
                    ),
                    CommandGroup::new(
                        "west build props-phandles",
                        vec![clean(), overlay(&[PROPS_PHANDLES_OVERLAY])],
                    ),
                    CommandGroup::new(
                        "west build props-basics;props-phandles",
                        vec![
                            clean(),
                            overlay(&[PROPS_PHANDLES_OVERLAY, PROPS_BASICS_OVERLAY]),
                        ],
                    ),
                ]
            }
            Demo::DevicetreeSemantics => vec![CommandGroup::new(
                "Plain west build",
                vec![
                    clean(),
                    build()
                        .define(CmakeDefine::list(
                            "DTC_OVERLAY_FILE",
                            &[PROPS_BASICS_OVERLAY, PROPS_PHANDLES_OVERLAY],
                        ))
                        .into(),
                ],
            )],
            Demo::Practice => vec![CommandGroup::new(
                "Plain west build",
                vec![clean(), build().into()],
            )],
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Demo::ALL
            .into_iter()
            .find(|demo| demo.name() == s)
            .ok_or_else(|| {
                let known = Demo::ALL.map(Demo::name).join(", ");
                format!("unknown demo '{}' (expected one of: {})", s, known)
            })
    }
}
