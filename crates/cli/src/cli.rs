//! CLI argument types.

use std::path::PathBuf;

use cefbuild_lib::platform::{BuildMode, Platform};
use clap::{Parser, Subcommand, ValueEnum};

/// Target platform argument; `all` expands to every supported
/// platform.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
  #[value(name = "linux64")]
  Linux64,

  #[value(name = "linuxarm64")]
  LinuxArm64,

  #[value(name = "macosx64")]
  MacosX64,

  #[value(name = "macosarm64")]
  MacosArm64,

  #[value(name = "all")]
  All,
}

impl PlatformArg {
  pub fn expand(self) -> Vec<Platform> {
    match self {
      PlatformArg::Linux64 => vec![Platform::Linux64],
      PlatformArg::LinuxArm64 => vec![Platform::LinuxArm64],
      PlatformArg::MacosX64 => vec![Platform::MacosX64],
      PlatformArg::MacosArm64 => vec![Platform::MacosArm64],
      PlatformArg::All => Platform::ALL.to_vec(),
    }
  }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BuildTypeArg {
  #[value(name = "Release")]
  Release,

  #[value(name = "Debug")]
  Debug,
}

impl From<BuildTypeArg> for BuildMode {
  fn from(arg: BuildTypeArg) -> Self {
    match arg {
      BuildTypeArg::Release => BuildMode::Release,
      BuildTypeArg::Debug => BuildMode::Debug,
    }
  }
}

/// cefbuild - build CEF binary distributions from source
#[derive(Parser)]
#[command(name = "cefbuild")]
#[command(version, about)]
pub struct Cli {
  /// Workspace root holding sources, caches and published outputs
  #[arg(long, default_value = "vendor/cef", global = true)]
  pub root: PathBuf,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
  /// Sync sources, build and publish distributions
  Build {
    /// CEF branch override (resolved from the index if not set)
    #[arg(long)]
    branch: Option<String>,

    /// Chromium version override (resolved from the index if not set)
    #[arg(long)]
    chromium_branch: Option<String>,

    /// Build type
    #[arg(long, value_enum, default_value_t = BuildTypeArg::Release)]
    build_type: BuildTypeArg,

    /// Target platform (host platform if not set)
    #[arg(long, value_enum)]
    platform: Option<PlatformArg>,

    /// Delete the build output directory before building
    #[arg(long)]
    clean: bool,

    /// Bound ninja parallelism (ninja's own default if not set)
    #[arg(long)]
    jobs: Option<u32>,
  },

  /// Print the latest stable CEF/Chromium version pair
  Resolve,

  /// Show cached sync and checkout state
  Status,
}
