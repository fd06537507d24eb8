//! depot_tools bootstrap and the fetch environment.

use std::fs;

use tracing::{info, warn};

use crate::Result;
use crate::consts::DEPOT_TOOLS_URL;
use crate::paths::BuildPaths;
use crate::process::{ProcessRunner, run_checked};

/// Ensures the depot_tools checkout exists and is initialized.
pub struct ToolsBootstrap<'a> {
  paths: &'a BuildPaths,
  runner: &'a dyn ProcessRunner,
}

impl<'a> ToolsBootstrap<'a> {
  pub fn new(paths: &'a BuildPaths, runner: &'a dyn ProcessRunner) -> Self {
    Self { paths, runner }
  }

  /// Clone depot_tools if absent and run its self-update script, then
  /// return the environment overrides every fetch/build invocation
  /// needs.
  pub fn ensure(&self) -> Result<Vec<(String, String)>> {
    let depot = self.paths.depot_tools();
    if !depot.exists() {
      info!(url = DEPOT_TOOLS_URL, "cloning depot_tools");
      fs::create_dir_all(self.paths.src_dir())?;
      run_checked(
        self.runner,
        "git",
        &["clone", DEPOT_TOOLS_URL],
        &self.paths.src_dir(),
        &[],
      )?;
    }

    // Self-update is best effort; an offline host can still build an
    // already-synced tree.
    let code = self.runner.run("./update_depot_tools", &[], &depot, &[])?;
    if code != 0 {
      warn!(code, "update_depot_tools exited non-zero, continuing");
    }

    Ok(fetch_env(self.paths))
  }
}

/// Environment overrides for gclient/gn/ninja invocations: depot_tools
/// first on PATH, self-updates pinned off, shared git cache.
///
/// PATH is joined with `:`; supported build hosts are Unix only.
pub fn fetch_env(paths: &BuildPaths) -> Vec<(String, String)> {
  let depot = paths.depot_tools();
  let path = match std::env::var("PATH") {
    Ok(existing) => format!("{}:{existing}", depot.display()),
    Err(_) => depot.display().to_string(),
  };
  vec![
    ("PATH".to_string(), path),
    ("DEPOT_TOOLS_UPDATE".to_string(), "0".to_string()),
    (
      "GIT_CACHE_PATH".to_string(),
      paths.git_cache().display().to_string(),
    ),
  ]
}
