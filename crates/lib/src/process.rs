//! External tool invocation boundary.
//!
//! Every stage of the pipeline blocks on external tools (git, gclient,
//! gn, ninja, make_distrib). Controllers depend on [`ProcessRunner`]
//! rather than spawning processes themselves, so tests can script exit
//! codes and assert on the exact invocations.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::Result;
use crate::error::BuildError;

/// Runs external tools on behalf of the pipeline.
pub trait ProcessRunner {
  /// Run `program` with `args` in `cwd`, with `env` applied on top of
  /// the inherited environment. Returns the exit code (`-1` when the
  /// process was terminated by a signal).
  fn run(&self, program: &str, args: &[&str], cwd: &Path, env: &[(String, String)]) -> Result<i32>;
}

/// Run a tool and fail with [`BuildError::Tool`] on non-zero exit.
pub fn run_checked(
  runner: &dyn ProcessRunner,
  program: &str,
  args: &[&str],
  cwd: &Path,
  env: &[(String, String)],
) -> Result<()> {
  let code = runner.run(program, args, cwd, env)?;
  if code != 0 {
    return Err(BuildError::tool(program, Some(code)));
  }
  Ok(())
}

/// [`ProcessRunner`] backed by `std::process`, with stdio inherited so
/// tool output streams straight to the user.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
  fn run(&self, program: &str, args: &[&str], cwd: &Path, env: &[(String, String)]) -> Result<i32> {
    info!(program, ?args, cwd = %cwd.display(), "running tool");

    let mut command = Command::new(program);
    command.args(args).current_dir(cwd);
    for (key, value) in env {
      command.env(key, value);
    }

    let status = command.status().map_err(|source| BuildError::Spawn {
      tool: program.to_string(),
      source,
    })?;
    let code = status.code().unwrap_or(-1);
    debug!(program, code, "tool exited");
    Ok(code)
  }
}
