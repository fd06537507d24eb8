//! Build and package execution for one platform/mode pair.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::Result;
use crate::consts::PRIMARY_TARGET;
use crate::paths::BuildPaths;
use crate::plan::{ARGS_FILE, BuildConfig, BuildPlan, plan_build};
use crate::platform::{BuildMode, Platform};
use crate::process::{ProcessRunner, run_checked};

/// Per-run execution options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
  /// Delete the output directory before building, forcing a full
  /// regeneration and recompile.
  pub clean: bool,
  /// ninja parallelism bound; `None` lets ninja pick its own default.
  pub jobs: Option<u32>,
}

/// Runs generation, compilation and packaging for one target.
pub struct BuildExecutor<'a> {
  paths: &'a BuildPaths,
  runner: &'a dyn ProcessRunner,
  env: Vec<(String, String)>,
}

impl<'a> BuildExecutor<'a> {
  pub fn new(paths: &'a BuildPaths, runner: &'a dyn ProcessRunner, env: Vec<(String, String)>) -> Self {
    Self { paths, runner, env }
  }

  /// Build and package one platform/mode combination. Generation only
  /// runs when the planner demands it; compilation and packaging
  /// always run. Any non-zero tool exit is fatal.
  pub fn build(&self, platform: Platform, mode: BuildMode, opts: ExecOptions) -> Result<()> {
    let out_dir = self.paths.build_out(platform, mode);
    if opts.clean && out_dir.exists() {
      info!(out = %out_dir.display(), "clean requested, removing output directory");
      fs::remove_dir_all(&out_dir)?;
    }

    let config = BuildConfig::derive(platform, mode);
    let plan = plan_build(&out_dir, &config);
    let out_rel = self.paths.build_out_rel(platform, mode);
    let chromium_src = self.paths.chromium_src();

    if plan.regenerate {
      self.generate(&out_dir, &out_rel, &plan)?;
    } else {
      info!(out = %out_rel, "build configuration unchanged, reusing build graph");
    }

    let mut ninja_args: Vec<String> = vec!["-C".to_string(), out_rel.clone()];
    if let Some(jobs) = opts.jobs {
      ninja_args.push("-j".to_string());
      ninja_args.push(jobs.to_string());
    }
    ninja_args.push(PRIMARY_TARGET.to_string());
    run_checked(self.runner, "ninja", &as_strs(&ninja_args), &chromium_src, &self.env)?;

    let distrib_flag = format!("--{}", platform.distrib_flag());
    run_checked(
      self.runner,
      "python3",
      &[
        "tools/make_distrib.py",
        "--ninja-build",
        &distrib_flag,
        "--output-dir",
        "../../distrib/",
      ],
      &self.paths.cef_dir(),
      &self.env,
    )?;

    info!(platform = platform.id(), mode = mode.name(), "build and packaging complete");
    Ok(())
  }

  /// Run the CEF patch hook, write args.gn, and regenerate the build
  /// graph.
  fn generate(&self, out_dir: &Path, out_rel: &str, plan: &BuildPlan) -> Result<()> {
    let chromium_src = self.paths.chromium_src();

    // The hook patches the tree and may partially no-op on reruns;
    // its exit code is advisory, matching upstream usage.
    let code = self
      .runner
      .run("python3", &["cef/tools/gclient_hook.py"], &chromium_src, &self.env)?;
    if code != 0 {
      warn!(code, "gclient_hook exited non-zero, continuing");
    }

    fs::create_dir_all(out_dir)?;
    // Skip the write when the bytes already match, keeping args.gn's
    // timestamp stable.
    let stored = fs::read_to_string(out_dir.join(ARGS_FILE)).ok();
    if stored.as_deref() != Some(plan.args.as_str()) {
      fs::write(out_dir.join(ARGS_FILE), &plan.args)?;
    }

    run_checked(self.runner, "gn", &["gen", out_rel], &chromium_src, &self.env)?;
    Ok(())
  }
}

fn as_strs(args: &[String]) -> Vec<&str> {
  args.iter().map(String::as_str).collect()
}
