//! Build command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use cefbuild_lib::paths::BuildPaths;
use cefbuild_lib::pipeline::{Pipeline, PipelineOptions};
use cefbuild_lib::platform::Platform;
use cefbuild_lib::process::SystemRunner;
use cefbuild_lib::state::FsStateStore;

use crate::cli::{BuildTypeArg, PlatformArg};
use crate::output::{print_info, print_success, print_warning};

#[allow(clippy::too_many_arguments)]
pub fn cmd_build(
  root: &Path,
  branch: Option<String>,
  chromium_branch: Option<String>,
  build_type: BuildTypeArg,
  platform: Option<PlatformArg>,
  clean: bool,
  jobs: Option<u32>,
) -> Result<()> {
  let platforms = match platform {
    Some(arg) => arg.expand(),
    None => vec![Platform::host().context("unsupported host platform; pass --platform")?],
  };

  let mode = cefbuild_lib::platform::BuildMode::from(build_type);
  let ids: Vec<&str> = platforms.iter().map(|p| p.id()).collect();
  print_info(&format!(
    "building {} ({}) under {}",
    ids.join(", "),
    mode.name(),
    root.display()
  ));

  let paths = BuildPaths::new(root);
  let state = FsStateStore::new(paths.state_dir());
  let runner = SystemRunner;

  let report = Pipeline::new(&paths, &state, &runner).run(&PipelineOptions {
    cef_branch: branch,
    chromium_version: chromium_branch,
    mode,
    platforms,
    clean,
    jobs,
  })?;

  println!();
  print_success(&format!(
    "CEF {} / Chromium {}",
    report.pair.cef_branch, report.pair.chromium_version
  ));
  for platform in &report.published {
    print_success(&format!(
      "{} -> {}",
      platform.id(),
      paths.published_dir(*platform).display()
    ));
  }
  for platform in &report.missing {
    print_warning(&format!("{}: no packaged distribution found", platform.id()));
  }
  if report.degraded() {
    print_warning("run degraded: some platforms produced no output");
  }

  Ok(())
}
