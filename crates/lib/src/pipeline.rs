//! The sequential pipeline driver.
//!
//! Platforms build strictly one after another: they share the single
//! Chromium tree and its depot_tools installation, so there is nothing
//! to parallelize at this level. The first fatal failure aborts the
//! remaining platforms; publish misses only degrade the summary.

use tracing::info;

use crate::Result;
use crate::checkout::CefCheckout;
use crate::collect::{OutputCollector, PublishOutcome};
use crate::executor::{BuildExecutor, ExecOptions};
use crate::paths::BuildPaths;
use crate::platform::{BuildMode, Platform};
use crate::process::ProcessRunner;
use crate::state::StateStore;
use crate::sync::SyncController;
use crate::tools::ToolsBootstrap;
use crate::version::{ReleasePair, VersionResolver};

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
  /// CEF branch override; resolved from the index when `None`.
  pub cef_branch: Option<String>,
  /// Chromium version override; resolved from the index when `None`.
  pub chromium_version: Option<String>,
  pub mode: BuildMode,
  /// Platforms to build, in order.
  pub platforms: Vec<Platform>,
  /// Delete build output directories before building.
  pub clean: bool,
  /// ninja parallelism bound.
  pub jobs: Option<u32>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
  /// The version pair the run built against.
  pub pair: ReleasePair,
  /// Platforms whose distribution was published.
  pub published: Vec<Platform>,
  /// Platforms that built but produced no matching packaged output.
  pub missing: Vec<Platform>,
}

impl PipelineReport {
  /// A run is degraded when any requested platform went unpublished.
  pub fn degraded(&self) -> bool {
    !self.missing.is_empty()
  }
}

/// Composes the full pipeline over injected state and process seams.
pub struct Pipeline<'a> {
  paths: &'a BuildPaths,
  state: &'a dyn StateStore,
  runner: &'a dyn ProcessRunner,
  resolver: VersionResolver,
}

impl<'a> Pipeline<'a> {
  pub fn new(paths: &'a BuildPaths, state: &'a dyn StateStore, runner: &'a dyn ProcessRunner) -> Self {
    Self {
      paths,
      state,
      runner,
      resolver: VersionResolver::new(),
    }
  }

  pub fn with_resolver(mut self, resolver: VersionResolver) -> Self {
    self.resolver = resolver;
    self
  }

  /// Run the full pipeline: resolve, bootstrap tools, sync, checkout,
  /// then build and publish each requested platform in order.
  pub fn run(&self, opts: &PipelineOptions) -> Result<PipelineReport> {
    let pair = self
      .resolver
      .resolve(opts.cef_branch.as_deref(), opts.chromium_version.as_deref())?;
    info!(cef = %pair.cef_branch, chromium = %pair.chromium_version, "starting pipeline");

    let env = ToolsBootstrap::new(self.paths, self.runner).ensure()?;

    SyncController::new(self.paths, self.state, self.runner, env.clone())
      .ensure_synced(&pair.chromium_version)?;
    CefCheckout::new(self.paths, self.state, self.runner).ensure_branch(&pair.cef_branch)?;

    let executor = BuildExecutor::new(self.paths, self.runner, env);
    let collector = OutputCollector::new(self.paths);

    let mut published = Vec::new();
    let mut missing = Vec::new();
    for &platform in &opts.platforms {
      info!(platform = platform.id(), mode = opts.mode.name(), "building platform");
      executor.build(
        platform,
        opts.mode,
        ExecOptions { clean: opts.clean, jobs: opts.jobs },
      )?;
      match collector.publish(platform)? {
        PublishOutcome::Published(_) => published.push(platform),
        PublishOutcome::NotFound => missing.push(platform),
      }
    }

    Ok(PipelineReport { pair, published, missing })
  }
}
