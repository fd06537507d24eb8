//! CEF checkout inside the Chromium tree.
//!
//! The full-ref fetch is the expensive part of moving branches, so it
//! only runs when the persisted branch marker disagrees with the
//! requested branch.

use tracing::info;

use crate::Result;
use crate::consts::{CEF_URL, KEY_CEF_BRANCH};
use crate::paths::BuildPaths;
use crate::process::{ProcessRunner, run_checked};
use crate::state::StateStore;

/// What [`CefCheckout::ensure_branch`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
  /// Already on the requested branch.
  Skipped,
  /// Fetched and checked out the requested branch.
  CheckedOut,
}

/// Keeps the CEF repository checked out at a requested branch.
pub struct CefCheckout<'a> {
  paths: &'a BuildPaths,
  state: &'a dyn StateStore,
  runner: &'a dyn ProcessRunner,
}

impl<'a> CefCheckout<'a> {
  pub fn new(paths: &'a BuildPaths, state: &'a dyn StateStore, runner: &'a dyn ProcessRunner) -> Self {
    Self { paths, state, runner }
  }

  /// Clone CEF into the tree if absent, then make sure `branch` is
  /// checked out. A fresh clone always checks out, whatever the
  /// persisted marker claims.
  pub fn ensure_branch(&self, branch: &str) -> Result<CheckoutOutcome> {
    let cef_dir = self.paths.cef_dir();
    let fresh_clone = !cef_dir.exists();

    if fresh_clone {
      info!(url = CEF_URL, "cloning cef");
      run_checked(
        self.runner,
        "git",
        &["clone", CEF_URL, "cef"],
        &self.paths.chromium_src(),
        &[],
      )?;
    }

    if !fresh_clone && self.state.get(KEY_CEF_BRANCH).as_deref() == Some(branch) {
      info!(branch, "cef already on branch, skipping checkout");
      return Ok(CheckoutOutcome::Skipped);
    }

    run_checked(self.runner, "git", &["fetch", "--all"], &cef_dir, &[])?;
    run_checked(self.runner, "git", &["checkout", branch], &cef_dir, &[])?;
    self.state.set(KEY_CEF_BRANCH, branch)?;
    info!(branch, "cef checkout complete");
    Ok(CheckoutOutcome::CheckedOut)
  }
}
