//! On-disk layout of a build workspace.
//!
//! Everything the pipeline touches lives under one root:
//!
//! ```text
//! <root>/
//! ├── state/                         # marker files (FsStateStore)
//! ├── src/
//! │   ├── depot_tools/               # fetch toolchain
//! │   ├── git_cache/                 # shared gclient git cache
//! │   └── chromium_git/
//! │       ├── .gclient               # sync manifest
//! │       ├── distrib/               # make_distrib output root
//! │       └── src/                   # Chromium tree
//! │           ├── cef/               # CEF checkout
//! │           └── out/<Mode>_GN_<platform>/
//! └── out/<platform>/                # published distributions
//! ```

use std::path::{Path, PathBuf};

use crate::platform::{BuildMode, Platform};

/// Path accessors for one build workspace root.
#[derive(Debug, Clone)]
pub struct BuildPaths {
  root: PathBuf,
}

impl BuildPaths {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding the persisted pipeline markers.
  pub fn state_dir(&self) -> PathBuf {
    self.root.join("state")
  }

  pub fn src_dir(&self) -> PathBuf {
    self.root.join("src")
  }

  pub fn depot_tools(&self) -> PathBuf {
    self.src_dir().join("depot_tools")
  }

  pub fn git_cache(&self) -> PathBuf {
    self.src_dir().join("git_cache")
  }

  /// gclient working directory (holds the manifest and the tree).
  pub fn chromium_git(&self) -> PathBuf {
    self.src_dir().join("chromium_git")
  }

  pub fn gclient_file(&self) -> PathBuf {
    self.chromium_git().join(".gclient")
  }

  /// The Chromium tree itself. Its existence is the evidence a sync
  /// actually produced a checkout.
  pub fn chromium_src(&self) -> PathBuf {
    self.chromium_git().join("src")
  }

  /// CEF checkout inside the Chromium tree.
  pub fn cef_dir(&self) -> PathBuf {
    self.chromium_src().join("cef")
  }

  /// Build output directory, relative to the Chromium tree. This is
  /// the form gn and ninja are invoked with.
  pub fn build_out_rel(&self, platform: Platform, mode: BuildMode) -> String {
    format!("out/{}_GN_{}", mode.name(), platform.id())
  }

  pub fn build_out(&self, platform: Platform, mode: BuildMode) -> PathBuf {
    self.chromium_src().join(self.build_out_rel(platform, mode))
  }

  /// Root make_distrib writes packaged distributions into.
  pub fn distrib_dir(&self) -> PathBuf {
    self.chromium_git().join("distrib")
  }

  /// Stable per-platform publication path.
  pub fn published_dir(&self, platform: Platform) -> PathBuf {
    self.root.join("out").join(platform.id())
  }
}
