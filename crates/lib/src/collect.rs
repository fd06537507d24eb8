//! Publication of packaged distributions.
//!
//! make_distrib names its output directories after the release and
//! platform; the collector finds the one matching a target platform
//! and republishes it at a stable per-platform path, replacing any
//! previous contents wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::Result;
use crate::paths::BuildPaths;
use crate::platform::Platform;

/// Result of publishing one platform's distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
  /// Copied to the stable per-platform path.
  Published(PathBuf),
  /// Nothing in the packaging root matched the platform. Non-fatal;
  /// the driver degrades the run summary.
  NotFound,
}

/// Republishes packaged distributions to stable per-platform paths.
pub struct OutputCollector<'a> {
  paths: &'a BuildPaths,
}

impl<'a> OutputCollector<'a> {
  pub fn new(paths: &'a BuildPaths) -> Self {
    Self { paths }
  }

  /// Publish the packaged distribution for `platform`.
  ///
  /// Any previously published directory is removed first, so the
  /// stable path always holds exactly one distribution, never a merge
  /// of two runs.
  pub fn publish(&self, platform: Platform) -> Result<PublishOutcome> {
    let dest = self.paths.published_dir(platform);
    if dest.exists() {
      fs::remove_dir_all(&dest)?;
    }

    let distrib = self.paths.distrib_dir();
    if !distrib.exists() {
      warn!(dir = %distrib.display(), "packaging output root missing");
      return Ok(PublishOutcome::NotFound);
    }

    for entry in fs::read_dir(&distrib)? {
      let entry = entry?;
      if !entry.path().is_dir() {
        continue;
      }
      let name = entry.file_name().to_string_lossy().into_owned();
      if platform.matches_artifact(&name) {
        copy_tree(&entry.path(), &dest)?;
        info!(from = %name, to = %dest.display(), "published distribution");
        return Ok(PublishOutcome::Published(dest));
      }
    }

    warn!(platform = platform.id(), "no packaged distribution found");
    Ok(PublishOutcome::NotFound)
  }
}

/// Recursively copy a directory tree.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
  for entry in WalkDir::new(from) {
    let entry = entry.map_err(std::io::Error::from)?;
    let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
    let target = to.join(rel);
    if entry.file_type().is_dir() {
      fs::create_dir_all(&target)?;
    } else {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::copy(entry.path(), &target)?;
    }
  }
  Ok(())
}
