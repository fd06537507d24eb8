//! Error types for the build pipeline.

use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Publish misses are deliberately not represented here: the output
/// collector reports them as a non-fatal outcome and the driver only
/// degrades the run summary.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Version index unreachable, malformed, or holding no stable entry.
  #[error("version resolution failed: {reason}")]
  Resolution { reason: String },

  /// gclient sync kept failing until the attempt bound was exhausted.
  #[error("chromium sync failed after {attempts} attempts")]
  SyncExhausted { attempts: u32 },

  /// An external tool exited non-zero.
  #[error("{tool} failed with exit code {code:?}")]
  Tool { tool: String, code: Option<i32> },

  /// An external tool could not be spawned at all.
  #[error("failed to spawn {tool}: {source}")]
  Spawn {
    tool: String,
    #[source]
    source: std::io::Error,
  },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl BuildError {
  pub(crate) fn resolution(reason: impl Into<String>) -> Self {
    BuildError::Resolution { reason: reason.into() }
  }

  pub(crate) fn tool(tool: impl Into<String>, code: Option<i32>) -> Self {
    BuildError::Tool { tool: tool.into(), code }
  }
}
