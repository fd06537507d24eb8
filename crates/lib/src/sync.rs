//! Chromium source synchronization.
//!
//! gclient syncs of this size fail transiently (network drops, partial
//! lockfile state), so the controller retries up to a fixed bound and
//! removes known-bad partial state before every attempt. A completion
//! marker persists across runs: an already-synced tree costs one state
//! read to revalidate instead of a full sync.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::Result;
use crate::consts::{
  BAD_STATE_DIRS, BAD_STATE_PREFIXES, CHROMIUM_SRC_URL, KEY_CHROMIUM_VERSION, KEY_SYNC_COMPLETE,
  MAX_SYNC_ATTEMPTS,
};
use crate::error::BuildError;
use crate::paths::BuildPaths;
use crate::process::{ProcessRunner, run_checked};
use crate::state::StateStore;

/// What [`SyncController::ensure_synced`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
  /// Tree already matched the requested version.
  Skipped,
  /// Tree was (re)synchronized; gclient attempts used.
  Synced { attempts: u32 },
}

/// Keeps the local Chromium tree in sync with a requested version.
pub struct SyncController<'a> {
  paths: &'a BuildPaths,
  state: &'a dyn StateStore,
  runner: &'a dyn ProcessRunner,
  env: Vec<(String, String)>,
}

impl<'a> SyncController<'a> {
  pub fn new(
    paths: &'a BuildPaths,
    state: &'a dyn StateStore,
    runner: &'a dyn ProcessRunner,
    env: Vec<(String, String)>,
  ) -> Self {
    Self { paths, state, runner, env }
  }

  /// Ensure the local tree matches `version`.
  ///
  /// Skips entirely when the cached version matches, the completion
  /// marker is set, and the tree holds a real checkout. Otherwise the
  /// manifest is rewritten, the completion marker cleared, and gclient
  /// retried up to [`MAX_SYNC_ATTEMPTS`] times. Exhaustion is fatal.
  pub fn ensure_synced(&self, version: &str) -> Result<SyncOutcome> {
    if self.is_current(version) {
      info!(version, "chromium tree up to date, skipping sync");
      return Ok(SyncOutcome::Skipped);
    }

    if let Some(cached) = self.state.get(KEY_CHROMIUM_VERSION) {
      if cached != version {
        info!(from = %cached, to = version, "chromium version changed");
      }
    }

    self.write_manifest(version)?;
    self.state.clear(KEY_SYNC_COMPLETE)?;

    let chromium_git = self.paths.chromium_git();
    for attempt in 1..=MAX_SYNC_ATTEMPTS {
      info!(attempt, max = MAX_SYNC_ATTEMPTS, "gclient sync");
      self.clean_bad_state()?;

      let code = self.runner.run(
        "gclient",
        &["sync", "--nohooks", "--no-history", "-D", "-R", "-f"],
        &chromium_git,
        &self.env,
      )?;

      // A zero exit without a source tree is still a failed sync.
      if code == 0 && self.paths.chromium_src().exists() {
        run_checked(self.runner, "gclient", &["runhooks"], &chromium_git, &self.env)?;
        self.state.set(KEY_CHROMIUM_VERSION, version)?;
        self.state.set(KEY_SYNC_COMPLETE, "true")?;
        info!(version, attempts = attempt, "chromium sync complete");
        return Ok(SyncOutcome::Synced { attempts: attempt });
      }

      warn!(attempt, code, "gclient sync failed");
    }

    Err(BuildError::SyncExhausted { attempts: MAX_SYNC_ATTEMPTS })
  }

  /// A sync is current only with a matching cached version, a set
  /// completion marker, and a tree that actually holds a checkout.
  fn is_current(&self, version: &str) -> bool {
    self.state.get(KEY_CHROMIUM_VERSION).as_deref() == Some(version)
      && self.state.is_set(KEY_SYNC_COMPLETE)
      && self.paths.chromium_src().exists()
  }

  /// Overwrite the .gclient manifest. Rewritten on every sync decision
  /// so the file stays the single source of truth.
  fn write_manifest(&self, version: &str) -> Result<()> {
    fs::create_dir_all(self.paths.chromium_git())?;
    fs::create_dir_all(self.paths.git_cache())?;
    fs::write(
      self.paths.gclient_file(),
      gclient_manifest(version, &self.paths.git_cache()),
    )?;
    debug!(version, "wrote .gclient manifest");
    Ok(())
  }

  /// Remove partial state an interrupted sync may have left behind.
  /// Only allow-listed names are ever touched.
  fn clean_bad_state(&self) -> Result<()> {
    let chromium_git = self.paths.chromium_git();
    for name in BAD_STATE_DIRS {
      let dir = chromium_git.join(name);
      if dir.exists() {
        warn!(dir = %dir.display(), "removing bad sync state");
        fs::remove_dir_all(&dir)?;
      }
    }
    for entry in fs::read_dir(&chromium_git)? {
      let entry = entry?;
      if !entry.path().is_dir() {
        continue;
      }
      let name = entry.file_name();
      let name = name.to_string_lossy();
      if BAD_STATE_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        warn!(dir = %entry.path().display(), "removing gclient temp state");
        fs::remove_dir_all(entry.path())?;
      }
    }
    Ok(())
  }
}

/// Render the gclient solutions file for a Chromium version.
pub fn gclient_manifest(version: &str, cache_dir: &Path) -> String {
  format!(
    r#"solutions = [
  {{
    "name": "src",
    "url": "{CHROMIUM_SRC_URL}@{version}",
    "managed": False,
    "custom_deps": {{}},
    "custom_vars": {{
      "checkout_pgo_profiles": True,
      "source_tarball": False,
    }},
  }},
]
cache_dir = "{cache}"
"#,
    cache = cache_dir.display()
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::MemStateStore;
  use crate::util::testutil::RecordingRunner;
  use tempfile::TempDir;

  const VERSION: &str = "143.0.7499.193";

  fn workspace() -> (TempDir, BuildPaths) {
    let temp = TempDir::new().unwrap();
    let paths = BuildPaths::new(temp.path());
    (temp, paths)
  }

  #[test]
  fn current_tree_skips_without_any_invocation() {
    let (_temp, paths) = workspace();
    std::fs::create_dir_all(paths.chromium_src()).unwrap();
    let state = MemStateStore::new();
    state.set(KEY_CHROMIUM_VERSION, VERSION).unwrap();
    state.set(KEY_SYNC_COMPLETE, "true").unwrap();
    let runner = RecordingRunner::new();

    let outcome = SyncController::new(&paths, &state, &runner, vec![])
      .ensure_synced(VERSION)
      .unwrap();

    assert_eq!(outcome, SyncOutcome::Skipped);
    assert_eq!(runner.call_count(), 0);
  }

  #[test]
  fn completion_marker_alone_is_not_enough_without_a_tree() {
    let (_temp, paths) = workspace();
    let state = MemStateStore::new();
    state.set(KEY_CHROMIUM_VERSION, VERSION).unwrap();
    state.set(KEY_SYNC_COMPLETE, "true").unwrap();
    let runner = RecordingRunner::new().create_dir_on("gclient", paths.chromium_src());

    let outcome = SyncController::new(&paths, &state, &runner, vec![])
      .ensure_synced(VERSION)
      .unwrap();

    assert_eq!(outcome, SyncOutcome::Synced { attempts: 1 });
  }

  #[test]
  fn fresh_sync_writes_manifest_and_persists_state() {
    let (_temp, paths) = workspace();
    let state = MemStateStore::new();
    let runner = RecordingRunner::new().create_dir_on("gclient", paths.chromium_src());

    let outcome = SyncController::new(&paths, &state, &runner, vec![])
      .ensure_synced(VERSION)
      .unwrap();

    assert_eq!(outcome, SyncOutcome::Synced { attempts: 1 });

    let manifest = std::fs::read_to_string(paths.gclient_file()).unwrap();
    assert!(manifest.contains(&format!("chromium/src.git@{VERSION}")));
    assert!(manifest.contains("cache_dir"));

    assert_eq!(state.get(KEY_CHROMIUM_VERSION).as_deref(), Some(VERSION));
    assert!(state.is_set(KEY_SYNC_COMPLETE));

    // sync, then runhooks
    let calls = runner.calls();
    assert_eq!(calls[0].args[0], "sync");
    assert_eq!(calls[1].args[0], "runhooks");
  }

  #[test]
  fn version_change_clears_completion_before_attempts() {
    let (_temp, paths) = workspace();
    std::fs::create_dir_all(paths.chromium_src()).unwrap();
    let state = MemStateStore::new();
    state.set(KEY_CHROMIUM_VERSION, "142.0.0.1").unwrap();
    state.set(KEY_SYNC_COMPLETE, "true").unwrap();
    // Every attempt fails; the marker must already be gone.
    let runner = RecordingRunner::new().script(&[1; 10]);

    let err = SyncController::new(&paths, &state, &runner, vec![])
      .ensure_synced(VERSION)
      .unwrap_err();

    assert!(matches!(err, BuildError::SyncExhausted { attempts: 10 }));
    assert!(!state.is_set(KEY_SYNC_COMPLETE));
    // 10 sync attempts, no runhooks
    assert_eq!(runner.call_count(), 10);
  }

  #[test]
  fn zero_exit_without_tree_counts_as_failure() {
    let (_temp, paths) = workspace();
    let state = MemStateStore::new();
    // All exits are 0 but the fake never creates the source tree.
    let runner = RecordingRunner::new();

    let err = SyncController::new(&paths, &state, &runner, vec![])
      .ensure_synced(VERSION)
      .unwrap_err();

    assert!(matches!(err, BuildError::SyncExhausted { attempts: 10 }));
    assert!(!state.is_set(KEY_SYNC_COMPLETE));
  }

  #[test]
  fn retry_succeeds_midway() {
    let (_temp, paths) = workspace();
    let state = MemStateStore::new();
    let runner = RecordingRunner::new()
      .script(&[1, 1, 0])
      .create_dir_on("gclient", paths.chromium_src());

    let outcome = SyncController::new(&paths, &state, &runner, vec![])
      .ensure_synced(VERSION)
      .unwrap();

    assert_eq!(outcome, SyncOutcome::Synced { attempts: 3 });
  }

  #[test]
  fn bad_state_is_cleaned_before_attempts() {
    let (_temp, paths) = workspace();
    let chromium_git = paths.chromium_git();
    std::fs::create_dir_all(chromium_git.join("_bad_scm")).unwrap();
    std::fs::create_dir_all(chromium_git.join("_gclient_tmp123")).unwrap();
    std::fs::create_dir_all(chromium_git.join("keepme")).unwrap();
    let state = MemStateStore::new();
    let runner = RecordingRunner::new().script(&[1; 10]);

    let _ = SyncController::new(&paths, &state, &runner, vec![]).ensure_synced(VERSION);

    assert!(!chromium_git.join("_bad_scm").exists());
    assert!(!chromium_git.join("_gclient_tmp123").exists());
    // Anything outside the allow-list stays.
    assert!(chromium_git.join("keepme").exists());
  }

  #[test]
  fn manifest_renders_version_and_cache() {
    let manifest = gclient_manifest(VERSION, Path::new("/cache/git"));
    assert!(manifest.contains(&format!("\"url\": \"{CHROMIUM_SRC_URL}@{VERSION}\"")));
    assert!(manifest.contains("cache_dir = \"/cache/git\""));
  }
}
