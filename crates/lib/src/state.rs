//! Persisted pipeline state.
//!
//! Controllers record their progress (last synced Chromium version,
//! sync completion, checked-out CEF branch) as named string keys
//! behind the [`StateStore`] trait rather than reading marker files
//! from ambient paths, so every controller is unit-testable without a
//! real workspace.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::Result;

/// Named persisted markers.
///
/// A key is either a value (`get` returns the stored string) or a
/// presence flag (`is_set`). Missing keys are simply absent, never an
/// error.
pub trait StateStore {
  fn get(&self, key: &str) -> Option<String>;

  fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Remove a key. Clearing an absent key is a no-op.
  fn clear(&self, key: &str) -> Result<()>;

  /// Presence-flag view of a key.
  fn is_set(&self, key: &str) -> bool {
    self.get(key).is_some()
  }
}

/// One plain-text file per key under a state directory.
///
/// Values are stored with a trailing newline and trimmed on read, so
/// the files stay friendly to shell inspection.
#[derive(Debug, Clone)]
pub struct FsStateStore {
  dir: PathBuf,
}

impl FsStateStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn key_path(&self, key: &str) -> PathBuf {
    self.dir.join(key)
  }
}

impl StateStore for FsStateStore {
  fn get(&self, key: &str) -> Option<String> {
    match fs::read_to_string(self.key_path(key)) {
      Ok(content) => Some(content.trim().to_string()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => None,
      Err(e) => {
        debug!(key, error = %e, "unreadable state key treated as absent");
        None
      }
    }
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    fs::create_dir_all(&self.dir)?;
    fs::write(self.key_path(key), format!("{value}\n"))?;
    Ok(())
  }

  fn clear(&self, key: &str) -> Result<()> {
    match fs::remove_file(self.key_path(key)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemStateStore {
  map: RefCell<HashMap<String, String>>,
}

impl MemStateStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl StateStore for MemStateStore {
  fn get(&self, key: &str) -> Option<String> {
    self.map.borrow().get(key).cloned()
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.map.borrow_mut().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn clear(&self, key: &str) -> Result<()> {
    self.map.borrow_mut().remove(key);
    Ok(())
  }
}
