//! Shared test fakes for controller tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::process::ProcessRunner;

/// One recorded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

/// [`ProcessRunner`] that records invocations and returns scripted
/// exit codes.
///
/// Scripted codes are consumed front-to-back; once the script runs
/// out, every further invocation exits 0. Side effects registered
/// with [`RecordingRunner::create_dir_on`] emulate tools that
/// materialize directories (clones, syncs).
#[derive(Debug, Default)]
pub struct RecordingRunner {
  calls: RefCell<Vec<Call>>,
  script: RefCell<VecDeque<i32>>,
  side_effects: RefCell<Vec<(String, PathBuf)>>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue exit codes for upcoming invocations.
  pub fn script(self, codes: &[i32]) -> Self {
    self.script.borrow_mut().extend(codes.iter().copied());
    self
  }

  /// Create `dir` whenever `program` is invoked.
  pub fn create_dir_on(self, program: &str, dir: impl Into<PathBuf>) -> Self {
    self.side_effects.borrow_mut().push((program.to_string(), dir.into()));
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.borrow().len()
  }

  /// Programs invoked, in order.
  pub fn programs(&self) -> Vec<String> {
    self.calls.borrow().iter().map(|c| c.program.clone()).collect()
  }
}

impl ProcessRunner for RecordingRunner {
  fn run(&self, program: &str, args: &[&str], cwd: &Path, _env: &[(String, String)]) -> Result<i32> {
    self.calls.borrow_mut().push(Call {
      program: program.to_string(),
      args: args.iter().map(|a| a.to_string()).collect(),
      cwd: cwd.to_path_buf(),
    });
    for (target, dir) in self.side_effects.borrow().iter() {
      if target == program {
        std::fs::create_dir_all(dir)?;
      }
    }
    Ok(self.script.borrow_mut().pop_front().unwrap_or(0))
  }
}
