//! Status command implementation.

use std::path::Path;

use anyhow::Result;
use cefbuild_lib::consts::{KEY_CEF_BRANCH, KEY_CHROMIUM_VERSION, KEY_SYNC_COMPLETE};
use cefbuild_lib::paths::BuildPaths;
use cefbuild_lib::state::{FsStateStore, StateStore};

use crate::output::{print_info, print_stat, print_success, print_warning};

pub fn cmd_status(root: &Path) -> Result<()> {
  let paths = BuildPaths::new(root);
  let state = FsStateStore::new(paths.state_dir());

  let version = state.get(KEY_CHROMIUM_VERSION);
  let branch = state.get(KEY_CEF_BRANCH);
  let synced = state.is_set(KEY_SYNC_COMPLETE);

  if version.is_none() && branch.is_none() {
    print_info("No sync state. Run 'cefbuild build' first.");
    return Ok(());
  }

  if let Some(version) = &version {
    print_stat("chromium", version);
  }
  if let Some(branch) = &branch {
    print_stat("cef branch", branch);
  }
  print_stat(
    "source tree",
    if paths.chromium_src().exists() {
      "present"
    } else {
      "missing"
    },
  );

  if synced && paths.chromium_src().exists() {
    print_success("sync complete");
  } else {
    print_warning("sync incomplete; the next build will re-sync");
  }

  Ok(())
}
