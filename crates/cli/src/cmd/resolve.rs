//! Resolve command implementation.

use anyhow::Result;
use cefbuild_lib::version::VersionResolver;

use crate::output::print_stat;

pub fn cmd_resolve() -> Result<()> {
  let pair = VersionResolver::new().resolve(None, None)?;
  print_stat("cef_branch", &pair.cef_branch);
  print_stat("chromium_version", &pair.chromium_version);
  Ok(())
}
