//! Build configuration planning.
//!
//! Derives the GN argument set for a platform/mode pair and decides
//! whether build files must be regenerated. Regenerating needlessly is
//! expensive: the patch hook touches source timestamps and forces a
//! large recompile, so an unchanged configuration with an intact build
//! graph goes straight to ninja.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::platform::{BuildMode, Platform};

/// File the serialized configuration is written to.
pub const ARGS_FILE: &str = "args.gn";

/// Presence of this file is the evidence a build graph was generated.
pub const BUILD_GRAPH_FILE: &str = "build.ninja";

/// Ordered GN `key=value` configuration.
///
/// Two configurations are equal iff their canonical serializations are
/// byte-identical; the BTreeMap gives the stable key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  args: BTreeMap<String, String>,
}

impl BuildConfig {
  /// Derive the canonical configuration for a platform/mode pair.
  /// Pure function of its inputs.
  pub fn derive(platform: Platform, mode: BuildMode) -> Self {
    let mut args = BTreeMap::new();
    let mut arg = |key: &str, value: &str| {
      args.insert(key.to_string(), value.to_string());
    };

    arg("is_official_build", "true");
    arg("proprietary_codecs", "true");
    arg("ffmpeg_branding", "\"Chrome\"");
    arg("use_sysroot", "false");
    arg("enable_widevine", "true");
    arg("target_cpu", &format!("\"{}\"", platform.target_cpu()));

    if mode.is_debug() {
      arg("is_debug", "true");
      arg("symbol_level", "2");
    } else {
      arg("is_debug", "false");
      arg("symbol_level", "0");
    }

    if platform.is_linux() {
      arg("use_allocator", "none");
    }

    Self { args }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.args.get(key).map(String::as_str)
  }

  /// Canonical form: one `key=value` per line, stable key order.
  pub fn serialize(&self) -> String {
    let mut out = String::new();
    for (key, value) in &self.args {
      let _ = writeln!(out, "{key}={value}");
    }
    out
  }
}

/// Regeneration decision for one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
  /// Whether the hook/args-write/`gn gen` step must run.
  pub regenerate: bool,
  /// Canonical serialization to write when regenerating.
  pub args: String,
}

/// Compare the derived configuration against what the output directory
/// holds. Regeneration is needed iff the stored args differ
/// byte-for-byte or the build graph is missing.
pub fn plan_build(out_dir: &Path, config: &BuildConfig) -> BuildPlan {
  let args = config.serialize();
  let stored = std::fs::read_to_string(out_dir.join(ARGS_FILE)).ok();
  let graph_present = out_dir.join(BUILD_GRAPH_FILE).exists();
  let unchanged = stored.as_deref() == Some(args.as_str());

  BuildPlan {
    regenerate: !unchanged || !graph_present,
    args,
  }
}
