//! Target platforms and build modes.

use std::fmt;

/// Platforms a distribution can be produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
  Linux64,
  LinuxArm64,
  MacosX64,
  MacosArm64,
}

impl Platform {
  /// Every supported platform, in build order for `--platform all`.
  pub const ALL: [Platform; 4] = [
    Platform::Linux64,
    Platform::LinuxArm64,
    Platform::MacosX64,
    Platform::MacosArm64,
  ];

  /// Canonical identifier, as used by the CEF build index and for the
  /// published output directory name.
  pub fn id(self) -> &'static str {
    match self {
      Platform::Linux64 => "linux64",
      Platform::LinuxArm64 => "linuxarm64",
      Platform::MacosX64 => "macosx64",
      Platform::MacosArm64 => "macosarm64",
    }
  }

  pub fn is_arm(self) -> bool {
    matches!(self, Platform::LinuxArm64 | Platform::MacosArm64)
  }

  pub fn is_linux(self) -> bool {
    matches!(self, Platform::Linux64 | Platform::LinuxArm64)
  }

  /// GN `target_cpu` value for this platform.
  pub fn target_cpu(self) -> &'static str {
    if self.is_arm() { "arm64" } else { "x64" }
  }

  /// Token make_distrib.py recognizes for this platform.
  pub fn distrib_flag(self) -> &'static str {
    match self {
      Platform::Linux64 => "linux64",
      Platform::LinuxArm64 => "linuxarm64",
      Platform::MacosX64 => "mac64",
      Platform::MacosArm64 => "macarm64",
    }
  }

  /// Case-insensitive match against a packaged directory name, e.g.
  /// `cef_binary_143.3.13+g6477a6a+chromium-143.0.7499.193_linux64`.
  pub fn matches_artifact(self, dir_name: &str) -> bool {
    dir_name.to_ascii_lowercase().contains(self.id())
  }

  /// Detect the platform of the running host. `None` on hosts CEF
  /// cannot be built for with this tooling.
  pub fn host() -> Option<Platform> {
    match (std::env::consts::OS, std::env::consts::ARCH) {
      ("linux", "aarch64") => Some(Platform::LinuxArm64),
      ("linux", _) => Some(Platform::Linux64),
      ("macos", "aarch64") => Some(Platform::MacosArm64),
      ("macos", _) => Some(Platform::MacosX64),
      _ => None,
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

/// Build mode for one output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
  Release,
  Debug,
}

impl BuildMode {
  /// Directory-name component (`out/<name>_GN_<platform>`).
  pub fn name(self) -> &'static str {
    match self {
      BuildMode::Release => "Release",
      BuildMode::Debug => "Debug",
    }
  }

  pub fn is_debug(self) -> bool {
    matches!(self, BuildMode::Debug)
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn target_cpu_follows_arm_marker() {
    assert_eq!(Platform::Linux64.target_cpu(), "x64");
    assert_eq!(Platform::LinuxArm64.target_cpu(), "arm64");
    assert_eq!(Platform::MacosX64.target_cpu(), "x64");
    assert_eq!(Platform::MacosArm64.target_cpu(), "arm64");
  }

  #[test]
  fn distrib_flags_use_short_mac_names() {
    assert_eq!(Platform::MacosX64.distrib_flag(), "mac64");
    assert_eq!(Platform::MacosArm64.distrib_flag(), "macarm64");
    assert_eq!(Platform::Linux64.distrib_flag(), "linux64");
  }

  #[test]
  fn artifact_match_is_case_insensitive_substring() {
    assert!(Platform::Linux64.matches_artifact("cef_binary_143_LINUX64_minimal"));
    assert!(!Platform::Linux64.matches_artifact("cef_binary_143_macosx64"));
    // linuxarm64 contains no "linux64" substring
    assert!(!Platform::Linux64.matches_artifact("cef_binary_143_linuxarm64"));
  }
}
