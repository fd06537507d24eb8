//! Version resolution against the CEF build index.
//!
//! The index is a JSON object keyed by platform id, each value holding
//! a `versions` array ordered newest-first. Resolution probes platform
//! keys in a fixed preference order and takes the first entry on the
//! stable channel.

use serde::Deserialize;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::Result;
use crate::consts::{CEF_INDEX_URL, INDEX_PLATFORM_PREFERENCE, INDEX_TIMEOUT};
use crate::error::BuildError;

/// The CEF/Chromium version pair a pipeline run builds against.
/// Resolved once per run, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePair {
  /// CEF branch to check out (e.g. `7499`).
  pub cef_branch: String,
  /// Full Chromium version to sync (e.g. `143.0.7499.193`).
  pub chromium_version: String,
}

/// One release entry in the index. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRecord {
  pub channel: String,
  pub cef_version: String,
  pub chromium_version: String,
}

/// Per-platform release list.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformReleases {
  pub versions: Vec<ReleaseRecord>,
}

/// Full index document, keyed by platform id.
pub type VersionIndex = HashMap<String, PlatformReleases>;

/// How the CEF branch is derived from a release record.
///
/// The derivation has drifted across revisions of this tooling and the
/// two rules disagree for the same release, so the rule is an explicit
/// choice and never mixed silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchRule {
  /// Third dot-segment of the Chromium version
  /// (`143.0.7499.193` -> `7499`). Current rule.
  #[default]
  ChromiumSegment,
  /// First dot-segment of the CEF version string
  /// (`143.3.13+g6477a6a+...` -> `143`). Legacy rule, kept only for
  /// reproducing old checkouts.
  CefMajor,
}

impl BranchRule {
  /// Derive the CEF branch for a release. Pure function of the record.
  pub fn derive(self, record: &ReleaseRecord) -> Result<String> {
    match self {
      BranchRule::ChromiumSegment => record
        .chromium_version
        .split('.')
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| {
          BuildError::resolution(format!(
            "malformed chromium version: {}",
            record.chromium_version
          ))
        }),
      BranchRule::CefMajor => record
        .cef_version
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
          BuildError::resolution(format!("malformed cef version: {}", record.cef_version))
        }),
    }
  }
}

/// Pick the latest stable release from the index.
///
/// Platform keys are probed in [`INDEX_PLATFORM_PREFERENCE`] order;
/// within the first key present, the first entry on the stable channel
/// wins.
pub fn select_stable(index: &VersionIndex) -> Result<&ReleaseRecord> {
  for key in INDEX_PLATFORM_PREFERENCE {
    let Some(platform) = index.get(*key) else {
      continue;
    };
    if let Some(record) = platform.versions.iter().find(|v| v.channel == "stable") {
      debug!(platform = key, cef = %record.cef_version, "stable release selected");
      return Ok(record);
    }
  }
  Err(BuildError::resolution("no stable release in index"))
}

/// Resolves the version pair for a run, honoring caller overrides.
#[derive(Debug, Clone)]
pub struct VersionResolver {
  index_url: String,
  rule: BranchRule,
}

impl VersionResolver {
  pub fn new() -> Self {
    Self {
      index_url: CEF_INDEX_URL.to_string(),
      rule: BranchRule::default(),
    }
  }

  pub fn with_rule(mut self, rule: BranchRule) -> Self {
    self.rule = rule;
    self
  }

  /// Point at a different index endpoint (tests).
  pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
    self.index_url = url.into();
    self
  }

  /// Resolve the pair. Overrides short-circuit: when both values are
  /// supplied the index is never queried.
  pub fn resolve(
    &self,
    cef_branch: Option<&str>,
    chromium_version: Option<&str>,
  ) -> Result<ReleasePair> {
    if let (Some(cef), Some(chromium)) = (cef_branch, chromium_version) {
      debug!(cef, chromium, "using caller-supplied version pair");
      return Ok(ReleasePair {
        cef_branch: cef.to_string(),
        chromium_version: chromium.to_string(),
      });
    }

    let index = self.fetch_index()?;
    let record = select_stable(&index)?;

    let pair = ReleasePair {
      cef_branch: match cef_branch {
        Some(cef) => cef.to_string(),
        None => self.rule.derive(record)?,
      },
      chromium_version: chromium_version
        .unwrap_or(&record.chromium_version)
        .to_string(),
    };
    info!(cef = %pair.cef_branch, chromium = %pair.chromium_version, "resolved latest stable");
    Ok(pair)
  }

  fn fetch_index(&self) -> Result<VersionIndex> {
    info!(url = %self.index_url, "fetching version index");
    let client = reqwest::blocking::Client::builder()
      .timeout(INDEX_TIMEOUT)
      .build()
      .map_err(|e| BuildError::resolution(format!("http client: {e}")))?;

    let response = client
      .get(&self.index_url)
      .send()
      .map_err(|e| BuildError::resolution(format!("index unreachable: {e}")))?;
    if !response.status().is_success() {
      return Err(BuildError::resolution(format!(
        "index returned {}",
        response.status()
      )));
    }
    response
      .json()
      .map_err(|e| BuildError::resolution(format!("malformed index: {e}")))
  }
}

impl Default for VersionResolver {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const INDEX_JSON: &str = r#"{
    "linux64": {
      "versions": [
        {"channel": "beta", "cef_version": "144.0.1+gaaaa", "chromium_version": "144.0.7500.0"},
        {"channel": "stable", "cef_version": "143.3.13+g6477a6a", "chromium_version": "143.0.7499.193"},
        {"channel": "stable", "cef_version": "143.3.9+g0ddc7a2", "chromium_version": "143.0.7499.110"}
      ]
    },
    "macosx64": {
      "versions": [
        {"channel": "stable", "cef_version": "999.0.0+gffff", "chromium_version": "999.0.1.2"}
      ]
    }
  }"#;

  fn record(cef_version: &str, chromium_version: &str) -> ReleaseRecord {
    ReleaseRecord {
      channel: "stable".to_string(),
      cef_version: cef_version.to_string(),
      chromium_version: chromium_version.to_string(),
    }
  }

  #[test]
  fn select_stable_prefers_first_platform_key() {
    let index: VersionIndex = serde_json::from_str(INDEX_JSON).unwrap();
    let selected = select_stable(&index).unwrap();
    // linux64 wins over macosx64, and the beta entry is skipped.
    assert_eq!(selected.chromium_version, "143.0.7499.193");
  }

  #[test]
  fn select_stable_falls_back_to_next_platform() {
    let mut index: VersionIndex = serde_json::from_str(INDEX_JSON).unwrap();
    index.remove("linux64");
    let selected = select_stable(&index).unwrap();
    assert_eq!(selected.chromium_version, "999.0.1.2");
  }

  #[test]
  fn select_stable_fails_without_stable_entry() {
    let index: VersionIndex = serde_json::from_str(
      r#"{"linux64": {"versions": [{"channel": "beta", "cef_version": "1.0.0", "chromium_version": "1.0.0.0"}]}}"#,
    )
    .unwrap();
    assert!(matches!(
      select_stable(&index),
      Err(BuildError::Resolution { .. })
    ));
  }

  #[test]
  fn chromium_segment_rule_takes_third_segment() {
    let rec = record("143.3.13+g6477a6a", "143.0.7499.193");
    assert_eq!(BranchRule::ChromiumSegment.derive(&rec).unwrap(), "7499");
  }

  #[test]
  fn cef_major_rule_takes_first_segment() {
    let rec = record("143.3.13+g6477a6a", "143.0.7499.193");
    assert_eq!(BranchRule::CefMajor.derive(&rec).unwrap(), "143");
  }

  #[test]
  fn derivation_is_deterministic() {
    let rec = record("143.3.13+g6477a6a", "143.0.7499.193");
    let first = BranchRule::ChromiumSegment.derive(&rec).unwrap();
    let second = BranchRule::ChromiumSegment.derive(&rec).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn malformed_chromium_version_is_resolution_error() {
    let rec = record("143.3.13", "143");
    assert!(matches!(
      BranchRule::ChromiumSegment.derive(&rec),
      Err(BuildError::Resolution { .. })
    ));
  }

  #[test]
  fn full_override_skips_the_index() {
    // The URL is unreachable on purpose: with both overrides present
    // no request may be made.
    let resolver = VersionResolver::new().with_index_url("http://127.0.0.1:1/index.json");
    let pair = resolver.resolve(Some("143"), Some("143.0.7499.193")).unwrap();
    assert_eq!(
      pair,
      ReleasePair {
        cef_branch: "143".to_string(),
        chromium_version: "143.0.7499.193".to_string(),
      }
    );
  }

  #[test]
  fn partial_override_keeps_the_other_half_resolved() {
    let mut server = mockito::Server::new();
    let mock = server
      .mock("GET", "/index.json")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(INDEX_JSON)
      .create();

    let resolver = VersionResolver::new().with_index_url(format!("{}/index.json", server.url()));
    let pair = resolver.resolve(Some("custom"), None).unwrap();

    mock.assert();
    assert_eq!(pair.cef_branch, "custom");
    assert_eq!(pair.chromium_version, "143.0.7499.193");
  }

  #[test]
  fn resolves_latest_stable_from_index() {
    let mut server = mockito::Server::new();
    server
      .mock("GET", "/index.json")
      .with_status(200)
      .with_body(INDEX_JSON)
      .create();

    let resolver = VersionResolver::new().with_index_url(format!("{}/index.json", server.url()));
    let pair = resolver.resolve(None, None).unwrap();

    assert_eq!(pair.cef_branch, "7499");
    assert_eq!(pair.chromium_version, "143.0.7499.193");
  }

  #[test]
  fn unreachable_index_is_resolution_error() {
    let resolver = VersionResolver::new().with_index_url("http://127.0.0.1:1/index.json");
    assert!(matches!(
      resolver.resolve(None, None),
      Err(BuildError::Resolution { .. })
    ));
  }
}
