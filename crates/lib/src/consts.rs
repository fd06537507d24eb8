//! Upstream endpoints, state keys and fixed bounds.

use std::time::Duration;

/// depot_tools checkout URL (gclient and friends).
pub const DEPOT_TOOLS_URL: &str =
  "https://chromium.googlesource.com/chromium/tools/depot_tools.git";

/// Chromium source URL named in the .gclient manifest.
pub const CHROMIUM_SRC_URL: &str = "https://chromium.googlesource.com/chromium/src.git";

/// CEF repository cloned inside the Chromium tree.
pub const CEF_URL: &str = "https://bitbucket.org/chromiumembedded/cef.git";

/// Version index listing released CEF builds per platform.
pub const CEF_INDEX_URL: &str = "https://cef-builds.spotifycdn.com/index.json";

/// Platform keys probed in the index, in preference order.
pub const INDEX_PLATFORM_PREFERENCE: &[&str] = &["linux64", "macosx64"];

/// Timeout for the version-index request.
pub const INDEX_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on gclient sync attempts before giving up.
pub const MAX_SYNC_ATTEMPTS: u32 = 10;

/// Ninja target compiled for the distribution.
pub const PRIMARY_TARGET: &str = "cefsimple";

/// State key: Chromium version the tree was last synced against.
pub const KEY_CHROMIUM_VERSION: &str = "chromium.version";

/// State key: set only after a fully successful sync. Any version
/// change clears it before the first new attempt.
pub const KEY_SYNC_COMPLETE: &str = "chromium.synced";

/// State key: CEF branch currently checked out inside the tree.
pub const KEY_CEF_BRANCH: &str = "cef.branch";

/// Directory names removed before every sync attempt. Exact names only.
pub const BAD_STATE_DIRS: &[&str] = &["_bad_scm"];

/// Name prefixes of gclient temp directories removed before every sync
/// attempt. Nothing outside this allow-list is ever deleted.
pub const BAD_STATE_PREFIXES: &[&str] = &["_gclient_"];
