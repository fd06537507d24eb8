//! cefbuild-lib: pipeline logic for building CEF binary distributions
//! from source.
//!
//! A pipeline run resolves the CEF/Chromium version pair to build,
//! synchronizes the multi-gigabyte Chromium tree through depot_tools,
//! checks out the matching CEF branch inside it, then generates,
//! compiles and packages a binary distribution per target platform:
//! - `version`: latest-stable resolution against the CEF build index
//! - `sync`: gclient-driven Chromium sync with bounded retry
//! - `checkout`: CEF branch checkout inside the Chromium tree
//! - `plan` / `executor`: GN configuration planning and ninja builds
//! - `collect`: publication of packaged distributions
//! - `pipeline`: the sequential driver tying the stages together
//!
//! External tools are reached only through [`process::ProcessRunner`],
//! and persisted markers only through [`state::StateStore`], so every
//! stage is testable without a Chromium checkout.

pub mod checkout;
pub mod collect;
pub mod consts;
pub mod error;
pub mod executor;
pub mod paths;
pub mod pipeline;
pub mod plan;
pub mod platform;
pub mod process;
pub mod state;
pub mod sync;
pub mod tools;
pub mod util;
pub mod version;

pub use error::BuildError;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, BuildError>;
