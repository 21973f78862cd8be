//! Field names and values recorded on the spans that wrap build changes.
//!
//! The CLI and the HTTP surface wrap each request in an outer span tagged
//! with its origin, so exported traces can tell the two apart.

/// Display name of the target build.
pub const BUILD_NAME: &str = "build.name";

/// Which surface asked for the change: [`ORIGIN_CLI`] or [`ORIGIN_HTTP`].
pub const CHANGE_ORIGIN: &str = "change.origin";

// --- Origin values ---

pub const ORIGIN_CLI: &str = "cli";
pub const ORIGIN_HTTP: &str = "http";
