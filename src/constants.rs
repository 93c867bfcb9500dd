//! Global constants for the reporter.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

/// Subdirectories that every usable installation root must contain.
pub const REQUIRED_ROOT_DIRS: &[&str] = &["bin", "games", "launcher", "storage"];

/// File name prefix of the generated report archive.
pub const REPORT_PREFIX: &str = "b2-report";

/// Name of the manifest entry inside the report archive.
pub const MANIFEST_NAME: &str = "general.json";

/// Deflate level used for every archive entry.
pub const ARCHIVE_COMPRESSION_LEVEL: i32 = 9;

/// Application event-log ids associated with process crashes.
pub const CRASH_EVENT_IDS: &[u32] = &[1000, 1001, 1002];

/// How far back the event-log query reaches unless all-time mode is on.
pub const EVENT_LOOKBACK_DAYS: i64 = 14;

/// Declaration prepended to each event record written into the archive.
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>";

/// Launcher metadata file collected from the installation root.
pub const LAUNCHER_INFO_FILE: &str = "info.json";
