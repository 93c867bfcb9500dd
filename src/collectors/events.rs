//! Application event-log query for crash-related entries.
//!
//! Entries with event ids 1000/1001/1002 (application error, WER fault,
//! application hang) from the last 14 days are rendered as XML and filtered
//! to those mentioning the installation root. The query shells out to
//! `wevtutil`; on platforms without it, or when the query fails, the
//! collector degrades to an empty record set.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::constants::{CRASH_EVENT_IDS, EVENT_LOOKBACK_DAYS};
use crate::paths::InstallRoot;

/// Collect rendered event records relevant to this installation. One string
/// per record, each a standalone `<Event>` document.
pub fn collect(root: &InstallRoot, all_time: bool) -> Vec<String> {
    let raw = match query_events(all_time) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("Event log query failed, continuing without events: {}", err);
            return Vec::new();
        }
    };

    let needle = root.as_path().to_string_lossy().to_lowercase();
    let events: Vec<String> = split_events(&raw)
        .into_iter()
        .filter(|event| event.to_lowercase().contains(&needle))
        .collect();
    info!("Collected {} events", events.len());
    events
}

/// XPath filter for the Application log: crash event ids, optionally
/// restricted to the lookback window.
#[cfg_attr(not(windows), allow(dead_code))]
fn xpath_query(all_time: bool, now: DateTime<Utc>) -> String {
    let ids = CRASH_EVENT_IDS
        .iter()
        .map(|id| format!("EventID={}", id))
        .collect::<Vec<_>>()
        .join(" or ");

    if all_time {
        format!("*[System[({})]]", ids)
    } else {
        let since = now - Duration::days(EVENT_LOOKBACK_DAYS);
        format!(
            "*[System[({}) and TimeCreated[@SystemTime >= '{}']]]",
            ids,
            since.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        )
    }
}

/// Split the renderer output into individual `<Event>` documents. A record
/// with a missing closing tag terminates the split; everything before it is
/// kept.
pub fn split_events(raw: &str) -> Vec<String> {
    const CLOSE: &str = "</Event>";
    let mut events = Vec::new();
    let mut rest = raw;
    while let Some(start) = rest.find("<Event") {
        let Some(close) = rest[start..].find(CLOSE) else {
            break;
        };
        let end = start + close + CLOSE.len();
        events.push(rest[start..end].to_string());
        rest = &rest[end..];
    }
    events
}

#[cfg(windows)]
fn query_events(all_time: bool) -> Result<String> {
    use anyhow::Context;
    use std::process::Command;

    let query = xpath_query(all_time, Utc::now());
    let output = Command::new("wevtutil")
        .args(["qe", "Application", "/f:xml", "/rd:true"])
        .arg(format!("/q:{}", query))
        .output()
        .context("failed to run wevtutil")?;
    if !output.status.success() {
        anyhow::bail!(
            "wevtutil exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(not(windows))]
fn query_events(_all_time: bool) -> Result<String> {
    anyhow::bail!("event-log queries are only available on Windows")
}
