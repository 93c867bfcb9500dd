//! Power-configuration dump, parsed from `powercfg /query` output.
//!
//! The parsed tree mirrors powercfg's own nesting: schemes own subgroups,
//! subgroups own settings, settings carry their AC/DC indices plus an
//! integer interpretation of the hex values. The raw text rides along
//! verbatim so nothing is lost when the parse misses a line.

use std::collections::BTreeMap;

use anyhow::Result;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

lazy_static! {
    static ref SCHEME: Regex =
        Regex::new(r"Power Scheme GUID: ([0-9a-fA-F\-]+)\s+\((.+)\)").unwrap();
    static ref SUBGROUP: Regex =
        Regex::new(r"Subgroup GUID: ([0-9a-fA-F\-]+)\s+\((.+)\)").unwrap();
    static ref SETTING: Regex =
        Regex::new(r"Power Setting GUID: ([0-9a-fA-F\-]+)\s+\((.+)\)").unwrap();
    static ref AC_VALUE: Regex =
        Regex::new(r"Current AC Power Setting Index: ([0-9a-fA-Fx]+)").unwrap();
    static ref DC_VALUE: Regex =
        Regex::new(r"Current DC Power Setting Index: ([0-9a-fA-Fx]+)").unwrap();
}

/// Opaque power-configuration record included in the manifest when present.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PowerReport {
    pub parsed: BTreeMap<String, PowerScheme>,
    pub raw: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PowerScheme {
    pub name: String,
    pub subgroups: BTreeMap<String, PowerSubgroup>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PowerSubgroup {
    pub name: String,
    pub settings: BTreeMap<String, PowerSetting>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PowerSetting {
    pub name: String,
    pub ac_value: Option<String>,
    pub dc_value: Option<String>,
    pub interpretation: Value,
}

/// Run `powercfg /query` and parse its output. Never fails: when the
/// subprocess is unavailable the report carries the error text as `raw` and
/// an empty parse.
pub fn collect() -> PowerReport {
    match run_powercfg() {
        Ok(raw) => {
            let report = PowerReport {
                parsed: parse_powercfg(&raw),
                raw,
            };
            info!("Collected power settings ({} schemes)", report.parsed.len());
            report
        }
        Err(err) => {
            warn!("Power settings unavailable: {}", err);
            PowerReport {
                parsed: BTreeMap::new(),
                raw: format!("error: {}", err),
            }
        }
    }
}

/// Parse the full `powercfg /query` text into the scheme tree.
pub fn parse_powercfg(text: &str) -> BTreeMap<String, PowerScheme> {
    let mut schemes: BTreeMap<String, PowerScheme> = BTreeMap::new();
    let mut current_scheme: Option<String> = None;
    let mut current_subgroup: Option<String> = None;
    let mut current_setting: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if let Some(caps) = SCHEME.captures(line) {
            let guid = caps[1].to_string();
            schemes.entry(guid.clone()).or_insert_with(|| PowerScheme {
                name: caps[2].to_string(),
                subgroups: BTreeMap::new(),
            });
            current_scheme = Some(guid);
            current_subgroup = None;
            current_setting = None;
            continue;
        }

        if let Some(caps) = SUBGROUP.captures(line) {
            let Some(scheme) = lookup_scheme(&mut schemes, &current_scheme) else {
                continue;
            };
            let guid = caps[1].to_string();
            scheme
                .subgroups
                .entry(guid.clone())
                .or_insert_with(|| PowerSubgroup {
                    name: caps[2].to_string(),
                    settings: BTreeMap::new(),
                });
            current_subgroup = Some(guid);
            current_setting = None;
            continue;
        }

        if let Some(caps) = SETTING.captures(line) {
            let Some(subgroup) =
                lookup_subgroup(&mut schemes, &current_scheme, &current_subgroup)
            else {
                continue;
            };
            let guid = caps[1].to_string();
            subgroup
                .settings
                .entry(guid.clone())
                .or_insert_with(|| PowerSetting {
                    name: caps[2].to_string(),
                    ac_value: None,
                    dc_value: None,
                    interpretation: Value::Null,
                });
            current_setting = Some(guid);
            continue;
        }

        if let Some(caps) = AC_VALUE.captures(line) {
            if let Some(setting) =
                lookup_setting(&mut schemes, &current_scheme, &current_subgroup, &current_setting)
            {
                setting.ac_value = Some(caps[1].to_string());
            }
            continue;
        }

        if let Some(caps) = DC_VALUE.captures(line) {
            if let Some(setting) =
                lookup_setting(&mut schemes, &current_scheme, &current_subgroup, &current_setting)
            {
                setting.dc_value = Some(caps[1].to_string());
            }
        }
    }

    for scheme in schemes.values_mut() {
        for subgroup in scheme.subgroups.values_mut() {
            for setting in subgroup.settings.values_mut() {
                setting.interpretation = json!({
                    "ac": interpret(setting.ac_value.as_deref()),
                    "dc": interpret(setting.dc_value.as_deref()),
                });
            }
        }
    }

    schemes
}

fn lookup_scheme<'a>(
    schemes: &'a mut BTreeMap<String, PowerScheme>,
    scheme: &Option<String>,
) -> Option<&'a mut PowerScheme> {
    schemes.get_mut(scheme.as_deref()?)
}

fn lookup_subgroup<'a>(
    schemes: &'a mut BTreeMap<String, PowerScheme>,
    scheme: &Option<String>,
    subgroup: &Option<String>,
) -> Option<&'a mut PowerSubgroup> {
    lookup_scheme(schemes, scheme)?
        .subgroups
        .get_mut(subgroup.as_deref()?)
}

fn lookup_setting<'a>(
    schemes: &'a mut BTreeMap<String, PowerScheme>,
    scheme: &Option<String>,
    subgroup: &Option<String>,
    setting: &Option<String>,
) -> Option<&'a mut PowerSetting> {
    lookup_subgroup(schemes, scheme, subgroup)?
        .settings
        .get_mut(setting.as_deref()?)
}

/// Hex index -> integer where possible, otherwise the raw string.
fn interpret(value: Option<&str>) -> Value {
    match value {
        None => Value::Null,
        Some(raw) => match i64::from_str_radix(raw.trim_start_matches("0x"), 16) {
            Ok(number) => Value::from(number),
            Err(_) => Value::String(raw.to_string()),
        },
    }
}

#[cfg(windows)]
fn run_powercfg() -> Result<String> {
    use anyhow::Context;
    use std::process::Command;

    let output = Command::new("powercfg")
        .arg("/query")
        .output()
        .context("failed to run powercfg")?;
    if !output.status.success() {
        anyhow::bail!("powercfg exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(not(windows))]
fn run_powercfg() -> Result<String> {
    anyhow::bail!("powercfg is only available on Windows")
}
