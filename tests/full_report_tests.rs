//! End-to-end report composition over a synthetic installation.
//!
//! Builds a root with one crash session, matching logs, a config and a
//! static binary of known bytes, then verifies the produced archive entry by
//! entry.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tempfile::TempDir;
use zip::read::ZipArchive;

use plutonium_reporter::bundle::{self, EvidenceBundle};
use plutonium_reporter::collect;
use plutonium_reporter::crashdump::CrashdumpIndex;
use plutonium_reporter::models::Game;
use plutonium_reporter::paths::InstallRoot;

const DUMP_NAME: &str = "plutonium-r4035-t6zm-2024-03-01_10-30-05.dmp";

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A root with one crash session, two T6 logs, one config and one static
/// binary with known content.
fn synthetic_install() -> TempDir {
    let dir = TempDir::new().unwrap();
    let base = dir.path();
    for sub in ["bin", "games", "launcher", "storage"] {
        fs::create_dir(base.join(sub)).unwrap();
    }
    write(&base.join("bin/launcher.exe"), b"123456789");
    write(&base.join("crashdumps").join(DUMP_NAME), b"dump bytes");
    write(&base.join("storage/t6/main/console_zm.log"), b"zombies log");
    write(&base.join("storage/t6/main/games_mp.log"), b"mp log");
    write(&base.join("storage/t6/players/settings.cfg"), b"seta fps 250");
    dir
}

#[test]
fn composes_a_complete_report_from_one_crash_session() {
    let install = synthetic_install();
    let root = InstallRoot::resolve(install.path()).unwrap();

    let presence = collect::detect_evidence(&root);
    assert!(presence.crashdumps);
    assert!(presence.t6_logs);

    // One distinct session in the crash directory resolves to T6 on its own.
    let index = CrashdumpIndex::from_dir(&root.crashdumps());
    let keys = index.session_keys();
    assert_eq!(keys.len(), 1);
    let session = index.select(keys[0]).unwrap();
    let game = session.game().unwrap();
    assert_eq!(game, Game::T6);

    let mut errors = Vec::new();
    let logs = collect::collect_logs(&root, game, session.artifacts());
    let configs = collect::collect_configs(&root);
    let hashes = collect::collect_hashes(&root, &mut errors);
    assert!(errors.is_empty());

    let bundle = EvidenceBundle {
        game,
        crashdumps_detected: presence.crashdumps,
        configs,
        logs,
        hashes,
        hardware: Default::default(),
        power: None,
        events: vec!["<Event><System/></Event>".to_string()],
        errors,
    };

    let out = TempDir::new().unwrap();
    let destination = out.path().join("b2-report-1709287805.zip");
    bundle::compose(&bundle, &root, &destination).unwrap();

    let file = fs::File::open(&destination).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();

    let mut manifest_text = String::new();
    archive
        .by_name("general.json")
        .unwrap()
        .read_to_string(&mut manifest_text)
        .unwrap();
    let manifest: Value = serde_json::from_str(&manifest_text).unwrap();

    assert_eq!(manifest["title"], "t6");
    assert_eq!(manifest["crashdumps_detected"], true);
    assert_eq!(manifest["errors"].as_array().unwrap().len(), 0);

    // Exactly one hash entry: the static binary, with known digests.
    let file_hashes = manifest["file_hashes"].as_array().unwrap();
    assert_eq!(file_hashes.len(), 1);
    assert_eq!(file_hashes[0]["path"], "bin/launcher.exe");
    assert_eq!(file_hashes[0]["size"], 9);
    assert_eq!(file_hashes[0]["hashes"]["crc32"], "0xCBF43926");
    assert_eq!(
        file_hashes[0]["hashes"]["sha1"],
        "f7c3bc1d808e04732adf679965ccc34ca7ae3441"
    );
    assert_eq!(
        file_hashes[0]["hashes"]["sha256"],
        "15e2b0d3c33891ebb0f1ef609ec419420c20e320ce94c65fbc8c3312448eb225"
    );

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    let log_entries: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("logs/") && !n.ends_with('/'))
        .collect();
    let config_entries: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("configs/") && !n.ends_with('/'))
        .collect();
    let event_entries: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("events/") && n.ends_with(".xml"))
        .collect();

    // Two title logs plus the selected crash artifact under logs/.
    assert_eq!(log_entries.len(), 3);
    assert!(names.contains(&format!("logs/crashdumps/{}", DUMP_NAME)));
    assert!(names.contains(&"logs/storage/t6/main/console_zm.log".to_string()));
    assert!(names.contains(&"logs/storage/t6/main/games_mp.log".to_string()));

    assert_eq!(config_entries.len(), 1);
    assert!(names.contains(&"configs/storage/t6/players/settings.cfg".to_string()));

    assert_eq!(event_entries.len(), 1);

    // Collected file content survives the round trip.
    let mut log_content = String::new();
    archive
        .by_name("logs/storage/t6/main/console_zm.log")
        .unwrap()
        .read_to_string(&mut log_content)
        .unwrap();
    assert_eq!(log_content, "zombies log");
}

#[test]
fn existing_destination_is_never_overwritten() {
    let install = synthetic_install();
    let root = InstallRoot::resolve(install.path()).unwrap();

    let out = TempDir::new().unwrap();
    let destination = out.path().join("b2-report-1.zip");
    fs::write(&destination, b"previous report").unwrap();

    let bundle = EvidenceBundle {
        game: Game::T6,
        crashdumps_detected: false,
        configs: Vec::new(),
        logs: Vec::new(),
        hashes: Vec::new(),
        hardware: Default::default(),
        power: None,
        events: Vec::new(),
        errors: Vec::new(),
    };

    assert!(bundle::compose(&bundle, &root, &destination).is_err());
    assert_eq!(fs::read(&destination).unwrap(), b"previous report");
}

#[test]
fn session_with_unknown_title_still_correlates_but_resolves_to_an_error() {
    let install = synthetic_install();
    let foreign = "plutonium-r9000-tzm5-2024-05-01_09-00-00.dmp";
    write(&install.path().join("crashdumps").join(foreign), b"dump");

    let root = InstallRoot::resolve(install.path()).unwrap();
    let index = CrashdumpIndex::from_dir(&root.crashdumps());
    let keys = index.session_keys();
    assert_eq!(keys.len(), 2);

    let unknown_key = "plutonium-r9000-tzm5-2024-05-01_09-00-00";
    let session = index.select(unknown_key).unwrap();
    assert_eq!(session.artifacts().len(), 1);
    // Correlation succeeded; only the closed title lookup fails, and the
    // caller falls back to manual title selection.
    assert!(session.game().is_err());
}
