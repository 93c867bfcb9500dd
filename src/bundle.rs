//! Composition of the final report archive.
//!
//! The archive has a fixed internal layout:
//!
//! ```text
//! general.json            manifest (root path, title, hashes, hardware, errors)
//! configs/<relative>...   collected config files
//! logs/<relative>...      collected log files and crash artifacts
//! events/<token>.xml      one document per collected event record
//! ```
//!
//! A destination that already exists is a hard error: a prior report is
//! never silently overwritten. The archive is written to a `.partial`
//! sibling first and renamed into place on success; any failure removes the
//! partial file so a truncated but valid-looking archive can never be
//! mistaken for a finished report. A config or log file that vanishes
//! between selection and archiving aborts the whole run (those files are
//! few and individually significant), which the partial-file rule turns
//! into a clean no-output failure.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info};
use serde_json::json;
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::collectors::hardware::HardwareReport;
use crate::collectors::power::PowerReport;
use crate::constants::{ARCHIVE_COMPRESSION_LEVEL, MANIFEST_NAME, XML_DECLARATION};
use crate::errors::ReportError;
use crate::models::{FileHash, FileRecord, Game};
use crate::paths::InstallRoot;

/// Everything one run collected, ready to be archived.
pub struct EvidenceBundle {
    pub game: Game,
    pub crashdumps_detected: bool,
    pub configs: Vec<FileRecord>,
    pub logs: Vec<FileRecord>,
    pub hashes: Vec<FileHash>,
    pub hardware: HardwareReport,
    pub power: Option<PowerReport>,
    pub events: Vec<String>,
    pub errors: Vec<String>,
}

/// Write `bundle` as a zip archive at `destination`.
///
/// Fails with `DestinationExists` (leaving the existing file untouched) when
/// the path is already taken. Entry order is deterministic: the manifest
/// first, then configs, logs and events, with file entries sorted by their
/// root-relative path.
pub fn compose(
    bundle: &EvidenceBundle,
    root: &InstallRoot,
    destination: &Path,
) -> Result<PathBuf, ReportError> {
    if destination.exists() {
        return Err(ReportError::DestinationExists(destination.to_path_buf()));
    }

    let partial = partial_path(destination);
    match write_archive(&partial, bundle, root) {
        Ok(()) => {
            fs::rename(&partial, destination)?;
            info!("Generated incident report at {}", destination.display());
            Ok(destination.to_path_buf())
        }
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&partial) {
                debug!("Could not remove partial archive: {}", cleanup);
            }
            Err(err)
        }
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

fn write_archive(
    path: &Path,
    bundle: &EvidenceBundle,
    root: &InstallRoot,
) -> Result<(), ReportError> {
    let file = fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(ARCHIVE_COMPRESSION_LEVEL))
        .unix_permissions(0o644);

    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(manifest_json(bundle, root)?.as_bytes())?;

    zip.add_directory("configs/", FileOptions::default())?;
    for record in sorted_by_relative_path(&bundle.configs, root) {
        let entry = format!("configs/{}", root.relative(&record.path));
        copy_file_entry(&mut zip, &record.path, &entry, options)?;
    }

    zip.add_directory("logs/", FileOptions::default())?;
    for record in sorted_by_relative_path(&bundle.logs, root) {
        let entry = format!("logs/{}", root.relative(&record.path));
        copy_file_entry(&mut zip, &record.path, &entry, options)?;
    }

    zip.add_directory("events/", FileOptions::default())?;
    for event in &bundle.events {
        // Random token, never content-derived: two identical records must
        // still land in two distinct documents.
        let entry = format!("events/{}.xml", Uuid::new_v4().simple());
        zip.start_file(entry, options)?;
        zip.write_all(XML_DECLARATION.as_bytes())?;
        zip.write_all(b"\n")?;
        zip.write_all(event.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

fn sorted_by_relative_path<'a>(
    records: &'a [FileRecord],
    root: &InstallRoot,
) -> Vec<&'a FileRecord> {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_by_key(|record| root.relative(&record.path));
    sorted
}

fn copy_file_entry(
    zip: &mut ZipWriter<fs::File>,
    source: &Path,
    entry: &str,
    options: FileOptions,
) -> Result<(), ReportError> {
    let mut file = fs::File::open(source).map_err(|source_err| ReportError::MissingSourceFile {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    zip.start_file(entry, options)?;
    io::copy(&mut file, zip)?;
    Ok(())
}

fn manifest_json(bundle: &EvidenceBundle, root: &InstallRoot) -> Result<String, serde_json::Error> {
    let mut manifest = json!({
        "root_path": root.as_path().to_string_lossy(),
        "title": bundle.game,
        "created_at": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "crashdumps_detected": bundle.crashdumps_detected,
        "file_hashes": bundle.hashes,
        "hardware_info": bundle.hardware,
        "errors": bundle.errors,
    });

    if let Some(power) = &bundle.power {
        if let Some(object) = manifest.as_object_mut() {
            object.insert("power_settings".to_string(), serde_json::to_value(power)?);
        }
    }

    serde_json::to_string_pretty(&manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentDigest, FileKind};
    use serde_json::Value;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::read::ZipArchive;

    fn fake_install() -> (TempDir, InstallRoot) {
        let dir = TempDir::new().unwrap();
        for sub in crate::constants::REQUIRED_ROOT_DIRS {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        let root = InstallRoot::resolve(dir.path()).unwrap();
        (dir, root)
    }

    fn empty_bundle(game: Game) -> EvidenceBundle {
        EvidenceBundle {
            game,
            crashdumps_detected: false,
            configs: Vec::new(),
            logs: Vec::new(),
            hashes: Vec::new(),
            hardware: HardwareReport::default(),
            power: None,
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let file = fs::File::open(path).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn read_manifest(path: &Path) -> Value {
        let file = fs::File::open(path).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name(MANIFEST_NAME).unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn refuses_existing_destination_without_touching_it() {
        let (dir, root) = fake_install();
        let destination = dir.path().join("report.zip");
        fs::write(&destination, b"prior report bytes").unwrap();

        let err = compose(&empty_bundle(Game::T4), &root, &destination).unwrap_err();
        assert!(matches!(err, ReportError::DestinationExists(_)));
        assert_eq!(fs::read(&destination).unwrap(), b"prior report bytes");
    }

    #[test]
    fn writes_manifest_and_layout_folders() {
        let (dir, root) = fake_install();
        let destination = dir.path().join("report.zip");

        let mut bundle = empty_bundle(Game::T5);
        bundle.crashdumps_detected = true;
        bundle.errors.push("hash failed for bin/broken.dll: gone".to_string());
        bundle.hashes.push(FileHash {
            path: "bin/launcher.exe".to_string(),
            hashes: ContentDigest {
                crc32: "0xCBF43926".to_string(),
                sha1: "f7c3bc1d808e04732adf679965ccc34ca7ae3441".to_string(),
                sha256: "15e2b0d3c33891ebb0f1ef609ec419420c20e320ce94c65fbc8c3312448eb225"
                    .to_string(),
            },
            size: 9,
        });

        compose(&bundle, &root, &destination).unwrap();

        let names = entry_names(&destination);
        assert_eq!(names[0], MANIFEST_NAME);
        assert!(names.contains(&"configs/".to_string()));
        assert!(names.contains(&"logs/".to_string()));
        assert!(names.contains(&"events/".to_string()));

        let manifest = read_manifest(&destination);
        assert_eq!(manifest["title"], "t5");
        assert_eq!(manifest["crashdumps_detected"], true);
        assert_eq!(manifest["file_hashes"][0]["path"], "bin/launcher.exe");
        assert_eq!(manifest["file_hashes"][0]["hashes"]["crc32"], "0xCBF43926");
        assert_eq!(manifest["errors"].as_array().unwrap().len(), 1);
        assert!(manifest["power_settings"].is_null());
    }

    #[test]
    fn copies_files_at_their_relative_paths() {
        let (dir, root) = fake_install();
        let config = dir.path().join("storage/t6/players/settings.cfg");
        fs::create_dir_all(config.parent().unwrap()).unwrap();
        fs::write(&config, b"seta com_maxfps 250").unwrap();
        let log = dir.path().join("storage/t6/main/console_zm.log");
        fs::create_dir_all(log.parent().unwrap()).unwrap();
        fs::write(&log, b"init").unwrap();

        let mut bundle = empty_bundle(Game::T6);
        bundle.configs.push(FileRecord {
            path: config,
            size: 19,
            kind: FileKind::Config,
        });
        bundle.logs.push(FileRecord {
            path: log,
            size: 4,
            kind: FileKind::Log,
        });

        let destination = dir.path().join("report.zip");
        compose(&bundle, &root, &destination).unwrap();

        let file = fs::File::open(&destination).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        let mut entry = archive
            .by_name("configs/storage/t6/players/settings.cfg")
            .unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "seta com_maxfps 250");
        drop(entry);
        assert!(archive.by_name("logs/storage/t6/main/console_zm.log").is_ok());
    }

    #[test]
    fn event_records_get_unique_xml_entries() {
        let (dir, root) = fake_install();
        let mut bundle = empty_bundle(Game::T4);
        bundle.events.push("<Event><System/></Event>".to_string());
        bundle.events.push("<Event><System/></Event>".to_string());

        let destination = dir.path().join("report.zip");
        compose(&bundle, &root, &destination).unwrap();

        let events: Vec<String> = entry_names(&destination)
            .into_iter()
            .filter(|name| name.starts_with("events/") && name.ends_with(".xml"))
            .collect();
        assert_eq!(events.len(), 2);
        assert_ne!(events[0], events[1]);
    }

    #[test]
    fn vanished_log_aborts_and_removes_partial() {
        let (dir, root) = fake_install();
        let mut bundle = empty_bundle(Game::T4);
        bundle.logs.push(FileRecord {
            path: dir.path().join("storage/t4/main/console.log"),
            size: 0,
            kind: FileKind::Log,
        });

        let destination = dir.path().join("report.zip");
        let err = compose(&bundle, &root, &destination).unwrap_err();
        assert!(matches!(err, ReportError::MissingSourceFile { .. }));
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }

    #[test]
    fn manifest_includes_power_settings_when_collected() {
        let (dir, root) = fake_install();
        let mut bundle = empty_bundle(Game::T6);
        bundle.power = Some(PowerReport {
            parsed: Default::default(),
            raw: "Power Scheme GUID: x (Balanced)".to_string(),
        });

        let destination = dir.path().join("report.zip");
        compose(&bundle, &root, &destination).unwrap();

        let manifest = read_manifest(&destination);
        assert_eq!(
            manifest["power_settings"]["raw"],
            "Power Scheme GUID: x (Balanced)"
        );
    }
}
