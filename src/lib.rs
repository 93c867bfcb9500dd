//! # plutonium-reporter
//!
//! Offline diagnostic evidence collector for Plutonium game-launcher
//! installations.
//!
//! ## Overview
//!
//! The reporter inspects an installation root, correlates the crash
//! artifacts it finds into incident sessions, gathers the matching logs and
//! configs, fingerprints the static file set with CRC32/SHA-1/SHA-256 and
//! packs everything, together with opaque hardware, event-log and
//! power-configuration records, into a single zip archive with a
//! machine-readable `general.json` manifest, ready to be handed to whoever
//! triages the issue.
//!
//! ## Pipeline
//!
//! The run is a single synchronous transaction: scan, correlate, hash, then
//! bundle. Individual unreadable files are skipped and surfaced in the
//! manifest's error list; missing required directories or an already
//! existing destination archive abort the run before anything is written.
//!
//! ## Module Organization
//!
//! - [`cli`]: command-line argument parsing
//! - [`models`]: core data models shared across the pipeline
//! - [`paths`]: validated installation root and derived paths
//! - [`scanner`]: lazy recursive directory scanning with predicates
//! - [`hash`]: multi-algorithm content fingerprinting
//! - [`crashdump`]: crash-artifact parsing and incident correlation
//! - [`collect`]: log, config and hash collection passes
//! - [`collectors`]: opaque hardware / event-log / power collaborators
//! - [`bundle`]: archive composition and manifest generation
//! - [`prompt`]: blocking console prompts for the interactive flow
//! - [`errors`]: the pipeline error taxonomy
//! - [`constants`]: application-wide constants

pub mod bundle;
pub mod cli;
pub mod collect;
pub mod collectors;
pub mod constants;
pub mod crashdump;
pub mod errors;
pub mod hash;
pub mod models;
pub mod paths;
pub mod prompt;
pub mod scanner;
