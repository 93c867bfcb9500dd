use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use plutonium_reporter::bundle::{self, EvidenceBundle};
use plutonium_reporter::cli::Args;
use plutonium_reporter::collect::{self, EvidencePresence};
use plutonium_reporter::collectors::hardware::{HardwareProbe, SystemProbe};
use plutonium_reporter::collectors::{events, power};
use plutonium_reporter::constants::REPORT_PREFIX;
use plutonium_reporter::crashdump::{CrashArtifact, CrashdumpIndex};
use plutonium_reporter::models::Game;
use plutonium_reporter::paths::InstallRoot;
use plutonium_reporter::prompt;

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{:#}", err);
        prompt::pause("Press ENTER to close");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    initialize_logging(args.verbose)?;
    println!("B2 PLUTONIUM REPORTER V{}", env!("CARGO_PKG_VERSION"));

    let root = locate_root(args)?;
    let root = InstallRoot::resolve(root)?;
    info!("Found Plutonium path: {}", root.as_path().display());

    let presence = collect::detect_evidence(&root);
    if !presence.any() {
        return Err(anyhow!(
            "There are no logs to collect in your Plutonium directory"
        ));
    }

    let mut errors: Vec<String> = Vec::new();
    let (game, crash_artifacts) = choose_incident(args, &root, &presence, &mut errors)?;
    info!("Reporting for {}", game.title());

    let logs = collect::collect_logs(&root, game, &crash_artifacts);
    let configs = collect::collect_configs(&root);
    let hashes = collect::collect_hashes(&root, &mut errors);
    let hardware = SystemProbe.report();
    let events = events::collect(&root, args.all_events);
    let power = power::collect();

    let bundle = EvidenceBundle {
        game,
        crashdumps_detected: presence.crashdumps,
        configs,
        logs,
        hashes,
        hardware,
        power: Some(power),
        events,
        errors,
    };

    let output_dir = match &args.output {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("cannot determine current directory")?,
    };
    let destination = output_dir.join(format!("{}-{}.zip", REPORT_PREFIX, Utc::now().timestamp()));
    bundle::compose(&bundle, &root, &destination)?;

    prompt::pause("Press ENTER to finish, send the archive to the person handling your issue");
    Ok(())
}

/// Initialize logging with the specified verbosity level.
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Determine the installation root: CLI override, then the default
/// `%LOCALAPPDATA%\Plutonium`, then an interactive fallback (empty input
/// means the reporter sits inside the installation itself).
fn locate_root(args: &Args) -> Result<PathBuf> {
    if let Some(root) = &args.root {
        return Ok(root.clone());
    }

    info!("Detecting Plutonium path");
    if let Some(local) = env::var_os("LOCALAPPDATA") {
        let default = PathBuf::from(local).join("Plutonium");
        if default.is_dir() {
            return Ok(default);
        }
    }

    println!(
        "Default Plutonium path is missing. Press ENTER if the reporter is currently \
         placed in a Plutonium directory, or put in the absolute path to Plutonium"
    );
    let line = prompt::read_line();
    if line.is_empty() {
        env::current_dir().context("cannot determine current directory")
    } else {
        Ok(PathBuf::from(line))
    }
}

/// Pick the incident to report on.
///
/// `--game` skips correlation entirely and reports for that title with no
/// crash artifacts attached. Otherwise the distinct crash sessions are
/// offered for selection (auto-selected when there is exactly one); an empty
/// choice, an empty crash directory or a session whose title code cannot be
/// resolved all fall back to manual title selection.
fn choose_incident(
    args: &Args,
    root: &InstallRoot,
    presence: &EvidencePresence,
    errors: &mut Vec<String>,
) -> Result<(Game, Vec<CrashArtifact>)> {
    if let Some(code) = &args.game {
        let game = Game::from_code(code)
            .map_err(|err| anyhow!("invalid --game value: {}", err))?;
        return Ok((game, Vec::new()));
    }

    if presence.crashdumps {
        let index = CrashdumpIndex::from_dir(&root.crashdumps());
        let keys = index.session_keys();
        let selected = match keys.len() {
            0 => None,
            1 => Some(keys[0].to_string()),
            _ => prompt::select_session(&keys),
        };
        if let Some(key) = selected {
            if let Some(session) = index.select(&key) {
                match session.game() {
                    Ok(game) => {
                        info!(
                            "Collected {} crash artifacts for session {}",
                            session.artifacts().len(),
                            session.key()
                        );
                        return Ok((game, session.artifacts().to_vec()));
                    }
                    Err(err) => {
                        warn!("Dropping crash session {}: {}", key, err);
                        errors.push(format!("crash session {}: {}", key, err));
                    }
                }
            }
        }
    }

    Ok((prompt::select_game(), Vec::new()))
}
