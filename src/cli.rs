use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the reporter.
///
/// Every option has an interactive fallback; running the binary with no
/// arguments walks the operator through the full flow.
#[derive(Parser, Debug)]
#[clap(name = "plutonium-reporter", about = "Offline diagnostic evidence collector for Plutonium installations")]
pub struct Args {
    /// Path to the Plutonium installation root (default: %LOCALAPPDATA%\Plutonium)
    #[clap(short, long)]
    pub root: Option<PathBuf>,

    /// Directory the report archive is written into (default: current directory)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Report for this title (t4, t5 or t6) without crashdump correlation,
    /// skipping the interactive menus
    #[clap(short, long)]
    pub game: Option<String>,

    /// Include crash events from any time instead of the last 14 days
    #[clap(long)]
    pub all_events: bool,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}
