use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::profiling::PassSummary;
use inputlab::display;
use inputlab::{ActionTracker, ConsoleLog, SessionTrace, SettingsStore};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "inputlab-replay")]
#[command(about = "Replay a recorded input session and print the detected actions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Feed a trace through the tracker.
    Run {
        trace: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Rows to print; defaults to the configured display row count.
        #[arg(long)]
        rows: Option<usize>,
        #[arg(long)]
        port: Option<u8>,
        /// Also print the button press intervals.
        #[arg(long, default_value_t = false)]
        presses: bool,
        #[arg(long, default_value_t = false)]
        profile: bool,
        /// Use the user's saved settings instead of the ones recorded in the trace.
        #[arg(long, default_value_t = false)]
        user_settings: bool,
    },
    /// Check a trace for out-of-range ports and queue slots.
    Validate { trace: PathBuf },
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: inputlab::trace::ReplaySummary,
    rows: &'a [display::DisplayRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<PassSummary>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            trace,
            json,
            rows,
            port,
            presses,
            profile,
            user_settings,
        } => cmd_run(&trace, json, rows, port, presses, profile, user_settings),
        Commands::Validate { trace } => cmd_validate(&trace),
    }
}

fn load_trace(path: &Path) -> Result<SessionTrace> {
    SessionTrace::load(path).with_context(|| format!("failed to load trace {}", path.display()))
}

fn cmd_validate(path: &Path) -> Result<()> {
    let trace = load_trace(path)?;
    let polls: usize = trace.frames.iter().map(|f| f.polls.len()).sum();
    println!("OK: {} frames, {} polls", trace.frames.len(), polls);
    Ok(())
}

fn cmd_run(
    path: &Path,
    json: bool,
    rows: Option<usize>,
    port: Option<u8>,
    presses: bool,
    profile: bool,
    user_settings: bool,
) -> Result<()> {
    let trace = load_trace(path)?;
    let mut tracker = if user_settings {
        ActionTracker::new(SettingsStore::from_env().load())
    } else {
        trace.tracker()
    };
    let mut console = ConsoleLog::new();

    let mut timings = PassSummary::default();
    let summary = if profile {
        trace.replay_profiled(&mut tracker, &mut console, &mut timings)
    } else {
        trace.replay(&mut tracker, &mut console)
    };

    let limit = rows.unwrap_or(tracker.settings().history.display_rows);
    let rows = display::rows(tracker.history(), tracker.polls_per_frame(), limit, port);

    if json {
        let report = JsonReport {
            summary,
            rows: &rows,
            profile: profile.then_some(timings),
        };
        let text = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{text}");
        return Ok(());
    }

    if presses {
        for line in console.lines() {
            println!("{line}");
        }
        println!();
    }
    print!("{}", display::render_text(&rows));
    println!(
        "{} frames, {} polls, {} detected, {} succeeded",
        summary.frames, summary.polls, summary.detected, summary.succeeded
    );
    if profile {
        println!(
            "detect passes: {} (avg {:?}, max {:?})",
            timings.passes,
            timings.avg_total(),
            timings.max_total
        );
    }
    Ok(())
}
