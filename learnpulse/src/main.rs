//! learnpulse - attendance streaks and activity heatmaps
//!
//! This tool provides commands for:
//! - Streak and attendance statistics (`stats`)
//! - A 365-day calendar heatmap (`grid`)
//! - Checking the server's streak against a local recomputation (`verify`)
//! - Showing the resolved configuration (`config`)
//!
//! Records come from a JSON snapshot (`--file`) or the LMS API (`--user`).
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/learnpulse/config.toml (~/.config/learnpulse/config.toml)
//! - Logs: $XDG_STATE_HOME/learnpulse/learnpulse.log (~/.local/state/learnpulse/learnpulse.log)

mod heatmap;
mod report;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use learnpulse_core::analytics::{window_start, DashboardStats, GRID_DAYS};
use learnpulse_core::ingest::{
    validate_records, ApiRecordSource, FileRecordSource, RecordSource, ValidationMode,
};
use learnpulse_core::{Config, DayBoundary};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "learnpulse")]
#[command(about = "Attendance streaks and activity heatmaps")]
#[command(version)]
struct Args {
    /// Write a debug log to the XDG state directory
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the XDG default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show streaks and attendance statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,
    },

    /// Show the 365-day activity heatmap
    Grid {
        #[command(flatten)]
        input: InputArgs,

        /// Export format (json = per-day counts and levels)
        #[arg(long)]
        export: Option<String>,
    },

    /// Compare the server-reported streak with a local recomputation
    Verify {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show resolved configuration
    Config,
}

/// Where records come from and how they are interpreted.
#[derive(ClapArgs)]
struct InputArgs {
    /// Read records from a JSON snapshot file
    #[arg(short, long, conflicts_with = "user")]
    file: Option<PathBuf>,

    /// Fetch records for this user from the LMS API
    #[arg(short, long)]
    user: Option<String>,

    /// LMS API base URL (overrides api.base_url)
    #[arg(long)]
    api_url: Option<String>,

    /// Reference day (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Timezone for calendar days: utc, local or ±HH:MM (overrides calendar.timezone)
    #[arg(long, allow_hyphen_values = true)]
    timezone: Option<String>,

    /// Skip records with malformed dates instead of failing
    #[arg(long)]
    lenient: bool,
}

/// A computed dashboard plus where its data came from.
struct Loaded {
    stats: DashboardStats,
    source: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Keep the guard alive for the whole run so buffered lines are flushed
    let _log_guard = if args.verbose {
        Some(
            learnpulse_core::logging::init(&config.logging)
                .context("failed to initialize logging")?,
        )
    } else {
        None
    };

    match args.command {
        Command::Stats { input, export } => cmd_stats(&config, &input, export.as_deref()),
        Command::Grid { input, export } => cmd_grid(&config, &input, export.as_deref()),
        Command::Verify { input } => cmd_verify(&config, &input),
        Command::Config => cmd_config(&config, args.config.as_ref()),
    }
}

fn cmd_stats(config: &Config, input: &InputArgs, export: Option<&str>) -> Result<()> {
    if let Some(other) = export.filter(|f| !matches!(*f, "md" | "json")) {
        bail!("Unknown export format: {}. Use 'md' or 'json'", other);
    }

    let loaded = load_dashboard(config, input)?;

    match export {
        Some("json") => report::print_json(&loaded.stats)?,
        Some(_) => report::print_markdown(&loaded.stats, &loaded.source),
        None => report::print_terminal(&loaded.stats, &loaded.source),
    }

    Ok(())
}

fn cmd_grid(config: &Config, input: &InputArgs, export: Option<&str>) -> Result<()> {
    if let Some(other) = export.filter(|f| *f != "json") {
        bail!("Unknown export format: {}. Use 'json'", other);
    }

    let loaded = load_dashboard(config, input)?;

    match export {
        Some(_) => report::print_grid_json(&loaded.stats)?,
        None => report::print_grid_terminal(&loaded.stats),
    }

    Ok(())
}

fn cmd_verify(config: &Config, input: &InputArgs) -> Result<()> {
    let loaded = load_dashboard(config, input)?;

    let Some(check) = loaded.stats.streak_check else {
        bail!(
            "{} did not report a server streak; nothing to verify",
            loaded.source
        );
    };

    println!("Streak Verification");
    println!("===================");
    println!();
    println!("Source:          {}", loaded.source);
    println!("Reference day:   {}", loaded.stats.reference_date);
    println!("Server streak:   {}", check.server);
    println!("Local streak:    {}", check.local);
    println!();

    if check.matches() {
        println!("OK: server and local streaks agree");
        Ok(())
    } else {
        bail!(
            "streak mismatch: server reports {}, records give {}",
            check.server,
            check.local
        )
    }
}

fn cmd_config(config: &Config, explicit_path: Option<&PathBuf>) -> Result<()> {
    println!("learnpulse Configuration");
    println!("========================");
    println!();

    let config_path = explicit_path.cloned().unwrap_or_else(Config::config_path);
    println!(
        "Config file:     {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("Log files:       {}.<date>", Config::log_path().display());
    println!();

    println!(
        "API URL:         {}",
        config.api.base_url.as_deref().unwrap_or("<not set>")
    );
    println!(
        "User ID:         {}",
        config.api.user_id.as_deref().unwrap_or("<not set>")
    );
    println!(
        "API token:       {}",
        if config.api.resolved_token().is_some() {
            "<set>"
        } else {
            "<not set>"
        }
    );
    println!("Timeout:         {}s", config.api.timeout_secs);
    println!("Max retries:     {}", config.api.max_retries);
    println!();
    println!("Timezone:        {}", config.calendar.boundary()?);
    println!("Log level:       {}", config.logging.level);

    Ok(())
}

/// Fetch a complete snapshot, validate it, and compute the dashboard.
fn load_dashboard(config: &Config, input: &InputArgs) -> Result<Loaded> {
    let boundary = match &input.timezone {
        Some(tz) => tz
            .parse::<DayBoundary>()
            .map_err(|e| anyhow::anyhow!("invalid --timezone: {}", e))?,
        None => config.calendar.boundary()?,
    };

    let reference = match &input.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid --date '{}', expected YYYY-MM-DD", date))?,
        None => boundary.today(),
    };
    if window_start(reference).is_none() {
        bail!(
            "reference day {} is too early: its {}-day window starts before the supported calendar",
            reference,
            GRID_DAYS
        );
    }

    let source = open_source(config, input)?;
    let source_name = source.name();

    let snapshot = source
        .fetch()
        .with_context(|| format!("failed to load attendance from {}", source_name))?;

    let mode = if input.lenient {
        ValidationMode::Lenient
    } else {
        ValidationMode::Strict
    };
    let validated = validate_records(&snapshot.records, boundary, mode)
        .context("attendance data failed validation (use --lenient to skip bad records)")?;

    for warning in &validated.warnings {
        eprintln!("warning: {}", warning);
    }

    tracing::info!(
        source = %source_name,
        records = validated.records.len(),
        reference = %reference,
        "Computing dashboard"
    );

    let stats = DashboardStats::compute(&validated.records, reference, snapshot.server_streak);

    Ok(Loaded {
        stats,
        source: source_name,
    })
}

fn open_source(config: &Config, input: &InputArgs) -> Result<Box<dyn RecordSource>> {
    if let Some(path) = &input.file {
        return Ok(Box::new(FileRecordSource::new(path)));
    }

    let Some(user_id) = input.user.clone().or_else(|| config.api.user_id.clone()) else {
        bail!("no record source: pass --file <path> or --user <id> (or set api.user_id in config)");
    };

    let mut api = config.api.clone();
    if let Some(url) = &input.api_url {
        api.base_url = Some(url.clone());
    }
    if !api.is_ready() {
        bail!("no API base URL for user {}: pass --api-url or set api.base_url in config", user_id);
    }

    let source = ApiRecordSource::new(api, user_id).context("failed to set up LMS API client")?;
    Ok(Box::new(source))
}
