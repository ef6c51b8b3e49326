//! `dstdump` CLI — dump DST transitions for every timezone as JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Every IANA zone for the current year, plus the two sample zones
//! dstdump report
//!
//! # A specific year, a few zones, written to a file
//! dstdump report --year 2024 --zone Europe/Berlin --zone America/New_York -o dst.json
//!
//! # Use a JSON registry instead of the bundled tz database
//! dstdump report --registry zones.json --no-samples
//!
//! # Resolve a single rule: last Sunday of October at 03:00
//! dstdump resolve --year 2024 --month 10 --week 5 --weekday sun --time 03:00:00
//! ```
//!
//! Set `RUST_LOG=debug` to see which zones have no rule for the year.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveTime, Weekday};
use clap::{Parser, Subcommand};
use dst_engine::report::ZoneReport;
use dst_engine::tzdb::parse_tz;
use dst_engine::{Occurrence, StaticSource, TransitionRule, TzdbSource};
use log::info;

#[derive(Parser)]
#[command(
    name = "dstdump",
    version,
    about = "Resolve timezone DST rules into concrete transition dates"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report DST transitions for every zone in the registry
    Report {
        /// Year to resolve (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// JSON registry file to read zones from instead of the tz database
        #[arg(short, long)]
        registry: Option<String>,
        /// Only report these zone ids (repeatable)
        #[arg(short, long = "zone")]
        zones: Vec<String>,
        /// Leave out the two fixed-rule sample zones
        #[arg(long)]
        no_samples: bool,
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Resolve a single transition rule
    Resolve {
        /// Year to resolve (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month, 1-12
        #[arg(short, long)]
        month: u32,
        /// Day of month, for a fixed-date rule
        #[arg(short, long, conflicts_with_all = ["week", "weekday"])]
        day: Option<u32>,
        /// Occurrence of the weekday, 1-4 or 5 for the last one
        #[arg(short, long, requires = "weekday")]
        week: Option<u8>,
        /// Weekday for a floating rule (e.g. "sun", "Sunday")
        #[arg(long, requires = "week")]
        weekday: Option<Weekday>,
        /// Time of day, HH:MM:SS (23:59:59 means end of day)
        #[arg(short, long, default_value = "00:00:00")]
        time: NaiveTime,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // Re-parse with --help to show usage (clap handles this)
            Cli::parse_from(["dstdump", "--help"]);
            unreachable!();
        }
    };

    match command {
        Commands::Report {
            year,
            registry,
            zones,
            no_samples,
            compact,
            output,
        } => {
            let year = year.unwrap_or_else(current_year);
            let mut reports = match registry.as_deref() {
                Some(path) => {
                    let source = load_registry(path)?;
                    dst_engine::build_report(&source, year)
                        .with_context(|| format!("Failed to build report from {}", path))?
                }
                None => {
                    let source = tzdb_source(year, &zones)?;
                    dst_engine::build_report(&source, year)
                        .context("Failed to build report from the tz database")?
                }
            };

            if !no_samples {
                let samples = dst_engine::build_report(&StaticSource::samples(), year)
                    .context("Failed to build sample zones")?;
                reports.extend(samples);
            }

            retain_zones(&mut reports, &zones);
            info!("reporting {} zones for {}", reports.len(), year);

            let json = dst_engine::to_json(&reports, !compact)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Resolve {
            year,
            month,
            day,
            week,
            weekday,
            time,
        } => {
            let year = year.unwrap_or_else(current_year);
            let rule = build_rule(month, day, week, weekday, time)?;
            let descriptor = dst_engine::describe(year, &rule)
                .with_context(|| format!("Failed to resolve rule for {}", year))?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
    }

    Ok(())
}

/// Turn the `resolve` flags into a rule: `--day` makes a fixed-date rule,
/// `--week` with `--weekday` a floating one.
fn build_rule(
    month: u32,
    day: Option<u32>,
    week: Option<u8>,
    weekday: Option<Weekday>,
    time: NaiveTime,
) -> Result<TransitionRule> {
    let rule = match (day, week, weekday) {
        (Some(day), _, _) => TransitionRule::fixed_date(time, month, day)?,
        (None, Some(week), Some(weekday)) => {
            TransitionRule::floating_date(time, month, Occurrence::try_from(week)?, weekday)?
        }
        _ => anyhow::bail!("Either --day or both --week and --weekday are required"),
    };
    Ok(rule)
}

/// The tz database source, limited to the requested zones when there are any.
/// Ids that are not IANA names (the sample zones) are left to `retain_zones`.
fn tzdb_source(year: i32, zones: &[String]) -> Result<TzdbSource> {
    let source = if zones.is_empty() {
        TzdbSource::new(year)
    } else {
        let names: Vec<&str> = zones
            .iter()
            .map(String::as_str)
            .filter(|z| parse_tz(z).is_ok())
            .collect();
        TzdbSource::with_zones(year, &names)
    };
    source.with_context(|| format!("Failed to scan the tz database for {}", year))
}

/// Keep only the requested zone ids; an empty list keeps everything.
fn retain_zones(reports: &mut Vec<ZoneReport>, zones: &[String]) {
    if !zones.is_empty() {
        reports.retain(|r| zones.iter().any(|z| z == &r.id));
    }
}

fn current_year() -> i32 {
    Local::now().year()
}

fn load_registry(path: &str) -> Result<StaticSource> {
    let file = File::open(path).with_context(|| format!("Failed to read file: {}", path))?;
    StaticSource::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse registry: {}", path))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
