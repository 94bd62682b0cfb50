mod report;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use serde::Serialize;
use urania::chart::{ChartSnapshot, TransitComparison};
use urania::interpret::WeeklySummary;
use urania::{EngineResources, Interpreter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Settings file (default: configs/urania.toml, then ../../configs/urania.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log provider selection and per-call summaries.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Natal chart for one moment.
    Chart {
        #[command(flatten)]
        moment: Moment,
        #[arg(long)]
        json: bool,
    },
    /// Aspects between a birth chart and a second moment.
    Transits {
        #[command(flatten)]
        birth: Birth,
        #[command(flatten)]
        moment: Moment,
        #[arg(long)]
        json: bool,
    },
    /// Daily transit comparisons over a run of consecutive days.
    Series {
        #[command(flatten)]
        birth: Birth,
        /// Location label for the transit moments.
        #[arg(long, default_value = "")]
        location: String,
        /// First day, YYYY-MM-DD (default: today).
        #[arg(long)]
        start: Option<String>,
        /// Number of days (default: report.forecast_days).
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct Moment {
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:MM, 24-hour
    #[arg(long)]
    time: String,
    #[arg(long, default_value = "")]
    location: String,
}

#[derive(ClapArgs, Debug)]
struct Birth {
    #[arg(long)]
    birth_date: String,
    #[arg(long)]
    birth_time: String,
    #[arg(long, default_value = "")]
    birth_location: String,
}

#[derive(Serialize)]
struct SeriesOutput<'a> {
    days: &'a [TransitComparison],
    summary: &'a WeeklySummary,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

fn print_transits(
    natal: &ChartSnapshot,
    comparisons: &[TransitComparison],
    interpreter: &Interpreter<'_>,
) {
    for comparison in comparisons {
        println!("{}", report::transits(natal, comparison, interpreter));
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = urania_config::load_settings_or_default(args.config.as_deref())
        .context("load settings")?;
    let resources = EngineResources::load(&settings.engine);
    let engine = resources.engine();
    let interpreter = resources.interpreter();
    log::info!(
        "Using {} ephemeris, {} aspect rules",
        resources.ephemeris.strategy_name(),
        resources.aspects.rules().len()
    );

    match args.command {
        Command::Chart { moment, json } => {
            let chart = engine.compute_chart(&moment.date, &moment.time, &moment.location);
            if json {
                print_json(&chart)?;
            } else {
                println!("{}", report::birth_chart(&chart, &interpreter));
            }
        }
        Command::Transits {
            birth,
            moment,
            json,
        } => {
            let natal =
                engine.compute_chart(&birth.birth_date, &birth.birth_time, &birth.birth_location);
            let comparison =
                engine.compute_transits(&natal, &moment.date, &moment.time, &moment.location);
            if json {
                print_json(&comparison)?;
            } else {
                print_transits(&natal, std::slice::from_ref(&comparison), &interpreter);
            }
        }
        Command::Series {
            birth,
            location,
            start,
            days,
            json,
        } => {
            let start = match start {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .with_context(|| format!("invalid --start date {s:?}"))?,
                None => Local::now().date_naive(),
            };
            let days = days.unwrap_or(settings.report.forecast_days);
            anyhow::ensure!(days > 0, "--days must be at least 1");

            let natal =
                engine.compute_chart(&birth.birth_date, &birth.birth_time, &birth.birth_location);
            let series = engine.compute_transit_series(
                &natal,
                start,
                days,
                &settings.report.default_time,
                &location,
            );
            let summary = interpreter.weekly_summary(&series);
            if json {
                print_json(&SeriesOutput {
                    days: &series,
                    summary: &summary,
                })?;
            } else {
                for comparison in &series {
                    println!("{}", report::daily_forecast(comparison, &interpreter));
                }
                println!(
                    "{}",
                    report::weekly_summary(&summary, &birth.birth_location, &location)
                );
            }
        }
    }
    Ok(())
}
