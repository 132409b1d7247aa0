use std::fmt::Display;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use temporal_bridge::{
    duration, instant, plain_date, plain_date_time, plain_month_day, plain_time, plain_year_month,
    CompareOutcome, Outcome,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "temporal",
    version,
    about = "Parse, format and do arithmetic on ISO 8601 dates, times and durations"
)]
struct Cli {
    /// Print the full outcome as JSON instead of the bare value
    #[arg(long, global = true)]
    json: bool,

    /// Time zone for `now` (IANA name or ±HH:MM); defaults to the system zone
    #[arg(long, global = true, env = "TEMPORAL_TZ", allow_hyphen_values = true)]
    zone: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Current instant, or wall-clock date/time in --zone
    Now {
        #[arg(value_enum, default_value_t = NowKind::Instant)]
        kind: NowKind,
    },
    /// Parse a value and print its canonical form
    Parse { kind: Kind, text: String },
    /// Print every field of a value as JSON
    Fields { kind: Kind, text: String },
    /// Add a duration to a value (constrain policy)
    Add { kind: Kind, value: String, duration: String },
    /// Subtract a duration from a value (constrain policy)
    Subtract { kind: Kind, value: String, duration: String },
    /// Duration from A to B
    Until {
        kind: DifferenceKind,
        a: String,
        b: String,
        /// Largest unit in the result, e.g. `days` or `hours`
        #[arg(long)]
        largest_unit: Option<String>,
    },
    /// Duration from B to A
    Since {
        kind: DifferenceKind,
        a: String,
        b: String,
        #[arg(long)]
        largest_unit: Option<String>,
    },
    /// Compare A and B, printing -1, 0 or 1
    Compare { kind: Kind, a: String, b: String },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Instant,
    Date,
    Time,
    DateTime,
    YearMonth,
    MonthDay,
    Duration,
}

/// Kinds with a difference operation. Durations have none.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DifferenceKind {
    Instant,
    Date,
    Time,
    DateTime,
    YearMonth,
    MonthDay,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NowKind {
    Instant,
    Date,
    Time,
    DateTime,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TEMPORAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let zone = cli.zone.as_deref();
    tracing::debug!(?zone, json = cli.json, "starting");
    match &cli.command {
        Command::Now { kind } => {
            let outcome = match kind {
                NowKind::Instant => instant::now(),
                NowKind::Date => plain_date::now(zone),
                NowKind::Time => plain_time::now(zone),
                NowKind::DateTime => plain_date_time::now(zone),
            };
            emit(outcome, cli.json)
        }
        Command::Parse { kind, text } => emit(parse(*kind, text), cli.json),
        Command::Fields { kind, text } => fields(*kind, text),
        Command::Add {
            kind,
            value,
            duration,
        } => emit(add(*kind, value, duration), cli.json),
        Command::Subtract {
            kind,
            value,
            duration,
        } => emit(subtract(*kind, value, duration), cli.json),
        Command::Until {
            kind,
            a,
            b,
            largest_unit,
        } => emit(until(*kind, a, b, largest_unit.as_deref()), cli.json),
        Command::Since {
            kind,
            a,
            b,
            largest_unit,
        } => emit(since(*kind, a, b, largest_unit.as_deref()), cli.json),
        Command::Compare { kind, a, b } => emit(compare(*kind, a, b), cli.json),
    }
}

/// Print the value (or the whole outcome with `--json`); errors go to stderr
/// with exit status 1.
fn emit<T: Serialize + Display>(outcome: Outcome<T>, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    match outcome.into_result() {
        Ok(value) => {
            if !json {
                println!("{value}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err((kind, message)) => {
            eprintln!("{kind:?}: {message}");
            Ok(ExitCode::from(1))
        }
    }
}

fn parse(kind: Kind, text: &str) -> Outcome<String> {
    let text = Some(text);
    match kind {
        Kind::Instant => instant::from_string(text),
        Kind::Date => plain_date::from_string(text),
        Kind::Time => plain_time::from_string(text),
        Kind::DateTime => plain_date_time::from_string(text),
        Kind::YearMonth => plain_year_month::from_string(text),
        Kind::MonthDay => plain_month_day::from_string(text),
        Kind::Duration => duration::from_string(text),
    }
}

/// Components are always printed as JSON. An invalid value reports the
/// parse error instead.
fn fields(kind: Kind, text: &str) -> Result<ExitCode> {
    if let Err((kind, message)) = parse(kind, text).into_result() {
        eprintln!("{kind:?}: {message}");
        return Ok(ExitCode::from(1));
    }
    let text = Some(text);
    let record = match kind {
        Kind::Instant => serde_json::to_value(instant::components(text))?,
        Kind::Date => serde_json::to_value(plain_date::components(text))?,
        Kind::Time => serde_json::to_value(plain_time::components(text))?,
        Kind::DateTime => serde_json::to_value(plain_date_time::components(text))?,
        Kind::YearMonth => serde_json::to_value(plain_year_month::components(text))?,
        Kind::MonthDay => serde_json::to_value(plain_month_day::components(text))?,
        Kind::Duration => serde_json::to_value(duration::components(text))?,
    };
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(ExitCode::SUCCESS)
}

fn add(kind: Kind, value: &str, d: &str) -> Outcome<String> {
    let (value, d) = (Some(value), Some(d));
    match kind {
        Kind::Instant => instant::add(value, d),
        Kind::Date => plain_date::add(value, d),
        Kind::Time => plain_time::add(value, d),
        Kind::DateTime => plain_date_time::add(value, d),
        Kind::YearMonth => plain_year_month::add(value, d),
        Kind::MonthDay => plain_month_day::add(value, d),
        Kind::Duration => duration::add(value, d),
    }
}

fn subtract(kind: Kind, value: &str, d: &str) -> Outcome<String> {
    let (value, d) = (Some(value), Some(d));
    match kind {
        Kind::Instant => instant::subtract(value, d),
        Kind::Date => plain_date::subtract(value, d),
        Kind::Time => plain_time::subtract(value, d),
        Kind::DateTime => plain_date_time::subtract(value, d),
        Kind::YearMonth => plain_year_month::subtract(value, d),
        Kind::MonthDay => plain_month_day::subtract(value, d),
        Kind::Duration => duration::subtract(value, d),
    }
}

fn until(kind: DifferenceKind, a: &str, b: &str, unit: Option<&str>) -> Outcome<String> {
    let (a, b) = (Some(a), Some(b));
    match kind {
        DifferenceKind::Instant => instant::until(a, b, unit),
        DifferenceKind::Date => plain_date::until(a, b, unit),
        DifferenceKind::Time => plain_time::until(a, b, unit),
        DifferenceKind::DateTime => plain_date_time::until(a, b, unit),
        DifferenceKind::YearMonth => plain_year_month::until(a, b, unit),
        DifferenceKind::MonthDay => plain_month_day::until(a, b, unit),
    }
}

fn since(kind: DifferenceKind, a: &str, b: &str, unit: Option<&str>) -> Outcome<String> {
    let (a, b) = (Some(a), Some(b));
    match kind {
        DifferenceKind::Instant => instant::since(a, b, unit),
        DifferenceKind::Date => plain_date::since(a, b, unit),
        DifferenceKind::Time => plain_time::since(a, b, unit),
        DifferenceKind::DateTime => plain_date_time::since(a, b, unit),
        DifferenceKind::YearMonth => plain_year_month::since(a, b, unit),
        DifferenceKind::MonthDay => plain_month_day::since(a, b, unit),
    }
}

fn compare(kind: Kind, a: &str, b: &str) -> CompareOutcome {
    let (a, b) = (Some(a), Some(b));
    match kind {
        Kind::Instant => instant::compare(a, b),
        Kind::Date => plain_date::compare(a, b),
        Kind::Time => plain_time::compare(a, b),
        Kind::DateTime => plain_date_time::compare(a, b),
        Kind::YearMonth => plain_year_month::compare(a, b),
        Kind::MonthDay => plain_month_day::compare(a, b),
        Kind::Duration => duration::compare(a, b),
    }
}
