//! CLI entry point for the bike-share trip analyzer.
//!
//! Provides subcommands for a one-shot analysis, an interactive session that
//! prompts for the city and filters, and listing the configured cities.

mod prompt;

use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_stats::config::{CityCatalog, CityId};
use bikeshare_stats::filter::{DayFilter, MonthFilter};
use bikeshare_stats::loader::RecordLoader;
use bikeshare_stats::model::{Dataset, PAGE_SIZE};
use bikeshare_stats::output::{render_json, render_page, render_report};
use bikeshare_stats::analysis::NO_MATCHING_TRIPS;
use bikeshare_stats::{AnalysisRequest, BikeshareError, analyze};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::prompt::{ask, confirm};

const DEFAULT_LOG_FILE: &str = "logs/bikeshare.log";

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Descriptive statistics for US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city names to trip tables (overrides --data-dir)
    #[arg(long, global = true, value_name = "FILE")]
    cities: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one city with optional month and day filters
    Analyze {
        /// Chicago, New York City or Washington
        #[arg(short, long)]
        city: CityId,

        /// January to June, or "all"
        #[arg(short, long, default_value = "all")]
        month: MonthFilter,

        /// Monday to Sunday, or "all"
        #[arg(short, long, default_value = "all")]
        day: DayFilter,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also print every matching record, five per page
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
    /// Prompt for city and filters, show the report, then page through raw trips
    Interactive,
    /// List the configured cities and their trip tables
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let _log_guard = init_tracing()?;

    let cli = Cli::parse();
    let loader = RecordLoader::new(resolve_catalog(cli.data_dir, cli.cities)?);

    match cli.command {
        Commands::Analyze {
            city,
            month,
            day,
            json,
            raw,
        } => {
            let request = AnalysisRequest { city, month, day };
            let analysis = analyze(&loader, &request)?;

            if json {
                println!("{}", render_json(&analysis.report)?);
            } else {
                print!("{}", render_report(&analysis.report));
            }

            if raw {
                for (i, page) in analysis.dataset.pages(PAGE_SIZE).enumerate() {
                    print!("{}", render_page(i * PAGE_SIZE, page));
                }
            }
        }
        Commands::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_session(&loader, &mut stdin.lock(), &mut stdout.lock())?;
        }
        Commands::Cities => {
            for (city, path) in loader.catalog().iter() {
                println!("{city}: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Colored stderr output plus a JSON log file rotated daily.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (log_dir, log_file_name) = split_log_path(Path::new(&log_file_path));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_file = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(console)
        .with(json_file)
        .try_init()
        .context("installing the tracing subscriber")?;

    Ok(guard)
}

/// Directory and file name for the rolling appender; a bare file name logs
/// into the current directory.
fn split_log_path(path: &Path) -> (&Path, &OsStr) {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        Some(_) => Path::new("."),
        None => Path::new("logs"),
    };
    let name = path.file_name().unwrap_or(OsStr::new("bikeshare.log"));
    (dir, name)
}

/// Builds the city catalog from flags, then environment, then defaults.
fn resolve_catalog(data_dir: Option<PathBuf>, cities: Option<PathBuf>) -> Result<CityCatalog> {
    let cities = cities.or_else(|| std::env::var_os("BIKESHARE_CITIES").map(PathBuf::from));
    if let Some(path) = cities {
        info!(path = %path.display(), "Using city catalog file");
        return CityCatalog::load(&path)
            .with_context(|| format!("loading city catalog {}", path.display()));
    }

    let data_dir = data_dir
        .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(CityCatalog::from_data_dir(data_dir))
}

/// The interactive loop: pick filters, show the report, page raw trips,
/// and offer to start over.
fn run_session<R: BufRead, W: Write>(
    loader: &RecordLoader,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "Welcome! Let's analyze US bikeshare data.\n")?;

    loop {
        let city: CityId = ask(
            input,
            output,
            "Choose a city (Chicago, New York City, Washington): ",
        )?;
        let month: MonthFilter = ask(
            input,
            output,
            "Enter a month (January to June) or 'all' for no filter: ",
        )?;
        let day: DayFilter = ask(
            input,
            output,
            "Enter a day (Monday to Sunday) or 'all' for no filter: ",
        )?;
        writeln!(output, "\nFilters applied successfully!")?;

        let request = AnalysisRequest { city, month, day };
        match analyze(loader, &request) {
            Ok(analysis) => {
                write!(output, "{}", render_report(&analysis.report))?;
                page_raw(&analysis.dataset, input, output)?;
            }
            Err(e @ BikeshareError::EmptyDataset {
                statistic: NO_MATCHING_TRIPS,
            }) => {
                warn!(error = %e, "No trips matched the filters");
                writeln!(output, "No trips match those filters.")?;
            }
            Err(e) => return Err(e.into()),
        }

        if !confirm(input, output, "\nWould you like to restart? Enter yes or no: ")? {
            writeln!(output, "Thank you for using the bikeshare analysis tool. Goodbye!")?;
            return Ok(());
        }
    }
}

/// Shows five raw trips per "yes" until the user declines or trips run out.
fn page_raw<R: BufRead, W: Write>(dataset: &Dataset, input: &mut R, output: &mut W) -> Result<()> {
    let mut offset = 0;
    loop {
        if !confirm(
            input,
            output,
            "Would you like to see 5 rows of data? Enter yes or no: ",
        )? {
            return Ok(());
        }
        let page = dataset.page(offset, PAGE_SIZE);
        if page.is_empty() {
            writeln!(output, "No more trips to show.")?;
            return Ok(());
        }
        write!(output, "{}", render_page(offset, page))?;
        offset += PAGE_SIZE;
    }
}
