//! CLI entry point for the bikeshare explorer.
//!
//! Runs the interactive session over stdin/stdout. All options have defaults,
//! so running with no arguments reads the city CSVs from the current directory.

use anyhow::{Context, Result};
use bikeshare_explorer::browser::DEFAULT_PAGE_SIZE;
use bikeshare_explorer::{CsvDirectory, Session};
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Interactively explore US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory containing chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Rows shown per page when browsing raw data
    #[arg(
        short,
        long,
        env = "BIKESHARE_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    page_size: usize,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: quiet stderr (prompts share the terminal) + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    info!(data_dir = %cli.data_dir.display(), page_size = cli.page_size, "Starting");

    let source = CsvDirectory::new(&cli.data_dir);
    let stdin = io::stdin();
    let mut session = Session::new(source, stdin.lock(), io::stdout()).with_page_size(cli.page_size);

    if let Err(e) = session.run() {
        error!(error = %e, "Session ended with an error");
        return Err(e).context("bikeshare session aborted");
    }

    Ok(())
}
