//! Folio report runner
//!
//! Reads a ledger snapshot, generates one report, and writes it to stdout as
//! JSON. Logs go to stderr.

mod cli;

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::LedgerSnapshot;
use folio_core::reports::{Report, ReportContext, ReportRequest, ReportService};
use folio_shared::config::LoggingConfig;
use folio_shared::{AppConfig, AppError};

use cli::{Cli, RequestSource};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let app_error = err.downcast_ref::<AppError>();
            eprintln!(
                "error[{}]: {err:#}",
                app_error.map_or("INTERNAL_ERROR", AppError::error_code)
            );
            let code = app_error.map_or(70, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;
    init_tracing(&config.logging);

    let snapshot: LedgerSnapshot = read_json(&cli.snapshot)?;
    let request: ReportRequest = match cli.command.into_request() {
        RequestSource::Inline(request) => request,
        RequestSource::File(path) => read_json(&path)?,
    };

    let generated_at = cli
        .now
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let ctx = ReportContext::new(generated_at)
        .with_currency(config.reporting.currency)
        .with_company_name(config.reporting.company_name);

    info!(
        report = request.name(),
        accounts = snapshot.accounts.len(),
        lines = snapshot.journal_lines.len(),
        "Generating report"
    );
    let report = ReportService::generate(&request, &snapshot, &ctx).map_err(AppError::from)?;

    write_report(&report, cli.pretty)?;
    debug!(report = request.name(), "Report written");

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_target(false).with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

/// Reads and parses a JSON document; `-` reads stdin.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let mut raw = String::new();
    let read = if path.as_os_str() == "-" {
        io::stdin().read_to_string(&mut raw)
    } else {
        std::fs::File::open(path).and_then(|mut file| file.read_to_string(&mut raw))
    };
    read.map_err(|e| AppError::InputUnavailable(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&raw)
        .map_err(|e| AppError::InvalidInput(format!("{}: {e}", path.display())))
}

fn write_report(report: &Report, pretty: bool) -> Result<(), AppError> {
    let mut out = io::stdout().lock();
    let written = if pretty {
        serde_json::to_writer_pretty(&mut out, report)
    } else {
        serde_json::to_writer(&mut out, report)
    };
    written.map_err(output_error)?;
    writeln!(out).map_err(output_error)?;
    out.flush().map_err(output_error)
}

fn output_error(err: impl std::fmt::Display) -> AppError {
    AppError::Output(err.to_string())
}
