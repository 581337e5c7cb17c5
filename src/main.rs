//! Manzili CLI entry point.
//!
//! Provides `generate`, `catalogue` and `serve` subcommands for writing a
//! single report from a JSON answer file, listing a locale's checkbox keys,
//! or running the HTTP service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use manzili::audit::AuditRecord;
use manzili::catalogue::Catalogues;
use manzili::config::ManziliConfig;
use manzili::credentials::load_with_env;
use manzili::locale::Locale;
use manzili::report::ReportService;

/// Manzili: home energy-audit reports in English and Arabic.
#[derive(Parser)]
#[command(name = "manzili", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Write one report from a JSON object of form answers.
    Generate {
        /// Report language: `en`, `ar`, `english` or `arabic`.
        #[arg(long, short)]
        locale: String,
        /// JSON file holding a flat field-name to value object.
        #[arg(long, short)]
        input: PathBuf,
        /// Directory to write the report to, overriding the config.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the checkbox keys of a locale's catalogue, one per line.
    Catalogue {
        /// Catalogue language.
        #[arg(long, short)]
        locale: String,
    },
    /// Run the HTTP service.
    Serve {
        /// Listen address, overriding the config.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ManziliConfig::load().context("failed to load configuration")?;

    match cli.command {
        Command::Generate {
            locale,
            input,
            output_dir,
        } => handle_generate(config, &locale, &input, output_dir).await,
        Command::Catalogue { locale } => handle_catalogue(&config, &locale),
        Command::Serve { bind } => handle_serve(config, bind).await,
    }
}

/// Generate a single report and print its path.
async fn handle_generate(
    mut config: ManziliConfig,
    locale: &str,
    input: &Path,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    manzili::logging::init_cli(&config.logging.level);
    if let Some(dir) = output_dir {
        config.reports.output_dir = dir;
    }

    let locale = Locale::parse(locale)?;
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let fields: BTreeMap<String, String> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a flat JSON object of strings", input.display()))?;

    let credentials = load_with_env(Path::new(".env")).context("failed to load credentials")?;
    let service = ReportService::from_config(&config, &credentials)?;
    let report = service
        .generate(locale, &AuditRecord::from_map(fields))
        .await?;

    println!("{}", report.path.display());
    Ok(())
}

/// Print catalogue keys in definition order.
fn handle_catalogue(config: &ManziliConfig, locale: &str) -> anyhow::Result<()> {
    manzili::logging::init_cli(&config.logging.level);
    let locale = Locale::parse(locale)?;
    let catalogues = Catalogues::load(config.reports.catalogue_dir.as_deref())?;
    for key in catalogues.get(locale).keys() {
        println!("{key}");
    }
    Ok(())
}

/// Run the HTTP service until Ctrl+C.
async fn handle_serve(mut config: ManziliConfig, bind: Option<String>) -> anyhow::Result<()> {
    let _logging_guard =
        manzili::logging::init_production(&config.server.logs_dir, &config.logging.level)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    let credentials = load_with_env(Path::new(".env")).context("failed to load credentials")?;
    let service = ReportService::from_config(&config, &credentials)
        .context("failed to initialise report service")?;
    info!(
        model = service.advisor().model_id().unwrap_or("none"),
        "manzili starting"
    );

    manzili::server::serve(service, &config.server.bind).await?;
    Ok(())
}
