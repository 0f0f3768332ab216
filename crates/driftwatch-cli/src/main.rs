//! driftwatch command-line interface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use driftwatch_catalog::{CatalogAdapter, MockCatalog};
use driftwatch_core::{Column, Config, ContractDocument, RunStatus, Severity};
use driftwatch_engine::{classify, compute_diff};
use driftwatch_report::ReportGenerator;
use driftwatch_runner::{DriftRunner, RunSummary};
use driftwatch_store::{FsStore, ObjectStore};

/// driftwatch - schema drift detection for data contracts
#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: driftwatch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run drift checks against the configured catalog and store
    Run {
        /// Skip rendering report artifacts
        #[arg(long)]
        no_reports: bool,
    },

    /// Diff a contract file against an actual-schema file, offline
    Diff {
        /// Path to the contract JSON document
        #[arg(short = 'C', long)]
        contract: PathBuf,

        /// Path to the actual schema JSON (column array or contract shape)
        #[arg(short, long)]
        actual: PathBuf,

        /// Write the diff JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify a single type transition
    Classify {
        /// Old type descriptor, e.g. 'decimal(12,2)'
        old: String,

        /// New type descriptor, e.g. 'decimal(10,2)'
        new: String,
    },

    /// Re-render report artifacts from an existing diff payload
    Report {
        /// Bucket holding the diff payload
        #[arg(short, long)]
        bucket: String,

        /// Key of the diff payload
        #[arg(short, long)]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Run { no_reports } => run_command(&config, no_reports).await,
        Commands::Diff {
            contract,
            actual,
            output,
        } => diff_command(&contract, &actual, output.as_deref()),
        Commands::Classify { old, new } => {
            classify_command(&old, &new);
            Ok(())
        }
        Commands::Report { bucket, key } => report_command(&config, &bucket, &key).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = PathBuf::from("driftwatch.toml");
            if default_path.exists() {
                Config::from_file(&default_path).context("failed to load driftwatch.toml")?
            } else {
                if cli.verbose {
                    eprintln!("{}", "No driftwatch.toml found, using defaults".yellow());
                }
                Config::default()
            }
        }
    };
    config.apply_env_overrides();
    tracing::debug!(
        store_root = %config.store.root.display(),
        catalog = %config.catalog.kind,
        "configuration loaded"
    );
    Ok(config)
}

async fn run_command(config: &Config, no_reports: bool) -> Result<()> {
    let store: Arc<dyn ObjectStore> = Arc::new(FsStore::new(config.store.root.clone()));
    let catalog = build_catalog(config).await?;

    let mut runner = DriftRunner::new(store.clone(), catalog);
    if config.reports.enabled && !no_reports {
        runner = runner.with_reporter(ReportGenerator::new(
            store,
            config.reports.bucket.clone(),
        ));
    }

    let summary = runner.run(config).await?;
    print_summary(&summary);

    if summary.any_breaking() {
        std::process::exit(1);
    }
    Ok(())
}

fn diff_command(
    contract_path: &std::path::Path,
    actual_path: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let contract = load_columns(contract_path)?;
    let actual = load_columns(actual_path)?;

    let result = compute_diff(&contract, &actual);
    let json = serde_json::to_string_pretty(&result)?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Diff written to {}", path.display());
        }
        None => println!("{}", json),
    }

    eprintln!(
        "{} {} (SAFE={} RISKY={} BREAKING={})",
        "overall:".bold(),
        severity_colored(result.overall_severity),
        result.counts.safe,
        result.counts.risky,
        result.counts.breaking
    );

    if result.is_breaking() {
        std::process::exit(1);
    }
    Ok(())
}

fn classify_command(old: &str, new: &str) {
    let (severity, rationale) = classify(old, new);
    println!("{} {}", severity_colored(severity), rationale);
}

async fn report_command(config: &Config, bucket: &str, key: &str) -> Result<()> {
    let store: Arc<dyn ObjectStore> = Arc::new(FsStore::new(config.store.root.clone()));
    let generator = ReportGenerator::new(store, config.reports.bucket.clone());

    let generated = generator
        .generate(bucket, key)
        .await
        .with_context(|| format!("failed to generate report for {}/{}", bucket, key))?;

    println!("{}", "Report artifacts written:".bold());
    println!("  {}", generated.markdown_key);
    println!("  {}", generated.html_key);
    println!("  {}", generated.latest_key);
    Ok(())
}

/// Parse a schema file: either a contract document or a bare column array.
fn load_columns(path: &std::path::Path) -> Result<Vec<Column>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColumnsDocument {
        Contract(ContractDocument),
        Bare(Vec<Column>),
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: ColumnsDocument = serde_json::from_str(&content)
        .with_context(|| format!("invalid schema document in {}", path.display()))?;
    Ok(match document {
        ColumnsDocument::Contract(contract) => contract.columns,
        ColumnsDocument::Bare(columns) => columns,
    })
}

async fn build_catalog(config: &Config) -> Result<Arc<dyn CatalogAdapter>> {
    match config.catalog.kind.as_str() {
        "mock" => Ok(Arc::new(MockCatalog::new())),
        "postgres" => build_postgres(config).await,
        other => anyhow::bail!(
            "Unknown catalog kind '{}' (expected 'mock' or 'postgres')",
            other
        ),
    }
}

#[cfg(feature = "postgres")]
async fn build_postgres(config: &Config) -> Result<Arc<dyn CatalogAdapter>> {
    use driftwatch_catalog::PostgresCatalog;

    let catalog = match &config.catalog.connection_string {
        Some(conn_str) => PostgresCatalog::from_connection_string(conn_str).await?,
        None => {
            let host = config
                .catalog
                .host
                .clone()
                .unwrap_or_else(|| "localhost".to_string());
            let port = config.catalog.port.unwrap_or(5432);
            let database = config
                .catalog
                .database
                .clone()
                .unwrap_or_else(|| "postgres".to_string());
            let user = config
                .catalog
                .user
                .clone()
                .unwrap_or_else(|| "postgres".to_string());
            let password = config.catalog.password.clone().unwrap_or_default();
            PostgresCatalog::connect(host, port, database, user, password).await?
        }
    };
    catalog.test_connection().await?;
    Ok(Arc::new(catalog))
}

#[cfg(not(feature = "postgres"))]
async fn build_postgres(_config: &Config) -> Result<Arc<dyn CatalogAdapter>> {
    anyhow::bail!("PostgreSQL support not compiled. Rebuild with: cargo build --features postgres")
}

fn print_summary(summary: &RunSummary) {
    println!("{}", "=".repeat(64));
    println!("{}", "Drift run summary".bold());
    println!("{}", "=".repeat(64));

    for outcome in &summary.results {
        match outcome.status {
            RunStatus::Ok => {
                let counts = outcome.counts.unwrap_or_default();
                let severity = outcome.overall_severity.unwrap_or(Severity::Safe);
                println!(
                    "{} {} {} (SAFE={} RISKY={} BREAKING={})",
                    status_colored(outcome.status),
                    outcome.table.bold(),
                    severity_colored(severity),
                    counts.safe,
                    counts.risky,
                    counts.breaking
                );
            }
            RunStatus::NoData => {
                println!(
                    "{} {} no data at the configured location, diff skipped",
                    status_colored(outcome.status),
                    outcome.table.bold()
                );
            }
            RunStatus::Error => {
                println!(
                    "{} {} {}",
                    status_colored(outcome.status),
                    outcome.table.bold(),
                    outcome.error.as_deref().unwrap_or("unknown error").red()
                );
            }
        }
        if let Some(severity) = outcome.overall_severity {
            if severity == Severity::Breaking {
                println!("       payload: {}/{}", outcome.diff.bucket, outcome.diff.key);
            }
        }
    }

    println!();
    println!("{} table(s) processed", summary.processed);
}

fn severity_colored(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Safe => severity.as_str().green(),
        Severity::Risky => severity.as_str().yellow(),
        Severity::Breaking => severity.as_str().red().bold(),
    }
}

fn status_colored(status: RunStatus) -> colored::ColoredString {
    match status {
        RunStatus::Ok => status.as_str().green(),
        RunStatus::NoData => status.as_str().yellow(),
        RunStatus::Error => status.as_str().red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
