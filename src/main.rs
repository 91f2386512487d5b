use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use surfatlas::config::Config;

mod commands;

use commands::{exit_code, scrape, ScrapeArgs};

#[derive(Parser)]
#[command(
    name = "surfatlas",
    version,
    about = "Surf spot catalog crawler with CSV and workbook export",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the catalog and export CSV files and workbooks
    Scrape(ScrapeArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "surfatlas failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scrape(args) => {
            let config = args.load_config()?;
            let format = cli
                .log_format
                .as_deref()
                .unwrap_or(&config.logging.format)
                .to_string();
            setup_tracing(&format, cli.verbose, &config)?;

            tracing::info!(
                full = args.full,
                base_url = %config.crawler.base_url,
                csv_dir = %config.output.csv_dir.display(),
                workbook_dir = %config.output.workbook_dir.display(),
                "Starting scrape command"
            );
            scrape(&args, &config).await?;
        }
    }

    tracing::info!("surfatlas completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool, config: &Config) -> Result<()> {
    let default_filter = if verbose {
        "surfatlas=debug,info".to_string()
    } else {
        format!("surfatlas={},warn", config.logging.level)
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&default_filter))?;

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
