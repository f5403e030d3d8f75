use anyhow::Result;
use clap::Parser;
use compromise_scan::{
    config::Config,
    engine::{ScanEngine, ScanOptions, ScanOutcome},
    output::{print_result, write_report, OutputFormat},
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const COMPROMISED: u8 = 1;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "compromise-scan")]
#[command(
    author,
    version,
    about = "Scan node_modules for packages from the SHA-1 HULUD compromised package list",
    after_help = "Examples:\n  compromise-scan\n  compromise-scan --scan /path/to/project\n  compromise-scan --csv custom.csv --output results.json"
)]
struct Cli {
    /// Path to CSV file with compromised packages
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Project directory whose node_modules is scanned [default: current directory]
    #[arg(long, value_name = "PATH")]
    scan: Option<PathBuf>,

    /// Output path for the JSON report (must be inside the current directory)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Console format (table, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Scan manifests one at a time
    #[arg(long)]
    no_parallel: bool,

    /// Maximum concurrent manifest reads
    #[arg(long)]
    workers: Option<usize>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init_config {
        init_config()?;
        return Ok(exit_codes::SUCCESS);
    }

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });

    let format_str = cli.format.unwrap_or_else(|| config.default_format.clone());
    let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table;

    let scan_path = match cli.scan {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let csv_path = cli.csv.unwrap_or_else(|| config.csv_path.clone());
    let output_path = cli.output.unwrap_or_else(|| config.output_path.clone());

    if is_interactive {
        println!();
        println!("Starting SHA-1 HULUD compromised package scan...");
        println!();
        println!("Scan Path: {}", scan_path.display());
        println!("CSV Path:  {}", csv_path.display());
    }

    let mut options = ScanOptions::new(&scan_path, &csv_path)
        .with_workers(cli.workers.unwrap_or_else(|| config.workers()))
        .with_progress(is_interactive && !cli.quiet && std::io::stdout().is_terminal());
    if cli.no_parallel || !config.parallel {
        options = options.sequential();
    }

    let outcome = ScanEngine::new(options).run().await?;

    if let Some(ref err) = outcome.load_error {
        eprintln!("Error loading CSV file: {}", err);
    }

    print_result(&outcome.report, format)?;

    match write_report(&outcome.report, &output_path) {
        Ok(path) => {
            if is_interactive {
                println!("Full report saved to: {}", path.display());
                println!();
            }
        }
        Err(e) => eprintln!("Error saving report: {}", e),
    }

    Ok(determine_exit_code(&outcome, config.fail_on_load_error))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_config() -> Result<()> {
    let config_path = Config::config_path();

    if config_path.exists() {
        println!("Config file already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default().save()?;
    println!("Created config file at: {}", config_path.display());
    println!();
    println!("Default configuration:");
    println!("{}", Config::generate_default_config());
    Ok(())
}

/// Determine the exit code from the scan outcome
fn determine_exit_code(outcome: &ScanOutcome, fail_on_load_error: bool) -> u8 {
    if outcome.report.is_vulnerable() {
        return exit_codes::COMPROMISED;
    }

    if outcome.load_failed() && fail_on_load_error {
        return exit_codes::ERROR;
    }

    exit_codes::SUCCESS
}
