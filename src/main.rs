use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use dexscrape::batch;
use dexscrape::cli::{Cli, Commands, RunArgs};
use dexscrape::config::AppConfig;
use dexscrape::logger::{RunLogger, VerbosityLevel};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    setup_tracing(cli.verbose)?;

    // Handle --init first (before any other processing)
    if cli.init {
        let path = AppConfig::create_default_config()
            .context("Failed to create configuration file")?;
        println!("✅ Created default configuration file at: {}", path.display());
        println!("   Edit this file to customize settings, then run dexscrape again.");
        return Ok(());
    }

    let Some(Commands::Run(args)) = cli.command else {
        Cli::command().print_help()?;
        anyhow::bail!("no command given; use `dexscrape run <input_file> [output_file]`");
    };

    let mut app_config = AppConfig::load(cli.config.as_deref()).context("Configuration error")?;
    args.apply_overrides(&mut app_config);
    app_config.validate().context("Invalid command-line override")?;

    let verbosity = VerbosityLevel::from_verbose_count(cli.verbose);
    let logger = match &cli.log_file {
        Some(log_file_path) => RunLogger::with_log_file(verbosity, log_file_path.clone()),
        None => RunLogger::new(verbosity),
    };

    let result = run_batch(&args, &app_config, logger.clone()).await;

    if logger.is_log_export_enabled() {
        match logger.export_logs() {
            Ok(()) => println!("📝 Exported {} log lines", logger.get_log_count()),
            Err(e) => eprintln!("⚠️  Failed to export logs: {}", e),
        }
    }

    result
}

async fn run_batch(args: &RunArgs, app_config: &AppConfig, logger: RunLogger) -> Result<()> {
    let output_path = args.output_path(app_config);

    println!("Pokémon Bulbapedia Scraper");
    println!("Input file: {}", args.input_file.display());
    println!("Output file: {}", output_path.display());
    println!("{}", "-".repeat(50));

    let summary = batch::run(&args.input_file, &output_path, app_config, logger.clone()).await?;

    if summary.total == 0 {
        logger.error("No entry names found in input file");
    }

    logger.print_final_summary(&summary);
    Ok(())
}

fn setup_tracing(verbose: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 | 1 => "warn",
            _ => "dexscrape=debug,warn",
        };
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init tracing subscriber: {}", e))?;

    Ok(())
}
