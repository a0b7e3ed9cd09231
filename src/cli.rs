use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "dexscrape")]
#[command(about = "Fetch Pokémon entries from Bulbapedia and write one text record per entry")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Create default configuration file at ./config/dexscrape.toml
    #[arg(long, global = true)]
    pub init: bool,

    /// Verbose logging (use -v for warnings, -vv for DEBUG with request details)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export execution logs to a file (specify file path)
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    /// Path to a configuration file (defaults to ./config/dexscrape.toml, then built-in defaults)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every entry name in INPUT_FILE
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Text file with one entry name per line
    pub input_file: PathBuf,

    /// Output file (defaults to [batch].default_output from config)
    pub output_file: Option<PathBuf>,

    /// Delay between requests in milliseconds (overrides config)
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Wiki base URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(delay_ms) = self.delay_ms {
            config.batch.request_delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.http.request_timeout_secs = timeout_secs;
        }
        if let Some(base_url) = &self.base_url {
            config.http.base_url = base_url.clone();
        }
    }

    /// Output path from the command line, or the configured default
    pub fn output_path(&self, config: &AppConfig) -> PathBuf {
        self.output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.batch.default_output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn test_run_with_input_only() {
        let cli = parse(&["dexscrape", "run", "names.txt"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.input_file, PathBuf::from("names.txt"));
        assert!(args.output_file.is_none());

        let config = AppConfig::embedded().unwrap();
        assert_eq!(args.output_path(&config), PathBuf::from("processed_output.md"));
    }

    #[test]
    fn test_run_with_output_and_overrides() {
        let cli = parse(&[
            "dexscrape",
            "-vv",
            "run",
            "names.txt",
            "out.md",
            "--delay-ms",
            "0",
            "--timeout-secs",
            "3",
            "--base-url",
            "http://127.0.0.1:8080",
        ]);
        assert_eq!(cli.verbose, 2);

        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        let mut config = AppConfig::embedded().unwrap();
        args.apply_overrides(&mut config);

        assert_eq!(args.output_path(&config), PathBuf::from("out.md"));
        assert_eq!(config.batch.request_delay_ms, 0);
        assert_eq!(config.http.request_timeout_secs, 3);
        assert_eq!(config.http.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_init_without_subcommand() {
        let cli = parse(&["dexscrape", "--init"]);
        assert!(cli.init);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_requires_input_file() {
        assert!(Cli::try_parse_from(["dexscrape", "run"]).is_err());
    }
}
