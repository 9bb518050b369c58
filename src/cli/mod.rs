//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod analyze;
pub mod config;
pub mod search;
pub mod serve;
pub mod status;

use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::map::MapState;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Search places and get AI-written guides to them
#[derive(Parser)]
#[command(name = "loc-explore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Geocode a place name
    Search(search::SearchArgs),

    /// Analyze a place and list suggested spots nearby
    Analyze(analyze::AnalyzeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show configuration and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Analyze(args) => analyze::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Install the log subscriber
///
/// `RUST_LOG` overrides `default_level`. Logs go to stderr. A second call
/// keeps the subscriber already installed.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Render `state` and print it or write it to `output`
pub fn emit(state: &MapState, format: &str, output: Option<&str>) -> Result<()> {
    let formatter =
        get_formatter(format).ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    let rendered = formatter.format(state)?;

    if let Some(path) = output {
        std::fs::write(path, &rendered)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let cli = Cli::try_parse_from([
            "loc-explore", "analyze", "Toronto", "--type", "environment", "-f", "gpx",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.query.as_deref(), Some("Toronto"));
                assert_eq!(args.r#type.as_deref(), Some("environment"));
                assert_eq!(args.format, "gpx");
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_query_conflicts_with_coordinates() {
        let result = Cli::try_parse_from(["loc-explore", "analyze", "Toronto", "--lat", "1", "--lng", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("warn");
        init_logging("info");
    }

    #[test]
    fn test_emit_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.gpx");

        emit(&MapState::default(), "gpx", path.to_str()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<gpx"));
    }

    #[test]
    fn test_emit_unknown_format() {
        assert!(matches!(
            emit(&MapState::default(), "kml", None),
            Err(Error::Config(_))
        ));
    }
}
