//! CLI command definitions for the `tutorhub` binary.
//!
//! Uses clap derive macros for argument parsing. The REST API itself is
//! started with `tutorhub serve`; the other commands are maintenance tools.

pub mod migrate;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Tutoring marketplace backend.
#[derive(Parser)]
#[command(name = "tutorhub", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on. Defaults to `[server] port` from config.toml.
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to. Defaults to `[server] host` from config.toml.
        #[arg(long)]
        host: Option<String>,
    },

    /// Apply pending database migrations and exit.
    Migrate,

    /// Show version, storage location and row counts.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["tutorhub", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert!(port.is_none());
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }

        let cli =
            Cli::try_parse_from(["tutorhub", "-vv", "serve", "--port", "9000", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), .. }));
    }
}
