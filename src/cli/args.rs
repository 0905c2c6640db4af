//! Command line argument parsing for the AskMe CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// AskMe - build and explain expanded full-text queries
#[derive(Parser, Debug, Clone)]
#[command(name = "askme")]
#[command(about = "Build boolean full-text queries by successive refinement")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AskmeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "ASKME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl AskmeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the formula of the built query
    Formula(BuildArgs),

    /// Print the query object sent to the search engine
    Query(QueryArgs),

    /// Print the snapshot history of the build
    History(HistoryArgs),
}

/// Arguments shared by every command: how to build the query.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// The seed term
    #[arg(short, long, value_name = "TERM")]
    pub seed: String,

    /// Edit script to replay on top of the seed (JSON array of edits)
    #[arg(long, value_name = "SCRIPT_FILE")]
    pub script: Option<PathBuf>,
}

/// Arguments for printing the query object
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Save the query object to this file instead of printing it
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for printing the history
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Saved search engine response to attach to the last snapshot
    #[arg(short, long, value_name = "RESPONSE_FILE")]
    pub response: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
