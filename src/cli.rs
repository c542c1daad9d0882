//! Command-line interface definitions for RowDupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Demonstration run: regenerate source.json, then write duplicates.json
//! rowdupe
//!
//! # Only generate a source collection
//! rowdupe generate --output data/source.json --rounds 10
//!
//! # Check an existing source on chosen fields
//! rowdupe check --source data/source.json --fields user,lang_id
//!
//! # Regenerate first, with reproducible balances
//! rowdupe check --regenerate --seed 42
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Generate sample user records and report rows that share key fields.
///
/// Without a subcommand, RowDupe regenerates `source.json` and writes the
/// duplicates of `(user, age, lang_id)` to `duplicates.json`.
#[derive(Debug, Parser)]
#[command(name = "rowdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print fatal errors as a JSON object on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute (defaults to the demonstration run)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for RowDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a fresh source collection
    Generate(GenerateArgs),
    /// Check a source collection for records sharing key fields
    Check(CheckArgs),
}

/// Arguments for the generate subcommand.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Destination of the source collection (default: source.json)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of times the templates are replicated (default: 5)
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Seed for reproducible balances
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Source collection to check (default: source.json)
    #[arg(short, long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Destination of the duplicate report (default: duplicates.json)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Comma-separated fields the duplicate key is built from
    ///
    /// Known fields: user, age, lang_id, row_id, balance.
    #[arg(short, long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Regenerate the source collection before checking it
    ///
    /// Warning: replaces the existing source file.
    #[arg(long)]
    pub regenerate: bool,

    /// Number of replication rounds when regenerating (default: 5)
    #[arg(long, value_name = "N", requires = "regenerate")]
    pub rounds: Option<usize>,

    /// Seed for reproducible balances when regenerating
    #[arg(long, value_name = "N", requires = "regenerate")]
    pub seed: Option<u64>,
}
