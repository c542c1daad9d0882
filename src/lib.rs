//! RowDupe - Record Duplicate Checker
//!
//! Generates a small collection of user records, persists it as JSON, and
//! reports the records that share a value across a chosen list of fields.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod generator;
pub mod logging;
pub mod record;
pub mod store;

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{CheckArgs, Cli, Commands, GenerateArgs};
use crate::config::{Config, ConfigOverrides};
use crate::duplicates::{Checker, DuplicateReport};
use crate::error::ExitCode;
use crate::generator::Generator;
use crate::logging::{Journal, LogJournal};

/// Initialize logging and run the command line.
///
/// # Errors
///
/// Returns an error if configuration, generation or checking fails.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    let journal = LogJournal::default();
    run(cli, &journal)
}

/// Run the command line, reporting through `journal`.
///
/// # Errors
///
/// Returns an error if configuration, generation or checking fails.
pub fn run(cli: Cli, journal: &dyn Journal) -> Result<ExitCode> {
    let config_file = cli.config.as_deref();
    match cli.command {
        None => run_demo(config_file, journal),
        Some(Commands::Generate(args)) => run_generate(config_file, args, journal),
        Some(Commands::Check(args)) => run_check(config_file, args, journal),
    }
}

fn run_demo(config_file: Option<&Path>, journal: &dyn Journal) -> Result<ExitCode> {
    let config = Config::load(config_file, &ConfigOverrides::default())?;
    journal.info(&format!(
        "Regenerating source collection: {}",
        config.source.display()
    ));
    generate_source(&config, None, journal)?;
    check_source(&config, journal)?;
    Ok(ExitCode::Success)
}

fn run_generate(
    config_file: Option<&Path>,
    args: GenerateArgs,
    journal: &dyn Journal,
) -> Result<ExitCode> {
    let overrides = ConfigOverrides {
        source: args.output,
        rounds: args.rounds,
        ..Default::default()
    };
    let config = Config::load(config_file, &overrides)?;
    generate_source(&config, args.seed, journal)?;
    Ok(ExitCode::Success)
}

fn run_check(config_file: Option<&Path>, args: CheckArgs, journal: &dyn Journal) -> Result<ExitCode> {
    let overrides = ConfigOverrides {
        source: args.source,
        report: args.output,
        unique_fields: args.fields,
        rounds: args.rounds,
    };
    let config = Config::load(config_file, &overrides)?;
    if args.regenerate {
        generate_source(&config, args.seed, journal)?;
    }
    check_source(&config, journal)?;
    Ok(ExitCode::Success)
}

fn generate_source(config: &Config, seed: Option<u64>, journal: &dyn Journal) -> Result<()> {
    let generator = Generator::new(config.generator_config()?, journal);
    let path = config.source.as_path();
    match seed {
        Some(seed) => generator.generate_into(path, &mut StdRng::seed_from_u64(seed)),
        None => generator.generate(path),
    }
    .with_context(|| format!("Failed to generate source collection: {}", path.display()))?;
    Ok(())
}

fn check_source(config: &Config, journal: &dyn Journal) -> Result<DuplicateReport> {
    Checker::new(journal)
        .check(config.unique_fields.as_slice(), &config.source, &config.report)
        .with_context(|| format!("Failed to check source: {}", config.source.display()))
}
