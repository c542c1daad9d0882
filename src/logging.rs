//! Logging infrastructure for RowDupe.
//!
//! Two layers live here:
//!
//! - [`init_logging`] installs the `env_logger` backend for the binary. Log
//!   lines go to standard output.
//! - [`Journal`] is the collaborator the generator and checker report
//!   progress and failures through. [`LogJournal`] forwards to the `log`
//!   facade; [`MemoryJournal`] keeps lines in memory for tests.
//!
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! # Example
//!
//! ```rust,no_run
//! use rowdupe::logging::{init_logging, Journal, LogJournal};
//!
//! init_logging(0, false);
//!
//! let journal = LogJournal::new("rowdupe");
//! journal.info("Application started");
//! ```

use std::cell::RefCell;
use std::env;
use std::io::Write;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};

use crate::error::DedupError;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// This function should be called once at the start of the application,
/// before any logging calls are made.
///
/// # Panics
///
/// Panics if called more than once, as `env_logger` can only be
/// initialized once per process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    builder.target(Target::Stdout);

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if verbose >= 1 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                timestamp,
                level,
                record.target(),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} {}",
                timestamp,
                level,
                record.args()
            )
        }
    });

    builder.init();
    log::debug!("Logging initialized at level: {:?}", log::max_level());
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Sink for progress and error messages from the generator and checker.
pub trait Journal {
    /// Record an informational progress message.
    fn info(&self, message: &str);

    /// Record a detail message, e.g. one line per generated row.
    fn debug(&self, message: &str);

    /// Record an error diagnostic.
    fn error(&self, message: &str);

    /// Record a failure using its normalized `(Kind) message` description.
    fn failure(&self, err: &DedupError) {
        self.error(&format!("Error: {}", err.describe()));
    }
}

/// [`Journal`] backed by the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogJournal {
    target: &'static str,
}

impl LogJournal {
    /// Create a journal that logs under `target`.
    #[must_use]
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogJournal {
    fn default() -> Self {
        Self::new("rowdupe")
    }
}

impl Journal for LogJournal {
    fn info(&self, message: &str) {
        log::info!(target: self.target, "{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!(target: self.target, "{}", message);
    }

    fn error(&self, message: &str) {
        log::error!(target: self.target, "{}", message);
    }
}

/// [`Journal`] that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    lines: RefCell<Vec<(Level, String)>>,
}

impl MemoryJournal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.borrow().clone()
    }

    /// Messages recorded at `level`.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

impl Journal for MemoryJournal {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
