//! Source collection generator.
//!
//! # Overview
//!
//! The generator replicates a fixed list of [`Template`]s over a number of
//! rounds. Each emitted [`Record`] gets the next sequential `row_id`
//! (starting at 1, shared across rounds and templates) and a balance drawn
//! uniformly from a [`BalanceRange`]. Rows come out round-major, then in
//! template order, so only the balances vary between runs.
//!
//! # Example
//!
//! ```
//! use rowdupe::generator::{Generator, GeneratorConfig};
//! use rowdupe::logging::MemoryJournal;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let journal = MemoryJournal::new();
//! let generator = Generator::new(GeneratorConfig::default(), &journal);
//! let records = generator.generate_with(&mut StdRng::seed_from_u64(7));
//!
//! assert_eq!(records.len(), 15);
//! assert_eq!(records[0].row_id, 1);
//! assert_eq!(records[14].row_id, 15);
//! ```

use std::path::Path;

use rand::Rng;

use crate::error::DedupError;
use crate::logging::Journal;
use crate::record::Record;
use crate::store;

/// Default destination of the generated source collection.
pub const DEFAULT_SOURCE_FILE: &str = "source.json";

/// Default number of replication rounds.
pub const DEFAULT_ROUNDS: usize = 5;

/// The user attributes copied into every replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub user: String,
    pub age: u32,
    pub lang_id: u32,
}

impl Template {
    /// Create a template.
    #[must_use]
    pub fn new(user: impl Into<String>, age: u32, lang_id: u32) -> Self {
        Self {
            user: user.into(),
            age,
            lang_id,
        }
    }

    fn instantiate(&self, row_id: u64, balance: i64) -> Record {
        Record {
            user: self.user.clone(),
            age: self.age,
            lang_id: self.lang_id,
            row_id,
            balance,
        }
    }
}

/// The built-in templates.
#[must_use]
pub fn default_templates() -> Vec<Template> {
    vec![
        Template::new("John", 30, 10),
        Template::new("Mike", 32, 18),
        Template::new("Nick", 27, 5),
    ]
}

/// Inclusive range balances are drawn from. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRange {
    min: i64,
    max: i64,
}

impl BalanceRange {
    /// `[1000, 50000]`
    pub const DEFAULT: BalanceRange = BalanceRange {
        min: 1000,
        max: 50000,
    };

    /// Create a range, or `None` if `min > max`.
    #[must_use]
    pub fn new(min: i64, max: i64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Whether `value` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.min..=self.max)
    }
}

impl Default for BalanceRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Records replicated in every round, in order
    pub templates: Vec<Template>,
    /// Number of times the template list is replicated
    pub rounds: usize,
    /// Range balances are drawn from
    pub balance: BalanceRange,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            rounds: DEFAULT_ROUNDS,
            balance: BalanceRange::DEFAULT,
        }
    }
}

impl GeneratorConfig {
    /// Replace the template list.
    #[must_use]
    pub fn with_templates(mut self, templates: Vec<Template>) -> Self {
        self.templates = templates;
        self
    }

    /// Set the number of rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the balance range.
    #[must_use]
    pub fn with_balance(mut self, balance: BalanceRange) -> Self {
        self.balance = balance;
        self
    }

    /// Number of records a run produces, or `None` if it does not fit in
    /// a `usize`.
    #[must_use]
    pub fn record_count(&self) -> Option<usize> {
        self.rounds.checked_mul(self.templates.len())
    }
}

/// Produces and persists source collections.
pub struct Generator<'j> {
    config: GeneratorConfig,
    journal: &'j dyn Journal,
}

impl<'j> Generator<'j> {
    /// Create a generator reporting through `journal`.
    #[must_use]
    pub fn new(config: GeneratorConfig, journal: &'j dyn Journal) -> Self {
        Self { config, journal }
    }

    /// Build the collection in memory, drawing balances from `rng`.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Vec<Record> {
        let capacity = self.config.record_count().unwrap_or_default();
        let mut records = Vec::with_capacity(capacity);
        let mut row_id = 0u64;

        for _ in 0..self.config.rounds {
            for template in &self.config.templates {
                row_id += 1;
                self.journal.debug(&format!("row_id: {}", row_id));
                records.push(template.instantiate(row_id, self.config.balance.sample(rng)));
            }
        }

        records
    }

    /// Build the collection with the thread RNG and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Persistence`] if `path` cannot be written.
    pub fn generate(&self, path: &Path) -> Result<Vec<Record>, DedupError> {
        self.generate_into(path, &mut rand::rng())
    }

    /// Build the collection with `rng` and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Persistence`] if `path` cannot be written.
    pub fn generate_into<R: Rng>(
        &self,
        path: &Path,
        rng: &mut R,
    ) -> Result<Vec<Record>, DedupError> {
        let records = self.generate_with(rng);
        store::save_json(&records, path, self.journal)?;
        self.journal.info(&format!(
            "Generated {} records ({} templates x {} rounds)",
            records.len(),
            self.config.templates.len(),
            self.config.rounds
        ));
        Ok(records)
    }
}
