//! Ordered parsing strategies for a single input file.
//!
//! Input files in the wild are not always in the expected layout, so each
//! file is handed to a chain of strategies. The first strategy that yields
//! at least one usable row wins; if none does, ingestion fails.

use crate::error::{DataLoadError, Result};
use tracing::{debug, warn};

/// One way of turning raw file bytes into typed records.
///
/// ## Design Note
/// - Strategies see raw bytes so each one picks its own text encoding
/// - Returning `Ok(vec![])` is allowed; the chain treats it as a failure
pub trait ParseStrategy<T>: Send + Sync {
    /// Returns the name of this strategy (for logging/debugging)
    fn name(&self) -> &str;

    /// Parse the whole file content into records.
    ///
    /// `file` names the input in errors.
    fn parse(&self, file: &str, content: &[u8]) -> Result<Vec<T>>;
}

/// Tries strategies in order and stops at the first success.
///
/// ## Usage
/// ```ignore
/// let movies = StrategyChain::new("movies.csv")
///     .add_strategy(PipeFlaggedCatalog)
///     .add_strategy(DelimitedCatalog::new(','))
///     .run(&bytes)?;
/// ```
pub struct StrategyChain<T> {
    file: String,
    strategies: Vec<Box<dyn ParseStrategy<T>>>,
}

impl<T> StrategyChain<T> {
    /// Create an empty chain for the named file.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            strategies: Vec::new(),
        }
    }

    /// Add a strategy to the end of the chain (builder pattern).
    pub fn add_strategy(mut self, strategy: impl ParseStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Run strategies in order until one yields rows.
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - Rows from the first successful strategy (never empty)
    /// * `Err(IngestionFailed)` - Every strategy errored or produced nothing
    pub fn run(&self, content: &[u8]) -> Result<Vec<T>> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            debug!("Trying strategy '{}' on {}", strategy.name(), self.file);
            let outcome = strategy.parse(&self.file, content).and_then(|rows| {
                if rows.is_empty() {
                    Err(DataLoadError::NoUsableRows {
                        file: self.file.clone(),
                        strategy: strategy.name().to_string(),
                    })
                } else {
                    Ok(rows)
                }
            });

            match outcome {
                Ok(rows) => {
                    debug!(
                        "Strategy '{}' parsed {} rows from {}",
                        strategy.name(),
                        rows.len(),
                        self.file
                    );
                    return Ok(rows);
                }
                Err(e) => {
                    warn!("Strategy '{}' failed on {}: {}", strategy.name(), self.file, e);
                    attempts.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        Err(DataLoadError::IngestionFailed {
            file: self.file.clone(),
            attempts,
        })
    }
}
