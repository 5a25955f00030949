//! Rebinning configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Configuration for the rebinning engine.
///
/// Accumulation is a scatter-add, so the parallel path produces the same
/// counts as the sequential one; these settings only affect throughput.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebinConfig {
    /// Whether to accumulate event chunks on the rayon pool.
    pub parallel: bool,
    /// Events per worker chunk; batches no larger than this run sequentially.
    pub chunk_size: usize,
}

impl Default for RebinConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 1024 * 1024, // 1M events per chunk
        }
    }
}

impl RebinConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to use parallel accumulation.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the chunk size for parallel accumulation.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Loads configuration from a JSON file.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// sets a zero chunk size.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid JSON or the values are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a zero chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        Ok(())
    }

    /// Whether a batch of `len` events should take the parallel path.
    #[must_use]
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel && self.chunk_size > 0 && len > self.chunk_size
    }
}
