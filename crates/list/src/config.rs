//! List configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a [`ListConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is not usable.
	#[error("invalid list config: {0}")]
	Invalid(String),
}

/// How the commit worker groups queued transactions into change-sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BatchPolicy {
	/// One change-set per committed transaction.
	#[default]
	PerTransaction,
	/// Drain up to `max_transactions` queued transactions into one change-set.
	Coalesce {
		/// Upper bound on transactions per change-set.
		max_transactions: usize,
	},
}

impl BatchPolicy {
	/// Returns how many transactions one batch may take from the queue.
	pub fn max_transactions(&self) -> usize {
		match *self {
			Self::PerTransaction => 1,
			Self::Coalesce { max_transactions } => max_transactions,
		}
	}
}

/// Tunables for one [`SortedList`](crate::SortedList).
///
/// ```toml
/// worker_name = "contacts"
/// coalesce_operations = true
///
/// [batch]
/// mode = "coalesce"
/// max_transactions = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
	/// Label attached to worker log events.
	pub worker_name: String,
	/// Transaction grouping.
	pub batch: BatchPolicy,
	/// Merge adjacent inserts, removes, and changes within a batch.
	pub coalesce_operations: bool,
}

impl Default for ListConfig {
	fn default() -> Self {
		Self {
			worker_name: "sorta-commit".to_string(),
			batch: BatchPolicy::default(),
			coalesce_operations: true,
		}
	}
}

impl ListConfig {
	/// Parses and validates a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses the TOML file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), worker = %config.worker_name, batch = ?config.batch, "list.config.loaded");
		Ok(config)
	}

	/// Checks values serde cannot express constraints for.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.worker_name.trim().is_empty() {
			return Err(ConfigError::Invalid("worker_name must not be empty".to_string()));
		}
		if self.batch.max_transactions() == 0 {
			return Err(ConfigError::Invalid("batch.max_transactions must be at least 1".to_string()));
		}
		Ok(())
	}
}
