use thiserror::Error;

/// Errors surfaced to readers of a sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
	/// A positional read was outside the visible snapshot.
	#[error("position {position} out of range for list of length {len}")]
	OutOfRange {
		/// Requested position.
		position: usize,
		/// Length of the snapshot that was read.
		len: usize,
	},
}

/// Result alias for list reads.
pub type Result<T> = std::result::Result<T, Error>;
