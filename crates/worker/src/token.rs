use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Hands out monotonically increasing run generations.
#[derive(Debug, Default, Clone)]
pub struct RunClock {
	last: Arc<AtomicU64>,
}

impl RunClock {
	/// Creates a clock whose first token is generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new run with a fresh, uncancelled token.
	pub fn next_run(&self) -> RunToken {
		let generation = self.last.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
		RunToken {
			generation,
			cancel: CancellationToken::new(),
		}
	}
}

/// Cancellation handle for one worker run.
///
/// Clones share cancellation state; cancelling any clone stops the run at
/// its next checkpoint.
#[derive(Debug, Clone)]
pub struct RunToken {
	generation: u64,
	cancel: CancellationToken,
}

impl RunToken {
	/// Returns the run's generation.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true once cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}
}
