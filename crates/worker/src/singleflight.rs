use std::collections::VecDeque;

use parking_lot::Mutex;

/// Outcome of [`SingleFlight::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
	/// The queue was idle; the caller must start the drainer.
	Started,
	/// A drainer is already active and will pick the item up.
	Queued,
}

struct FlightState<T> {
	queue: VecDeque<T>,
	running: bool,
}

/// Unbounded FIFO that admits at most one active drainer.
///
/// The queue and the running flag share one lock, so "push and maybe start"
/// and "observe empty and stop" are each a single decision: an item can
/// never be stranded behind a drainer that already decided to stop.
///
/// The `on_start`/`on_land` hooks run while the lock is held. They must not
/// block or touch this queue; posting a notification is what they are for,
/// and running them under the lock keeps start/land notifications from
/// overtaking each other.
pub struct SingleFlight<T> {
	state: Mutex<FlightState<T>>,
}

impl<T> Default for SingleFlight<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for SingleFlight<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("SingleFlight")
			.field("pending", &state.queue.len())
			.field("running", &state.running)
			.finish()
	}
}

impl<T> SingleFlight<T> {
	/// Creates an idle, empty queue.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(FlightState {
				queue: VecDeque::new(),
				running: false,
			}),
		}
	}

	/// Appends `item`. If idle, flips to running and calls `on_start`.
	pub fn enqueue(&self, item: T, on_start: impl FnOnce()) -> Enqueued {
		let mut state = self.state.lock();
		state.queue.push_back(item);
		if state.running {
			return Enqueued::Queued;
		}
		state.running = true;
		on_start();
		Enqueued::Started
	}

	/// Starts a drainer for items left behind by an abandoned run.
	///
	/// Returns true (after calling `on_start`) only if the queue was idle and
	/// non-empty.
	pub fn resume(&self, on_start: impl FnOnce()) -> bool {
		let mut state = self.state.lock();
		if state.running || state.queue.is_empty() {
			return false;
		}
		state.running = true;
		on_start();
		true
	}

	/// Pops up to `max` items for the active drainer.
	///
	/// When the queue is empty the drainer lands instead: the running flag is
	/// cleared, `on_land` is called, and `None` is returned.
	pub fn next_batch(&self, max: usize, on_land: impl FnOnce()) -> Option<Vec<T>> {
		let mut state = self.state.lock();
		debug_assert!(state.running, "next_batch called without an active drainer");
		if state.queue.is_empty() {
			state.running = false;
			on_land();
			return None;
		}
		let take = max.max(1).min(state.queue.len());
		Some(state.queue.drain(..take).collect())
	}

	/// Lands the active drainer regardless of queued items.
	///
	/// Returns false (without calling `on_land`) if no drainer was active.
	pub fn land(&self, on_land: impl FnOnce()) -> bool {
		let mut state = self.state.lock();
		if !state.running {
			return false;
		}
		state.running = false;
		on_land();
		true
	}

	/// Returns true while a drainer is active.
	pub fn is_running(&self) -> bool {
		self.state.lock().running
	}

	/// Returns the number of queued items.
	pub fn len(&self) -> usize {
		self.state.lock().queue.len()
	}

	/// Returns true if nothing is queued.
	pub fn is_empty(&self) -> bool {
		self.state.lock().queue.is_empty()
	}
}
