use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use sorta_primitives::{ChangeSet, Error, OrderedState, Result};

struct BufferState<T> {
	current: Option<(u64, OrderedState<T>)>,
	backlog: VecDeque<(u64, OrderedState<T>)>,
	next_sequence: u64,
}

/// Published snapshots waiting for the consumer, plus the one readers see.
///
/// The worker publishes into the backlog; only the consumer advancing moves
/// the oldest backlog entry into view. Reads therefore never observe a state
/// the consumer has not yet replayed.
pub struct SnapshotBuffer<T> {
	state: Mutex<BufferState<T>>,
}

impl<T> Default for SnapshotBuffer<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for SnapshotBuffer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("SnapshotBuffer")
			.field("current", &state.current.as_ref().map(|(seq, s)| (*seq, s.len())))
			.field("backlog", &state.backlog.len())
			.finish()
	}
}

impl<T> SnapshotBuffer<T> {
	/// Creates a buffer that has never been published to.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(BufferState {
				current: None,
				backlog: VecDeque::new(),
				next_sequence: 1,
			}),
		}
	}

	/// Queues `state` behind earlier publications and pairs it with the
	/// capability that will make it current.
	pub fn publish(self: &Arc<Self>, state: OrderedState<T>, change_set: ChangeSet) -> Delivery<T> {
		let mut guard = self.state.lock();
		let sequence = guard.next_sequence;
		guard.next_sequence += 1;
		guard.backlog.push_back((sequence, state));
		tracing::trace!(sequence, backlog = guard.backlog.len(), "snapshot.publish");
		drop(guard);

		Delivery {
			change_set,
			advance: Advance {
				buffer: Arc::clone(self),
				sequence,
				done: false,
			},
		}
	}

	/// Makes the oldest backlog entry current. Returns false if the backlog
	/// was empty.
	pub fn advance(&self) -> bool {
		self.pop_oldest().is_some()
	}

	fn pop_oldest(&self) -> Option<u64> {
		let mut guard = self.state.lock();
		let (sequence, state) = guard.backlog.pop_front()?;
		guard.current = Some((sequence, state));
		Some(sequence)
	}

	/// Returns the number of items in the current snapshot.
	pub fn len(&self) -> usize {
		self.state.lock().current.as_ref().map_or(0, |(_, s)| s.len())
	}

	/// Returns true if the current snapshot is absent or empty.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the current snapshot, if one was ever advanced to.
	pub fn current(&self) -> Option<OrderedState<T>> {
		self.state.lock().current.as_ref().map(|(_, s)| s.clone())
	}

	/// Returns how many published snapshots await an advance.
	pub fn backlog_len(&self) -> usize {
		self.state.lock().backlog.len()
	}
}

impl<T: Clone> SnapshotBuffer<T> {
	/// Returns the item at `position` in the current snapshot.
	pub fn get(&self, position: usize) -> Result<T> {
		let guard = self.state.lock();
		match guard.current.as_ref() {
			Some((_, state)) => state.get(position).cloned(),
			None => Err(Error::OutOfRange { position, len: 0 }),
		}
	}
}

/// One processed batch as handed to the consumer.
#[derive(Debug)]
pub struct Delivery<T> {
	/// Operations transforming the previously advanced snapshot into the
	/// snapshot behind `advance`.
	pub change_set: ChangeSet,
	/// Capability that makes the paired snapshot current.
	pub advance: Advance<T>,
}

/// Single-use capability to advance a [`SnapshotBuffer`] past one delivery.
///
/// Dropping it unused still advances, with a warning, so later deliveries
/// stay aligned with their snapshots.
#[must_use = "call `advance()` after replaying the change-set"]
pub struct Advance<T> {
	buffer: Arc<SnapshotBuffer<T>>,
	sequence: u64,
	done: bool,
}

impl<T> std::fmt::Debug for Advance<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Advance").field("sequence", &self.sequence).finish_non_exhaustive()
	}
}

impl<T> Advance<T> {
	/// Returns the publication sequence number this capability belongs to.
	pub fn sequence(&self) -> u64 {
		self.sequence
	}

	/// Makes the paired snapshot current and returns it.
	pub fn advance(mut self) -> OrderedState<T> {
		self.done = true;
		self.step();
		self.buffer.current().unwrap_or_default()
	}

	fn step(&self) {
		match self.buffer.pop_oldest() {
			Some(sequence) if sequence != self.sequence => {
				tracing::warn!(expected = self.sequence, advanced = sequence, "snapshot.advance_out_of_order");
			}
			Some(_) => {}
			None => tracing::warn!(sequence = self.sequence, "snapshot.advance_empty_backlog"),
		}
	}
}

impl<T> Drop for Advance<T> {
	fn drop(&mut self) {
		if !self.done {
			tracing::warn!(sequence = self.sequence, "snapshot.advance_dropped");
			self.step();
		}
	}
}
