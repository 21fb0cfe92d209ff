use sorta_primitives::{ChangeSet, Operation};

use crate::StoreCallback;

/// Range operation held back so the next adjacent one can merge into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
	Insert { at: usize, count: usize },
	Remove { at: usize, count: usize },
	Change { at: usize, count: usize },
}

impl From<Pending> for Operation {
	fn from(pending: Pending) -> Self {
		match pending {
			Pending::Insert { at, count } => Operation::Insert { at, count },
			Pending::Remove { at, count } => Operation::Remove { at, count },
			Pending::Change { at, count } => Operation::Change { at, count },
		}
	}
}

/// Buffers store callbacks into one [`ChangeSet`] per batch.
///
/// Nothing is forwarded while a batch runs; the consumer only ever sees a
/// complete change-set paired with the snapshot it leads to. With coalescing
/// enabled, runs of adjacent inserts, removes, or changes collapse into a
/// single ranged operation. Moves are never merged and flush whatever range
/// is pending, so emission order is preserved.
///
/// Operations recorded by an abandoned batch stay buffered and lead the next
/// change-set: the store is not rolled back, so the consumer still has to see
/// them.
#[derive(Debug)]
pub struct DiffAccumulator {
	coalesce: bool,
	in_batch: bool,
	pending: Option<Pending>,
	recorded: ChangeSet,
}

impl Default for DiffAccumulator {
	fn default() -> Self {
		Self::new(true)
	}
}

impl DiffAccumulator {
	/// Creates an accumulator; `coalesce` enables range merging.
	pub fn new(coalesce: bool) -> Self {
		Self {
			coalesce,
			in_batch: false,
			pending: None,
			recorded: ChangeSet::new(),
		}
	}

	/// Returns true if nothing has been recorded since the last take.
	pub fn is_empty(&self) -> bool {
		self.pending.is_none() && self.recorded.is_empty()
	}

	/// Opens a batched-update bracket.
	///
	/// A bracket left open by a run that unwound is treated like an abandoned
	/// one: its operations carry into this batch.
	pub fn begin_batch(&mut self) {
		if self.in_batch {
			self.flush();
		}
		self.in_batch = true;
	}

	/// Closes the bracket and flushes any pending range.
	pub fn end_batch(&mut self) {
		self.flush();
		self.in_batch = false;
	}

	/// Closes the bracket of a batch that will not be delivered.
	///
	/// Recorded operations are retained for the next [`Self::take_change_set`].
	pub fn abandon_batch(&mut self) {
		self.flush();
		self.in_batch = false;
		tracing::debug!(carried = self.recorded.len(), "diff.abandon_batch");
	}

	/// Returns everything recorded so far and resets the accumulator.
	pub fn take_change_set(&mut self) -> ChangeSet {
		self.flush();
		std::mem::take(&mut self.recorded)
	}

	fn flush(&mut self) {
		if let Some(pending) = self.pending.take() {
			self.recorded.push(pending.into());
		}
	}

	fn record(&mut self, next: Pending) {
		if !self.coalesce {
			self.recorded.push(next.into());
			return;
		}

		let merged = match (self.pending, next) {
			(Some(Pending::Insert { at, count }), Pending::Insert { at: pos, count: n }) if pos >= at && pos <= at + count => {
				Some(Pending::Insert { at, count: count + n })
			}
			(Some(Pending::Remove { at, count }), Pending::Remove { at: pos, count: n }) if at >= pos && at <= pos + n => {
				Some(Pending::Remove { at: pos, count: count + n })
			}
			(Some(Pending::Change { at, count }), Pending::Change { at: pos, count: n }) if pos <= at + count && pos + n >= at => {
				let start = at.min(pos);
				let end = (at + count).max(pos + n);
				Some(Pending::Change {
					at: start,
					count: end - start,
				})
			}
			_ => None,
		};

		match merged {
			Some(merged) => self.pending = Some(merged),
			None => {
				self.flush();
				self.pending = Some(next);
			}
		}
	}
}

impl StoreCallback for DiffAccumulator {
	fn on_inserted(&mut self, position: usize, count: usize) {
		self.record(Pending::Insert { at: position, count });
	}

	fn on_removed(&mut self, position: usize, count: usize) {
		self.record(Pending::Remove { at: position, count });
	}

	fn on_moved(&mut self, from: usize, to: usize) {
		self.flush();
		self.recorded.push(Operation::Move { from, to });
	}

	fn on_changed(&mut self, position: usize, count: usize) {
		self.record(Pending::Change { at: position, count });
	}
}
