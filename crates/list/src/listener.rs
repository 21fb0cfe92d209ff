use sorta_primitives::ChangeSet;

use crate::snapshot::Advance;

/// Consumer-side callbacks of a [`SortedList`](crate::SortedList).
///
/// Every method runs on the list's [`ConsumerContext`](crate::ConsumerContext),
/// in the order the worker produced the events. A run always looks like
/// `started, ready*, finished`; runs never overlap.
pub trait ChangeListener<T>: Send + Sync {
	/// The worker went from idle to running.
	fn on_batch_started(&self) {}

	/// The worker went back to idle.
	fn on_batch_finished(&self) {}

	/// One batch was applied.
	///
	/// Replay `change_set` against the displayed representation, then call
	/// [`Advance::advance`] so readers see the matching snapshot.
	fn on_change_set_ready(&self, change_set: ChangeSet, advance: Advance<T>);
}
