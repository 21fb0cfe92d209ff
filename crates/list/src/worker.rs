use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use sorta_worker::{RunToken, panic_message};

use crate::ListItem;
use crate::edit::Transaction;
use crate::list::{Core, Inner};

enum Applied {
	Published,
	Interrupted,
}

/// One worker run: drains the transaction queue until it is empty or the
/// run is interrupted.
///
/// The run lands when the worker is dropped without having observed an empty
/// queue. That covers interruption, panics escaping a batch, and a runtime
/// that discards the worker before it ever runs.
pub(crate) struct CommitWorker<T: ListItem> {
	inner: Arc<Inner<T>>,
	token: RunToken,
	landed: bool,
}

impl<T: ListItem> Drop for CommitWorker<T> {
	fn drop(&mut self) {
		if self.landed {
			return;
		}
		let inner = &*self.inner;
		if inner.queue.land(|| inner.post_finished()) {
			tracing::debug!(
				worker = %inner.config.worker_name,
				generation = self.token.generation(),
				pending = inner.queue.len(),
				"list.worker.landed_early"
			);
		}
	}
}

impl<T: ListItem> CommitWorker<T> {
	pub(crate) fn new(inner: Arc<Inner<T>>, token: RunToken) -> Self {
		Self {
			inner,
			token,
			landed: false,
		}
	}

	pub(crate) fn run(mut self) {
		let inner = Arc::clone(&self.inner);
		let max = inner.config.batch.max_transactions();

		loop {
			if self.token.is_cancelled() {
				tracing::warn!(
					worker = %inner.config.worker_name,
					generation = self.token.generation(),
					pending = inner.queue.len(),
					"list.worker.interrupted"
				);
				return;
			}

			let Some(batch) = inner.queue.next_batch(max, || inner.post_finished()) else {
				self.landed = true;
				tracing::trace!(worker = %inner.config.worker_name, generation = self.token.generation(), "list.worker.idle");
				return;
			};

			match catch_unwind(AssertUnwindSafe(|| self.apply(batch))) {
				Ok(Applied::Published) => {}
				Ok(Applied::Interrupted) => {
					tracing::warn!(
						worker = %inner.config.worker_name,
						generation = self.token.generation(),
						pending = inner.queue.len(),
						"list.worker.batch_abandoned"
					);
					return;
				}
				Err(payload) => {
					let message = panic_message(&*payload).unwrap_or_else(|| "<non-string panic>".to_string());
					tracing::error!(
						worker = %inner.config.worker_name,
						generation = self.token.generation(),
						panic = %message,
						"list.worker.batch_panicked"
					);
				}
			}
		}
	}

	/// Applies `batch` and publishes the result, or abandons it if the run is
	/// cancelled between edits.
	fn apply(&self, batch: Vec<Transaction<T>>) -> Applied {
		let transactions = batch.len();
		let mut core = self.inner.core.lock();
		let Core { store, diff } = &mut *core;

		diff.begin_batch();
		for transaction in batch {
			for edit in transaction {
				if self.token.is_cancelled() {
					diff.abandon_batch();
					return Applied::Interrupted;
				}
				edit.apply(store, diff);
			}
		}
		diff.end_batch();

		let change_set = diff.take_change_set();
		let state = store.snapshot();
		drop(core);

		tracing::debug!(
			worker = %self.inner.config.worker_name,
			generation = self.token.generation(),
			transactions,
			operations = change_set.len(),
			len = state.len(),
			"list.batch.applied"
		);
		let delivery = self.inner.snapshots.publish(state, change_set);
		self.inner.post_delivery(delivery);
		Applied::Published
	}
}
