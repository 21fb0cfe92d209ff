use std::sync::Arc;

use parking_lot::Mutex;
use sorta_primitives::{Comparator, OrderedState, Result};
use sorta_store::{DiffAccumulator, OrderedStore};
use sorta_worker::{RunClock, RunToken, SingleFlight};
use tokio::runtime::Handle;

use crate::ListItem;
use crate::config::ListConfig;
use crate::context::ConsumerContext;
use crate::edit::Transaction;
use crate::editor::Editor;
use crate::listener::ChangeListener;
use crate::snapshot::{Delivery, SnapshotBuffer};
use crate::worker::CommitWorker;

/// Worker-owned mutable state. Only the active run locks it.
pub(crate) struct Core<T> {
	pub(crate) store: OrderedStore<T>,
	pub(crate) diff: DiffAccumulator,
}

pub(crate) struct Inner<T: ListItem> {
	pub(crate) config: ListConfig,
	pub(crate) queue: SingleFlight<Transaction<T>>,
	pub(crate) core: Mutex<Core<T>>,
	pub(crate) snapshots: Arc<SnapshotBuffer<T>>,
	context: Arc<dyn ConsumerContext>,
	listener: Arc<dyn ChangeListener<T>>,
	clock: RunClock,
	run: Mutex<Option<RunToken>>,
	runtime: Option<Handle>,
}

impl<T: ListItem> Inner<T> {
	pub(crate) fn submit(self: &Arc<Self>, transaction: Transaction<T>) {
		let edits = transaction.len();
		let mut started = None;
		self.queue.enqueue(transaction, || started = Some(self.begin_run()));
		match started {
			Some(token) => self.spawn_worker(token),
			None => tracing::trace!(worker = %self.config.worker_name, edits, "list.commit.queued"),
		}
	}

	pub(crate) fn resume(self: &Arc<Self>) -> bool {
		let mut started = None;
		self.queue.resume(|| started = Some(self.begin_run()));
		match started {
			Some(token) => {
				tracing::debug!(worker = %self.config.worker_name, pending = self.queue.len(), "list.resume");
				self.spawn_worker(token);
				true
			}
			None => false,
		}
	}

	/// Called under the queue lock on the idle to running flip.
	fn begin_run(&self) -> RunToken {
		let token = self.clock.next_run();
		*self.run.lock() = Some(token.clone());
		self.post_started();
		token
	}

	fn spawn_worker(self: &Arc<Self>, token: RunToken) {
		tracing::trace!(worker = %self.config.worker_name, generation = token.generation(), "list.worker.spawn");
		let worker = CommitWorker::new(Arc::clone(self), token);
		drop(sorta_worker::spawn_blocking(self.runtime.as_ref(), &self.config.worker_name, move || worker.run()));
	}

	pub(crate) fn interrupt(&self) -> bool {
		let token = self.run.lock().clone();
		let Some(token) = token else {
			return false;
		};
		if token.is_cancelled() || !self.queue.is_running() {
			return false;
		}
		token.cancel();
		tracing::debug!(worker = %self.config.worker_name, generation = token.generation(), "list.interrupt");
		true
	}

	fn post_started(&self) {
		let listener = Arc::clone(&self.listener);
		self.context.post(Box::new(move || listener.on_batch_started()));
	}

	pub(crate) fn post_finished(&self) {
		let listener = Arc::clone(&self.listener);
		self.context.post(Box::new(move || listener.on_batch_finished()));
	}

	pub(crate) fn post_delivery(&self, delivery: Delivery<T>) {
		let listener = Arc::clone(&self.listener);
		self.context
			.post(Box::new(move || listener.on_change_set_ready(delivery.change_set, delivery.advance)));
	}
}

/// Sorted list edited through [`Editor`]s from any thread.
///
/// Commits are applied on one background worker at a time; each processed
/// batch reaches the [`ChangeListener`] as a change-set plus an
/// [`Advance`](crate::Advance). Reads see the last advanced snapshot only.
///
/// Cloning yields another handle to the same list.
pub struct SortedList<T: ListItem> {
	inner: Arc<Inner<T>>,
}

impl<T: ListItem> Clone for SortedList<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T: ListItem> std::fmt::Debug for SortedList<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SortedList")
			.field("worker", &self.inner.config.worker_name)
			.field("queue", &self.inner.queue)
			.field("snapshots", &self.inner.snapshots)
			.finish_non_exhaustive()
	}
}

impl<T: ListItem> SortedList<T> {
	/// Starts building a list ordered by `cmp` that reports to `listener` on
	/// `context`.
	pub fn builder<C, L>(cmp: Comparator<T>, context: C, listener: Arc<L>) -> SortedListBuilder<T>
	where
		C: ConsumerContext + 'static,
		L: ChangeListener<T> + 'static,
	{
		SortedListBuilder {
			cmp,
			context: Arc::new(context),
			listener,
			config: ListConfig::default(),
			runtime: None,
		}
	}

	/// Returns an empty editor bound to this list.
	pub fn edit(&self) -> Editor<T> {
		Editor::new(Arc::clone(&self.inner))
	}

	/// Returns the length of the last advanced snapshot.
	pub fn len(&self) -> usize {
		self.inner.snapshots.len()
	}

	/// Returns true if the last advanced snapshot is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.snapshots.is_empty()
	}

	/// Returns the item at `position` in the last advanced snapshot.
	pub fn get(&self, position: usize) -> Result<T> {
		self.inner.snapshots.get(position)
	}

	/// Returns the last advanced snapshot.
	pub fn snapshot(&self) -> OrderedState<T> {
		self.inner.snapshots.current().unwrap_or_default()
	}

	/// Returns true while a worker run is active.
	pub fn is_running(&self) -> bool {
		self.inner.queue.is_running()
	}

	/// Returns the number of committed transactions not yet taken by a worker.
	pub fn pending(&self) -> usize {
		self.inner.queue.len()
	}

	/// Returns the number of delivered snapshots not yet advanced to.
	pub fn backlog_len(&self) -> usize {
		self.inner.snapshots.backlog_len()
	}

	/// Stops the active run before its next edit.
	///
	/// The batch in progress is abandoned without a change-set; its applied
	/// operations lead the next one. Queued transactions stay queued until the
	/// next commit or [`Self::resume`]. Returns false if nothing was running.
	pub fn interrupt(&self) -> bool {
		self.inner.interrupt()
	}

	/// Restarts the worker for transactions left queued by an interrupted run.
	///
	/// Returns true if a run was started.
	pub fn resume(&self) -> bool {
		self.inner.resume()
	}

	/// Returns the configuration the list was built with.
	pub fn config(&self) -> &ListConfig {
		&self.inner.config
	}
}

/// Builder for [`SortedList`].
pub struct SortedListBuilder<T: ListItem> {
	cmp: Comparator<T>,
	context: Arc<dyn ConsumerContext>,
	listener: Arc<dyn ChangeListener<T>>,
	config: ListConfig,
	runtime: Option<Handle>,
}

impl<T: ListItem> std::fmt::Debug for SortedListBuilder<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SortedListBuilder")
			.field("config", &self.config)
			.field("runtime", &self.runtime.is_some())
			.finish_non_exhaustive()
	}
}

impl<T: ListItem> SortedListBuilder<T> {
	/// Replaces the default configuration.
	pub fn config(mut self, config: ListConfig) -> Self {
		self.config = config;
		self
	}

	/// Runs the worker on `handle` instead of the ambient or fallback runtime.
	pub fn runtime(mut self, handle: Handle) -> Self {
		self.runtime = Some(handle);
		self
	}

	/// Builds an empty list.
	pub fn build(self) -> SortedList<T> {
		let diff = DiffAccumulator::new(self.config.coalesce_operations);
		let runtime = self.runtime.or_else(|| Handle::try_current().ok());
		SortedList {
			inner: Arc::new(Inner {
				queue: SingleFlight::new(),
				core: Mutex::new(Core {
					store: OrderedStore::new(self.cmp),
					diff,
				}),
				snapshots: Arc::new(SnapshotBuffer::new()),
				context: self.context,
				listener: self.listener,
				clock: RunClock::new(),
				run: Mutex::new(None),
				runtime,
				config: self.config,
			}),
		}
	}
}
