use tokio::sync::mpsc;

/// Deferred unit of work bound for the consumer context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Single-threaded execution context that runs listener callbacks.
///
/// Tasks must run in post order, one at a time, and never inline inside
/// [`ConsumerContext::post`]: the worker posts while holding its queue lock.
pub trait ConsumerContext: Send + Sync {
	/// Schedules `task` to run later on the consumer context.
	fn post(&self, task: Task);
}

/// Channel-backed [`ConsumerContext`] driven by a [`TaskQueueRunner`].
#[derive(Debug, Clone)]
pub struct TaskQueue {
	tx: mpsc::UnboundedSender<Task>,
}

impl TaskQueue {
	/// Creates a queue and the runner that drains it.
	pub fn new() -> (Self, TaskQueueRunner) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, TaskQueueRunner { rx })
	}
}

impl ConsumerContext for TaskQueue {
	fn post(&self, task: Task) {
		if self.tx.send(task).is_err() {
			tracing::trace!("task_queue.closed");
		}
	}
}

/// Receiving half of a [`TaskQueue`], owned by the consumer thread.
pub struct TaskQueueRunner {
	rx: mpsc::UnboundedReceiver<Task>,
}

impl std::fmt::Debug for TaskQueueRunner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TaskQueueRunner").field("queued", &self.rx.len()).finish()
	}
}

impl TaskQueueRunner {
	/// Runs every task already queued without waiting. Returns how many ran.
	pub fn run_pending(&mut self) -> usize {
		let mut ran = 0;
		while let Ok(task) = self.rx.try_recv() {
			task();
			ran += 1;
		}
		ran
	}

	/// Blocks until one task arrives and runs it.
	///
	/// Returns false once every [`TaskQueue`] handle is gone. Must not be
	/// called from within an async runtime.
	pub fn run_next_blocking(&mut self) -> bool {
		match self.rx.blocking_recv() {
			Some(task) => {
				task();
				true
			}
			None => false,
		}
	}

	/// Waits for one task and runs it. Returns false once every sender is gone.
	pub async fn run_next(&mut self) -> bool {
		match self.rx.recv().await {
			Some(task) => {
				task();
				true
			}
			None => false,
		}
	}

	/// Returns the number of queued tasks.
	pub fn len(&self) -> usize {
		self.rx.len()
	}

	/// Returns true if no task is queued.
	pub fn is_empty(&self) -> bool {
		self.rx.is_empty()
	}
}
