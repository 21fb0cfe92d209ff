//! Shared fixtures for sorted-list integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use sorta_list::{Advance, ChangeListener, ListConfig, SortedList, TaskQueue, TaskQueueRunner};
use sorta_primitives::{ChangeSet, ChangeSink, Comparator, Entry};

/// Contact row: identity is `id`, order is `(rank, id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
	pub id: u32,
	pub rank: u32,
	pub name: &'static str,
}

pub fn contact(id: u32, rank: u32, name: &'static str) -> Contact {
	Contact { id, rank, name }
}

impl Entry for Contact {
	fn same_identity(&self, other: &Self) -> bool {
		self.id == other.id
	}

	fn same_content(&self, other: &Self) -> bool {
		self.rank == other.rank && self.name == other.name
	}
}

pub fn by_rank() -> Comparator<Contact> {
	Arc::new(|a: &Contact, b: &Contact| a.rank.cmp(&b.rank).then(a.id.cmp(&b.id)))
}

/// Blocks comparator calls while closed so a test can hold the worker
/// mid-batch.
#[derive(Default)]
pub struct Gate {
	closed: Mutex<bool>,
	cv: Condvar,
	entered: AtomicBool,
}

impl Gate {
	pub fn close(&self) {
		self.entered.store(false, AtomicOrdering::SeqCst);
		*self.closed.lock() = true;
	}

	pub fn open(&self) {
		*self.closed.lock() = false;
		self.cv.notify_all();
	}

	/// Called from the comparator.
	pub fn pass(&self) {
		let mut closed = self.closed.lock();
		if *closed {
			self.entered.store(true, AtomicOrdering::SeqCst);
			self.cv.notify_all();
		}
		while *closed {
			self.cv.wait(&mut closed);
		}
	}

	/// Waits until the worker is parked on the gate.
	pub fn wait_entered(&self) {
		let mut closed = self.closed.lock();
		while !self.entered.load(AtomicOrdering::SeqCst) {
			let timed_out = self.cv.wait_for(&mut closed, Duration::from_secs(5)).timed_out();
			assert!(!timed_out, "worker never reached the gate");
		}
	}
}

/// [`by_rank`] guarded by `gate`.
pub fn gated(gate: &Arc<Gate>) -> Comparator<Contact> {
	let gate = Arc::clone(gate);
	let cmp = by_rank();
	Arc::new(move |a: &Contact, b: &Contact| {
		gate.pass();
		cmp(a, b)
	})
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Started,
	Ready(ChangeSet),
	Finished,
}

/// What the recorder does with each [`Advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// Replay the change-set, then advance.
	Advance,
	/// Keep the capability for the test to advance later.
	Hold,
	/// Drop it unused.
	Drop,
}

/// Listener that logs every event and, in [`Mode::Advance`], checks each
/// change-set replays the shown rows onto the advanced snapshot.
pub struct Recorder {
	mode: Mode,
	events: Mutex<Vec<Event>>,
	shown: Mutex<Vec<Contact>>,
	held: Mutex<Vec<(ChangeSet, Advance<Contact>)>>,
}

impl Recorder {
	pub fn new(mode: Mode) -> Arc<Self> {
		Arc::new(Self {
			mode,
			events: Mutex::new(Vec::new()),
			shown: Mutex::new(Vec::new()),
			held: Mutex::new(Vec::new()),
		})
	}

	pub fn events(&self) -> Vec<Event> {
		self.events.lock().clone()
	}

	pub fn change_sets(&self) -> Vec<ChangeSet> {
		self.events
			.lock()
			.iter()
			.filter_map(|event| match event {
				Event::Ready(cs) => Some(cs.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn shown(&self) -> Vec<Contact> {
		self.shown.lock().clone()
	}

	/// Takes the oldest held capability.
	pub fn take_held(&self) -> (ChangeSet, Advance<Contact>) {
		self.held.lock().remove(0)
	}

	/// Checks runs never overlap and every ready sits inside a run.
	pub fn assert_well_formed(&self) {
		let mut running = false;
		for (i, event) in self.events.lock().iter().enumerate() {
			match event {
				Event::Started => {
					assert!(!running, "event {i}: started while running");
					running = true;
				}
				Event::Finished => {
					assert!(running, "event {i}: finished while idle");
					running = false;
				}
				Event::Ready(_) => assert!(running, "event {i}: ready outside a run"),
			}
		}
		assert!(!running, "last run never finished");
	}
}

impl ChangeListener<Contact> for Recorder {
	fn on_batch_started(&self) {
		self.events.lock().push(Event::Started);
	}

	fn on_batch_finished(&self) {
		self.events.lock().push(Event::Finished);
	}

	fn on_change_set_ready(&self, change_set: ChangeSet, advance: Advance<Contact>) {
		self.events.lock().push(Event::Ready(change_set.clone()));
		match self.mode {
			Mode::Advance => {
				let mut shown = self.shown.lock();
				let next = advance.advance();
				assert_replays(&shown, &change_set, next.as_slice());
				*shown = next.as_slice().to_vec();
			}
			Mode::Hold => self.held.lock().push((change_set, advance)),
			Mode::Drop => drop(advance),
		}
	}
}

#[derive(Debug, Clone)]
enum Slot {
	Old(Contact),
	Changed(u32),
	New,
}

struct Replay(Vec<Slot>);

impl ChangeSink for Replay {
	fn moved(&mut self, from: usize, to: usize) {
		let slot = self.0.remove(from);
		self.0.insert(to, slot);
	}

	fn inserted(&mut self, at: usize, count: usize) {
		self.0.splice(at..at, std::iter::repeat_n(Slot::New, count));
	}

	fn removed(&mut self, at: usize, count: usize) {
		self.0.drain(at..at + count);
	}

	fn changed(&mut self, at: usize, count: usize) {
		for slot in &mut self.0[at..at + count] {
			if let Slot::Old(old) = slot {
				*slot = Slot::Changed(old.id);
			}
		}
	}
}

/// Replays `cs` over `old` and checks the result lines up with `new`.
pub fn assert_replays(old: &[Contact], cs: &ChangeSet, new: &[Contact]) {
	let mut replay = Replay(old.iter().cloned().map(Slot::Old).collect());
	cs.apply_to(&mut replay);
	assert_eq!(replay.0.len(), new.len(), "length mismatch after {cs:?}");
	for (i, (slot, row)) in replay.0.iter().zip(new).enumerate() {
		match slot {
			Slot::Old(old) => assert_eq!(old, row, "slot {i} after {cs:?}"),
			Slot::Changed(id) => assert_eq!(*id, row.id, "slot {i} after {cs:?}"),
			Slot::New => {}
		}
	}
}

pub fn list(cmp: Comparator<Contact>, config: ListConfig, mode: Mode) -> (SortedList<Contact>, TaskQueueRunner, Arc<Recorder>) {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let (context, runner) = TaskQueue::new();
	let recorder = Recorder::new(mode);
	let list = SortedList::builder(cmp, context, Arc::clone(&recorder)).config(config).build();
	(list, runner, recorder)
}

/// Runs consumer tasks until the worker is idle and every posted task ran.
pub fn settle(list: &SortedList<Contact>, runner: &mut TaskQueueRunner) {
	loop {
		runner.run_pending();
		if !list.is_running() {
			runner.run_pending();
			return;
		}
		runner.run_next_blocking();
	}
}
