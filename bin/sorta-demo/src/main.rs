//! Sorted-list demo.
//!
//! Spawns producer threads that commit ticket edits concurrently while the
//! main task plays the consumer: it replays every change-set onto its own
//! copy of the rows and advances the list.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use clap::Parser;
use parking_lot::Mutex;
use sorta_list::{Advance, ChangeListener, ConsumerContext, ListConfig, SortedList, TaskQueue};
use sorta_primitives::{ChangeSet, ChangeSink, Entry, OrderBuilder};
use tracing::{debug, info, warn};

/// Demo command line arguments.
#[derive(Parser, Debug)]
#[command(name = "sorta-demo")]
#[command(about = "Concurrent sorted-list change-set demo")]
struct Args {
	/// Number of producer threads
	#[arg(short, long, default_value_t = 4)]
	producers: u32,

	/// Commits per producer
	#[arg(short, long, default_value_t = 25)]
	commits: u32,

	/// TOML list configuration
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
	Urgent,
	Normal,
}

#[derive(Debug, Clone)]
struct Ticket {
	id: u32,
	lane: Lane,
	priority: u32,
	revision: u32,
}

impl Entry for Ticket {
	fn same_identity(&self, other: &Self) -> bool {
		self.id == other.id
	}

	fn same_content(&self, other: &Self) -> bool {
		self.lane == other.lane && self.priority == other.priority && self.revision == other.revision
	}
}

/// Consumer-side mirror of the list, kept in sync by replaying change-sets.
#[derive(Default)]
struct Mirror {
	rows: Vec<Option<u32>>,
	changed: usize,
}

impl ChangeSink for Mirror {
	fn moved(&mut self, from: usize, to: usize) {
		let row = self.rows.remove(from);
		self.rows.insert(to, row);
	}

	fn inserted(&mut self, at: usize, count: usize) {
		self.rows.splice(at..at, std::iter::repeat_n(None, count));
	}

	fn removed(&mut self, at: usize, count: usize) {
		self.rows.drain(at..at + count);
	}

	fn changed(&mut self, _at: usize, count: usize) {
		self.changed += count;
	}
}

/// Positions where a replayed row kept an id that differs from the list.
///
/// Rows inserted by the replay carry no id yet and always match.
fn diverged_rows(rows: &[Option<u32>], state: &[Ticket]) -> Vec<usize> {
	rows.iter()
		.zip(state)
		.enumerate()
		.filter(|(_, (row, ticket))| matches!(row, Some(id) if *id != ticket.id))
		.map(|(position, _)| position)
		.collect()
}

#[derive(Default)]
struct Console {
	mirror: Mutex<Mirror>,
	batches: Mutex<usize>,
}

impl ChangeListener<Ticket> for Console {
	fn on_batch_started(&self) {
		debug!("worker started");
	}

	fn on_batch_finished(&self) {
		debug!("worker idle");
	}

	fn on_change_set_ready(&self, change_set: ChangeSet, advance: Advance<Ticket>) {
		let mut mirror = self.mirror.lock();
		change_set.apply_to(&mut *mirror);
		let state = advance.advance();
		if mirror.rows.len() != state.len() {
			warn!(mirror = mirror.rows.len(), list = state.len(), "mirror out of sync");
		}
		for position in diverged_rows(&mirror.rows, state.as_slice()) {
			warn!(position, "mirror row diverged");
		}
		mirror.rows = state.iter().map(|t| Some(t.id)).collect();
		*self.batches.lock() += 1;
		info!(operations = change_set.len(), delta = change_set.len_delta(), len = state.len(), "change-set applied");
		debug!(?change_set, "operations");
	}
}

fn producer(list: SortedList<Ticket>, index: u32, commits: u32) {
	let mut editor = list.edit();
	let base = index * 1000;
	for step in 0..commits {
		let id = base + step % 7;
		let ticket = Ticket {
			id,
			lane: if (id + step) % 5 == 0 { Lane::Urgent } else { Lane::Normal },
			priority: (id * 31 + step * 17) % 100,
			revision: step,
		};
		if step % 11 == 10 {
			editor.remove(ticket);
		} else {
			editor.add(ticket);
		}
		editor.commit();
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => ListConfig::load(path)?,
		None => ListConfig::default(),
	};
	info!(producers = args.producers, commits = args.commits, batch = ?config.batch, "starting demo");

	let lane = |t: &Ticket| t.lane;
	let cmp = OrderBuilder::new()
		.general_order(lane, [Lane::Urgent, Lane::Normal])
		.model_order(lane, Lane::Urgent, |a: &Ticket, b: &Ticket| a.priority.cmp(&b.priority).then(a.id.cmp(&b.id)))
		.model_order(lane, Lane::Normal, |a: &Ticket, b: &Ticket| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)))
		.build();

	let (context, mut runner) = TaskQueue::new();
	let console = Arc::new(Console::default());
	let list = SortedList::builder(cmp, context.clone(), Arc::clone(&console)).config(config).build();

	let handles: Vec<_> = (0..args.producers)
		.map(|index| {
			let list = list.clone();
			let commits = args.commits;
			thread::spawn(move || producer(list, index, commits))
		})
		.collect();

	let done = Arc::new(AtomicBool::new(false));
	let marker = Arc::clone(&done);
	thread::spawn(move || {
		for handle in handles {
			if handle.join().is_err() {
				warn!("producer panicked");
			}
		}
		context.post(Box::new(move || marker.store(true, Ordering::SeqCst)));
	});

	while runner.run_next().await {
		if done.load(Ordering::SeqCst) && !list.is_running() {
			runner.run_pending();
			break;
		}
	}

	let mirror = console.mirror.lock();
	info!(
		batches = *console.batches.lock(),
		rows = list.len(),
		changed = mirror.changed,
		"demo finished"
	);
	for (position, ticket) in list.snapshot().iter().enumerate().take(10) {
		info!(position, id = ticket.id, lane = ?ticket.lane, priority = ticket.priority, "row");
	}
	Ok(())
}
