//! Sorted list edited from many threads, diffed on one background worker,
//! and delivered to one consumer context in commit order.
//!
//! * [`SortedList`]: owning handle; readers call [`SortedList::len`] and
//!   [`SortedList::get`] against the last advanced snapshot
//! * [`Editor`]: fluent batch builder; [`Editor::commit`] enqueues one
//!   transaction without waiting for it
//! * [`ChangeListener`]: consumer callbacks; each change-set arrives with an
//!   [`Advance`] capability that makes its snapshot visible
//! * [`ConsumerContext`] / [`TaskQueue`]: where callbacks run
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sorta_list::{Advance, ChangeListener, SortedList, TaskQueue};
//! use sorta_primitives::{ChangeSet, Entry};
//!
//! #[derive(Clone)]
//! struct Row { id: u32, rank: u32 }
//!
//! impl Entry for Row {
//! 	fn same_identity(&self, other: &Self) -> bool { self.id == other.id }
//! 	fn same_content(&self, other: &Self) -> bool { self.rank == other.rank }
//! }
//!
//! struct Printer;
//!
//! impl ChangeListener<Row> for Printer {
//! 	fn on_change_set_ready(&self, change_set: ChangeSet, advance: Advance<Row>) {
//! 		println!("{change_set:?}");
//! 		advance.advance();
//! 	}
//! }
//!
//! let (context, mut runner) = TaskQueue::new();
//! let list = SortedList::builder(Arc::new(|a: &Row, b: &Row| a.rank.cmp(&b.rank)), context, Arc::new(Printer)).build();
//! list.edit().add(Row { id: 1, rank: 3 }).add(Row { id: 2, rank: 1 }).commit();
//! loop {
//! 	runner.run_pending();
//! 	if !list.is_running() {
//! 		runner.run_pending();
//! 		break;
//! 	}
//! 	runner.run_next_blocking();
//! }
//! ```

mod config;
mod context;
mod edit;
mod editor;
mod list;
mod listener;
mod snapshot;
mod worker;

pub use config::{BatchPolicy, ConfigError, ListConfig};
pub use context::{ConsumerContext, Task, TaskQueue, TaskQueueRunner};
pub use edit::{Edit, Transaction};
pub use editor::Editor;
pub use list::{SortedList, SortedListBuilder};
pub use listener::ChangeListener;
pub use snapshot::{Advance, Delivery, SnapshotBuffer};
use sorta_primitives::Entry;

/// Bounds every list item satisfies.
pub trait ListItem: Entry + Clone + Send + Sync + 'static {}

impl<T> ListItem for T where T: Entry + Clone + Send + Sync + 'static {}
