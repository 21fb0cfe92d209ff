use std::sync::Arc;

use crate::ListItem;
use crate::edit::{Edit, Transaction};
use crate::list::Inner;

/// Fluent builder for one transaction.
///
/// Every edit method returns the editor so calls chain into a final
/// [`Editor::commit`]. Committing hands the accumulated edits to the list and
/// leaves the editor empty, ready for the next batch.
///
/// ```ignore
/// list.edit().remove(stale).add_all(fresh).commit();
/// ```
pub struct Editor<T: ListItem> {
	edits: Vec<Edit<T>>,
	inner: Arc<Inner<T>>,
}

impl<T: ListItem> std::fmt::Debug for Editor<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Editor").field("edits", &self.edits.len()).finish_non_exhaustive()
	}
}

impl<T: ListItem> Editor<T> {
	pub(crate) fn new(inner: Arc<Inner<T>>) -> Self {
		Self { edits: Vec::new(), inner }
	}

	/// Adds `item`, or updates the entry sharing its identity.
	pub fn add(&mut self, item: T) -> &mut Self {
		self.edits.push(Edit::Add(item));
		self
	}

	/// Adds every item.
	pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) -> &mut Self {
		self.edits.push(Edit::AddAll(items.into_iter().collect()));
		self
	}

	/// Removes the entry sharing `item`'s identity.
	pub fn remove(&mut self, item: T) -> &mut Self {
		self.edits.push(Edit::Remove(item));
		self
	}

	/// Removes every entry sharing an identity with one of `items`.
	pub fn remove_all(&mut self, items: impl IntoIterator<Item = T>) -> &mut Self {
		self.edits.push(Edit::RemoveAll(items.into_iter().collect()));
		self
	}

	/// Makes the list hold exactly `items`, matched by identity.
	pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) -> &mut Self {
		self.edits.push(Edit::ReplaceAll(items.into_iter().collect()));
		self
	}

	/// Removes everything.
	pub fn clear(&mut self) -> &mut Self {
		self.edits.push(Edit::Clear);
		self
	}

	/// Returns the number of uncommitted edits.
	pub fn len(&self) -> usize {
		self.edits.len()
	}

	/// Returns true if nothing is pending.
	pub fn is_empty(&self) -> bool {
		self.edits.is_empty()
	}

	/// Drops uncommitted edits.
	pub fn discard(&mut self) -> &mut Self {
		self.edits.clear();
		self
	}

	/// Enqueues the pending edits as one transaction.
	///
	/// Never waits for the worker. The outcome is observed only through the
	/// list's [`ChangeListener`](crate::ChangeListener). An empty commit still
	/// produces an (empty) change-set.
	pub fn commit(&mut self) {
		let edits = std::mem::take(&mut self.edits);
		self.inner.submit(Transaction::new(edits));
	}
}
