use sorta_store::{OrderedStore, StoreCallback};

use crate::ListItem;

/// One edit recorded by an [`Editor`](crate::Editor).
#[derive(Debug, Clone)]
pub enum Edit<T> {
	/// Insert, or update the entry with the same identity.
	Add(T),
	/// [`Edit::Add`] for many items, landing as contiguous ranges.
	AddAll(Vec<T>),
	/// Remove the entry with the same identity, if any.
	Remove(T),
	/// [`Edit::Remove`] for many items.
	RemoveAll(Vec<T>),
	/// Sync the list to exactly these items by identity.
	ReplaceAll(Vec<T>),
	/// Remove everything.
	Clear,
}

impl<T: ListItem> Edit<T> {
	/// Applies this edit to `store`, reporting structural steps to `cb`.
	pub(crate) fn apply<C>(self, store: &mut OrderedStore<T>, cb: &mut C)
	where
		C: StoreCallback + ?Sized,
	{
		match self {
			Self::Add(item) => {
				store.add(item, cb);
			}
			Self::AddAll(items) => store.add_all(items, cb),
			Self::Remove(item) => {
				store.remove(&item, cb);
			}
			Self::RemoveAll(items) => {
				store.remove_all(&items, cb);
			}
			Self::ReplaceAll(items) => store.replace_all(items, cb),
			Self::Clear => store.clear(cb),
		}
	}
}

/// Ordered edits committed together as one unit of work.
///
/// Immutable once committed; the commit worker applies its edits in order.
#[derive(Debug, Clone)]
pub struct Transaction<T> {
	edits: Vec<Edit<T>>,
}

impl<T> Transaction<T> {
	pub(crate) fn new(edits: Vec<Edit<T>>) -> Self {
		Self { edits }
	}

	/// Returns the number of edits.
	pub fn len(&self) -> usize {
		self.edits.len()
	}

	/// Returns true if the transaction carries no edits.
	pub fn is_empty(&self) -> bool {
		self.edits.is_empty()
	}

	/// Returns the edits in commit order.
	pub fn edits(&self) -> &[Edit<T>] {
		&self.edits
	}
}

impl<T> IntoIterator for Transaction<T> {
	type Item = Edit<T>;
	type IntoIter = std::vec::IntoIter<Edit<T>>;

	fn into_iter(self) -> Self::IntoIter {
		self.edits.into_iter()
	}
}
