use std::cmp::Ordering;

use sorta_primitives::{ChangeSet, Comparator, Entry, Operation, OrderedState};

/// Receives every structural step an [`OrderedStore`] performs.
///
/// Positions are always relative to the store contents right before the
/// step, matching how a display layer would replay them.
pub trait StoreCallback {
	/// `count` items were inserted at `position`.
	fn on_inserted(&mut self, position: usize, count: usize);
	/// `count` items were removed starting at `position`.
	fn on_removed(&mut self, position: usize, count: usize);
	/// The item at `from` now lives at `to`.
	fn on_moved(&mut self, from: usize, to: usize);
	/// `count` items starting at `position` changed content in place.
	fn on_changed(&mut self, position: usize, count: usize);
}

/// Discards all callbacks.
impl StoreCallback for () {
	fn on_inserted(&mut self, _position: usize, _count: usize) {}
	fn on_removed(&mut self, _position: usize, _count: usize) {}
	fn on_moved(&mut self, _from: usize, _to: usize) {}
	fn on_changed(&mut self, _position: usize, _count: usize) {}
}

/// Records every callback verbatim, without coalescing.
impl StoreCallback for ChangeSet {
	fn on_inserted(&mut self, position: usize, count: usize) {
		self.push(Operation::Insert { at: position, count });
	}

	fn on_removed(&mut self, position: usize, count: usize) {
		self.push(Operation::Remove { at: position, count });
	}

	fn on_moved(&mut self, from: usize, to: usize) {
		self.push(Operation::Move { from, to });
	}

	fn on_changed(&mut self, position: usize, count: usize) {
		self.push(Operation::Change { at: position, count });
	}
}

/// Mutable sorted sequence keyed by a fixed comparator.
///
/// Items are unique by [`Entry::same_identity`]. Adding an item whose identity
/// is already present updates the existing entry instead of duplicating it:
/// a content difference becomes a change, a sort-key difference becomes a
/// move. Items with equal order keep insertion order.
///
/// Finding an item by identity binary-searches its comparator-equal run, but
/// a miss falls back to a linear `same_identity` scan, since an item whose
/// sort key changed may sit anywhere. Adding a new item therefore costs O(n)
/// identity checks on top of the O(log n) comparator search.
pub struct OrderedStore<T> {
	items: Vec<T>,
	cmp: Comparator<T>,
}

impl<T> std::fmt::Debug for OrderedStore<T>
where
	T: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OrderedStore").field("items", &self.items).finish_non_exhaustive()
	}
}

impl<T> OrderedStore<T>
where
	T: Entry + Clone,
{
	/// Creates an empty store ordered by `cmp`.
	pub fn new(cmp: Comparator<T>) -> Self {
		Self { items: Vec::new(), cmp }
	}

	/// Returns the number of items.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if the store holds no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the item at `position`.
	pub fn get(&self, position: usize) -> Option<&T> {
		self.items.get(position)
	}

	/// Iterates items in order.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	/// Returns the items as a sorted slice.
	pub fn as_slice(&self) -> &[T] {
		&self.items
	}

	/// Captures the current contents as an immutable snapshot.
	pub fn snapshot(&self) -> OrderedState<T> {
		OrderedState::from(self.items.clone())
	}

	/// Returns the position of the item sharing `item`'s identity.
	pub fn position_of(&self, item: &T) -> Option<usize> {
		position_of_identity(&self.items, item, &self.cmp)
	}

	/// Adds one item and returns its final position.
	pub fn add<C>(&mut self, item: T, cb: &mut C) -> usize
	where
		C: StoreCallback + ?Sized,
	{
		let Some(index) = self.position_of(&item) else {
			let at = self.insertion_point(&item);
			self.items.insert(at, item);
			cb.on_inserted(at, 1);
			return at;
		};

		let existing = &self.items[index];
		let content_same = existing.same_content(&item);
		if (self.cmp)(existing, &item) == Ordering::Equal {
			self.items[index] = item;
			if !content_same {
				cb.on_changed(index, 1);
			}
			return index;
		}

		let to = self.relocation_point(index, &item);
		self.items.remove(index);
		self.items.insert(to, item);
		if to != index {
			cb.on_moved(index, to);
		}
		if !content_same {
			cb.on_changed(to, 1);
		}
		to
	}

	/// Adds many items.
	///
	/// The incoming items are stably sorted first, so runs of new items land
	/// as contiguous inserts.
	pub fn add_all<C>(&mut self, items: impl IntoIterator<Item = T>, cb: &mut C)
	where
		C: StoreCallback + ?Sized,
	{
		let mut items: Vec<T> = items.into_iter().collect();
		items.sort_by(|a, b| (self.cmp)(a, b));
		for item in items {
			self.add(item, cb);
		}
	}

	/// Removes the item sharing `item`'s identity, if present.
	pub fn remove<C>(&mut self, item: &T, cb: &mut C) -> bool
	where
		C: StoreCallback + ?Sized,
	{
		let Some(index) = self.position_of(item) else {
			return false;
		};
		self.items.remove(index);
		cb.on_removed(index, 1);
		true
	}

	/// Removes every item sharing an identity with one of `items`.
	///
	/// Returns the number of items removed.
	pub fn remove_all<'a, C>(&mut self, items: impl IntoIterator<Item = &'a T>, cb: &mut C) -> usize
	where
		T: 'a,
		C: StoreCallback + ?Sized,
	{
		let mut items: Vec<&T> = items.into_iter().collect();
		items.sort_by(|a, b| (self.cmp)(*a, *b));
		let mut removed = 0;
		for item in items {
			if self.remove(item, cb) {
				removed += 1;
			}
		}
		removed
	}

	/// Removes everything.
	pub fn clear<C>(&mut self, cb: &mut C)
	where
		C: StoreCallback + ?Sized,
	{
		let len = self.items.len();
		if len > 0 {
			self.items.clear();
			cb.on_removed(0, len);
		}
	}

	/// Synchronizes the store with `items`.
	///
	/// Held items whose identity is absent from `items` are removed (from the
	/// back, so earlier positions stay valid), then `items` are added. Entries
	/// that survive are updated in place or moved rather than re-inserted, so
	/// replacing with an identical set emits nothing.
	pub fn replace_all<C>(&mut self, items: impl IntoIterator<Item = T>, cb: &mut C)
	where
		C: StoreCallback + ?Sized,
	{
		let mut incoming: Vec<T> = items.into_iter().collect();
		incoming.sort_by(|a, b| (self.cmp)(a, b));

		let before = self.items.len();
		for index in (0..self.items.len()).rev() {
			if position_of_identity(&incoming, &self.items[index], &self.cmp).is_none() {
				self.items.remove(index);
				cb.on_removed(index, 1);
			}
		}
		tracing::trace!(
			kept = self.items.len(),
			removed = before - self.items.len(),
			incoming = incoming.len(),
			"store.replace_all"
		);

		for item in incoming {
			self.add(item, cb);
		}
	}

	/// Position right after every item ordered at or before `item`.
	fn insertion_point(&self, item: &T) -> usize {
		self.items.partition_point(|x| (self.cmp)(x, item) != Ordering::Greater)
	}

	/// [`Self::insertion_point`] as if the item at `index` were already taken
	/// out. Runs the comparator without touching the store.
	fn relocation_point(&self, index: usize, item: &T) -> usize {
		let (before, rest) = self.items.split_at(index);
		let after = &rest[1..];
		let fits = |x: &T| (self.cmp)(x, item) != Ordering::Greater;
		match before.last() {
			Some(last) if !fits(last) => before.partition_point(fits),
			_ => index + after.partition_point(fits),
		}
	}
}

/// Finds the identity match for `item` in sorted `items`.
///
/// The comparator-equal run is probed first; an item whose sort key changed
/// since it was stored can sit anywhere, so a miss falls back to a scan.
fn position_of_identity<T: Entry>(items: &[T], item: &T, cmp: &Comparator<T>) -> Option<usize> {
	let lo = items.partition_point(|x| cmp(x, item) == Ordering::Less);
	let hi = lo + items[lo..].partition_point(|x| cmp(x, item) != Ordering::Greater);
	(lo..hi)
		.find(|&i| items[i].same_identity(item))
		.or_else(|| items.iter().position(|x| x.same_identity(item)))
}
