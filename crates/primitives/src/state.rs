use std::sync::Arc;

use crate::{Error, Result};

/// Immutable ordered sequence captured at one commit point.
///
/// Cloning is cheap; the items are shared.
#[derive(Debug)]
pub struct OrderedState<T> {
	items: Arc<[T]>,
}

impl<T> Clone for OrderedState<T> {
	fn clone(&self) -> Self {
		Self {
			items: Arc::clone(&self.items),
		}
	}
}

impl<T> Default for OrderedState<T> {
	fn default() -> Self {
		Self {
			items: Arc::from(Vec::new()),
		}
	}
}

impl<T> OrderedState<T> {
	/// Returns the number of items.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if the snapshot holds no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the item at `position`.
	pub fn get(&self, position: usize) -> Result<&T> {
		self.items.get(position).ok_or(Error::OutOfRange {
			position,
			len: self.items.len(),
		})
	}

	/// Iterates items in order.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	/// Returns the items as a slice.
	pub fn as_slice(&self) -> &[T] {
		&self.items
	}
}

impl<T> From<Vec<T>> for OrderedState<T> {
	fn from(items: Vec<T>) -> Self {
		Self { items: Arc::from(items) }
	}
}

impl<'a, T> IntoIterator for &'a OrderedState<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}
