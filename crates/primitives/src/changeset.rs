/// A single structural operation in a [`ChangeSet`].
///
/// Positions refer to the sequence as it looks after every earlier operation
/// of the same change-set has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	/// The item at `from` is taken out and reinserted so that it ends up at `to`.
	Move { from: usize, to: usize },
	/// `count` new items appear starting at `at`.
	Insert { at: usize, count: usize },
	/// `count` items starting at `at` disappear.
	Remove { at: usize, count: usize },
	/// `count` items starting at `at` kept their identity but changed content.
	Change { at: usize, count: usize },
}

impl Operation {
	/// Returns the net effect of this operation on the sequence length.
	pub fn len_delta(&self) -> isize {
		match *self {
			Self::Insert { count, .. } => count as isize,
			Self::Remove { count, .. } => -(count as isize),
			Self::Move { .. } | Self::Change { .. } => 0,
		}
	}
}

/// Receiver for the operations of a [`ChangeSet`].
///
/// Display layers implement this to replay a change-set against their own
/// representation, one callback per operation in emission order.
pub trait ChangeSink {
	/// Called for [`Operation::Move`].
	fn moved(&mut self, from: usize, to: usize);
	/// Called for [`Operation::Insert`].
	fn inserted(&mut self, at: usize, count: usize);
	/// Called for [`Operation::Remove`].
	fn removed(&mut self, at: usize, count: usize);
	/// Called for [`Operation::Change`].
	fn changed(&mut self, at: usize, count: usize);
}

/// Ordered list of structural operations transforming one published snapshot
/// into the next.
///
/// A change-set is produced once per processed batch and is meant to be
/// consumed exactly once, paired with the snapshot it leads to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	operations: Vec<Operation>,
}

impl ChangeSet {
	/// Creates an empty change-set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of operations.
	pub fn len(&self) -> usize {
		self.operations.len()
	}

	/// Returns true if the batch changed nothing visible.
	pub fn is_empty(&self) -> bool {
		self.operations.is_empty()
	}

	/// Returns all operations in emission order.
	pub fn operations(&self) -> &[Operation] {
		&self.operations
	}

	/// Iterates operations in emission order.
	pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
		self.operations.iter()
	}

	/// Returns the net change in length across the whole change-set.
	pub fn len_delta(&self) -> isize {
		self.operations.iter().map(Operation::len_delta).sum()
	}

	/// Appends one operation. Zero-count ranges and no-op moves are dropped.
	pub fn push(&mut self, op: Operation) {
		let empty = match op {
			Operation::Move { from, to } => from == to,
			Operation::Insert { count, .. } | Operation::Remove { count, .. } | Operation::Change { count, .. } => count == 0,
		};
		if !empty {
			self.operations.push(op);
		}
	}

	/// Appends every operation of `other` after the operations of `self`.
	pub fn extend(&mut self, other: ChangeSet) {
		self.operations.extend(other.operations);
	}

	/// Replays every operation into `sink` in emission order.
	pub fn apply_to<S: ChangeSink + ?Sized>(&self, sink: &mut S) {
		for op in &self.operations {
			match *op {
				Operation::Move { from, to } => sink.moved(from, to),
				Operation::Insert { at, count } => sink.inserted(at, count),
				Operation::Remove { at, count } => sink.removed(at, count),
				Operation::Change { at, count } => sink.changed(at, count),
			}
		}
	}
}

impl From<Vec<Operation>> for ChangeSet {
	fn from(operations: Vec<Operation>) -> Self {
		let mut cs = Self::new();
		for op in operations {
			cs.push(op);
		}
		cs
	}
}

impl IntoIterator for ChangeSet {
	type Item = Operation;
	type IntoIter = std::vec::IntoIter<Operation>;

	fn into_iter(self) -> Self::IntoIter {
		self.operations.into_iter()
	}
}

impl<'a> IntoIterator for &'a ChangeSet {
	type Item = &'a Operation;
	type IntoIter = std::slice::Iter<'a, Operation>;

	fn into_iter(self) -> Self::IntoIter {
		self.operations.iter()
	}
}
