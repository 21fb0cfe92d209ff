/// Contract every item stored in a sorted list must satisfy.
///
/// Ordering is not part of this trait: it is supplied separately as a
/// [`Comparator`](crate::Comparator) when the list is built, so the same item
/// type can be listed under different orders.
///
/// Both predicates must be pure and total. A comparator that places two
/// identity-equal items far apart, or predicates that change their answer
/// over time, produce undefined change-sets; nothing checks this at runtime.
pub trait Entry {
	/// Returns true when `self` and `other` represent the same logical item.
	///
	/// Identity decides whether an edit becomes a move/change of an existing
	/// position or a remove plus insert.
	fn same_identity(&self, other: &Self) -> bool;

	/// Returns true when two identity-equal items carry the same payload.
	///
	/// Only consulted for identity-equal pairs. A `false` answer emits a
	/// [`Operation::Change`](crate::Operation::Change).
	fn same_content(&self, other: &Self) -> bool;
}
