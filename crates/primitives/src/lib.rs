//! Core types shared by the sorted-list engine: the item contract, ordering
//! rules, immutable snapshots, and structural change-sets.

/// Structural change-set emitted for one committed batch.
pub mod changeset;
/// Item identity/content contract.
pub mod entry;
/// Error types.
pub mod error;
/// Comparator type and rule-based composition.
pub mod order;
/// Immutable ordered snapshots.
pub mod state;

pub use changeset::{ChangeSet, ChangeSink, Operation};
pub use entry::Entry;
pub use error::{Error, Result};
pub use order::{Comparator, OrderBuilder, OrderRule};
pub use state::OrderedState;
