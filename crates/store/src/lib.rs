//! Sorted item storage and change recording.
//!
//! [`OrderedStore`] keeps items sorted under a fixed comparator and reports
//! every structural step to a [`StoreCallback`]. [`DiffAccumulator`] is the
//! callback used by commit workers: it buffers and coalesces those steps into
//! one [`ChangeSet`](sorta_primitives::ChangeSet) per batch.

mod diff;
mod store;

pub use diff::DiffAccumulator;
pub use store::{OrderedStore, StoreCallback};

#[cfg(test)]
mod test_support;
