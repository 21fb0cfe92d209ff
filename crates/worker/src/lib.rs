//! Worker primitives for the sorted-list commit pipeline.
//!
//! * [`SingleFlight`]: FIFO queue that admits at most one active drainer
//! * [`RunClock`] / [`RunToken`]: per-run cancellation scoped by generation
//! * [`spawn_blocking`]: runs a drainer on the blocking pool of the ambient
//!   (or a lazily built fallback) tokio runtime

mod singleflight;
mod spawn;
mod token;

use std::any::Any;

pub use singleflight::{Enqueued, SingleFlight};
pub use spawn::{runtime_handle, spawn_blocking};
pub use token::{RunClock, RunToken};

/// Extracts a readable message from a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return Some((*msg).to_string());
	}
	payload.downcast_ref::<String>().cloned()
}
