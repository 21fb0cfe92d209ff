use std::sync::OnceLock;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Returns the ambient tokio runtime, or a shared fallback runtime when the
/// caller is not inside one.
pub fn runtime_handle() -> Handle {
	if let Ok(handle) = Handle::try_current() {
		return handle;
	}

	static FALLBACK_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = FALLBACK_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.worker_threads(1)
			.thread_name("sorta-worker")
			.build()
			.expect("failed to build sorta-worker fallback runtime")
	});
	runtime.handle().clone()
}

/// Runs `f` on the blocking pool of `handle`, or of [`runtime_handle`] when
/// no handle is given.
pub fn spawn_blocking<F, R>(handle: Option<&Handle>, name: &str, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(worker = name, "worker.spawn_blocking");
	match handle {
		Some(handle) => handle.spawn_blocking(f),
		None => runtime_handle().spawn_blocking(f),
	}
}
