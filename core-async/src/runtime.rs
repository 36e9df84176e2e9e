//! Runtime utilities that abstract over the underlying async executor.
//!
//! Downstream crates never need to depend on Tokio directly to obtain a
//! handle or to drive a future to completion from synchronous code.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a lightweight current-thread
/// runtime.
///
/// Returns an error if the runtime could not be built.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: std::future::Future,
{
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}

/// Returns `true` when called from inside a Tokio runtime context.
pub fn in_runtime() -> bool {
    Handle::try_current().is_ok()
}
