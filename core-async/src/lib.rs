//! Runtime abstraction layer for the Tune SDK core.
//!
//! Domain crates (`core-ads`, `core-runtime`, ...) spawn tasks, take locks and
//! sleep through this crate instead of reaching for Tokio directly, so the
//! executor can be swapped in a single place when a host embeds the SDK in a
//! different runtime.
//!
//! # Modules
//!
//! - `task`: Task spawning and execution
//! - `time`: Time-related operations (sleep, timeout, instant)
//! - `sync`: Synchronization primitives (Mutex, channels, cancellation)
//! - `runtime`: Runtime handles and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
