//! # Desktop Bridge Implementations
//!
//! Default implementations of the host bridges for desktop platforms
//! (macOS, Windows, Linux), used by the `desktop-shims` feature and by
//! integration tests.
//!
//! - `HttpClient` using `reqwest`
//! - `NetworkMonitor` using a TCP reachability probe
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopNetworkMonitor, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let monitor = Arc::new(DesktopNetworkMonitor::new());
//! ```

mod http;
mod network;

pub use http::ReqwestHttpClient;
pub use network::DesktopNetworkMonitor;
