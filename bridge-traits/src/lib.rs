//! # Host Bridge Traits
//!
//! Capabilities the SDK core needs from the host platform, expressed as
//! `Send + Sync` traits so one adapter can be shared across tasks behind an
//! `Arc`.
//!
//! | Trait | Used for | Desktop adapter |
//! |-------|----------|-----------------|
//! | [`HttpClient`] | Sending ad requests | `bridge_desktop::ReqwestHttpClient` |
//! | [`NetworkMonitor`] | Skipping requests while offline | `bridge_desktop::DesktopNetworkMonitor` |
//! | [`Clock`] | Request timestamps | [`SystemClock`] |
//! | [`LoggerSink`] | Forwarding SDK logs to OSLog/Logcat | [`ConsoleLogger`] |
//!
//! Mobile hosts implement these over NSURLSession/OkHttp and the platform
//! reachability APIs. Adapters convert platform failures into
//! [`BridgeError`] with an actionable message.
//!
//! ```ignore
//! use async_trait::async_trait;
//! use bridge_traits::{error::Result, HttpClient, HttpRequest, HttpResponse};
//!
//! struct HostHttp;
//!
//! #[async_trait]
//! impl HttpClient for HostHttp {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         forward_to_platform(request).await
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod network;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use network::{NetworkInfo, NetworkMonitor, NetworkStatus, NetworkType};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
