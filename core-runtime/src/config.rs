//! # SDK Configuration Module
//!
//! Provides configuration management for the Tune SDK core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an `SdkConfig`
//! instance that holds the advertiser identity, the ad server endpoint and the
//! host bridges the SDK talks through. It enforces fail-fast validation so a
//! misconfigured host finds out at startup instead of on the first ad request.
//!
//! ## Required Settings
//!
//! - `advertiser_id` - numeric Tune advertiser id
//! - `package_name` - bundle identifier of the host app
//! - `HttpClient` - transport (desktop default: reqwest)
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `NetworkMonitor` - reachability oracle (desktop default: TCP probe).
//!   Without one the network is assumed reachable.
//! - `EventBus` - receives `AdEvent`s
//! - `Clock` - time source for request timestamps (default: system clock)
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults for
//! `HttpClient` and `NetworkMonitor` are injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SdkConfig;
//!
//! let config = SdkConfig::builder()
//!     .advertiser_id("877")
//!     .package_name("com.example.app")
//!     .debug_mode(true)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::EventBus;
use bridge_traits::{Clock, HttpClient, NetworkMonitor, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Production ad server.
pub const DEFAULT_AD_SERVER_URL: &str = "https://aa.tuneapi.com";

/// Staging ad server, selected by [`SdkConfigBuilder::staging`].
pub const STAGING_AD_SERVER_URL: &str = "https://aa.stage.tuneapi.com";

/// Default per-request timeout handed to the transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Core configuration for the Tune SDK.
///
/// Use [`SdkConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct SdkConfig {
    /// Tune advertiser id
    pub advertiser_id: String,

    /// Bundle identifier / package name of the host app
    pub package_name: String,

    /// Base URL of the ad server, without trailing slash
    pub ad_server_url: String,

    /// SDK version reported to the server
    pub sdk_version: String,

    /// Per-request timeout; expiry surfaces as an ordinary request failure
    pub request_timeout: Duration,

    /// Ask the server for debug (test) creatives
    pub debug_mode: bool,

    /// HTTP transport
    pub http_client: Arc<dyn HttpClient>,

    /// Reachability oracle (optional)
    pub network_monitor: Option<Arc<dyn NetworkMonitor>>,

    /// Event bus for ad lifecycle events (optional)
    pub event_bus: Option<Arc<EventBus>>,

    /// Time source
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfig")
            .field("advertiser_id", &self.advertiser_id)
            .field("package_name", &self.package_name)
            .field("ad_server_url", &self.ad_server_url)
            .field("sdk_version", &self.sdk_version)
            .field("request_timeout", &self.request_timeout)
            .field("debug_mode", &self.debug_mode)
            .field("http_client", &"HttpClient { ... }")
            .field(
                "network_monitor",
                &self
                    .network_monitor
                    .as_ref()
                    .map(|_| "NetworkMonitor { ... }"),
            )
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

impl SdkConfig {
    /// Creates a new builder for constructing an `SdkConfig`.
    pub fn builder() -> SdkConfigBuilder {
        SdkConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Advertiser id is present and numeric
    /// - Package name is present
    /// - Ad server URL uses http(s)
    /// - Request timeout is within (0, 5 min]
    pub fn validate(&self) -> Result<()> {
        if self.advertiser_id.is_empty() {
            return Err(Error::Config("Advertiser id cannot be empty".to_string()));
        }

        if !self.advertiser_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Config(format!(
                "Advertiser id must be numeric, got '{}'",
                self.advertiser_id
            )));
        }

        if self.package_name.trim().is_empty() {
            return Err(Error::Config("Package name cannot be empty".to_string()));
        }

        if !(self.ad_server_url.starts_with("https://")
            || self.ad_server_url.starts_with("http://"))
        {
            return Err(Error::Config(format!(
                "Ad server URL must start with http:// or https://, got '{}'",
                self.ad_server_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Mobile: inject the platform-native adapter (NSURLSession/OkHttp)."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_network_monitor(ad_server_url: &str) -> Option<Arc<dyn NetworkMonitor>> {
    use bridge_desktop::DesktopNetworkMonitor;

    let monitor: Arc<dyn NetworkMonitor> = Arc::new(DesktopNetworkMonitor::for_url(ad_server_url));
    Some(monitor)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_network_monitor(_ad_server_url: &str) -> Option<Arc<dyn NetworkMonitor>> {
    None
}

/// Builder for constructing [`SdkConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](SdkConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct SdkConfigBuilder {
    advertiser_id: Option<String>,
    package_name: Option<String>,
    ad_server_url: Option<String>,
    sdk_version: Option<String>,
    request_timeout: Option<Duration>,
    debug_mode: bool,
    staging: bool,
    http_client: Option<Arc<dyn HttpClient>>,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    skip_network_monitor: bool,
    event_bus: Option<Arc<EventBus>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SdkConfigBuilder {
    /// Sets the Tune advertiser id (required).
    pub fn advertiser_id(mut self, id: impl Into<String>) -> Self {
        self.advertiser_id = Some(id.into());
        self
    }

    /// Sets the host app's package name (required).
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Overrides the ad server base URL.
    ///
    /// Default: [`DEFAULT_AD_SERVER_URL`], or [`STAGING_AD_SERVER_URL`] when
    /// [`staging`](Self::staging) is set.
    pub fn ad_server_url(mut self, url: impl Into<String>) -> Self {
        self.ad_server_url = Some(url.into());
        self
    }

    /// Overrides the SDK version reported to the server.
    pub fn sdk_version(mut self, version: impl Into<String>) -> Self {
        self.sdk_version = Some(version.into());
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Requests debug creatives from the ad server.
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Targets the staging ad server unless a URL was set explicitly.
    pub fn staging(mut self, enabled: bool) -> Self {
        self.staging = enabled;
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the reachability oracle.
    pub fn network_monitor(mut self, monitor: Arc<dyn NetworkMonitor>) -> Self {
        self.network_monitor = Some(monitor);
        self.skip_network_monitor = false;
        self
    }

    /// Disables reachability checks, including the desktop default.
    pub fn without_network_monitor(mut self) -> Self {
        self.network_monitor = None;
        self.skip_network_monitor = true;
        self
    }

    /// Sets the event bus that receives ad lifecycle events.
    pub fn event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Sets the time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the final `SdkConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required settings are missing (advertiser id, package name)
    /// - No `HttpClient` was provided and no desktop default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<SdkConfig> {
        let advertiser_id = self.advertiser_id.ok_or_else(|| {
            Error::Config("Advertiser id is required. Use .advertiser_id() to set it.".to_string())
        })?;

        let package_name = self.package_name.ok_or_else(|| {
            Error::Config("Package name is required. Use .package_name() to set it.".to_string())
        })?;

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let ad_server_url = self
            .ad_server_url
            .unwrap_or_else(|| {
                if self.staging {
                    STAGING_AD_SERVER_URL.to_string()
                } else {
                    DEFAULT_AD_SERVER_URL.to_string()
                }
            })
            .trim_end_matches('/')
            .to_string();

        let network_monitor = match (self.network_monitor, self.skip_network_monitor) {
            (Some(monitor), _) => Some(monitor),
            (None, true) => None,
            (None, false) => provide_default_network_monitor(&ad_server_url),
        };

        let config = SdkConfig {
            advertiser_id,
            package_name,
            ad_server_url,
            sdk_version: self
                .sdk_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            request_timeout,
            debug_mode: self.debug_mode,
            http_client,
            network_monitor,
            event_bus: self.event_bus,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        };

        config.validate()?;

        Ok(config)
    }
}
