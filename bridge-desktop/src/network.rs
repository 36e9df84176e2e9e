//! Network Monitoring Implementation

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    network::{NetworkInfo, NetworkMonitor, NetworkStatus, NetworkType},
};
use core_async::sync::Mutex;
use core_async::time::{Duration, Instant};
use reqwest::Url;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_PROBE_ADDR: &str = "8.8.8.8:53";
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const CACHE_TTL: Duration = Duration::from_secs(5);

/// Reachability by TCP probe.
///
/// A connection to the probe address is attempted with a short timeout. The
/// answer is cached for a few seconds so that a burst of ad requests does not
/// pay for one probe each.
#[derive(Clone)]
pub struct DesktopNetworkMonitor {
    probe_addr: String,
    cache_ttl: Duration,
    cached_info: Arc<Mutex<Option<(Instant, NetworkInfo)>>>,
}

impl DesktopNetworkMonitor {
    /// Monitor probing a public DNS resolver.
    pub fn new() -> Self {
        Self::with_probe_addr(DEFAULT_PROBE_ADDR)
    }

    /// Monitor probing the host of `url`, typically the ad server, so that
    /// "reachable" means the ads endpoint itself answers.
    ///
    /// Falls back to [`new`](Self::new) when the URL has no host.
    pub fn for_url(url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) => match (parsed.host_str(), parsed.port_or_known_default()) {
                (Some(host), Some(port)) => Self::with_probe_addr(format!("{}:{}", host, port)),
                _ => Self::new(),
            },
            Err(_) => Self::new(),
        }
    }

    /// Monitor probing `addr` (`host:port`).
    pub fn with_probe_addr(addr: impl Into<String>) -> Self {
        Self {
            probe_addr: addr.into(),
            cache_ttl: CACHE_TTL,
            cached_info: Arc::new(Mutex::new(None)),
        }
    }

    /// Override how long a probe result stays valid
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    async fn check_connectivity(&self) -> NetworkStatus {
        match core_async::time::timeout(
            PROBE_TIMEOUT,
            tokio::net::TcpStream::connect(self.probe_addr.as_str()),
        )
        .await
        {
            Ok(Ok(_)) => NetworkStatus::Connected,
            Ok(Err(_)) | Err(_) => NetworkStatus::Disconnected,
        }
    }

    async fn probe(&self) -> NetworkInfo {
        let status = self.check_connectivity().await;
        debug!(status = ?status, probe = %self.probe_addr, "Network probe finished");

        if status == NetworkStatus::Connected {
            // Desktop cannot tell WiFi from Ethernet without platform APIs
            NetworkInfo::connected(NetworkType::Other)
        } else {
            NetworkInfo::disconnected()
        }
    }
}

impl Default for DesktopNetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkMonitor for DesktopNetworkMonitor {
    async fn get_network_info(&self) -> Result<NetworkInfo> {
        let mut cached = self.cached_info.lock().await;

        if let Some((at, info)) = cached.as_ref() {
            if at.elapsed() < self.cache_ttl {
                return Ok(info.clone());
            }
        }

        let info = self.probe().await;
        *cached = Some((Instant::now(), info.clone()));
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_local_listener_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let monitor = DesktopNetworkMonitor::with_probe_addr(listener.local_addr().unwrap().to_string());

        let info = monitor.get_network_info().await.unwrap();
        assert_eq!(info.status, NetworkStatus::Connected);
        assert!(monitor.is_connected().await);
    }

    #[test]
    fn test_probe_addr_from_url() {
        assert_eq!(
            DesktopNetworkMonitor::for_url("https://aa.tuneapi.com").probe_addr,
            "aa.tuneapi.com:443"
        );
        assert_eq!(
            DesktopNetworkMonitor::for_url("http://127.0.0.1:8080/api").probe_addr,
            "127.0.0.1:8080"
        );
        assert_eq!(
            DesktopNetworkMonitor::for_url("not a url").probe_addr,
            DEFAULT_PROBE_ADDR
        );
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let monitor = DesktopNetworkMonitor::with_probe_addr(addr);
        assert!(!monitor.is_connected().await);
    }

    #[tokio::test]
    async fn test_result_is_cached() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let monitor = DesktopNetworkMonitor::with_probe_addr(addr)
            .with_cache_ttl(Duration::from_secs(60));

        assert!(monitor.is_connected().await);
        drop(listener);
        // Still served from cache
        assert!(monitor.is_connected().await);
    }

    #[tokio::test]
    async fn test_zero_ttl_probes_every_time() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let monitor = DesktopNetworkMonitor::with_probe_addr(addr).with_cache_ttl(Duration::ZERO);

        assert!(monitor.is_connected().await);
        drop(listener);
        assert!(!monitor.is_connected().await);
    }
}
