//! Reachability oracle consulted before every ad request.

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Cellular,
    WiFi,
    Ethernet,
    /// Connected, but the platform cannot tell how
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Connected,
    Disconnected,
    /// The platform could not decide; treated as not connected
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub status: NetworkStatus,
    /// `None` unless connected
    pub network_type: Option<NetworkType>,
}

impl NetworkInfo {
    pub fn connected(network_type: NetworkType) -> Self {
        Self {
            status: NetworkStatus::Connected,
            network_type: Some(network_type),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            status: NetworkStatus::Disconnected,
            network_type: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == NetworkStatus::Connected
    }
}

/// Answers "can an ad request leave the device right now".
///
/// The ad coordinator calls [`is_connected`](NetworkMonitor::is_connected)
/// once per fetch and reports `NetworkUnreachable` instead of sending when it
/// returns `false`. Hosts back it with SCNetworkReachability on iOS,
/// ConnectivityManager on Android, and a TCP probe on desktop.
///
/// ```ignore
/// use bridge_traits::network::NetworkMonitor;
///
/// async fn can_request_ads(monitor: &dyn NetworkMonitor) -> bool {
///     monitor.is_connected().await
/// }
/// ```
#[async_trait::async_trait]
pub trait NetworkMonitor: Send + Sync {
    async fn get_network_info(&self) -> Result<NetworkInfo>;

    /// An error from [`get_network_info`](NetworkMonitor::get_network_info)
    /// counts as not connected.
    async fn is_connected(&self) -> bool {
        self.get_network_info()
            .await
            .map(|info| info.is_connected())
            .unwrap_or(false)
    }
}
