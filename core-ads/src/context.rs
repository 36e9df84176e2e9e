//! Collaborators and server settings shared by ad coordinators.

use bridge_traits::{Clock, HttpClient, NetworkMonitor};
use core_runtime::config::SdkConfig;
use core_runtime::events::EventBus;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Everything a coordinator needs besides its request.
///
/// Cheap to clone; derive one per SDK instance with
/// [`AdFetchContext::from_config`] and hand clones to every coordinator.
#[derive(Clone)]
pub struct AdFetchContext {
    pub http_client: Arc<dyn HttpClient>,
    /// `None` means the network is assumed reachable
    pub network_monitor: Option<Arc<dyn NetworkMonitor>>,
    pub event_bus: Option<Arc<EventBus>>,
    pub clock: Arc<dyn Clock>,
    pub ad_server_url: String,
    pub advertiser_id: String,
    pub package_name: String,
    pub sdk_version: String,
    pub request_timeout: Duration,
    pub debug_mode: bool,
}

impl AdFetchContext {
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            http_client: Arc::clone(&config.http_client),
            network_monitor: config.network_monitor.clone(),
            event_bus: config.event_bus.clone(),
            clock: Arc::clone(&config.clock),
            ad_server_url: config.ad_server_url.clone(),
            advertiser_id: config.advertiser_id.clone(),
            package_name: config.package_name.clone(),
            sdk_version: config.sdk_version.clone(),
            request_timeout: config.request_timeout,
            debug_mode: config.debug_mode,
        }
    }

    pub(crate) async fn is_reachable(&self) -> bool {
        match &self.network_monitor {
            Some(monitor) => monitor.is_connected().await,
            None => true,
        }
    }
}

impl From<&SdkConfig> for AdFetchContext {
    fn from(config: &SdkConfig) -> Self {
        Self::from_config(config)
    }
}

impl fmt::Debug for AdFetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdFetchContext")
            .field("ad_server_url", &self.ad_server_url)
            .field("advertiser_id", &self.advertiser_id)
            .field("package_name", &self.package_name)
            .field("sdk_version", &self.sdk_version)
            .field("request_timeout", &self.request_timeout)
            .field("debug_mode", &self.debug_mode)
            .field("has_network_monitor", &self.network_monitor.is_some())
            .field("event_bus", &self.event_bus)
            .finish()
    }
}
