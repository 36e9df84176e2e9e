//! Workspace facade crate.
//!
//! Host applications depend on `tune-sdk` and enable the documented features
//! instead of wiring each workspace crate individually:
//!
//! - `ads` - ad fetching (`core-ads`)
//! - `tracking` - tracking keys and event models (`core-tracking`)
//! - `desktop-shims` - reqwest/TCP-probe defaults for the host bridges

pub use bridge_traits as bridge;
pub use core_runtime as runtime;

pub use core_runtime::config::{SdkConfig, SdkConfigBuilder};
pub use core_runtime::events::{AdEvent, CoreEvent, EventBus};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[cfg(feature = "ads")]
pub use core_ads as ads;

#[cfg(feature = "ads")]
pub use core_ads::{
    download_ad, Ad, AdDownloadDelegate, AdError, AdFetchContext, AdFetchCoordinator,
    AdMetadata, AdOrientation, AdResult, AdType, CompletionHandler, FetchRequest,
};

#[cfg(feature = "tracking")]
pub use core_tracking as tracking;

#[cfg(feature = "tracking")]
pub use core_tracking::{EventItem, TrackingEvent};
