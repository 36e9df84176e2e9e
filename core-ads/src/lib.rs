//! # Core Ads
//!
//! Ad download coordination for the Tune SDK.
//!
//! An [`AdFetchCoordinator`] owns one [`FetchRequest`] (ad type, placement,
//! orientations, targeting metadata) and runs at most one download at a time
//! against the ad server. Outcomes reach the host through an
//! [`AdDownloadDelegate`] or a closure wrapped in [`CompletionHandler`].
//!
//! ## Collaborators
//!
//! Coordinators never construct their own transport. An [`AdFetchContext`]
//! derived from [`SdkConfig`](core_runtime::config::SdkConfig) carries the
//! injected `HttpClient`, the optional `NetworkMonitor`, the clock and the
//! optional event bus.
//!
//! ## One-shot downloads
//!
//! [`download_ad`] builds a throwaway coordinator, starts it and calls the
//! handler once with the outcome.

pub mod ad;
pub mod context;
pub mod coordinator;
pub mod delegate;
pub mod error;
pub mod metadata;
pub mod request;
mod response;
pub mod types;

pub use ad::Ad;
pub use context::AdFetchContext;
pub use coordinator::{download_ad, AdFetchCoordinator};
pub use delegate::{AdDownloadDelegate, AdResult, CompletionHandler};
pub use error::{AdError, Result};
pub use metadata::{AdMetadata, Gender};
pub use request::{AdRequestPayload, FetchRequest, AD_REQUEST_PATH};
pub use types::{AdOrientation, AdType};
