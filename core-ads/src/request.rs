//! Fetch request parameters and the ad server request built from them.

use bridge_traits::{HttpMethod, HttpRequest};
use core_tracking::keys;
use serde::Serialize;
use uuid::Uuid;

use crate::context::AdFetchContext;
use crate::error::{AdError, Result};
use crate::metadata::AdMetadata;
use crate::types::{AdOrientation, AdType};

/// Path of the ad request endpoint, relative to the server base URL.
pub const AD_REQUEST_PATH: &str = "/api/v1/ads/request";

/// Value of the `sdk` query parameter.
pub const SDK_PLATFORM: &str = "rust";

/// What a coordinator fetches. Fixed until the coordinator is re-initialized.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ad_type: AdType,
    pub placement: String,
    pub orientations: AdOrientation,
    pub metadata: AdMetadata,
}

impl FetchRequest {
    pub fn new(ad_type: AdType, placement: impl Into<String>) -> Self {
        Self {
            ad_type,
            placement: placement.into(),
            orientations: AdOrientation::ALL,
            metadata: AdMetadata::default(),
        }
    }

    pub fn with_orientations(mut self, orientations: AdOrientation) -> Self {
        self.orientations = orientations;
        self
    }

    pub fn with_metadata(mut self, metadata: AdMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn has_placement(&self) -> bool {
        !self.placement.trim().is_empty()
    }
}

/// JSON body of an ad request.
#[derive(Debug, Serialize)]
pub struct AdRequestPayload {
    pub placement: String,
    #[serde(rename = "type")]
    pub ad_type: AdType,
    pub orientations: AdOrientation,
    pub metadata: AdMetadata,
    pub sdk_version: String,
    pub request_id: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// A request ready for the transport, plus what the started hook reports.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRequest {
    pub url: String,
    /// Serialized body, also the diagnostic payload of the started hook
    pub body: String,
    pub request_id: String,
    pub http: HttpRequest,
}

/// Full endpoint URL with the identity query parameters.
pub(crate) fn request_url(context: &AdFetchContext, debug: bool) -> String {
    let mut query = vec![
        (keys::ADVERTISER_ID, context.advertiser_id.as_str()),
        (keys::PACKAGE_NAME, context.package_name.as_str()),
        (keys::SDK, SDK_PLATFORM),
        (keys::VER, context.sdk_version.as_str()),
    ];
    if debug {
        query.push((keys::DEBUG, "1"));
    }

    let query = query
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}{}?{}",
        context.ad_server_url.trim_end_matches('/'),
        AD_REQUEST_PATH,
        query
    )
}

pub(crate) fn build_request(
    context: &AdFetchContext,
    request: &FetchRequest,
) -> Result<PreparedRequest> {
    let request_id = Uuid::new_v4().to_string();
    let payload = AdRequestPayload {
        placement: request.placement.clone(),
        ad_type: request.ad_type,
        orientations: request.orientations.normalized(),
        metadata: request.metadata.sanitized(),
        sdk_version: context.sdk_version.clone(),
        request_id: request_id.clone(),
        timestamp: context.clock.unix_timestamp_millis(),
    };

    let body = serde_json::to_string(&payload).map_err(|e| AdError::RequestFailed {
        status: None,
        message: format!("Failed to encode ad request: {}", e),
    })?;

    let url = request_url(context, context.debug_mode || request.metadata.debug_mode);

    let http = HttpRequest::new(HttpMethod::Post, url.clone())
        .header(keys::HTTP_CONTENT_TYPE, keys::HTTP_CONTENT_TYPE_APPLICATION_JSON)
        .header("Accept", keys::HTTP_CONTENT_TYPE_APPLICATION_JSON)
        .body(body.clone().into())
        .timeout(context.request_timeout);

    Ok(PreparedRequest {
        url,
        body,
        request_id,
        http,
    })
}
