//! Ad creative returned by a successful fetch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::AdType;

/// A downloaded ad creative, ready to hand to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub ad_type: AdType,
    pub placement: String,
    /// Server-side id of the request that produced this ad
    pub request_id: String,
    /// HTML markup of the creative
    pub html: String,
    /// Seconds to keep the ad on screen, when the server sets one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Interstitials: show the SDK's close button instead of one in the markup
    #[serde(default)]
    pub uses_native_close_button: bool,
    /// Background colour, e.g. `#000000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Opaque attribution references echoed back on impressions and clicks
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub refs: BTreeMap<String, Value>,
}

/// Body of a successful ad server response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdResponseBody {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uses_native_close_button: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub refs: BTreeMap<String, Value>,
}

impl Ad {
    /// Combines a server response with the request that produced it.
    ///
    /// The server's request id wins over the locally generated one.
    pub(crate) fn from_response(
        body: AdResponseBody,
        ad_type: AdType,
        placement: &str,
        local_request_id: &str,
    ) -> Self {
        Self {
            ad_type,
            placement: placement.to_string(),
            request_id: body
                .request_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| local_request_id.to_string()),
            html: body.html,
            duration: body.duration,
            uses_native_close_button: body.uses_native_close_button,
            color: body.color,
            refs: body.refs,
        }
    }
}
