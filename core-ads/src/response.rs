//! Maps transport outcomes onto [`AdResult`](crate::AdResult).

use bridge_traits::{BridgeError, HttpResponse};
use serde::Deserialize;

use crate::ad::{Ad, AdResponseBody};
use crate::error::{AdError, Result};
use crate::request::FetchRequest;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub(crate) fn parse_response(
    outcome: std::result::Result<HttpResponse, BridgeError>,
    request: &FetchRequest,
    request_id: &str,
) -> Result<Ad> {
    let response = outcome.map_err(|e| AdError::RequestFailed {
        status: None,
        message: e.to_string(),
    })?;

    if !response.is_success() {
        let message = response
            .json::<ErrorBody>()
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("Ad server returned HTTP {}", response.status));
        return Err(AdError::RequestFailed {
            status: Some(response.status),
            message,
        });
    }

    if response.body.is_empty() {
        return Err(AdError::InvalidResponse("empty response body".to_string()));
    }

    let body: AdResponseBody = serde_json::from_slice(&response.body)
        .map_err(|e| AdError::InvalidResponse(format!("malformed ad payload: {}", e)))?;

    if body.html.trim().is_empty() {
        return Err(AdError::InvalidResponse(
            "ad payload has no html".to_string(),
        ));
    }

    Ok(Ad::from_response(
        body,
        request.ad_type,
        &request.placement,
        request_id,
    ))
}
