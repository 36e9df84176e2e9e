use thiserror::Error;

/// Terminal failure of an ad fetch.
///
/// Delivered exclusively through
/// [`AdDownloadDelegate::download_failed_with_error`](crate::AdDownloadDelegate::download_failed_with_error).
/// An already-running fetch is not an error; `fetch_ad` returns `false` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdError {
    #[error("Network is not reachable")]
    NetworkUnreachable,

    #[error("Ad request failed{}: {message}", status_suffix(.status))]
    RequestFailed {
        /// HTTP status, `None` when the transport failed before a response
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid ad response: {0}")]
    InvalidResponse(String),

    #[error("Ad placement is missing")]
    MissingPlacement,
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with status {}", code))
        .unwrap_or_default()
}

impl AdError {
    /// Error domain reported to hosts alongside [`code`](Self::code).
    pub const DOMAIN: &'static str = "com.tune.ads";

    pub fn domain(&self) -> &'static str {
        Self::DOMAIN
    }

    /// Stable numeric code per error kind.
    pub fn code(&self) -> i32 {
        match self {
            AdError::NetworkUnreachable => 1,
            AdError::RequestFailed { .. } => 2,
            AdError::InvalidResponse(_) => 3,
            AdError::MissingPlacement => 4,
        }
    }

    /// HTTP status of the failed request, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdError>;
