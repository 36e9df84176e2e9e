//! Result channel between a coordinator and its consumer.

use std::fmt;
use std::sync::Mutex;

use crate::ad::Ad;
use crate::error::AdError;

/// Outcome of one fetch.
pub type AdResult = Result<Ad, AdError>;

/// Receives the outcome of each fetch a coordinator starts.
///
/// For every fetch that is started and not cancelled or reset, exactly one of
/// [`download_finished_with_ad`](Self::download_finished_with_ad) and
/// [`download_failed_with_error`](Self::download_failed_with_error) is called.
/// Callbacks run on a runtime worker thread and must not block.
pub trait AdDownloadDelegate: Send + Sync {
    fn download_finished_with_ad(&self, ad: Ad);

    fn download_failed_with_error(&self, error: AdError);

    /// Observer hook fired once per started fetch, before its terminal callback.
    ///
    /// `data` is the JSON request body.
    fn download_started_for_ad_with_url(&self, url: &str, data: &str) {
        let _ = (url, data);
    }
}

/// Adapts a closure into an [`AdDownloadDelegate`].
///
/// ```
/// use core_ads::{AdResult, CompletionHandler};
///
/// let handler = CompletionHandler::new(|result: AdResult| match result {
///     Ok(ad) => println!("loaded {}", ad.request_id),
///     Err(e) => eprintln!("failed: {}", e),
/// });
/// ```
pub struct CompletionHandler<F> {
    handler: F,
}

impl<F> CompletionHandler<F>
where
    F: Fn(AdResult) + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> AdDownloadDelegate for CompletionHandler<F>
where
    F: Fn(AdResult) + Send + Sync,
{
    fn download_finished_with_ad(&self, ad: Ad) {
        (self.handler)(Ok(ad))
    }

    fn download_failed_with_error(&self, error: AdError) {
        (self.handler)(Err(error))
    }
}

impl<F> fmt::Debug for CompletionHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionHandler { .. }")
    }
}

type OnceCallback = Box<dyn FnOnce(AdResult) + Send>;

/// Delegate for one-shot downloads; the callback runs at most once.
pub(crate) struct OnceHandler {
    handler: Mutex<Option<OnceCallback>>,
}

impl OnceHandler {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: FnOnce(AdResult) + Send + 'static,
    {
        Self {
            handler: Mutex::new(Some(Box::new(handler))),
        }
    }

    fn complete(&self, result: AdResult) {
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handler) = handler {
            handler(result);
        }
    }
}

impl AdDownloadDelegate for OnceHandler {
    fn download_finished_with_ad(&self, ad: Ad) {
        self.complete(Ok(ad))
    }

    fn download_failed_with_error(&self, error: AdError) {
        self.complete(Err(error))
    }
}
