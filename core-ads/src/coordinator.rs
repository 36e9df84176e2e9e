//! # Ad Fetch Coordinator
//!
//! Mediates at most one outstanding ad download per coordinator and reports
//! its outcome through an [`AdDownloadDelegate`].
//!
//! ## Lifecycle
//!
//! ```text
//!            fetch_ad() == true
//!   ┌──────┐ ─────────────────> ┌──────────┐
//!   │ Idle │                    │ Fetching │
//!   └──────┘ <───────────────── └──────────┘
//!       success / failure / cancel() / reset()
//! ```
//!
//! `fetch_ad` while fetching returns `false` without touching the network.
//!
//! ## Cancellation
//!
//! The fetch task and [`cancel`](AdFetchCoordinator::cancel) race for the
//! active slot under the state lock. If `cancel` takes it first, the task
//! stays silent even when the response has already arrived. Once the task
//! holds the slot its callback is delivered and `cancel` is a no-op.
//!
//! A `cancel` from another thread can land between the task being spawned and
//! `fetch_ad` announcing it. The abort takes effect at once, but
//! `DownloadCancelled` is held back and published by `fetch_ad` right after
//! `DownloadStarted`, so subscribers always see a fetch start before it is
//! cancelled.
//!
//! ## Usage
//!
//! ```ignore
//! use core_ads::{AdFetchContext, AdFetchCoordinator, AdResult, AdType, FetchRequest};
//!
//! let context = AdFetchContext::from_config(&config);
//! let coordinator = AdFetchCoordinator::with_completion(
//!     context,
//!     FetchRequest::new(AdType::Interstitial, "home_banner"),
//!     |result: AdResult| match result {
//!         Ok(ad) => show(ad),
//!         Err(e) => tracing::warn!(error = %e, "No ad"),
//!     },
//! );
//!
//! if !coordinator.fetch_ad().await {
//!     // already fetching, offline, or no placement
//! }
//! ```

use core_async::sync::{oneshot, CancellationToken};
use core_async::task::JoinHandle;
use core_runtime::events::{AdEvent, CoreEvent};
use core_runtime::logging::truncate_for_log;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::context::AdFetchContext;
use crate::delegate::{AdDownloadDelegate, AdResult, CompletionHandler, OnceHandler};
use crate::error::AdError;
use crate::metadata::AdMetadata;
use crate::request::{build_request, FetchRequest};
use crate::response::parse_response;
use crate::types::{AdOrientation, AdType};

const LOGGED_BODY_CHARS: usize = 512;

/// The fetch currently owning the coordinator.
struct ActiveFetch {
    id: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
    /// Set once `DownloadStarted` and the started hook have gone out
    announced: bool,
}

impl ActiveFetch {
    fn abort(self) {
        self.token.cancel();
        self.handle.abort();
    }
}

struct FetchState {
    request: FetchRequest,
    /// In progress iff `Some`
    active: Option<ActiveFetch>,
    next_id: u64,
    /// Fetch cancelled before it was announced; `fetch_ad` reports it
    unannounced_cancel: Option<u64>,
}

/// State shared between the coordinator and its fetch task.
struct Shared {
    context: AdFetchContext,
    delegate: Arc<dyn AdDownloadDelegate>,
    state: Mutex<FetchState>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, FetchState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: AdEvent) {
        if let Some(bus) = &self.context.event_bus {
            bus.emit(CoreEvent::Ad(event)).ok();
        }
    }

    /// Delivers a terminal outcome. Never called with the state lock held.
    fn dispatch(&self, fetch_id: Option<u64>, placement: &str, result: AdResult) {
        match result {
            Ok(ad) => {
                info!(
                    fetch_id,
                    placement,
                    request_id = %ad.request_id,
                    "Ad download finished"
                );
                if let Some(fetch_id) = fetch_id {
                    self.emit(AdEvent::DownloadFinished {
                        fetch_id,
                        placement: placement.to_string(),
                        request_id: Some(ad.request_id.clone()),
                    });
                }
                self.delegate.download_finished_with_ad(ad);
            }
            Err(error) => {
                warn!(fetch_id, placement, code = error.code(), error = %error, "Ad download failed");
                self.emit(AdEvent::DownloadFailed {
                    fetch_id,
                    placement: placement.to_string(),
                    code: error.code(),
                    message: error.to_string(),
                });
                self.delegate.download_failed_with_error(error);
            }
        }
    }

    /// Clears the active slot, returning the fetch that held it.
    fn take_active(&self) -> Option<ActiveFetch> {
        self.lock_state().active.take()
    }

    /// Removes the active fetch if it is still `fetch_id`.
    fn claim(&self, fetch_id: u64) -> bool {
        let mut state = self.lock_state();
        match &state.active {
            Some(active) if active.id == fetch_id => {
                state.active = None;
                true
            }
            _ => false,
        }
    }

    async fn run_fetch(
        self: Arc<Self>,
        fetch_id: u64,
        token: CancellationToken,
        request: FetchRequest,
        prepared: crate::request::PreparedRequest,
        started: oneshot::Receiver<()>,
    ) {
        // The started hook precedes any terminal callback. A dropped sender
        // means fetch_ad finished without sending, which is fine to proceed on.
        let _ = started.await;

        let outcome = tokio::select! {
            biased;

            _ = token.cancelled() => {
                debug!(fetch_id, "Ad fetch cancelled before response");
                return;
            }

            outcome = self.context.http_client.execute(prepared.http) => outcome,
        };

        let result = parse_response(outcome, &request, &prepared.request_id);

        if !self.claim(fetch_id) {
            debug!(fetch_id, "Ad fetch was cancelled or reset; dropping result");
            return;
        }

        self.dispatch(Some(fetch_id), &request.placement, result);
    }
}

/// Coordinates ad downloads for one placement.
///
/// Cloning is not supported; share it behind an `Arc` if several owners need
/// to cancel. Dropping the coordinator does not cancel an in-flight fetch;
/// its outcome is still delivered to the delegate.
pub struct AdFetchCoordinator {
    shared: Arc<Shared>,
}

impl AdFetchCoordinator {
    /// Creates a coordinator. No network activity happens until
    /// [`fetch_ad`](Self::fetch_ad).
    ///
    /// An empty placement is accepted here and reported by `fetch_ad`.
    pub fn new(
        context: AdFetchContext,
        request: FetchRequest,
        delegate: Arc<dyn AdDownloadDelegate>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                context,
                delegate,
                state: Mutex::new(FetchState {
                    request,
                    active: None,
                    next_id: 0,
                    unannounced_cancel: None,
                }),
            }),
        }
    }

    /// Creates a coordinator reporting through a closure.
    pub fn with_completion<F>(context: AdFetchContext, request: FetchRequest, handler: F) -> Self
    where
        F: Fn(AdResult) + Send + Sync + 'static,
    {
        Self::new(context, request, Arc::new(CompletionHandler::new(handler)))
    }

    /// Starts a fetch.
    ///
    /// Returns `true` when a request was handed to the transport. Returns
    /// `false` when a fetch is already in progress (no callback), or after
    /// reporting `MissingPlacement` or `NetworkUnreachable` to the delegate.
    #[instrument(skip(self), fields(placement = tracing::field::Empty))]
    pub async fn fetch_ad(&self) -> bool {
        let request = {
            let state = self.shared.lock_state();
            if state.active.is_some() {
                debug!("Ad fetch already in progress");
                return false;
            }
            state.request.clone()
        };
        tracing::Span::current().record("placement", request.placement.as_str());

        if !request.has_placement() {
            self.shared
                .dispatch(None, &request.placement, Err(AdError::MissingPlacement));
            return false;
        }

        if !self.shared.context.is_reachable().await {
            self.shared
                .dispatch(None, &request.placement, Err(AdError::NetworkUnreachable));
            return false;
        }

        let prepared = match build_request(&self.shared.context, &request) {
            Ok(prepared) => prepared,
            Err(error) => {
                self.shared.dispatch(None, &request.placement, Err(error));
                return false;
            }
        };
        let url = prepared.url.clone();
        let body = prepared.body.clone();

        let (started_tx, started_rx) = oneshot::channel();

        let fetch_id = {
            let mut state = self.shared.lock_state();
            // Another caller may have started while reachability was checked
            if state.active.is_some() {
                debug!("Ad fetch already in progress");
                return false;
            }

            state.next_id += 1;
            let fetch_id = state.next_id;
            let token = CancellationToken::new();
            let handle = core_async::task::spawn(Arc::clone(&self.shared).run_fetch(
                fetch_id,
                token.clone(),
                request.clone(),
                prepared,
                started_rx,
            ));
            state.active = Some(ActiveFetch {
                id: fetch_id,
                token,
                handle,
                announced: false,
            });
            fetch_id
        };

        info!(fetch_id, url = %url, ad_type = %request.ad_type, "Ad download started");
        debug!(fetch_id, body = %truncate_for_log(&body, LOGGED_BODY_CHARS), "Ad request body");

        self.shared.emit(AdEvent::DownloadStarted {
            fetch_id,
            placement: request.placement.clone(),
            ad_type: request.ad_type.to_string(),
            url: url.clone(),
        });
        self.shared
            .delegate
            .download_started_for_ad_with_url(&url, &body);

        let cancelled_early = {
            let mut state = self.shared.lock_state();
            match state.active.as_mut() {
                Some(active) if active.id == fetch_id => {
                    active.announced = true;
                    false
                }
                _ => {
                    let cancelled = state.unannounced_cancel == Some(fetch_id);
                    if cancelled {
                        state.unannounced_cancel = None;
                    }
                    cancelled
                }
            }
        };
        if cancelled_early {
            self.shared.emit(AdEvent::DownloadCancelled {
                fetch_id,
                placement: request.placement.clone(),
            });
        }
        let _ = started_tx.send(());

        true
    }

    /// Aborts the in-flight fetch, if any, without calling the delegate.
    ///
    /// Returns whether a fetch was cancelled. Calling it while idle is a no-op.
    /// When the fetch has not been announced yet (a concurrent `fetch_ad` is
    /// still firing its started notification), `DownloadCancelled` is
    /// published after `DownloadStarted` by that `fetch_ad` call.
    pub fn cancel(&self) -> bool {
        let (active, placement) = {
            let mut state = self.shared.lock_state();
            let Some(active) = state.active.take() else {
                return false;
            };
            if !active.announced {
                state.unannounced_cancel = Some(active.id);
            }
            (active, state.request.placement.clone())
        };

        let fetch_id = active.id;
        let announced = active.announced;
        active.abort();

        info!(fetch_id, placement = %placement, "Ad download cancelled");
        if announced {
            self.shared
                .emit(AdEvent::DownloadCancelled { fetch_id, placement });
        }
        true
    }

    /// Returns to idle, aborting any in-flight fetch silently.
    ///
    /// The stored request is kept; the next `fetch_ad` is accepted at once.
    pub fn reset(&self) {
        if let Some(active) = self.shared.take_active() {
            debug!(fetch_id = active.id, "Ad fetch reset");
            active.abort();
        }
    }

    /// Resets and replaces the request used by later fetches.
    pub fn reinitialize(&self, request: FetchRequest) {
        let active = {
            let mut state = self.shared.lock_state();
            state.request = request;
            state.active.take()
        };
        if let Some(active) = active {
            debug!(fetch_id = active.id, "Ad fetch reset for new request");
            active.abort();
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.shared.lock_state().active.is_some()
    }

    pub fn request(&self) -> FetchRequest {
        self.shared.lock_state().request.clone()
    }
}

impl fmt::Debug for AdFetchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock_state();
        f.debug_struct("AdFetchCoordinator")
            .field("request", &state.request)
            .field("active_fetch", &state.active.as_ref().map(|a| a.id))
            .finish()
    }
}

/// Downloads one ad and hands the outcome to `handler`.
///
/// The coordinator is discarded right away; the spawned fetch keeps what it
/// needs alive until the handler has run. Returns what `fetch_ad` returned.
/// The handler is called on both paths, including when the fetch never
/// started.
pub async fn download_ad<F>(
    context: AdFetchContext,
    ad_type: AdType,
    orientations: AdOrientation,
    placement: impl Into<String>,
    metadata: AdMetadata,
    handler: F,
) -> bool
where
    F: FnOnce(AdResult) + Send + 'static,
{
    let request = FetchRequest::new(ad_type, placement)
        .with_orientations(orientations)
        .with_metadata(metadata);
    let coordinator = AdFetchCoordinator::new(context, request, Arc::new(OnceHandler::new(handler)));
    coordinator.fetch_ad().await
}
