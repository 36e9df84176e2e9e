//! # Ad Lifecycle Events
//!
//! Optional broadcast channel from the SDK to the host, built on
//! `tokio::sync::broadcast`. Coordinators publish here in addition to calling
//! their delegate, so analytics or debug overlays can watch every placement
//! without wrapping delegates.
//!
//! ```text
//! AdFetchCoordinator ──emit──> EventBus ──subscribe──> EventStream (per observer)
//! ```
//!
//! ```rust
//! use core_runtime::events::{AdEvent, CoreEvent, EventBus};
//!
//! let bus = EventBus::default();
//! let mut observer = bus.subscribe();
//!
//! bus.emit(CoreEvent::Ad(AdEvent::DownloadCancelled {
//!     fetch_id: 1,
//!     placement: "home_banner".to_string(),
//! }))
//! .ok();
//!
//! assert!(observer.try_recv().is_ok());
//! ```
//!
//! Publishing never blocks and never affects a fetch. Events emitted while
//! nobody subscribes are dropped, and a slow observer loses the oldest
//! buffered events rather than stalling the coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

use tracing::warn;

pub use tokio::sync::broadcast::error::{RecvError, SendError, TryRecvError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Ad fetch lifecycle events
    Ad(AdEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Ad(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Ad(AdEvent::DownloadFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Ad(AdEvent::DownloadFinished { .. }) => EventSeverity::Info,
            CoreEvent::Ad(_) => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Ad Events
// ============================================================================

/// Events published by the ad fetch coordinator.
///
/// `fetch_id` identifies one accepted `fetch_ad` call; it increases
/// monotonically per coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AdEvent {
    /// A request was handed to the transport.
    DownloadStarted {
        fetch_id: u64,
        placement: String,
        ad_type: String,
        url: String,
    },
    /// The delegate received an ad.
    DownloadFinished {
        fetch_id: u64,
        placement: String,
        request_id: Option<String>,
    },
    /// The delegate received a failure.
    ///
    /// `fetch_id` is `None` for failures raised before a request existed
    /// (missing placement, unreachable network).
    DownloadFailed {
        fetch_id: Option<u64>,
        placement: String,
        code: i32,
        message: String,
    },
    /// An in-flight fetch was cancelled; no callback follows.
    DownloadCancelled { fetch_id: u64, placement: String },
}

impl AdEvent {
    fn description(&self) -> &str {
        match self {
            AdEvent::DownloadStarted { .. } => "Ad download started",
            AdEvent::DownloadFinished { .. } => "Ad download finished",
            AdEvent::DownloadFailed { .. } => "Ad download failed",
            AdEvent::DownloadCancelled { .. } => "Ad download cancelled",
        }
    }

    /// Placement the event refers to.
    pub fn placement(&self) -> &str {
        match self {
            AdEvent::DownloadStarted { placement, .. }
            | AdEvent::DownloadFinished { placement, .. }
            | AdEvent::DownloadFailed { placement, .. }
            | AdEvent::DownloadCancelled { placement, .. } => placement,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast channel for [`CoreEvent`]s. Cloning shares the channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// `capacity` is the number of events buffered per subscriber before the
    /// oldest are dropped for that subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns how many subscribers received the event; an error means there
    /// were none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Receiver for events emitted from now on. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Subscribes and wraps the receiver in an [`EventStream`].
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// Filtered view of a subscription that tolerates lag.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventSeverity};
///
/// let bus = EventBus::default();
/// let problems = bus
///     .stream()
///     .placement("home_banner")
///     .filter(|event| event.severity() >= EventSeverity::Warning);
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filters: Vec<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filters: Vec::new(),
        }
    }

    /// Keeps only events matching `predicate`. Filters accumulate.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Keeps only ad events for one placement.
    pub fn placement(self, placement: impl Into<String>) -> Self {
        let placement = placement.into();
        self.filter(move |event| match event {
            CoreEvent::Ad(ad) => ad.placement() == placement,
        })
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filters.iter().all(|filter| filter(event))
    }

    /// Next matching event.
    ///
    /// Missed events are logged and skipped. Returns `None` once every
    /// sender is gone.
    pub async fn recv(&mut self) -> Option<CoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Event observer lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event already buffered, without waiting.
    pub fn try_recv(&mut self) -> Option<CoreEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Event observer lagged behind");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("filters", &self.filters.len())
            .finish()
    }
}
