//! Behavioural tests for `AdFetchCoordinator` against in-memory bridges.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::network::{NetworkInfo, NetworkMonitor, NetworkType};
use bridge_traits::{BridgeError, HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_ads::{
    download_ad, Ad, AdDownloadDelegate, AdError, AdFetchContext, AdFetchCoordinator,
    AdMetadata, AdOrientation, AdType, FetchRequest,
};
use core_runtime::config::SdkConfig;
use core_runtime::events::{AdEvent, CoreEvent, EventBus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Barrier, Semaphore};

const AD_BODY: &str = r#"{"html":"<div>ad</div>","duration":5.0,"requestId":"srv-1"}"#;

// ----------------------------------------------------------------------------
// Fakes
// ----------------------------------------------------------------------------

/// Transport that holds every request until the gate is opened.
struct GatedHttp {
    calls: AtomicUsize,
    gate: Semaphore,
    status: u16,
    body: &'static str,
    requests: Mutex<Vec<HttpRequest>>,
}

impl GatedHttp {
    fn closed(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn open(status: u16, body: &'static str) -> Arc<Self> {
        let http = Self::closed(status, body);
        http.release();
        http
    }

    fn release(&self) {
        self.gate.add_permits(1_000);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait_for_calls(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("transport was not called");
    }
}

#[async_trait]
impl HttpClient for GatedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        Ok(HttpResponse {
            status: self.status,
            headers: HashMap::new(),
            body: Bytes::from_static(self.body.as_bytes()),
        })
    }
}

struct FailingHttp;

#[async_trait]
impl HttpClient for FailingHttp {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        Err(BridgeError::Connection("connection reset".to_string()))
    }
}

struct FixedMonitor(bool);

#[async_trait]
impl NetworkMonitor for FixedMonitor {
    async fn get_network_info(&self) -> BridgeResult<NetworkInfo> {
        Ok(if self.0 {
            NetworkInfo::connected(NetworkType::WiFi)
        } else {
            NetworkInfo::disconnected()
        })
    }
}

/// Reachable monitor that takes a while to answer.
struct SlowMonitor {
    delay: Duration,
    checks: AtomicUsize,
}

impl SlowMonitor {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            checks: AtomicUsize::new(0),
        })
    }

    fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkMonitor for SlowMonitor {
    async fn get_network_info(&self) -> BridgeResult<NetworkInfo> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(NetworkInfo::connected(NetworkType::Ethernet))
    }
}

#[derive(Debug)]
enum Call {
    Started { url: String, data: String },
    Finished(Ad),
    Failed(AdError),
}

impl Call {
    fn is_terminal(&self) -> bool {
        !matches!(self, Call::Started { .. })
    }
}

struct RecordingDelegate(mpsc::UnboundedSender<Call>);

impl AdDownloadDelegate for RecordingDelegate {
    fn download_finished_with_ad(&self, ad: Ad) {
        self.0.send(Call::Finished(ad)).ok();
    }

    fn download_failed_with_error(&self, error: AdError) {
        self.0.send(Call::Failed(error)).ok();
    }

    fn download_started_for_ad_with_url(&self, url: &str, data: &str) {
        self.0
            .send(Call::Started {
                url: url.to_string(),
                data: data.to_string(),
            })
            .ok();
    }
}

/// Cancels its own coordinator from inside the started hook.
#[derive(Default)]
struct CancelOnStart {
    coordinator: OnceLock<Arc<AdFetchCoordinator>>,
    cancelled: AtomicBool,
    terminal_calls: AtomicUsize,
}

impl AdDownloadDelegate for CancelOnStart {
    fn download_finished_with_ad(&self, _ad: Ad) {
        self.terminal_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn download_failed_with_error(&self, _error: AdError) {
        self.terminal_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn download_started_for_ad_with_url(&self, _url: &str, _data: &str) {
        if let Some(coordinator) = self.coordinator.get() {
            self.cancelled.store(coordinator.cancel(), Ordering::SeqCst);
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn context_with(
    http: Arc<dyn HttpClient>,
    monitor: Option<Arc<dyn NetworkMonitor>>,
    bus: Option<Arc<EventBus>>,
) -> AdFetchContext {
    let mut builder = SdkConfig::builder()
        .advertiser_id("877")
        .package_name("com.example.app")
        .http_client(http);
    builder = match monitor {
        Some(monitor) => builder.network_monitor(monitor),
        None => builder.without_network_monitor(),
    };
    if let Some(bus) = bus {
        builder = builder.event_bus(bus);
    }
    AdFetchContext::from_config(&builder.build().unwrap())
}

fn context(http: Arc<dyn HttpClient>) -> AdFetchContext {
    context_with(http, None, None)
}

fn new_coordinator(
    context: AdFetchContext,
    request: FetchRequest,
) -> (AdFetchCoordinator, mpsc::UnboundedReceiver<Call>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let coordinator = AdFetchCoordinator::new(context, request, Arc::new(RecordingDelegate(tx)));
    (coordinator, rx)
}

async fn next_call(rx: &mut mpsc::UnboundedReceiver<Call>) -> Call {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for delegate")
        .expect("delegate channel closed")
}

async fn assert_quiet(rx: &mut mpsc::UnboundedReceiver<Call>) {
    tokio::time::sleep(Duration::from_millis(100)).await;
    if let Ok(call) = rx.try_recv() {
        panic!("unexpected delegate call: {:?}", call);
    }
}

async fn next_event(stream: &mut tokio::sync::broadcast::Receiver<CoreEvent>) -> AdEvent {
    let event = tokio::time::timeout(Duration::from_secs(5), stream.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event bus closed");
    match event {
        CoreEvent::Ad(event) => event,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_interstitial_fetch_reports_started_then_finished() {
    let http = GatedHttp::open(200, AD_BODY);
    let (coordinator, mut rx) = new_coordinator(
        context(http.clone()),
        FetchRequest::new(AdType::Interstitial, "home_banner"),
    );

    assert!(coordinator.fetch_ad().await);

    match next_call(&mut rx).await {
        Call::Started { url, data } => {
            assert!(url.contains("/api/v1/ads/request?"));
            assert!(url.contains("advertiser_id=877"));
            let body: serde_json::Value = serde_json::from_str(&data).unwrap();
            assert_eq!(body["placement"], "home_banner");
            assert_eq!(body["type"], "interstitial");
        }
        other => panic!("expected started, got {:?}", other),
    }

    match next_call(&mut rx).await {
        Call::Finished(ad) => {
            assert_eq!(ad.ad_type, AdType::Interstitial);
            assert_eq!(ad.placement, "home_banner");
            assert_eq!(ad.request_id, "srv-1");
            assert_eq!(ad.duration, Some(5.0));
        }
        other => panic!("expected finished, got {:?}", other),
    }

    assert_quiet(&mut rx).await;
    assert_eq!(http.calls(), 1);
    assert!(!coordinator.is_fetching());
}

#[tokio::test]
async fn test_second_fetch_rejected_while_in_flight() {
    let http = GatedHttp::closed(200, AD_BODY);
    let (coordinator, mut rx) =
        new_coordinator(context(http.clone()), FetchRequest::new(AdType::Banner, "feed"));

    assert!(coordinator.fetch_ad().await);
    assert!(coordinator.is_fetching());
    assert!(!coordinator.fetch_ad().await);
    assert!(!coordinator.fetch_ad().await);

    http.wait_for_calls(1).await;
    http.release();

    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(next_call(&mut rx).await, Call::Finished(_)));
    assert_quiet(&mut rx).await;
    assert_eq!(http.calls(), 1);

    // Idle again; the next fetch is accepted
    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(next_call(&mut rx).await, Call::Finished(_)));
    assert_eq!(http.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fetches_start_one_request() {
    let http = GatedHttp::closed(200, AD_BODY);
    let monitor = SlowMonitor::new(Duration::from_millis(50));
    let (coordinator, mut rx) = new_coordinator(
        context_with(http.clone(), Some(monitor.clone()), None),
        FetchRequest::new(AdType::Banner, "feed"),
    );
    let coordinator = Arc::new(coordinator);

    let barrier = Arc::new(Barrier::new(16));
    let callers: Vec<_> = (0..16)
        .map(|_| {
            let coordinator = Arc::clone(&coordinator);
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                coordinator.fetch_ad().await
            })
        })
        .collect();

    let mut accepted = 0;
    for caller in callers {
        if caller.await.unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
    // Several callers were past the idle check while reachability was pending
    assert!(monitor.checks() > 1);

    http.wait_for_calls(1).await;
    http.release();
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(next_call(&mut rx).await, Call::Finished(_)));
    assert_quiet(&mut rx).await;
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn test_unreachable_network_fails_without_request() {
    let http = GatedHttp::open(200, AD_BODY);
    let (coordinator, mut rx) = new_coordinator(
        context_with(http.clone(), Some(Arc::new(FixedMonitor(false))), None),
        FetchRequest::new(AdType::Banner, "feed"),
    );

    assert!(!coordinator.fetch_ad().await);

    assert!(matches!(
        next_call(&mut rx).await,
        Call::Failed(AdError::NetworkUnreachable)
    ));
    assert_quiet(&mut rx).await;
    assert_eq!(http.calls(), 0);
    assert!(!coordinator.is_fetching());
}

#[tokio::test]
async fn test_reachable_monitor_allows_fetch() {
    let http = GatedHttp::open(200, AD_BODY);
    let (coordinator, mut rx) = new_coordinator(
        context_with(http.clone(), Some(Arc::new(FixedMonitor(true))), None),
        FetchRequest::new(AdType::Banner, "feed"),
    );

    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(next_call(&mut rx).await, Call::Finished(_)));
}

#[tokio::test]
async fn test_missing_placement_is_reported() {
    let http = GatedHttp::open(200, AD_BODY);
    let bus = Arc::new(EventBus::new(16));
    let mut events = bus.subscribe();
    let (coordinator, mut rx) = new_coordinator(
        context_with(http.clone(), None, Some(bus)),
        FetchRequest::new(AdType::Banner, " "),
    );

    assert!(!coordinator.fetch_ad().await);
    assert!(matches!(
        next_call(&mut rx).await,
        Call::Failed(AdError::MissingPlacement)
    ));
    assert_eq!(http.calls(), 0);

    match next_event(&mut events).await {
        AdEvent::DownloadFailed { fetch_id, code, .. } => {
            assert_eq!(fetch_id, None);
            assert_eq!(code, AdError::MissingPlacement.code());
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_suppresses_late_response() {
    let http = GatedHttp::closed(200, AD_BODY);
    let (coordinator, mut rx) =
        new_coordinator(context(http.clone()), FetchRequest::new(AdType::Banner, "feed"));

    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    http.wait_for_calls(1).await;

    assert!(coordinator.cancel());
    assert!(!coordinator.is_fetching());
    assert!(!coordinator.cancel());

    http.release();
    assert_quiet(&mut rx).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_races_completion_without_double_delivery() {
    for round in 0..50 {
        let http = GatedHttp::open(200, AD_BODY);
        let (coordinator, mut rx) =
            new_coordinator(context(http.clone()), FetchRequest::new(AdType::Banner, "feed"));

        assert!(coordinator.fetch_ad().await);
        if round % 2 == 0 {
            tokio::task::yield_now().await;
        }
        let cancelled = coordinator.cancel();

        assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
        if cancelled {
            assert_quiet(&mut rx).await;
        } else {
            assert!(next_call(&mut rx).await.is_terminal());
            assert_quiet(&mut rx).await;
        }
        assert!(!coordinator.is_fetching());
    }
}

#[tokio::test]
async fn test_cancel_from_started_hook_is_published_after_start() {
    let bus = Arc::new(EventBus::new(16));
    let mut events = bus.subscribe();
    let http = GatedHttp::open(200, AD_BODY);
    let delegate = Arc::new(CancelOnStart::default());

    let coordinator = Arc::new(AdFetchCoordinator::new(
        context_with(http.clone(), None, Some(bus)),
        FetchRequest::new(AdType::Banner, "feed"),
        delegate.clone(),
    ));
    delegate.coordinator.set(Arc::clone(&coordinator)).ok();

    assert!(coordinator.fetch_ad().await);
    assert!(delegate.cancelled.load(Ordering::SeqCst));
    assert!(!coordinator.is_fetching());

    assert!(matches!(
        next_event(&mut events).await,
        AdEvent::DownloadStarted { fetch_id: 1, .. }
    ));
    assert!(matches!(
        next_event(&mut events).await,
        AdEvent::DownloadCancelled { fetch_id: 1, .. }
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(delegate.terminal_calls.load(Ordering::SeqCst), 0);
    assert_eq!(http.calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_racing_start_never_precedes_started_event() {
    for _ in 0..50 {
        let bus = Arc::new(EventBus::new(16));
        let mut events = bus.subscribe();
        let http = GatedHttp::closed(200, AD_BODY);
        let (coordinator, mut rx) = new_coordinator(
            context_with(http, None, Some(bus)),
            FetchRequest::new(AdType::Banner, "feed"),
        );
        let coordinator = Arc::new(coordinator);

        let canceller = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                while !coordinator.cancel() {
                    tokio::task::yield_now().await;
                }
            })
        };

        assert!(coordinator.fetch_ad().await);
        tokio::time::timeout(Duration::from_secs(5), canceller)
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            next_event(&mut events).await,
            AdEvent::DownloadStarted { fetch_id: 1, .. }
        ));
        assert!(matches!(
            next_event(&mut events).await,
            AdEvent::DownloadCancelled { fetch_id: 1, .. }
        ));
        assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
        assert!(rx.try_recv().is_err());
    }
}

#[tokio::test]
async fn test_reset_allows_new_fetch_and_drops_old_result() {
    let http = GatedHttp::closed(200, AD_BODY);
    let (coordinator, mut rx) =
        new_coordinator(context(http.clone()), FetchRequest::new(AdType::Banner, "feed"));

    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    http.wait_for_calls(1).await;

    coordinator.reset();
    assert!(!coordinator.is_fetching());

    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    http.wait_for_calls(2).await;
    http.release();

    assert!(matches!(next_call(&mut rx).await, Call::Finished(_)));
    assert_quiet(&mut rx).await;
}

#[tokio::test]
async fn test_transport_and_server_errors_map_to_request_failed() {
    let (coordinator, mut rx) = new_coordinator(
        context(Arc::new(FailingHttp)),
        FetchRequest::new(AdType::Banner, "feed"),
    );
    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    match next_call(&mut rx).await {
        Call::Failed(error) => {
            assert_eq!(error.status(), None);
            assert!(error.to_string().contains("connection reset"));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    let http = GatedHttp::open(500, r#"{"error":"no fill"}"#);
    let (coordinator, mut rx) =
        new_coordinator(context(http), FetchRequest::new(AdType::Banner, "feed"));
    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    match next_call(&mut rx).await {
        Call::Failed(error) => assert_eq!(
            error,
            AdError::RequestFailed {
                status: Some(500),
                message: "no fill".to_string()
            }
        ),
        other => panic!("expected failure, got {:?}", other),
    }

    let http = GatedHttp::open(200, r#"{"html":"#);
    let (coordinator, mut rx) =
        new_coordinator(context(http), FetchRequest::new(AdType::Banner, "feed"));
    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(
        next_call(&mut rx).await,
        Call::Failed(AdError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_server_error_is_sent_once() {
    let http = GatedHttp::open(503, r#"{"error":"overloaded"}"#);
    let (coordinator, mut rx) =
        new_coordinator(context(http.clone()), FetchRequest::new(AdType::Banner, "feed"));

    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(
        next_call(&mut rx).await,
        Call::Failed(AdError::RequestFailed {
            status: Some(503),
            ..
        })
    ));

    assert_quiet(&mut rx).await;
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn test_event_bus_sees_lifecycle() {
    let bus = Arc::new(EventBus::new(16));
    let mut events = bus.subscribe();

    let http = GatedHttp::open(200, AD_BODY);
    let (coordinator, mut rx) = new_coordinator(
        context_with(http, None, Some(bus.clone())),
        FetchRequest::new(AdType::Banner, "feed"),
    );

    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(matches!(next_call(&mut rx).await, Call::Finished(_)));

    match next_event(&mut events).await {
        AdEvent::DownloadStarted {
            fetch_id,
            placement,
            ad_type,
            url,
        } => {
            assert_eq!(fetch_id, 1);
            assert_eq!(placement, "feed");
            assert_eq!(ad_type, "banner");
            assert!(url.contains("/api/v1/ads/request"));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(
        next_event(&mut events).await,
        AdEvent::DownloadFinished {
            fetch_id: 1,
            placement: "feed".to_string(),
            request_id: Some("srv-1".to_string()),
        }
    );

    let gated = GatedHttp::closed(200, AD_BODY);
    let (coordinator, mut rx) = new_coordinator(
        context_with(gated, None, Some(bus)),
        FetchRequest::new(AdType::Banner, "feed"),
    );
    assert!(coordinator.fetch_ad().await);
    assert!(matches!(next_call(&mut rx).await, Call::Started { .. }));
    assert!(coordinator.cancel());

    assert!(matches!(
        next_event(&mut events).await,
        AdEvent::DownloadStarted { fetch_id: 1, .. }
    ));
    assert_eq!(
        next_event(&mut events).await,
        AdEvent::DownloadCancelled {
            fetch_id: 1,
            placement: "feed".to_string(),
        }
    );
}

#[tokio::test]
async fn test_download_ad_calls_handler_once() {
    let http = GatedHttp::open(200, AD_BODY);
    let (tx, rx) = oneshot::channel();

    let started = download_ad(
        context(http.clone()),
        AdType::Banner,
        AdOrientation::PORTRAIT,
        "footer",
        AdMetadata::new().keyword("music"),
        move |result| {
            tx.send(result).ok();
        },
    )
    .await;
    assert!(started);

    let ad = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(ad.placement, "footer");

    let requests = http.requests.lock().unwrap();
    let body: serde_json::Value = serde_json::from_str(&requests[0].body_text()).unwrap();
    assert_eq!(body["orientations"], serde_json::json!(["portrait"]));
    assert_eq!(body["metadata"]["keywords"], serde_json::json!(["music"]));
}

#[tokio::test]
async fn test_download_ad_reports_unreachable() {
    let http = GatedHttp::open(200, AD_BODY);
    let (tx, rx) = oneshot::channel();

    let started = download_ad(
        context_with(http.clone(), Some(Arc::new(FixedMonitor(false))), None),
        AdType::Interstitial,
        AdOrientation::ALL,
        "home_banner",
        AdMetadata::default(),
        move |result| {
            tx.send(result).ok();
        },
    )
    .await;

    assert!(!started);
    assert_eq!(rx.await.unwrap().unwrap_err(), AdError::NetworkUnreachable);
    assert_eq!(http.calls(), 0);
}
