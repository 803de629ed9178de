//! Tests for the command channel: bulk precache and notification clicks.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use muninn::{
    CacheSet, CacheStorage, Command, InterceptedRequest, Interceptor, MemoryStorage, Muninn,
    Notification, Result, ViewHandle, ViewRegistry,
};

// ============================================================================
// Mocks
// ============================================================================

/// View registry with a fixed view list, recording focus/open calls.
#[derive(Default)]
struct RecordingViews {
    views: Vec<ViewHandle>,
    focused: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
}

impl RecordingViews {
    fn with_views(views: Vec<ViewHandle>) -> Self {
        Self {
            views,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ViewRegistry for RecordingViews {
    async fn views(&self) -> Vec<ViewHandle> {
        self.views.clone()
    }

    async fn claim(&self) -> Result<()> {
        Ok(())
    }

    async fn focus(&self, view: &ViewHandle) -> Result<()> {
        self.focused.lock().unwrap().push(view.id.clone());
        Ok(())
    }

    async fn open(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

struct ClosableNotification {
    closed: AtomicBool,
}

impl ClosableNotification {
    fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }
}

impl Notification for ClosableNotification {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn image_engine(storage: Arc<MemoryStorage>) -> Interceptor {
    Muninn::builder()
        .media_hosts(["127.0.0.1"])
        .storage(storage)
        .build()
        .unwrap()
}

async fn image_cached(storage: &MemoryStorage, engine: &Interceptor, url: &str) -> bool {
    let set = storage.open(engine.registry().image()).await.unwrap();
    let key = InterceptedRequest::get(url).unwrap().key();
    set.lookup(&key).await.is_some()
}

// ============================================================================
// Precache
// ============================================================================

#[tokio::test]
async fn precache_is_best_effort_per_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/imgA"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"A".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imgB"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imgC"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"C".to_vec()))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = image_engine(storage.clone());
    let uri = server.uri();

    let raw = format!(
        r#"{{ "type": "PRECACHE_IMAGES", "payload": ["{uri}/imgA", "{uri}/imgB", "{uri}/imgC"] }}"#
    );
    // Fire-and-forget: the failing middle item never reaches the sender.
    engine.handle_message(&raw).await;

    assert!(image_cached(&storage, &engine, &format!("{uri}/imgA")).await);
    assert!(!image_cached(&storage, &engine, &format!("{uri}/imgB")).await);
    assert!(image_cached(&storage, &engine, &format!("{uri}/imgC")).await);
}

#[tokio::test]
async fn precache_isolates_unparseable_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = image_engine(storage.clone());
    let uri = server.uri();

    engine
        .handle_command(Command::PrecacheImages(vec![
            "not a url".to_string(),
            format!("{uri}/ok.png"),
        ]))
        .await;

    assert!(image_cached(&storage, &engine, &format!("{uri}/ok.png")).await);
}

#[tokio::test]
async fn unknown_message_types_are_ignored() {
    let storage = Arc::new(MemoryStorage::new());
    let engine = image_engine(storage.clone());

    engine
        .handle_message(r#"{ "type": "CLEAR_EVERYTHING", "payload": [] }"#)
        .await;
    engine.handle_message("not json at all").await;

    assert!(storage.names().await.unwrap().is_empty());
}

// ============================================================================
// Notification interaction
// ============================================================================

#[tokio::test]
async fn notification_click_focuses_an_open_application_view() {
    let views = Arc::new(RecordingViews::with_views(vec![
        ViewHandle::new("v1", "https://other.example.net/"),
        ViewHandle::new("v2", "https://records.example.org/cortes/12"),
    ]));
    let engine = Muninn::builder()
        .shell_origin("https://records.example.org")
        .views(views.clone())
        .build()
        .unwrap();

    let notification = ClosableNotification::new();
    engine
        .handle_notification_click(&notification)
        .await
        .unwrap();

    assert!(notification.closed.load(Ordering::SeqCst));
    assert_eq!(*views.focused.lock().unwrap(), vec!["v2".to_string()]);
    assert!(views.opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn notification_click_opens_a_view_when_none_match() {
    let views = Arc::new(RecordingViews::with_views(vec![ViewHandle::new(
        "v1",
        "https://other.example.net/",
    )]));
    let engine = Muninn::builder()
        .shell_origin("https://records.example.org")
        .views(views.clone())
        .build()
        .unwrap();

    let notification = ClosableNotification::new();
    engine
        .handle_notification_click(&notification)
        .await
        .unwrap();

    assert!(notification.closed.load(Ordering::SeqCst));
    assert!(views.focused.lock().unwrap().is_empty());
    assert_eq!(
        *views.opened.lock().unwrap(),
        vec!["https://records.example.org/".to_string()]
    );
}

#[tokio::test]
async fn notification_click_acts_on_at_most_one_view() {
    let views = Arc::new(RecordingViews::with_views(vec![
        ViewHandle::new("v1", "https://records.example.org/a"),
        ViewHandle::new("v2", "https://records.example.org/b"),
    ]));
    let engine = Muninn::builder()
        .shell_origin("https://records.example.org")
        .views(views.clone())
        .build()
        .unwrap();

    let notification = ClosableNotification::new();
    engine
        .handle_notification_click(&notification)
        .await
        .unwrap();

    assert_eq!(views.focused.lock().unwrap().len(), 1);
    assert!(views.opened.lock().unwrap().is_empty());
}
