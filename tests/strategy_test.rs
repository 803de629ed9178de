//! Tests for the retrieval strategies: cache-first and stale-while-revalidate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use muninn::{
    CacheSet, CacheStorage, FetchOutcome, InterceptedRequest, Interceptor, MemoryStorage, Muninn,
    ResponseSnapshot,
};

// ============================================================================
// Helpers
// ============================================================================

/// Engine whose media host list matches the mock server, sharing `storage`
/// with the test so cache contents can be inspected and pre-seeded.
fn image_engine(storage: Arc<MemoryStorage>) -> Interceptor {
    Muninn::builder()
        .media_hosts(["127.0.0.1"])
        .storage(storage)
        .build()
        .unwrap()
}

/// Engine that classifies every mock-server request as shell (the default
/// host lists match neither 127.0.0.1 nor localhost).
fn shell_engine(storage: Arc<MemoryStorage>) -> Interceptor {
    Muninn::builder().storage(storage).build().unwrap()
}

fn body_of(outcome: FetchOutcome) -> Vec<u8> {
    match outcome {
        FetchOutcome::Response(snapshot) => snapshot.body().to_vec(),
        FetchOutcome::Declined => panic!("expected a supplied response"),
    }
}

// ============================================================================
// Cache-first (image class)
// ============================================================================

#[tokio::test]
async fn cache_first_fetches_network_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pixels".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = image_engine(storage.clone());
    let request = InterceptedRequest::get(&format!("{}/img.png", server.uri())).unwrap();

    let first = engine.handle_fetch(&request).await.unwrap();
    assert_eq!(body_of(first), b"pixels");

    // Second identical request must be answered from cache; the mock's
    // expect(1) verifies zero additional network calls on drop.
    let second = engine.handle_fetch(&request).await.unwrap();
    assert_eq!(body_of(second), b"pixels");

    let set = storage.open(engine.registry().image()).await.unwrap();
    assert_eq!(set.entry_count().await, 1);
}

#[tokio::test]
async fn cache_first_miss_with_dead_network_propagates() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let engine = image_engine(Arc::new(MemoryStorage::new()));
    let request = InterceptedRequest::get(&format!("{uri}/img.png")).unwrap();

    assert!(engine.handle_fetch(&request).await.is_err());
}

#[tokio::test]
async fn cache_first_does_not_store_non_success_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = image_engine(storage.clone());
    let request = InterceptedRequest::get(&format!("{}/gone.png", server.uri())).unwrap();

    // The 404 is returned to the caller but never persisted, so the
    // second request goes to the network again (expect(2)).
    for _ in 0..2 {
        match engine.handle_fetch(&request).await.unwrap() {
            FetchOutcome::Response(snapshot) => assert_eq!(snapshot.status(), 404),
            FetchOutcome::Declined => panic!("expected a supplied response"),
        }
    }

    let set = storage.open(engine.registry().image()).await.unwrap();
    assert_eq!(set.entry_count().await, 0);
}

// ============================================================================
// Stale-while-revalidate (shell class)
// ============================================================================

#[tokio::test]
async fn swr_serves_cached_without_waiting_for_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"fresh".to_vec())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = shell_engine(storage.clone());
    let request = InterceptedRequest::get(&format!("{}/index.html", server.uri())).unwrap();

    let set = storage.open(engine.registry().shell()).await.unwrap();
    set.store(request.key(), ResponseSnapshot::ok("stale"))
        .await
        .unwrap();

    let started = Instant::now();
    let outcome = engine.handle_fetch(&request).await.unwrap();
    let elapsed = started.elapsed();

    // Latency bound: the cached answer comes back long before the
    // network's 2s delay settles.
    assert_eq!(body_of(outcome), b"stale");
    assert!(
        elapsed < Duration::from_secs(1),
        "stale response waited on the network: {elapsed:?}"
    );

    // Once the slow fetch lands the entry converges to the fresh body.
    let mut refreshed = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if let Some(snapshot) = set.lookup(&request.key()).await {
            if snapshot.body() == b"fresh" {
                refreshed = true;
                break;
            }
        }
    }
    assert!(refreshed, "cache entry was not revalidated");
}

#[tokio::test]
async fn swr_miss_returns_the_network_result_and_stores_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"console.log(1)".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = shell_engine(storage.clone());
    let request = InterceptedRequest::get(&format!("{}/app.js", server.uri())).unwrap();

    let outcome = engine.handle_fetch(&request).await.unwrap();
    assert_eq!(body_of(outcome), b"console.log(1)");

    let set = storage.open(engine.registry().shell()).await.unwrap();
    let cached = set.lookup(&request.key()).await.unwrap();
    assert_eq!(cached.body(), b"console.log(1)");
}

#[tokio::test]
async fn swr_miss_with_dead_network_propagates() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let engine = shell_engine(Arc::new(MemoryStorage::new()));
    let request = InterceptedRequest::get(&format!("{uri}/index.html")).unwrap();

    assert!(engine.handle_fetch(&request).await.is_err());
}

#[tokio::test]
async fn swr_revalidation_failure_after_stale_serve_is_swallowed() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let storage = Arc::new(MemoryStorage::new());
    let engine = shell_engine(storage.clone());
    let request = InterceptedRequest::get(&format!("{uri}/index.html")).unwrap();

    let set = storage.open(engine.registry().shell()).await.unwrap();
    set.store(request.key(), ResponseSnapshot::ok("stale"))
        .await
        .unwrap();

    // Network is dead, but the caller already has a usable answer.
    let outcome = engine.handle_fetch(&request).await.unwrap();
    assert_eq!(body_of(outcome), b"stale");

    // The failed revalidation must not disturb the stored entry.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let cached = set.lookup(&request.key()).await.unwrap();
    assert_eq!(cached.body(), b"stale");
}

#[tokio::test]
async fn swr_non_success_revalidation_keeps_the_stale_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let engine = shell_engine(storage.clone());
    let request = InterceptedRequest::get(&format!("{}/index.html", server.uri())).unwrap();

    let set = storage.open(engine.registry().shell()).await.unwrap();
    set.store(request.key(), ResponseSnapshot::ok("stale"))
        .await
        .unwrap();

    let outcome = engine.handle_fetch(&request).await.unwrap();
    assert_eq!(body_of(outcome), b"stale");

    tokio::time::sleep(Duration::from_millis(200)).await;
    let cached = set.lookup(&request.key()).await.unwrap();
    assert_eq!(cached.body(), b"stale");
}
