#![allow(clippy::unwrap_used)]
// Integration tests for `Poller` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spoolwatch_core::{
    CoreError, NotificationLevel, Poller, SpoolSelection, Thresholds, WatchConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn spools_body() -> serde_json::Value {
    json!([
        {"id": 1, "remaining_weight": 800.0, "initial_weight": 1000.0},
        {"id": 2, "remaining_weight": 40.0, "initial_weight": 1000.0},
        {"id": 3, "remaining_weight": 150.0, "initial_weight": 1000.0}
    ])
}

async fn mount_spools(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/spool"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_klipper(server: &MockServer, spool_id: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/server/spoolman/spool_id"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": {"spool_id": spool_id}})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/server/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": {"api_version_string": "1.4.0"}})),
        )
        .mount(server)
        .await;
}

fn config(spoolman: &MockServer, klipper: Option<&MockServer>) -> WatchConfig {
    let mut cfg = WatchConfig::new(spoolman.uri());
    cfg.klipper_url = klipper.map(MockServer::uri);
    cfg.thresholds = Thresholds {
        info: 20,
        warning: 10,
        critical: 5,
    };
    cfg.timeout = Duration::from_secs(5);
    cfg
}

// ── poll_once ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_once_classifies_spools() {
    let spoolman = MockServer::start().await;
    let printer = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(200).set_body_json(spools_body())).await;
    mount_klipper(&printer, json!(3)).await;

    let poller = Poller::new(config(&spoolman, Some(&printer))).unwrap();
    let snap = poller.poll_once().await;

    let klipper = snap.klipper.as_ref().unwrap();
    assert_eq!(klipper.active_spool, SpoolSelection::Selected(3));
    assert_eq!(klipper.api_version.as_deref(), Some("1.4.0"));

    assert_eq!(snap.level_of(1), Some(NotificationLevel::Ok));
    assert_eq!(snap.level_of(2), Some(NotificationLevel::Critical));
    assert_eq!(snap.level_of(3), Some(NotificationLevel::Info));
    assert_eq!(snap.active_spool().map(|r| r.spool.id), Some(3));
}

#[tokio::test]
async fn test_poll_once_without_klipper() {
    let spoolman = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(200).set_body_json(spools_body())).await;

    let poller = Poller::new(config(&spoolman, None)).unwrap();
    let snap = poller.poll_once().await;

    assert!(snap.klipper.is_none());
    assert_eq!(snap.spools.as_ref().map(Vec::len), Some(3));
    assert!(snap.active_spool().is_none());
}

#[tokio::test]
async fn test_poll_once_survives_spoolman_failure() {
    let spoolman = MockServer::start().await;
    let printer = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(500)).await;
    mount_klipper(&printer, json!(null)).await;

    let poller = Poller::new(config(&spoolman, Some(&printer))).unwrap();
    let snap = poller.poll_once().await;

    assert!(snap.spools.is_none());
    assert_eq!(
        snap.klipper.unwrap().active_spool,
        SpoolSelection::NoSelection
    );
}

#[tokio::test]
async fn test_poll_once_survives_printer_offline() {
    let spoolman = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(200).set_body_json(spools_body())).await;

    let dead = MockServer::start().await;
    let mut cfg = config(&spoolman, None);
    cfg.klipper_url = Some(dead.uri());
    drop(dead);

    let poller = Poller::new(cfg).unwrap();
    let snap = poller.poll_once().await;

    let klipper = snap.klipper.unwrap();
    assert_eq!(klipper.active_spool, SpoolSelection::FetchFailed);
    assert_eq!(klipper.api_version, None);
    assert_eq!(snap.spools.map(|s| s.len()), Some(3));
}

// ── Health check ────────────────────────────────────────────────────

#[tokio::test]
async fn test_check_health_unhealthy() {
    let spoolman = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "starting"})))
        .mount(&spoolman)
        .await;

    let poller = Poller::new(config(&spoolman, None)).unwrap();
    match poller.check_health().await {
        Err(CoreError::Unhealthy { status, url }) => {
            assert_eq!(status, "starting");
            assert!(url.ends_with('/'));
        }
        other => panic!("expected Unhealthy, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_check_health_wrong_content_type() {
    let spoolman = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("healthy"))
        .mount(&spoolman)
        .await;

    let poller = Poller::new(config(&spoolman, None)).unwrap();
    assert!(matches!(
        poller.check_health().await,
        Err(CoreError::UnexpectedContentType { .. })
    ));
}

// ── Background loop ─────────────────────────────────────────────────

#[tokio::test]
async fn test_start_publishes_first_snapshot_immediately() {
    let spoolman = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(200).set_body_json(spools_body())).await;

    let mut cfg = config(&spoolman, None);
    cfg.update_interval = Duration::from_secs(3600);
    let poller = Poller::new(cfg).unwrap();
    let mut rx = poller.subscribe();
    assert!(poller.latest().is_none());

    poller.start().await;
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("no snapshot published")
        .unwrap();

    let snap = rx.borrow_and_update().clone().unwrap();
    assert_eq!(snap.spools.as_ref().map(Vec::len), Some(3));
    assert!(poller.latest().is_some());

    poller.shutdown().await;
}

#[tokio::test]
async fn test_start_polls_repeatedly() {
    let spoolman = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(200).set_body_json(spools_body())).await;

    let mut cfg = config(&spoolman, None);
    cfg.update_interval = Duration::from_millis(50);
    let poller = Poller::new(cfg).unwrap();
    let mut rx = poller.subscribe();

    poller.start().await;
    for _ in 0..3 {
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("poll loop stalled")
            .unwrap();
    }
    poller.shutdown().await;

    let requests = spoolman.received_requests().await.unwrap();
    assert!(requests.len() >= 3, "only {} polls", requests.len());
}

#[tokio::test]
async fn test_restart_after_shutdown_polls_again() {
    let spoolman = MockServer::start().await;
    mount_spools(&spoolman, ResponseTemplate::new(200).set_body_json(spools_body())).await;

    let mut cfg = config(&spoolman, None);
    cfg.update_interval = Duration::from_secs(3600);
    let poller = Poller::new(cfg).unwrap();
    let mut rx = poller.subscribe();

    poller.start().await;
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("first run published nothing")
        .unwrap();
    poller.shutdown().await;

    poller.start().await;
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("restarted loop published nothing")
        .unwrap();
    poller.shutdown().await;

    let requests = spoolman.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}
