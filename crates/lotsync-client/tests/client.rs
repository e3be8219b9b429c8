//! Integration tests for `LotClient` using wiremock HTTP mocks.

use lotsync_client::{run_cycle, FetchError, LotClient, PollScheduler, SyncStatus};
use lotsync_core::Pipeline;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> LotClient {
    LotClient::new(base_url, "test-key", 5, "lotsync-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn get_lot_count_sends_api_key_and_returns_body() {
    let server = MockServer::start().await;
    let body = json!([
        { "lot": "G", "available_spaces": 70, "capacity": 169, "occupied_spaces": 99, "occupancy_pct": 58.6 }
    ]);

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .and(header("X-API-Key", "test-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let value = client.get_lot_count().await.expect("should return body");
    assert_eq!(value, body);
}

#[tokio::test]
async fn trailing_slash_base_url_hits_single_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/", server.uri()));
    client.get_lot_count().await.expect("should succeed");
}

#[tokio::test]
async fn unauthorized_maps_to_distinct_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key." })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_lot_count().await.unwrap_err();
    assert!(matches!(err, FetchError::Unauthorized), "got: {err:?}");
    assert_eq!(err.user_message(), "Unauthorized: Invalid or missing API key");
}

#[tokio::test]
async fn other_statuses_carry_code_and_reason() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_lot_count().await.unwrap_err();
    match err {
        FetchError::FetchFailed {
            status,
            ref status_text,
        } => {
            assert_eq!(status, 503);
            assert_eq!(status_text, "Service Unavailable");
        }
        other => panic!("expected FetchFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_lot_count().await.unwrap_err();
    assert!(matches!(err, FetchError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = test_client(&uri);
    let err = client.get_lot_count().await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got: {err:?}");
    assert!(err.user_message().starts_with("Network error:"));
}

#[tokio::test]
async fn run_cycle_filters_and_orders_backend_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lot": "J", "occupancy_pct": 92 },
            { "lot": "Z", "occupancy_pct": 10 },
            { "lot": "G", "occupancy_pct": 45.4 },
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = run_cycle(&client, &Pipeline::default())
        .await
        .expect("cycle should succeed");
    let summary: Vec<(&str, u8)> = records
        .iter()
        .map(|r| (r.lot_id.as_str(), r.occupancy_pct))
        .collect();
    assert_eq!(summary, vec![("G", 45), ("J", 92)]);
}

#[tokio::test]
async fn run_cycle_treats_scalar_body_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = run_cycle(&client, &Pipeline::default()).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn scheduler_publishes_ready_from_live_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getLotCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lot": "H", "occupancy_pct": 70 },
        ])))
        .mount(&server)
        .await;

    let mut scheduler = PollScheduler::new(
        test_client(&server.uri()),
        Pipeline::default(),
        std::time::Duration::from_secs(60),
    );
    let mut rx = scheduler.subscribe();
    scheduler.start().unwrap();

    rx.changed().await.expect("status update");
    let status = rx.borrow_and_update().clone();
    match status {
        SyncStatus::Ready(snapshot) => {
            assert_eq!(snapshot.records.len(), 1);
            assert_eq!(snapshot.records[0].lot_id, "H");
        }
        other => panic!("expected Ready, got: {other:?}"),
    }

    scheduler.shutdown().await;
}
