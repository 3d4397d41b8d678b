//! Relay dispatcher against a mock relay

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::time::Duration;
use studio_booking::notification::{DispatchOutcome, NotificationDispatcher, RelayNotificationDispatcher};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RELAY_PATH: &str = "/api/send-whatsapp-message";

fn relay(server: &MockServer) -> RelayNotificationDispatcher {
    RelayNotificationDispatcher::new(format!("{}{RELAY_PATH}", server.uri()))
}

#[tokio::test]
async fn posts_normalized_target_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RELAY_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "targetNumber": "5583987654321",
            "message": "Your booking is confirmed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = relay(&server)
        .dispatch(
            "+55 (83) 98765-4321",
            "Your booking is confirmed".to_string(),
            Duration::from_secs(2),
        )
        .await;

    assert_eq!(outcome, DispatchOutcome::Delivered);
}

#[tokio::test]
async fn non_success_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RELAY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("whatsapp session down"))
        .mount(&server)
        .await;

    let outcome = relay(&server)
        .dispatch("5583981927402", "hi".to_string(), Duration::from_secs(2))
        .await;

    assert_eq!(outcome, DispatchOutcome::Rejected { status: 503 });
}

#[tokio::test]
async fn slow_relay_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RELAY_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let outcome = relay(&server)
        .dispatch("5583981927402", "hi".to_string(), Duration::from_millis(100))
        .await;

    assert_eq!(outcome, DispatchOutcome::TimedOut);
}

#[tokio::test]
async fn stalled_response_body_times_out() {
    // Headers arrive at once, the promised body never does
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{\"suc")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let dispatcher = RelayNotificationDispatcher::new(format!("http://{address}{RELAY_PATH}"));
    let outcome = dispatcher
        .dispatch("5583981927402", "hi".to_string(), Duration::from_millis(200))
        .await;

    assert_eq!(outcome, DispatchOutcome::TimedOut);
    server.abort();
}

#[tokio::test]
async fn unreachable_relay_is_a_transport_failure() {
    // Port 9 (discard) is not listening in the test environment
    let dispatcher = RelayNotificationDispatcher::new("http://127.0.0.1:9/api/send-whatsapp-message");
    let outcome = dispatcher
        .dispatch("5583981927402", "hi".to_string(), Duration::from_secs(2))
        .await;

    assert!(matches!(outcome, DispatchOutcome::TransportFailed { .. }));
}

#[tokio::test]
async fn target_without_digits_never_reaches_the_relay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = relay(&server)
        .dispatch("ask at the desk", "hi".to_string(), Duration::from_secs(2))
        .await;

    assert_eq!(outcome, DispatchOutcome::InvalidTarget);
}
