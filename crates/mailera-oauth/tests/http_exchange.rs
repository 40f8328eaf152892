//! Integration tests for the HTTP exchange client.
//!
//! An `httpmock` server stands in for the exchange service so the full
//! request and response path is exercised without external network access.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mailera_oauth::{
    CallbackHandler, CallbackResult, CallbackStatus, Error, ExchangeRequest, HttpExchange,
    Location, MemoryLocation, TokenExchange,
};

const REDIRECT: &str = "https://mailera.example/callback";
const HOOK: &str = "/webhook/oauth-callback";

fn exchange_for(url: &str) -> HttpExchange {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpExchange::from_url(url).unwrap().with_client(client)
}

fn request() -> ExchangeRequest {
    ExchangeRequest {
        code: "abc123".into(),
        redirect_uri: REDIRECT.into(),
    }
}

#[tokio::test]
async fn posts_json_and_reads_identity() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(HOOK)
                .header("content-type", "application/json")
                .json_body(json!({"code": "abc123", "redirect_uri": REDIRECT}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"email": "a@b.com", "name": "A"}));
        })
        .await;

    let response = exchange_for(&server.url(HOOK))
        .exchange(&request())
        .await
        .unwrap();

    assert_eq!(response.email.as_deref(), Some("a@b.com"));
    assert_eq!(response.name.as_deref(), Some("A"));
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_identity_fields_deserialize_as_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(HOOK);
            then.status(200).json_body(json!({}));
        })
        .await;

    let response = exchange_for(&server.url(HOOK))
        .exchange(&request())
        .await
        .unwrap();

    assert_eq!(response.email, None);
    assert_eq!(response.name, None);
}

#[tokio::test]
async fn non_success_status_is_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(HOOK);
            then.status(500).json_body(json!({}));
        })
        .await;

    let err = exchange_for(&server.url(HOOK))
        .exchange(&request())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Exchange { status } if status.as_u16() == 500));
}

#[tokio::test]
async fn callback_success_end_to_end() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(HOOK)
                .json_body(json!({"code": "abc123", "redirect_uri": REDIRECT}));
            then.status(200)
                .json_body(json!({"email": "a@b.com", "name": "A"}));
        })
        .await;

    let mut handler = CallbackHandler::new(exchange_for(&server.url(HOOK)), REDIRECT)
        .with_success_delay(Duration::from_millis(20));
    let mut location = MemoryLocation::new("/callback?code=abc123");
    let (tx, mut rx) = mpsc::unbounded_channel();

    handler.handle(&mut location, tx).await;

    assert_eq!(
        rx.recv().await.unwrap(),
        CallbackResult::Success {
            email: "a@b.com".into(),
            name: "A".into()
        }
    );
    assert!(rx.recv().await.is_none());
    assert_eq!(location.current(), "/callback");
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn callback_server_error_end_to_end() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(HOOK);
            then.status(500).body("oops");
        })
        .await;

    let mut handler = CallbackHandler::new(exchange_for(&server.url(HOOK)), REDIRECT);
    let mut location = MemoryLocation::new("/callback?code=abc123");
    let (tx, mut rx) = mpsc::unbounded_channel();

    let status = handler.handle(&mut location, tx).await;

    assert!(matches!(status, CallbackStatus::Failure { .. }));
    assert_eq!(
        rx.try_recv().unwrap(),
        CallbackResult::Failure {
            reason: "Registration failed".into()
        }
    );
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn callback_malformed_body_end_to_end() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(HOOK);
            then.status(200).body("not json");
        })
        .await;

    let mut handler = CallbackHandler::new(exchange_for(&server.url(HOOK)), REDIRECT);
    let mut location = MemoryLocation::new("/callback?code=abc123");
    let (tx, mut rx) = mpsc::unbounded_channel();

    handler.handle(&mut location, tx).await;

    assert_eq!(
        rx.try_recv().unwrap(),
        CallbackResult::Failure {
            reason: "Registration failed".into()
        }
    );
}

#[tokio::test]
async fn denied_redirect_never_calls_service() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(HOOK);
            then.status(200).json_body(json!({}));
        })
        .await;

    let mut handler = CallbackHandler::new(exchange_for(&server.url(HOOK)), REDIRECT);
    let mut location = MemoryLocation::new("/callback?error=access_denied");
    let (tx, mut rx) = mpsc::unbounded_channel();

    handler.handle(&mut location, tx).await;

    assert_eq!(
        rx.try_recv().unwrap(),
        CallbackResult::Failure {
            reason: "access_denied".into()
        }
    );
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn callback_unreachable_service() {
    // Bind then release a port so nothing is listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let exchange = exchange_for(&format!("http://{addr}/hook"));
    let mut handler = CallbackHandler::new(exchange, REDIRECT);
    let mut location = MemoryLocation::new("/callback?code=abc123");
    let (tx, mut rx) = mpsc::unbounded_channel();

    handler.handle(&mut location, tx).await;

    assert_eq!(
        rx.try_recv().unwrap(),
        CallbackResult::Failure {
            reason: "Registration failed".into()
        }
    );
}
