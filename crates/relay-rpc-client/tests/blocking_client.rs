//! Blocking client against a mock HTTP server.
//!
//! The mock server needs a runtime while the blocking client must not run inside
//! one, so each exchange happens on a plain OS thread.

#![cfg(feature = "blocking")]

use relay_rpc_client::error_codes::TRANSPORT_ERROR;
use relay_rpc_client::{
    Batch, BlockingJsonRpcClient, ClientConfig, ClientResult, ErrorObject, Request, RequestParams,
    Response,
};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run `f` with a fresh blocking client on its own thread
async fn on_thread<R, F>(endpoint: String, config: ClientConfig, f: F) -> R
where
    R: Send + 'static,
    F: FnOnce(BlockingJsonRpcClient) -> R + Send + 'static,
{
    let handle = std::thread::spawn(move || {
        let client = BlockingJsonRpcClient::with_config(&endpoint, config).unwrap();
        f(client)
    });
    tokio::task::spawn_blocking(move || handle.join().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": null,
            "result": "pong"
        })))
        .mount(&server)
        .await;

    let response: ClientResult<Option<Response<String>>> =
        on_thread(server.uri(), ClientConfig::default(), |client| {
            client.send(&Request::call("ping", RequestParams::new()))
        })
        .await;

    let response = response.unwrap().unwrap();
    assert_eq!(response.result().map(String::as_str), Some("pong"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_batch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let batch = Batch::combine(vec![
        Request::call("a", RequestParams::new()),
        Request::call("b", RequestParams::new()),
    ]);
    let ids: Vec<_> = batch.iter().map(|r| r.id().cloned()).collect();

    let responses: Vec<Response<Value>> =
        on_thread(server.uri(), ClientConfig::default(), move |client| {
            client.send_batch(&batch)
        })
        .await
        .unwrap();

    assert_eq!(responses.len(), 2);
    let expected = ErrorObject::new(TRANSPORT_ERROR, "503 - Service Unavailable", None);
    for (response, id) in responses.iter().zip(ids) {
        assert_eq!(response.id, id);
        assert_eq!(response.error_object(), Some(&expected));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_notification() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = on_thread(server.uri(), ClientConfig::default(), |client| {
        client.send::<Value>(&Request::notification("ping", RequestParams::new()))
    })
    .await
    .unwrap();
    assert!(response.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_request_timeout(Duration::from_millis(200));
    let error = on_thread(server.uri(), config, |client| {
        client
            .send::<Value>(&Request::call("slow", RequestParams::new()))
            .unwrap_err()
    })
    .await;
    assert!(error.is_timeout());
}
