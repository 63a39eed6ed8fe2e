//! End-to-end tests of the async client against a mock HTTP server

use relay_rpc_client::error_codes::{INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, TRANSPORT_ERROR};
use relay_rpc_client::{
    Batch, ClientConfig, ClientResult, ErrorObject, JsonRpcClient, Request, RequestParams,
    Response, encode, encode_batch,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Outcome {
    value: String,
}

/// Answers each call with `result`, echoing the call's id
struct EchoResult(Value);

impl Respond for EchoResult {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let envelope: Value = request.body_json().unwrap_or(Value::Null);
        let reply = |call: &Value| json!({"jsonrpc": "2.0", "id": call["id"].clone(), "result": self.0.clone()});

        let body = match &envelope {
            Value::Array(calls) => Value::Array(
                calls
                    .iter()
                    .filter(|call| call.get("id").is_some())
                    .map(reply)
                    .collect(),
            ),
            call => reply(call),
        };
        ResponseTemplate::new(200).set_body_json(body)
    }
}

async fn setup() -> (MockServer, JsonRpcClient) {
    let server = MockServer::start().await;
    let client = JsonRpcClient::new(&format!("{}/rpc", server.uri())).unwrap();
    (server, client)
}

fn start_request() -> Request {
    Request::builder()
        .method("start")
        .param("apiKey", "test-key")
        .build()
}

#[tokio::test]
async fn test_call_success() {
    let (server, client) = setup().await;
    let request = start_request();

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(header("content-type", "application/json; charset=UTF-8"))
        .and(body_json(encode(&request)))
        .respond_with(EchoResult(json!({"value": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let response: Response<Outcome> = client.send(&request).await.unwrap().unwrap();
    assert_eq!(response.id.as_ref(), request.id());
    assert_eq!(response.result(), Some(&Outcome { value: "ok".to_string() }));
    assert_eq!(client.statistics().responses_received, 1);
}

#[tokio::test]
async fn test_not_found_maps_to_method_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = Request::call("missing", RequestParams::new());
    let response: Response<Outcome> = client.send(&request).await.unwrap().unwrap();
    assert_eq!(response.id.as_ref(), request.id());
    assert_eq!(response.error_object().unwrap().code, METHOD_NOT_FOUND);
    assert_eq!(response.error_object().unwrap().message, "Method not found");
}

#[tokio::test]
async fn test_bad_request_maps_to_invalid_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("missing apiKey"))
        .mount(&server)
        .await;

    let response: Response<Outcome> = client.send(&start_request()).await.unwrap().unwrap();
    assert_eq!(response.error_object().unwrap().code, INVALID_PARAMS);
}

#[tokio::test]
async fn test_batch_server_failure_is_replicated() {
    let (server, client) = setup().await;
    let batch = Batch::combine(vec![
        Request::call("a", RequestParams::new()),
        Request::call("b", RequestParams::new()),
        Request::call("c", RequestParams::new()),
    ]);

    Mock::given(method("POST"))
        .and(body_json(encode_batch(&batch)))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let responses: Vec<Response<Outcome>> = client.send_batch(&batch).await.unwrap();
    assert_eq!(responses.len(), 3);
    for (response, request) in responses.iter().zip(batch.iter()) {
        assert_eq!(response.id.as_ref(), request.id());
        assert_eq!(
            response.error_object(),
            Some(&ErrorObject::new(TRANSPORT_ERROR, "500 - Internal Server Error", None))
        );
    }
}

#[tokio::test]
async fn test_batch_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(EchoResult(json!({"value": "done"})))
        .mount(&server)
        .await;

    let batch = Batch::combine(vec![
        Request::call("a", RequestParams::new()),
        Request::notification("b", RequestParams::new()),
        Request::call("c", RequestParams::new()),
    ]);
    let responses: Vec<Response<Outcome>> = client.send_batch(&batch).await.unwrap();

    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(Response::is_success));
    let pairs = relay_rpc_client::correlate(&batch, &responses);
    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|(_, response)| response.is_some()));
}

#[tokio::test]
async fn test_notification_with_empty_body() {
    let (server, client) = setup().await;
    let notification = Request::notification("ping", RequestParams::new());

    Mock::given(method("POST"))
        .and(body_json(encode(&notification)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = client.send::<Value>(&notification).await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_server_error_is_passed_through() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {"code": -32042, "message": "Quota exceeded", "data": {"retryAfter": 60}}
        })))
        .mount(&server)
        .await;

    let response: Response<Outcome> = client.send(&start_request()).await.unwrap().unwrap();
    let error = response.error_object().unwrap();
    assert_eq!(error, &ErrorObject::new(-32042, "Quota exceeded", None));
    assert_eq!(error.data, Some(json!({"retryAfter": 60})));
}

#[tokio::test]
async fn test_html_success_is_a_parse_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let request = start_request();
    let response: Response<Outcome> = client.send(&request).await.unwrap().unwrap();
    assert_eq!(response.id.as_ref(), request.id());
    assert_eq!(response.error_object().unwrap().code, PARSE_ERROR);
}

#[tokio::test]
async fn test_timeout_is_an_error() {
    let server = MockServer::start().await;
    let config = ClientConfig::default().with_request_timeout(Duration::from_millis(200));
    let client = JsonRpcClient::builder()
        .endpoint(server.uri())
        .config(config)
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let error = client.send::<Outcome>(&start_request()).await.unwrap_err();
    assert!(error.is_timeout());
}

#[tokio::test]
async fn test_connection_refused_is_an_error() {
    let client = JsonRpcClient::new("http://127.0.0.1:9/rpc").unwrap();
    let error = client.send::<Value>(&start_request()).await.unwrap_err();
    assert!(error.is_transport_error());
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let server = MockServer::start().await;
    let client = JsonRpcClient::builder()
        .endpoint(server.uri())
        .config(ClientConfig::default().with_header("X-Api-Key", "secret"))
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .and(header("x-api-key", "secret"))
        .and(header("accept", "application/json"))
        .respond_with(EchoResult(json!({"value": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let response: Response<Outcome> = client.send(&start_request()).await.unwrap().unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_callback_receives_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(EchoResult(json!({"value": "called back"})))
        .mount(&server)
        .await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    client
        .send_with_callback(
            start_request(),
            move |result: ClientResult<Option<Response<Outcome>>>| {
                let _ = tx.send(result);
            },
        )
        .await
        .unwrap();

    let response = rx.await.unwrap().unwrap().unwrap();
    assert_eq!(response.result().map(|o| o.value.as_str()), Some("called back"));
}

#[tokio::test]
async fn test_batch_callback_receives_failure() {
    let client = JsonRpcClient::new("http://127.0.0.1:9/rpc").unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel();

    let batch = Batch::combine(vec![Request::call("a", RequestParams::new())]);
    client
        .send_batch_with_callback(batch, move |result: ClientResult<Vec<Response<Value>>>| {
            let _ = tx.send(result.is_err());
        })
        .await
        .unwrap();

    assert!(rx.await.unwrap());
}
