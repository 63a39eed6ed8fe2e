//! Blocking JSON-RPC client
//!
//! Same semantics as [`JsonRpcClient`](crate::JsonRpcClient), for callers without
//! an async runtime. Do not use it from inside one.

use bytes::Bytes;
use relay_rpc_protocol::encode::{encode, encode_batch, to_vec};
use relay_rpc_protocol::{Batch, Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::CallState;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::exchange::{interpret_batch, interpret_single};
use crate::transport::{
    BlockingTransport, SharedBlockingTransport, TransportResponse, TransportStatistics,
};

#[derive(Clone)]
pub struct BlockingJsonRpcClient {
    transport: SharedBlockingTransport,
    config: Arc<ClientConfig>,
}

impl fmt::Debug for BlockingJsonRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingJsonRpcClient")
            .field("endpoint", &self.transport.endpoint())
            .finish()
    }
}

impl BlockingJsonRpcClient {
    /// Create a client posting to `endpoint` with default configuration
    #[cfg(feature = "blocking")]
    pub fn new(endpoint: &str) -> ClientResult<Self> {
        Self::with_config(endpoint, ClientConfig::default())
    }

    /// Create a client posting to `endpoint`; timeouts are enforced by the HTTP client
    #[cfg(feature = "blocking")]
    pub fn with_config(endpoint: &str, config: ClientConfig) -> ClientResult<Self> {
        let transport = crate::transport::BlockingHttpTransport::with_config(endpoint, &config)?;
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: impl BlockingTransport + 'static, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub fn statistics(&self) -> TransportStatistics {
        self.transport.statistics()
    }

    /// Send a single request, blocking until the exchange completes
    pub fn send<T: DeserializeOwned>(&self, request: &Request) -> ClientResult<Option<Response<T>>> {
        let response = self.exchange(encode(request), request.method())?;
        Ok(interpret_single(request, &response))
    }

    /// Send a batch, blocking until the exchange completes
    pub fn send_batch<T: DeserializeOwned>(&self, batch: &Batch) -> ClientResult<Vec<Response<T>>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let response = self.exchange(encode_batch(batch), "batch")?;
        Ok(interpret_batch(batch, &response))
    }

    fn exchange(&self, envelope: Value, label: &str) -> ClientResult<TransportResponse> {
        let body = Bytes::from(to_vec(&envelope)?);
        debug!(method = label, state = %CallState::Built, "JSON-RPC exchange");
        if self.config.logging.log_requests {
            debug!(method = label, body = %String::from_utf8_lossy(&body), "Request body");
        }

        debug!(method = label, state = %CallState::Sent, "JSON-RPC exchange");
        match self.transport.post(body) {
            Ok(response) => {
                debug!(
                    method = label,
                    state = %CallState::Completed,
                    status = response.status,
                    "JSON-RPC exchange"
                );
                if self.config.logging.log_responses
                    && let Some(body) = &response.body
                {
                    debug!(method = label, body = %String::from_utf8_lossy(body), "Response body");
                }
                Ok(response)
            }
            Err(e) => {
                warn!(method = label, state = %CallState::Failed, error = %e, "JSON-RPC exchange");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TransportError, TransportResult};
    use relay_rpc_protocol::{ErrorObject, RequestParams};

    struct Unreachable;

    impl BlockingTransport for Unreachable {
        fn endpoint(&self) -> &str {
            "http://unreachable.test/rpc"
        }

        fn post(&self, _body: Bytes) -> TransportResult<TransportResponse> {
            Err(TransportError::Connect("connection refused".to_string()))
        }
    }

    struct ServerError;

    impl BlockingTransport for ServerError {
        fn endpoint(&self) -> &str {
            "http://broken.test/rpc"
        }

        fn post(&self, _body: Bytes) -> TransportResult<TransportResponse> {
            let mut response = TransportResponse::json(500, "oops");
            response.reason = Some("Internal Server Error".to_string());
            Ok(response)
        }
    }

    #[test]
    fn test_transport_failure_propagates() {
        let client = BlockingJsonRpcClient::with_transport(Unreachable, ClientConfig::default());
        let error = client
            .send::<Value>(&Request::call("start", RequestParams::new()))
            .unwrap_err();
        assert!(error.is_transport_error());
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_batch_failure_is_replicated() {
        let client = BlockingJsonRpcClient::with_transport(ServerError, ClientConfig::default());
        let batch = Batch::combine(vec![
            Request::call("a", RequestParams::new()),
            Request::call("b", RequestParams::new()),
        ]);

        let responses = client.send_batch::<Value>(&batch).unwrap();
        let expected = ErrorObject::new(-32000, "500 - Internal Server Error", None);
        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r.error_object() == Some(&expected)));
        assert_eq!(responses[0].id.as_ref(), batch.requests()[0].id());
    }

    #[test]
    fn test_empty_batch() {
        let client = BlockingJsonRpcClient::with_transport(Unreachable, ClientConfig::default());
        assert!(client.send_batch::<Value>(&Batch::empty()).unwrap().is_empty());
    }
}
