//! Main JSON-RPC client implementation

use bytes::Bytes;
use relay_rpc_protocol::encode::{encode, encode_batch, to_vec};
use relay_rpc_protocol::{Batch, Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::callback::{BatchCallback, ResponseCallback, deliver, deliver_batch};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, TransportError};
use crate::exchange::{interpret_batch, interpret_single};
use crate::transport::{
    HttpTransport, SharedTransport, Transport, TransportResponse, TransportStatistics,
};

/// Lifecycle of a single exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// Envelope encoded, nothing sent yet
    Built,
    /// Body handed to the transport
    Sent,
    /// HTTP exchange finished, whatever the status
    Completed,
    /// No HTTP exchange completed
    Failed,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Built => write!(f, "built"),
            CallState::Sent => write!(f, "sent"),
            CallState::Completed => write!(f, "completed"),
            CallState::Failed => write!(f, "failed"),
        }
    }
}

/// Asynchronous JSON-RPC 2.0 client bound to one endpoint.
///
/// Cheap to clone; clones share the underlying transport and its connection pool.
#[derive(Clone)]
pub struct JsonRpcClient {
    /// Transport layer
    transport: SharedTransport,
    /// Configuration
    config: Arc<ClientConfig>,
    /// Runtime that runs callback exchanges
    runtime: Option<Handle>,
}

impl fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("endpoint", &self.transport.endpoint())
            .field("config", &self.config)
            .finish()
    }
}

impl JsonRpcClient {
    /// Create a client posting to `endpoint` over HTTP with default configuration
    pub fn new(endpoint: &str) -> ClientResult<Self> {
        Self::builder().endpoint(endpoint).build()
    }

    /// Create a client over an existing transport
    pub fn with_transport(transport: impl Transport + 'static, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get transport statistics
    pub fn statistics(&self) -> TransportStatistics {
        self.transport.statistics()
    }

    /// Send a single request.
    ///
    /// Returns `Ok(None)` when a notification is accepted. HTTP failures, bad
    /// bodies and server errors come back as error responses; only a failed
    /// exchange (connect, I/O, timeout) is an `Err`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> ClientResult<Option<Response<T>>> {
        let response = self.exchange(encode(request), request.method()).await?;
        Ok(interpret_single(request, &response))
    }

    /// Send a batch in one HTTP exchange.
    ///
    /// An empty batch is answered locally with no responses.
    pub async fn send_batch<T: DeserializeOwned>(
        &self,
        batch: &Batch,
    ) -> ClientResult<Vec<Response<T>>> {
        if batch.is_empty() {
            debug!("Empty batch, nothing to send");
            return Ok(Vec::new());
        }

        let response = self.exchange(encode_batch(batch), "batch").await?;
        Ok(interpret_batch(batch, &response))
    }

    /// Send a single request in the background and hand the outcome to `callback`.
    ///
    /// The exchange runs on the runtime captured when the client was built, so
    /// this may be called from any thread.
    ///
    /// # Panics
    ///
    /// Panics if the client was built outside a Tokio runtime without
    /// [`ClientBuilder::runtime`] and this is called outside one too.
    pub fn send_with_callback<T, C>(&self, request: Request, callback: C) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        C: ResponseCallback<T>,
    {
        let client = self.clone();
        self.spawn(async move {
            let result = client.send::<T>(&request).await;
            deliver(callback, result);
        })
    }

    /// Send a batch in the background and hand the outcome to `callback`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`JsonRpcClient::send_with_callback`].
    pub fn send_batch_with_callback<T, C>(&self, batch: Batch, callback: C) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + 'static,
        C: BatchCallback<T>,
    {
        let client = self.clone();
        self.spawn(async move {
            let result = client.send_batch::<T>(&batch).await;
            deliver_batch(callback, result);
        })
    }

    fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.runtime {
            Some(runtime) => runtime.spawn(task),
            None => tokio::spawn(task),
        }
    }

    /// Post an encoded envelope, bounded by the configured request timeout
    async fn exchange(&self, envelope: Value, label: &str) -> ClientResult<TransportResponse> {
        let body = Bytes::from(to_vec(&envelope)?);
        debug!(method = label, state = %CallState::Built, "JSON-RPC exchange");
        if self.config.logging.log_requests {
            debug!(method = label, body = %String::from_utf8_lossy(&body), "Request body");
        }

        debug!(method = label, state = %CallState::Sent, "JSON-RPC exchange");
        let result = timeout(self.config.timeouts.request, self.transport.post(body))
            .await
            .map_err(|_| TransportError::Timeout)
            .and_then(|result| result);

        match result {
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
                Err(ClientError::Transport(e))
            }
        }
    }
}

/// Builder for creating JSON-RPC clients
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    transport: Option<SharedTransport>,
    config: Option<ClientConfig>,
    runtime: Option<Handle>,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint for the default HTTP transport
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Use `transport` instead of building an HTTP transport; takes precedence over `endpoint`
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Runtime for callback exchanges; defaults to the runtime `build` is called from
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the client
    pub fn build(self) -> ClientResult<JsonRpcClient> {
        let config = self.config.unwrap_or_default();

        let transport: SharedTransport = match (self.transport, self.endpoint) {
            (Some(transport), _) => transport,
            (None, Some(endpoint)) => Arc::new(HttpTransport::with_config(&endpoint, &config)?),
            (None, None) => {
                return Err(ClientError::config(
                    "either an endpoint or a transport must be set",
                ));
            }
        };

        Ok(JsonRpcClient {
            transport,
            config: Arc::new(config),
            runtime: self.runtime.or_else(|| Handle::try_current().ok()),
        })
    }
}
