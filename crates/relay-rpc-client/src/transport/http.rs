//! HTTP transport implementation backed by `reqwest`

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::transport::{
    JSON_CONTENT_TYPE, StatisticsRecorder, Transport, TransportResponse, TransportStatistics,
};

/// HTTP transport posting JSON-RPC envelopes to a single endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client
    client: Client,
    /// Server endpoint URL
    endpoint: Url,
    /// Statistics
    stats: StatisticsRecorder,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new(endpoint: &str) -> TransportResult<Self> {
        Self::with_config(endpoint, &ClientConfig::default())
    }

    /// Create a new HTTP transport honouring timeouts and headers from `config`
    pub fn with_config(endpoint: &str, config: &ClientConfig) -> TransportResult<Self> {
        let url = parse_endpoint(endpoint)?;

        let mut builder = Client::builder()
            .connect_timeout(config.timeouts.connect)
            .timeout(config.timeouts.request)
            .default_headers(default_headers(config)?);

        if let Some(user_agent) = &config.connection.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self::from_parts(url, client))
    }

    /// Create HTTP transport with custom client
    pub fn with_client(endpoint: &str, client: Client) -> TransportResult<Self> {
        Ok(Self::from_parts(parse_endpoint(endpoint)?, client))
    }

    fn from_parts(endpoint: Url, client: Client) -> Self {
        Self {
            client,
            endpoint,
            stats: StatisticsRecorder::default(),
        }
    }

    /// Read status, headers and body of a completed exchange
    async fn read_response(&self, response: Response) -> TransportResult<TransportResponse> {
        let status = response.status();
        let headers = collect_headers(response.headers());

        let body = match response.bytes().await {
            Ok(body) => Some(body),
            Err(e) if e.is_timeout() => return Err(TransportError::Timeout),
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "Failed to read response body");
                None
            }
        };

        Ok(TransportResponse::new(
            status.as_u16(),
            status.canonical_reason().map(str::to_string),
            headers,
            body,
        ))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn post(&self, body: Bytes) -> TransportResult<TransportResponse> {
        let start_time = Instant::now();
        self.stats.record_request();

        debug!(endpoint = %self.endpoint, bytes = body.len(), "Sending HTTP POST");

        let response = match self.client.post(self.endpoint.clone()).body(body).send().await {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_error(e.to_string());
                return Err(e.into());
            }
        };

        let response = match self.read_response(response).await {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_error(e.to_string());
                return Err(e);
            }
        };

        let elapsed = start_time.elapsed();
        self.stats.record_response(elapsed);

        debug!(
            status = response.status,
            elapsed_ms = elapsed.as_millis(),
            "HTTP exchange completed"
        );

        Ok(response)
    }

    fn statistics(&self) -> TransportStatistics {
        self.stats.snapshot()
    }
}

/// Parse and check an endpoint URL (http or https only)
pub(crate) fn parse_endpoint(endpoint: &str) -> TransportResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::InvalidEndpoint(format!(
            "unsupported scheme for HTTP transport: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Headers sent with every request: JSON content negotiation plus configured extras
pub(crate) fn default_headers(config: &ClientConfig) -> TransportResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (name, value) in config.connection.headers.iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Build(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Build(format!("invalid value for header '{}': {}", name, e)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

pub(crate) fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}
