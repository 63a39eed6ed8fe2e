//! Blocking HTTP transport backed by `reqwest::blocking`
//!
//! Must not be created or used from within an async runtime; `reqwest` panics
//! when its blocking client is driven from a tokio worker thread.

use bytes::Bytes;
use reqwest::blocking::Client;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::transport::http::{collect_headers, default_headers, parse_endpoint};
use crate::transport::{BlockingTransport, StatisticsRecorder, TransportResponse, TransportStatistics};

/// Synchronous counterpart of [`HttpTransport`](crate::transport::HttpTransport)
#[derive(Debug, Clone)]
pub struct BlockingHttpTransport {
    client: Client,
    endpoint: Url,
    stats: StatisticsRecorder,
}

impl BlockingHttpTransport {
    pub fn new(endpoint: &str) -> TransportResult<Self> {
        Self::with_config(endpoint, &ClientConfig::default())
    }

    pub fn with_config(endpoint: &str, config: &ClientConfig) -> TransportResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;

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

        Ok(Self {
            client,
            endpoint,
            stats: StatisticsRecorder::default(),
        })
    }

    fn exchange(&self, body: Bytes) -> TransportResult<TransportResponse> {
        let response = self.client.post(self.endpoint.clone()).body(body).send()?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let body = match response.bytes() {
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

impl BlockingTransport for BlockingHttpTransport {
    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn post(&self, body: Bytes) -> TransportResult<TransportResponse> {
        let start_time = Instant::now();
        self.stats.record_request();

        debug!(endpoint = %self.endpoint, bytes = body.len(), "Sending blocking HTTP POST");

        match self.exchange(body) {
            Ok(response) => {
                self.stats.record_response(start_time.elapsed());
                Ok(response)
            }
            Err(e) => {
                self.stats.record_error(e.to_string());
                Err(e)
            }
        }
    }

    fn statistics(&self) -> TransportStatistics {
        self.stats.snapshot()
    }
}
