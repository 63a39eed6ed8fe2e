//! Transport layer for the JSON-RPC client
//!
//! A transport performs one HTTP POST per exchange and hands back the status,
//! headers and body untouched. Interpreting them is the job of
//! [`exchange`](crate::exchange).

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportResult;

pub mod http;
#[cfg(feature = "blocking")]
pub mod blocking;

pub use http::HttpTransport;
#[cfg(feature = "blocking")]
pub use blocking::BlockingHttpTransport;

/// Content type sent with every request body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Raw outcome of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase, when known
    pub reason: Option<String>,
    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Response body; `None` when the body could not be read
    pub body: Option<Bytes>,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16, reason: Option<String>, headers: HashMap<String, String>, body: Option<Bytes>) -> Self {
        Self {
            status,
            reason,
            headers,
            body,
        }
    }

    /// A response carrying a JSON body
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self::new(status, None, headers, Some(body.into()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether the content type announces JSON
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Asynchronous HTTP transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Endpoint the transport posts to
    fn endpoint(&self) -> &str;

    /// POST `body` to the endpoint and return the raw response
    async fn post(&self, body: Bytes) -> TransportResult<TransportResponse>;

    /// Get transport statistics
    fn statistics(&self) -> TransportStatistics {
        TransportStatistics::default()
    }
}

/// Synchronous HTTP transport
pub trait BlockingTransport: Send + Sync {
    /// Endpoint the transport posts to
    fn endpoint(&self) -> &str;

    /// POST `body` to the endpoint, blocking until the response is read
    fn post(&self, body: Bytes) -> TransportResult<TransportResponse>;

    /// Get transport statistics
    fn statistics(&self) -> TransportStatistics {
        TransportStatistics::default()
    }
}

/// Type alias for a shared transport
pub type SharedTransport = Arc<dyn Transport>;

/// Type alias for a shared blocking transport
pub type SharedBlockingTransport = Arc<dyn BlockingTransport>;

/// Transport statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportStatistics {
    /// Number of requests sent
    pub requests_sent: u64,
    /// Number of responses received
    pub responses_received: u64,
    /// Number of transport errors encountered
    pub errors: u64,
    /// Average response time
    pub avg_response_time_ms: f64,
    /// Last error message
    pub last_error: Option<String>,
}

/// Shared, thread-safe statistics accumulator used by the HTTP transports
#[derive(Debug, Clone, Default)]
pub(crate) struct StatisticsRecorder {
    stats: Arc<Mutex<TransportStatistics>>,
}

impl StatisticsRecorder {
    fn update<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut TransportStatistics),
    {
        let mut stats = self.stats.lock();
        update_fn(&mut stats);
    }

    pub(crate) fn record_request(&self) {
        self.update(|stats| stats.requests_sent += 1);
    }

    pub(crate) fn record_response(&self, elapsed: Duration) {
        self.update(|stats| {
            stats.responses_received += 1;
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            let n = stats.responses_received as f64;
            stats.avg_response_time_ms += (elapsed_ms - stats.avg_response_time_ms) / n;
        });
    }

    pub(crate) fn record_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|stats| {
            stats.errors += 1;
            stats.last_error = Some(message);
        });
    }

    pub(crate) fn snapshot(&self) -> TransportStatistics {
        self.stats.lock().clone()
    }
}
