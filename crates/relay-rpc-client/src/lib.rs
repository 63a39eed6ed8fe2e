//! # JSON-RPC 2.0 HTTP Client
//!
//! A client for JSON-RPC 2.0 services reachable over HTTP. Requests and batches
//! are posted to a single endpoint and every completed exchange is turned into
//! typed responses, with HTTP failures mapped onto JSON-RPC error objects.
//!
//! ## Features
//!
//! - **Three call modes**: async/await, completion callbacks and blocking
//! - **Batches**: one HTTP exchange, per-element decoding, per-request error replication
//! - **Typed results**: `result` decoded into any `DeserializeOwned` type
//! - **Errors as values**: only a failed exchange (connect, I/O, timeout) is an `Err`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relay_rpc_client::{JsonRpcClient, Request};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JsonRpcClient::new("http://localhost:8080/rpc")?;
//!
//!     let request = Request::builder()
//!         .method("start")
//!         .param("apiKey", "secret")
//!         .build();
//!
//!     if let Some(response) = client.send::<serde_json::Value>(&request).await? {
//!         println!("result: {:?}", response.into_result());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Blocking
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use relay_rpc_client::{BlockingJsonRpcClient, Request, RequestParams};
//!
//! let client = BlockingJsonRpcClient::new("http://localhost:8080/rpc")?;
//! let ping = Request::notification("ping", RequestParams::new());
//! assert!(client.send::<serde_json::Value>(&ping)?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod prelude;
pub mod transport;

// Re-export main types
pub use blocking::BlockingJsonRpcClient;
pub use callback::{BatchCallback, ResponseCallback};
pub use client::{CallState, ClientBuilder, JsonRpcClient};
pub use config::{ClientConfig, ConnectionConfig, LoggingConfig, TimeoutConfig};
pub use error::{ClientError, ClientResult, TransportError, TransportResult};

// Re-export transport types
pub use transport::{BlockingTransport, Transport, TransportResponse, TransportStatistics};

// Re-export protocol types for convenience
pub use relay_rpc_protocol::*;
