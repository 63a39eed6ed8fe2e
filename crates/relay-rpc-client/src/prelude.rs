//! # JSON-RPC Client Prelude
//!
//! Convenient re-exports of the most commonly used client types and traits.
//!
//! ```rust
//! use relay_rpc_client::prelude::*;
//! ```

// Core client types
pub use crate::blocking::BlockingJsonRpcClient;
pub use crate::callback::{BatchCallback, ResponseCallback};
pub use crate::client::{ClientBuilder, JsonRpcClient};
pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, ClientResult, TransportError};

// Transport types
pub use crate::transport::{BlockingTransport, Transport, TransportResponse};

// Re-export protocol types for convenience
pub use relay_rpc_protocol::prelude::*;

pub use std::time::Duration;
