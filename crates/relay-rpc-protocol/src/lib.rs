//! # JSON-RPC 2.0 Client Protocol Layer
//!
//! A pure, transport-agnostic implementation of the client side of JSON-RPC 2.0.
//! This crate builds and encodes request envelopes, validates incoming envelopes
//! against the 2.0 schema and decodes them into typed responses. It performs no I/O.
//!
//! ## Features
//! - Calls with freshly generated UUID ids and id-less notifications
//! - Batches with an explicit empty sentinel
//! - Discriminated schema validation errors
//! - Per-element isolation when decoding batch responses
//! - HTTP status to JSON-RPC error mapping

pub mod batch;
pub mod encode;
pub mod error;
pub mod error_map;
pub mod prelude;
pub mod request;
pub mod response;
pub mod types;
pub mod validate;

// Re-export main types
pub use batch::{Batch, correlate};
pub use encode::{encode, encode_batch};
pub use error::{ErrorCode, ErrorObject, ResponseError, ResultDecodeError, SchemaError};
pub use error_map::{map_http_status, replicate_for_batch};
pub use request::{Request, RequestBuilder, RequestKind, RequestParams};
pub use response::{
    Response, ResponsePayload, decode_batch, decode_batch_with, decode_one, decode_one_with,
};
pub use types::RequestId;
pub use validate::assert_valid;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;

    /// Code used for HTTP failures that have no dedicated mapping
    pub const TRANSPORT_ERROR: i64 = SERVER_ERROR_END;
}
