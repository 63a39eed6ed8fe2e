//! # JSON-RPC Protocol Prelude
//!
//! Convenient re-exports of the most commonly used protocol types.
//!
//! ```rust
//! use relay_rpc_protocol::prelude::*;
//! ```

pub use crate::batch::{Batch, correlate};
pub use crate::encode::{encode, encode_batch};
pub use crate::error::{ErrorCode, ErrorObject, ResponseError, ResultDecodeError, SchemaError};
pub use crate::error_map::{map_http_status, parse_error, replicate_for_batch};
pub use crate::request::{Request, RequestBuilder, RequestKind, RequestParams};
pub use crate::response::{Response, ResponsePayload, decode_batch, decode_one, decode_one_with};
pub use crate::types::RequestId;
pub use crate::validate::assert_valid;

// Standard error codes
pub use crate::error_codes::*;
