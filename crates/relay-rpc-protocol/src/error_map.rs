//! Mapping of HTTP-level failures onto JSON-RPC error objects.
//!
//! | condition                             | code   | message                  |
//! |---------------------------------------|--------|--------------------------|
//! | non-JSON content / unreadable body    | -32700 | `Parse error`            |
//! | HTTP 400                              | -32602 | `Invalid params`         |
//! | HTTP 404                              | -32601 | `Method not found`       |
//! | any other status >= 300               | -32000 | `<status> - <reason>`    |

use serde_json::Value;

use crate::batch::Batch;
use crate::error::ErrorObject;
use crate::error_codes;
use crate::response::Response;

const UNKNOWN_REASON: &str = "Unknown";

/// Map an HTTP status to an error. Statuses below 300 are not failures.
pub fn map_http_status(status: u16, reason: Option<&str>) -> Option<ErrorObject> {
    match status {
        0..300 => None,
        400 => Some(ErrorObject::invalid_params()),
        404 => Some(ErrorObject::method_not_found()),
        _ => Some(ErrorObject::new(
            error_codes::TRANSPORT_ERROR,
            format!("{} - {}", status, reason.unwrap_or(UNKNOWN_REASON)),
            None,
        )),
    }
}

/// Parse error for a body that is not JSON, is malformed, or could not be read
pub fn parse_error(detail: impl Into<String>) -> ErrorObject {
    ErrorObject::parse_error(Some(Value::String(detail.into())))
}

/// One error response per request of `batch`, each tagged with that request's id.
///
/// Keeps the cardinality and order of the batch when the exchange as a whole failed.
pub fn replicate_for_batch<T>(batch: &Batch, error: &ErrorObject) -> Vec<Response<T>> {
    batch
        .iter()
        .map(|request| Response::error(request.id().cloned(), error.clone()))
        .collect()
}
