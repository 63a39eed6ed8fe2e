//! Interpretation of completed HTTP exchanges
//!
//! Turns a [`TransportResponse`] into JSON-RPC responses. Both the async and the
//! blocking client go through these functions, so they agree on every edge case.
//! Nothing here fails: HTTP statuses, unreadable or malformed bodies and invalid
//! envelopes all become error responses.

use relay_rpc_protocol::error_map::{map_http_status, parse_error, replicate_for_batch};
use relay_rpc_protocol::{
    Batch, ErrorObject, Request, RequestId, Response, assert_valid, decode_batch, decode_one,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::transport::TransportResponse;

/// Interpret the answer to a single request.
///
/// Returns `None` only for a notification answered with a 2xx status. A call
/// always yields a response; synthesised errors carry the call's id.
pub fn interpret_single<T: DeserializeOwned>(
    request: &Request,
    response: &TransportResponse,
) -> Option<Response<T>> {
    let status_error = map_http_status(response.status, response.reason.as_deref());

    if request.is_notification() {
        return status_error.map(|error| {
            warn!(
                method = request.method(),
                status = response.status,
                code = error.code,
                "Notification rejected by server"
            );
            Response::error(None, error)
        });
    }

    let error = match read_json(response) {
        Ok(value) => match decode_one::<T>(&value) {
            Ok(decoded) => return Some(decoded),
            Err(schema_error) => {
                warn!(
                    method = request.method(),
                    status = response.status,
                    reason = %schema_error,
                    "Response is not a valid JSON-RPC envelope"
                );
                status_error.unwrap_or_else(|| schema_error.to_error_object())
            }
        },
        Err(detail) => status_error.unwrap_or_else(|| parse_error(detail)),
    };

    debug!(
        method = request.method(),
        status = response.status,
        code = error.code,
        "Synthesised error response"
    );
    Some(Response::error(request.id().cloned(), error))
}

/// Interpret the answer to a batch.
///
/// A JSON array is decoded element by element; an element that fails schema
/// validation becomes a parse error response without affecting its neighbours.
/// With a status of 300 or more the array is only trusted when it is non-empty
/// and every element is a valid envelope. When the exchange failed as a whole, the error is replicated once per request
/// of `batch`, in order. A 2xx answer to a batch of notifications may carry no
/// body at all and yields no responses.
pub fn interpret_batch<T: DeserializeOwned>(
    batch: &Batch,
    response: &TransportResponse,
) -> Vec<Response<T>> {
    if batch.is_empty() {
        return Vec::new();
    }

    let status_error = map_http_status(response.status, response.reason.as_deref());

    let detail = match read_json(response) {
        Ok(value) if value.is_array() => {
            if status_error.is_none() || is_envelope_array(&value) {
                return decode_elements(&value);
            }
            "batch response elements are not JSON-RPC envelopes".to_string()
        }
        Ok(value) => match batch_rejection(&value) {
            Some(error) => {
                warn!(
                    size = batch.len(),
                    code = error.code,
                    "Batch rejected by server"
                );
                return replicate_for_batch(batch, &error);
            }
            None => "batch response is not an array".to_string(),
        },
        Err(detail) => detail,
    };

    if status_error.is_none() && !batch.has_calls() {
        debug!(size = batch.len(), "Notification batch accepted");
        return Vec::new();
    }

    let error = status_error.unwrap_or_else(|| parse_error(detail));
    warn!(
        size = batch.len(),
        status = response.status,
        code = error.code,
        "Batch exchange failed"
    );
    replicate_for_batch(batch, &error)
}

fn decode_elements<T: DeserializeOwned>(value: &Value) -> Vec<Response<T>> {
    let elements = value.as_array().map(Vec::as_slice).unwrap_or_default();

    decode_batch::<T>(value)
        .unwrap_or_default()
        .into_iter()
        .zip(elements)
        .map(|(result, element)| {
            result.unwrap_or_else(|schema_error| {
                let id = element.get("id").and_then(RequestId::from_value);
                warn!(id = ?id, reason = %schema_error, "Invalid element in batch response");
                Response::error(id, schema_error.to_error_object())
            })
        })
        .collect()
}

fn is_envelope_array(value: &Value) -> bool {
    value.as_array().is_some_and(|elements| !elements.is_empty()) && assert_valid(value).is_ok()
}

/// Error carried by a single envelope sent back in place of a batch answer
fn batch_rejection(value: &Value) -> Option<ErrorObject> {
    decode_one::<Value>(value)
        .ok()
        .and_then(|response| response.error_object().cloned())
}

/// Parse the body as JSON, or describe why that is not possible
fn read_json(response: &TransportResponse) -> Result<Value, String> {
    if !response.is_json() {
        return Err(format!(
            "unexpected content type: {}",
            response.content_type().unwrap_or("none")
        ));
    }

    let body = response
        .body
        .as_ref()
        .ok_or_else(|| "response body could not be read".to_string())?;

    serde_json::from_slice(body).map_err(|e| format!("malformed JSON: {}", e))
}
