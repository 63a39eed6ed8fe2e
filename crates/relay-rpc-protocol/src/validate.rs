//! JSON-RPC 2.0 schema validation.
//!
//! Validation is pure and runs before any payload decoding, so a structurally
//! invalid envelope never reaches the response decoder.

use serde_json::{Map, Value};

use crate::JSONRPC_VERSION;
use crate::error::SchemaError;

/// Check a value is a valid envelope, or an array of valid envelopes.
///
/// JSON `null` is rejected as [`SchemaError::Null`]. Array elements are
/// validated independently and the first failure is reported.
pub fn assert_valid(value: &Value) -> Result<(), SchemaError> {
    match value {
        Value::Array(elements) => elements.iter().try_for_each(assert_valid_object),
        other => assert_valid_object(other),
    }
}

/// Check a single value is a valid request-shaped or response-shaped envelope
pub fn assert_valid_object(value: &Value) -> Result<(), SchemaError> {
    let object = match value {
        Value::Null => return Err(SchemaError::Null),
        Value::Object(object) => object,
        _ => return Err(SchemaError::NotAnObject),
    };

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(SchemaError::BadVersion);
    }

    if object.contains_key("method") {
        check_request(object)
    } else {
        check_response(object)
    }
}

fn check_request(object: &Map<String, Value>) -> Result<(), SchemaError> {
    if let Some(params) = object.get("params")
        && !(params.is_array() || params.is_object())
    {
        return Err(SchemaError::BadParams);
    }

    match object.get("id") {
        Some(id) if !is_valid_id(id) => Err(SchemaError::BadId),
        _ => Ok(()),
    }
}

fn check_response(object: &Map<String, Value>) -> Result<(), SchemaError> {
    let id = object.get("id").ok_or(SchemaError::MissingId)?;
    if !is_valid_id(id) {
        return Err(SchemaError::BadId);
    }

    match (object.get("result"), object.get("error")) {
        (Some(_), Some(_)) => Err(SchemaError::ConflictingResultAndError),
        (None, None) => Err(SchemaError::MissingResult),
        (None, Some(error)) => check_error(error),
        (Some(_), None) => Ok(()),
    }
}

fn check_error(error: &Value) -> Result<(), SchemaError> {
    let well_formed = error.as_object().is_some_and(|error| {
        error.get("code").is_some_and(Value::is_i64) && error.get("message").is_some_and(Value::is_string)
    });

    if well_formed {
        Ok(())
    } else {
        Err(SchemaError::MalformedError)
    }
}

fn is_valid_id(id: &Value) -> bool {
    id.is_string() || id.is_i64() || id.is_null()
}
