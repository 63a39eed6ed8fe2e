use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use tracing::debug;

use crate::error::{ErrorObject, ResponseError, ResultDecodeError, SchemaError};
use crate::types::RequestId;
use crate::validate::assert_valid_object;

/// Outcome carried by a response. Exactly one variant is ever present, so a
/// response can never hold both a result and an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload<T> {
    /// `result` decoded into the caller's type
    Result(T),
    /// The server (or the error mapper) reported an error
    Error(ErrorObject),
    /// The envelope was valid but `result` did not match the caller's type
    ResultDecode(ResultDecodeError),
}

/// A decoded JSON-RPC response
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    /// `None` when the wire id was null or the response was synthesised
    pub id: Option<RequestId>,
    pub payload: ResponsePayload<T>,
}

impl<T> Response<T> {
    pub fn new(id: Option<RequestId>, payload: ResponsePayload<T>) -> Self {
        Self { id, payload }
    }

    pub fn success(id: Option<RequestId>, result: T) -> Self {
        Self::new(id, ResponsePayload::Result(result))
    }

    pub fn error(id: Option<RequestId>, error: ErrorObject) -> Self {
        Self::new(id, ResponsePayload::Error(error))
    }

    pub fn result(&self) -> Option<&T> {
        match &self.payload {
            ResponsePayload::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_object(&self) -> Option<&ErrorObject> {
        match &self.payload {
            ResponsePayload::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn decode_error(&self) -> Option<&ResultDecodeError> {
        match &self.payload {
            ResponsePayload::ResultDecode(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.payload, ResponsePayload::Result(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }

    pub fn into_result(self) -> Result<T, ResponseError> {
        match self.payload {
            ResponsePayload::Result(result) => Ok(result),
            ResponsePayload::Error(error) => Err(ResponseError::Remote(error)),
            ResponsePayload::ResultDecode(error) => Err(ResponseError::Decode(error)),
        }
    }
}

/// Validate and decode a single response, deserializing `result` into `T`
pub fn decode_one<T: DeserializeOwned>(value: &Value) -> Result<Response<T>, SchemaError> {
    decode_one_with(value, |result| T::deserialize(result))
}

/// Validate and decode a single response with a caller-supplied result decoder.
///
/// Schema violations are returned as `Err`. A decoder failure is not a protocol
/// error: it is returned inside the response as [`ResponsePayload::ResultDecode`].
pub fn decode_one_with<T, E, F>(value: &Value, decoder: F) -> Result<Response<T>, SchemaError>
where
    F: FnOnce(&Value) -> Result<T, E>,
    E: Display,
{
    assert_valid_object(value)?;
    if value.get("method").is_some() {
        return Err(SchemaError::NotAResponse);
    }

    let id = value.get("id").and_then(RequestId::from_value);

    let payload = match (value.get("error"), value.get("result")) {
        (Some(error), _) => match ErrorObject::deserialize(error) {
            Ok(error) => ResponsePayload::Error(error),
            Err(_) => return Err(SchemaError::MalformedError),
        },
        (None, Some(result)) => match decoder(result) {
            Ok(result) => ResponsePayload::Result(result),
            Err(e) => {
                debug!(id = ?id, error = %e, "Result did not match the expected type");
                ResponsePayload::ResultDecode(ResultDecodeError::new(e.to_string(), result.clone()))
            }
        },
        (None, None) => return Err(SchemaError::MissingResult),
    };

    Ok(Response::new(id, payload))
}

/// Decode a batch response.
///
/// The top-level value must be an array. Every element is decoded on its own,
/// so the output always has the same length as the input and one invalid
/// element does not affect the others.
pub fn decode_batch<T: DeserializeOwned>(
    value: &Value,
) -> Result<Vec<Result<Response<T>, SchemaError>>, SchemaError> {
    decode_batch_with(value, |result| T::deserialize(result))
}

/// [`decode_batch`] with a caller-supplied result decoder
pub fn decode_batch_with<T, E, F>(
    value: &Value,
    decoder: F,
) -> Result<Vec<Result<Response<T>, SchemaError>>, SchemaError>
where
    F: Fn(&Value) -> Result<T, E>,
    E: Display,
{
    let elements = match value {
        Value::Null => return Err(SchemaError::Null),
        Value::Array(elements) => elements,
        _ => return Err(SchemaError::NotAnArray),
    };

    Ok(elements
        .iter()
        .map(|element| decode_one_with(element, &decoder))
        .collect())
}
