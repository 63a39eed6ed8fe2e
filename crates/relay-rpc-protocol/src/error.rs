use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::error_codes;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl ErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            ErrorCode::ParseError => error_codes::PARSE_ERROR,
            ErrorCode::InvalidRequest => error_codes::INVALID_REQUEST,
            ErrorCode::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            ErrorCode::InvalidParams => error_codes::INVALID_PARAMS,
            ErrorCode::InternalError => error_codes::INTERNAL_ERROR,
            ErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ServerError(_) => "Server error",
        }
    }

    /// Classify a raw code. Codes outside the reserved ranges yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            error_codes::PARSE_ERROR => Some(ErrorCode::ParseError),
            error_codes::INVALID_REQUEST => Some(ErrorCode::InvalidRequest),
            error_codes::METHOD_NOT_FOUND => Some(ErrorCode::MethodNotFound),
            error_codes::INVALID_PARAMS => Some(ErrorCode::InvalidParams),
            error_codes::INTERNAL_ERROR => Some(ErrorCode::InternalError),
            c if (error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END).contains(&c) => {
                Some(ErrorCode::ServerError(c))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object.
///
/// Equality and hashing only consider `code` and `message`; `data` is
/// diagnostic and may differ between otherwise identical failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn from_code(code: ErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::from_code(ErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::from_code(ErrorCode::InvalidRequest, None, data)
    }

    pub fn method_not_found() -> Self {
        Self::from_code(ErrorCode::MethodNotFound, None, None)
    }

    pub fn invalid_params() -> Self {
        Self::from_code(ErrorCode::InvalidParams, None, None)
    }
}

impl PartialEq for ErrorObject {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message
    }
}

impl Eq for ErrorObject {}

impl Hash for ErrorObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.message.hash(state);
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorObject {}

/// Reasons a JSON value is not a valid JSON-RPC 2.0 envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("the provided JSON cannot be null")]
    Null,

    #[error("the provided JSON is not an object")]
    NotAnObject,

    #[error("the provided JSON is not an array")]
    NotAnArray,

    #[error("only JSON-RPC 2.0 envelopes are supported")]
    BadVersion,

    #[error("the envelope is a request, not a response")]
    NotAResponse,

    #[error("member 'params' must be an object or an array")]
    BadParams,

    #[error("member 'id' must be a string, an integer or null")]
    BadId,

    #[error("member 'id' must be provided")]
    MissingId,

    #[error("member 'result' cannot be provided when 'error' is present")]
    ConflictingResultAndError,

    #[error("member 'result' is mandatory")]
    MissingResult,

    #[error("member 'error' is not valid")]
    MalformedError,
}

impl SchemaError {
    /// The Parse error reported for this invalid envelope, reason attached as data
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject::parse_error(Some(Value::String(self.to_string())))
    }
}

/// The envelope was valid but `result` did not match the expected type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to decode result: {message}")]
pub struct ResultDecodeError {
    pub message: String,
    /// The raw `result` member as received
    pub value: Value,
}

impl ResultDecodeError {
    pub fn new(message: impl Into<String>, value: Value) -> Self {
        Self {
            message: message.into(),
            value,
        }
    }
}

/// Failure outcome of a completed response
#[derive(Debug, Clone, Error)]
pub enum ResponseError {
    #[error(transparent)]
    Remote(ErrorObject),

    #[error(transparent)]
    Decode(#[from] ResultDecodeError),
}

impl From<ErrorObject> for ResponseError {
    fn from(error: ErrorObject) -> Self {
        ResponseError::Remote(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::ParseError.code(), -32700);
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::from_code(-32050), Some(ErrorCode::ServerError(-32050)));
        assert_eq!(ErrorCode::from_code(42), None);
    }

    #[test]
    fn test_reserved_constructors() {
        assert_eq!(ErrorObject::parse_error(None).code, -32700);
        assert_eq!(ErrorObject::invalid_request(None).code, -32600);
        assert_eq!(ErrorObject::method_not_found().code, -32601);
        assert_eq!(ErrorObject::invalid_params().message, "Invalid params");
    }

    #[test]
    fn test_equality_ignores_data() {
        let a = ErrorObject::new(-32000, "500 - Internal Server Error", Some(json!({"trace": 1})));
        let b = ErrorObject::new(-32000, "500 - Internal Server Error", None);
        assert_eq!(a, b);

        let c = ErrorObject::new(-32001, "500 - Internal Server Error", None);
        assert_ne!(a, c);
    }

    #[test]
    fn test_error_serialization() {
        let error = ErrorObject::method_not_found();
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, json!({"code": -32601, "message": "Method not found"}));
    }

    #[test]
    fn test_schema_error_maps_to_parse_error() {
        let error = SchemaError::MissingId.to_error_object();
        assert_eq!(error, ErrorObject::parse_error(None));
        assert_eq!(error.data, Some(json!("member 'id' must be provided")));
    }
}
