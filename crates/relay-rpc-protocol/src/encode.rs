//! Wire encoding of requests.
//!
//! The encoder does not validate its input: an empty method is transmitted as
//! is and the server decides.

use serde_json::{Map, Value};

use crate::JSONRPC_VERSION;
use crate::request::Request;

/// Encode a single request as a JSON-RPC 2.0 object
pub fn encode(request: &Request) -> Value {
    let mut object = Map::new();
    object.insert(
        "jsonrpc".to_string(),
        Value::String(JSONRPC_VERSION.to_string()),
    );
    object.insert(
        "method".to_string(),
        Value::String(request.method().to_string()),
    );

    if let Some(id) = request.id() {
        object.insert("id".to_string(), id.to_value());
    }

    if !request.params().is_empty() {
        let params = request
            .params()
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        object.insert("params".to_string(), Value::Object(params));
    }

    Value::Object(object)
}

/// Encode requests as a JSON array, preserving order
pub fn encode_batch<'a>(requests: impl IntoIterator<Item = &'a Request>) -> Value {
    Value::Array(requests.into_iter().map(encode).collect())
}

/// Serialize an encoded envelope to UTF-8 body bytes
pub fn to_vec(value: &Value) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(value)
}
