use std::collections::BTreeMap;
use std::fmt;

use crate::types::RequestId;

/// Named parameters of a request. Keys are unique and kept in sorted order.
pub type RequestParams = BTreeMap<String, String>;

/// Whether a request expects a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Carries an id, a response is expected
    Call,
    /// No id, fire-and-forget
    Notification,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Call => write!(f, "call"),
            RequestKind::Notification => write!(f, "notification"),
        }
    }
}

/// An immutable JSON-RPC request.
///
/// `id` is present iff `kind` is [`RequestKind::Call`]. Two requests are
/// equal when their method and id are equal.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    params: RequestParams,
    id: Option<RequestId>,
    kind: RequestKind,
}

impl Request {
    /// Build a call with a freshly generated id
    pub fn call(method: impl Into<String>, params: RequestParams) -> Self {
        Self {
            method: method.into(),
            params,
            id: Some(RequestId::generate()),
            kind: RequestKind::Call,
        }
    }

    /// Build a notification (no id)
    pub fn notification(method: impl Into<String>, params: RequestParams) -> Self {
        Self {
            method: method.into(),
            params,
            id: None,
            kind: RequestKind::Notification,
        }
    }

    /// Fluent builder for a call
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new(RequestKind::Call)
    }

    /// Fluent builder for a notification
    pub fn notification_builder() -> RequestBuilder {
        RequestBuilder::new(RequestKind::Notification)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn is_notification(&self) -> bool {
        self.kind == RequestKind::Notification
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.id == other.id
    }
}

impl Eq for Request {}

/// Accumulates method and params; `build` snapshots them into a new [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    kind: RequestKind,
    method: String,
    params: RequestParams,
}

impl RequestBuilder {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            method: String::new(),
            params: RequestParams::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Build a request. Each call yields a new request (and a new id for calls).
    pub fn build(&self) -> Request {
        match self.kind {
            RequestKind::Call => Request::call(self.method.clone(), self.params.clone()),
            RequestKind::Notification => {
                Request::notification(self.method.clone(), self.params.clone())
            }
        }
    }
}
