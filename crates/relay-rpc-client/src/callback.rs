//! Completion callbacks for fire-and-continue calls
//!
//! Exactly one of the two methods is invoked per exchange, on a runtime worker
//! thread. Closures taking the whole [`ClientResult`] implement both traits.

use relay_rpc_protocol::Response;

use crate::error::{ClientError, ClientResult};

/// Receives the outcome of a single request
pub trait ResponseCallback<T>: Send + 'static {
    /// The exchange completed; `None` for an accepted notification
    fn on_response(self, response: Option<Response<T>>);

    /// No HTTP exchange completed
    fn on_failure(self, error: ClientError);
}

/// Receives the outcome of a batch
pub trait BatchCallback<T>: Send + 'static {
    /// The exchange completed, one response per answered request
    fn on_response(self, responses: Vec<Response<T>>);

    /// No HTTP exchange completed
    fn on_failure(self, error: ClientError);
}

impl<T, F> ResponseCallback<T> for F
where
    F: FnOnce(ClientResult<Option<Response<T>>>) + Send + 'static,
{
    fn on_response(self, response: Option<Response<T>>) {
        self(Ok(response))
    }

    fn on_failure(self, error: ClientError) {
        self(Err(error))
    }
}

impl<T, F> BatchCallback<T> for F
where
    F: FnOnce(ClientResult<Vec<Response<T>>>) + Send + 'static,
{
    fn on_response(self, responses: Vec<Response<T>>) {
        self(Ok(responses))
    }

    fn on_failure(self, error: ClientError) {
        self(Err(error))
    }
}

/// Route a result to the matching callback method
pub(crate) fn deliver<T, C: ResponseCallback<T>>(callback: C, result: ClientResult<Option<Response<T>>>) {
    match result {
        Ok(response) => callback.on_response(response),
        Err(error) => callback.on_failure(error),
    }
}

pub(crate) fn deliver_batch<T, C: BatchCallback<T>>(callback: C, result: ClientResult<Vec<Response<T>>>) {
    match result {
        Ok(responses) => callback.on_response(responses),
        Err(error) => callback.on_failure(error),
    }
}
